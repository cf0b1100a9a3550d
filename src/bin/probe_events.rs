//! Manual probe for the event extraction against a live page. Fetches
//! a fixed date, reports whether the events section was located, and
//! prints the first few extracted items. Does not touch the database.

use almanac_ingest::errors::IngestError;
use almanac_ingest::events::{page_url, EventScraper};
use almanac_ingest::http_client::HttpClient;

#[tokio::main]
async fn main() -> Result<(), IngestError> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let (month, day) = (11, 21);
    let url = page_url(month, day);
    println!("Probing: {url}");

    let mut client = HttpClient::new();
    let html = client.get(&url, &[]).await?;
    client.print_stats();

    let mut scraper = EventScraper::new(month, day, html);
    scraper.run()?;

    if scraper.events().is_empty() {
        println!("No events extracted (is the Events section present?)");
        return Ok(());
    }

    println!("Extracted {} events; first 3:", scraper.events().len());
    for event in scraper.events().iter().take(3) {
        println!("  {} – {}", event.year, event.description);
    }

    scraper.pretty_print();

    Ok(())
}
