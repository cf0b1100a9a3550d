use almanac_ingest::config::Config;
use almanac_ingest::db::with_connection;
use almanac_ingest::errors::IngestError;
use almanac_ingest::events::{page_url, EventScraper};
use almanac_ingest::http_client::HttpClient;
use chrono::{Datelike, Local};

#[tokio::main]
async fn main() -> Result<(), IngestError> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let config = Config::from_env();
    let today = Local::now();
    let (month, day) = (today.month(), today.day());

    println!(
        "Scraping historical events for {}...\n",
        today.format("%B %d")
    );

    let url = page_url(month, day);
    println!("Scraping: {url}");

    // A transport failure means an empty page, which falls through to
    // the no-events notice below.
    let mut client = HttpClient::new();
    let html = match client.get(&url, &[]).await {
        Ok(html) => html,
        Err(e) => {
            log::warn!("Error scraping {url}: {e}");
            String::new()
        }
    };

    let mut scraper = EventScraper::new(month, day, html);
    scraper.run()?;

    if scraper.events().is_empty() {
        println!("\nNo events found");
        return Ok(());
    }

    let inserted = match with_connection(&config.db_path, |conn| scraper.save_to_db(conn)) {
        Ok(inserted) => inserted,
        Err(e) => {
            log::error!("Database error: {e}");
            0
        }
    };

    println!("\nInserted {inserted} events into database");

    Ok(())
}
