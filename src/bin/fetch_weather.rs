use almanac_ingest::config::{Config, GERMAN_CITIES};
use almanac_ingest::db::with_connection;
use almanac_ingest::errors::IngestError;
use almanac_ingest::weather::{extract_reading, store_reading, WeatherFetcher};
use std::time::{Duration, Instant};
use tokio::time::sleep;

#[tokio::main]
async fn main() -> Result<(), IngestError> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let config = Config::from_env();
    let mut fetcher = WeatherFetcher::new(&config)?;

    println!(
        "Fetching weather data for {} German cities...\n",
        GERMAN_CITIES.len()
    );

    let start = Instant::now();
    let mut success_count = 0u32;
    let mut failure_count = 0u32;

    for (i, city) in GERMAN_CITIES.iter().enumerate() {
        println!("[{}/{}] Fetching {city}...", i + 1, GERMAN_CITIES.len());

        let stored = match fetcher.fetch(city).await {
            Some(body) => store_city(&config, &body),
            None => false,
        };
        if stored {
            success_count += 1;
        } else {
            failure_count += 1;
        }

        // The free tier allows 60 calls a minute; one second between
        // requests keeps well under that.
        if i + 1 < GERMAN_CITIES.len() {
            sleep(Duration::from_secs(1)).await;
        }
    }

    let ruler = "=".repeat(50);
    println!("\n{ruler}");
    println!("Successfully inserted: {success_count}");
    println!("Failed: {failure_count}");
    println!("{ruler}");
    println!("Total time: {:.2} seconds", start.elapsed().as_secs_f64());
    fetcher.print_stats();

    Ok(())
}

/// Extract one fetched payload and insert it over a connection of its
/// own. Either failure is logged and only costs this record.
fn store_city(config: &Config, body: &str) -> bool {
    let reading = match extract_reading(body) {
        Ok(reading) => reading,
        Err(e) => {
            log::error!("Missing data field: {e}");
            return false;
        }
    };

    match with_connection(&config.db_path, |conn| store_reading(conn, &reading)) {
        Ok(()) => {
            println!(
                "  {}: {}°C, {}",
                reading.city, reading.temperature_c, reading.description
            );
            true
        }
        Err(e) => {
            log::error!("Database error for {}: {e}", reading.city);
            false
        }
    }
}
