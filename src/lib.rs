//! Ingestion pipelines for the city almanac database.
//!
//! Two independent fetch -> extract -> write pipelines share this
//! library: current weather for a fixed list of German cities
//! (OpenWeatherMap -> `raw_weather`) and "on this day" historical
//! events (Wikipedia -> `historical_events`). The binaries under
//! `src/bin/` are thin sequential drivers around these modules.

pub mod config;
pub mod db;
pub mod errors;
pub mod events;
pub mod http_client;
pub mod weather;
