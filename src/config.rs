use std::env;
use std::path::PathBuf;

/// The fixed set of cities polled by the weather driver.
pub const GERMAN_CITIES: &[&str] = &[
    "Berlin",
    "Hamburg",
    "Munich",
    "Cologne",
    "Frankfurt",
    "Stuttgart",
    "Dusseldorf",
    "Leipzig",
    "Dortmund",
    "Essen",
    "Bremen",
    "Dresden",
    "Hanover",
    "Nuremberg",
    "Duisburg",
    "Bochum",
    "Wuppertal",
    "Bielefeld",
    "Bonn",
    "Munster",
];

/// Country code appended to every city query.
pub const COUNTRY_CODE: &str = "DE";

/// Run-scoped configuration, built once from the environment and
/// passed by reference into the stages that need it.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the SQLite database file, `ALMANAC_DB` (default `almanac.db`).
    pub db_path: PathBuf,
    /// OpenWeatherMap API key, `OPENWEATHER_API_KEY`. Only the weather
    /// pipeline requires it.
    pub api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let db_path = env::var("ALMANAC_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("almanac.db"));
        let api_key = env::var("OPENWEATHER_API_KEY").ok();

        Self { db_path, api_key }
    }
}
