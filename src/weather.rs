use crate::config::{Config, COUNTRY_CODE};
use crate::errors::IngestError;
use crate::http_client::HttpClient;
use log::warn;
use rusqlite::{params, Connection};
use serde::Deserialize;

const OPENWEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// One weather observation for one city, as stored in `raw_weather`.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReading {
    pub city: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub description: String,
    pub pressure_hpa: u32,
    pub wind_speed_ms: f64,
    pub wind_direction_deg: u16,
    pub visibility_m: u32,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    #[serde(default)]
    deg: u16,
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwPayload {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    coord: OwCoord,
    #[serde(default)]
    visibility: u32,
}

pub struct WeatherFetcher {
    client: HttpClient,
    api_key: String,
}

impl WeatherFetcher {
    pub fn new(config: &Config) -> Result<Self, IngestError> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            IngestError::Config("OPENWEATHER_API_KEY is not set".to_string())
        })?;

        Ok(Self {
            client: HttpClient::new(),
            api_key,
        })
    }

    /// Fetch the current weather for one city. Metric units, one
    /// attempt. Transport and HTTP-status failures are logged and
    /// collapse to `None`; nothing propagates to the caller.
    pub async fn fetch(&mut self, city: &str) -> Option<String> {
        let place = format!("{city},{COUNTRY_CODE}");
        let query = [
            ("q", place.as_str()),
            ("appid", self.api_key.as_str()),
            ("units", "metric"),
        ];

        match self.client.get(OPENWEATHER_URL, &query).await {
            Ok(body) => Some(body),
            Err(e) => {
                warn!("Error fetching weather for {city}: {e}");
                None
            }
        }
    }

    pub fn print_stats(&self) {
        self.client.print_stats();
    }
}

/// Turn a raw response body into a reading. A missing required field
/// surfaces as a payload error, distinct from any database failure; an
/// absent `wind.deg` or `visibility` defaults to 0.
pub fn extract_reading(body: &str) -> Result<WeatherReading, IngestError> {
    let payload: OwPayload = serde_json::from_str(body)?;

    let description = payload
        .weather
        .into_iter()
        .next()
        .ok_or(IngestError::MissingField("weather[0]"))?
        .description;

    Ok(WeatherReading {
        city: payload.name,
        temperature_c: payload.main.temp,
        feels_like_c: payload.main.feels_like,
        humidity_pct: payload.main.humidity,
        description,
        pressure_hpa: payload.main.pressure,
        wind_speed_ms: payload.wind.speed,
        wind_direction_deg: payload.wind.deg,
        visibility_m: payload.visibility,
        latitude: payload.coord.lat,
        longitude: payload.coord.lon,
    })
}

/// Insert one reading as one row. A failure here aborts this record
/// only; the driver keeps going.
pub fn store_reading(conn: &Connection, reading: &WeatherReading) -> Result<(), IngestError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS raw_weather (
            id INTEGER PRIMARY KEY,
            city TEXT NOT NULL,
            temperature REAL NOT NULL,
            feels_like REAL NOT NULL,
            humidity INTEGER NOT NULL,
            weather_description TEXT NOT NULL,
            pressure_hpa INTEGER NOT NULL,
            wind_speed_ms REAL NOT NULL,
            wind_direction_deg INTEGER NOT NULL,
            visibility_meters INTEGER NOT NULL,
            latitude REAL NOT NULL,
            longitude REAL NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "INSERT INTO raw_weather
         (city, temperature, feels_like, humidity, weather_description,
          pressure_hpa, wind_speed_ms, wind_direction_deg, visibility_meters,
          latitude, longitude)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            reading.city,
            reading.temperature_c,
            reading.feels_like_c,
            reading.humidity_pct,
            reading.description,
            reading.pressure_hpa,
            reading.wind_speed_ms,
            reading.wind_direction_deg,
            reading.visibility_m,
            reading.latitude,
            reading.longitude,
        ],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_PAYLOAD: &str = r#"{
        "coord": {"lon": 13.41, "lat": 52.52},
        "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
        "main": {"temp": 18.3, "feels_like": 17.9, "pressure": 1012, "humidity": 72},
        "visibility": 10000,
        "wind": {"speed": 4.1, "deg": 250},
        "name": "Berlin"
    }"#;

    #[test]
    fn extract_copies_fields_verbatim() {
        let reading = extract_reading(FULL_PAYLOAD).expect("payload should parse");

        assert_eq!(reading.city, "Berlin");
        assert_eq!(reading.temperature_c, 18.3);
        assert_eq!(reading.feels_like_c, 17.9);
        assert_eq!(reading.humidity_pct, 72);
        assert_eq!(reading.description, "light rain");
        assert_eq!(reading.pressure_hpa, 1012);
        assert_eq!(reading.wind_speed_ms, 4.1);
        assert_eq!(reading.wind_direction_deg, 250);
        assert_eq!(reading.visibility_m, 10000);
        assert_eq!(reading.latitude, 52.52);
        assert_eq!(reading.longitude, 13.41);
    }

    #[test]
    fn extract_fails_on_missing_required_field() {
        // "temp" removed from "main"
        let body = r#"{
            "coord": {"lon": 13.41, "lat": 52.52},
            "weather": [{"description": "light rain"}],
            "main": {"feels_like": 17.9, "pressure": 1012, "humidity": 72},
            "wind": {"speed": 4.1},
            "name": "Berlin"
        }"#;

        let err = extract_reading(body).unwrap_err();
        assert!(matches!(err, IngestError::Payload(_)));
    }

    #[test]
    fn extract_fails_on_empty_weather_array() {
        let body = r#"{
            "coord": {"lon": 13.41, "lat": 52.52},
            "weather": [],
            "main": {"temp": 18.3, "feels_like": 17.9, "pressure": 1012, "humidity": 72},
            "wind": {"speed": 4.1},
            "name": "Berlin"
        }"#;

        let err = extract_reading(body).unwrap_err();
        assert!(matches!(err, IngestError::MissingField("weather[0]")));
    }

    #[test]
    fn extract_defaults_optional_fields_to_zero() {
        // No "deg" in "wind" and no top-level "visibility".
        let body = r#"{
            "coord": {"lon": 9.99, "lat": 53.55},
            "weather": [{"description": "overcast clouds"}],
            "main": {"temp": 15.0, "feels_like": 14.2, "pressure": 1008, "humidity": 81},
            "wind": {"speed": 6.7},
            "name": "Hamburg"
        }"#;

        let reading = extract_reading(body).expect("payload should parse");
        assert_eq!(reading.wind_direction_deg, 0);
        assert_eq!(reading.visibility_m, 0);
    }

    #[test]
    fn store_inserts_exactly_one_matching_row() {
        let conn = Connection::open_in_memory().expect("in-memory db");
        let reading = extract_reading(FULL_PAYLOAD).expect("payload should parse");

        store_reading(&conn, &reading).expect("insert should succeed");

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM raw_weather", [], |row| row.get(0))
            .expect("count");
        assert_eq!(count, 1);

        let stored = conn
            .query_row(
                "SELECT city, temperature, feels_like, humidity, weather_description,
                        pressure_hpa, wind_speed_ms, wind_direction_deg, visibility_meters,
                        latitude, longitude
                 FROM raw_weather",
                [],
                |row| {
                    Ok(WeatherReading {
                        city: row.get(0)?,
                        temperature_c: row.get(1)?,
                        feels_like_c: row.get(2)?,
                        humidity_pct: row.get(3)?,
                        description: row.get(4)?,
                        pressure_hpa: row.get(5)?,
                        wind_speed_ms: row.get(6)?,
                        wind_direction_deg: row.get(7)?,
                        visibility_m: row.get(8)?,
                        latitude: row.get(9)?,
                        longitude: row.get(10)?,
                    })
                },
            )
            .expect("row");

        assert_eq!(stored, reading);
    }

    #[test]
    fn fetcher_requires_api_key() {
        let config = Config {
            db_path: "almanac.db".into(),
            api_key: None,
        };

        let err = WeatherFetcher::new(&config).err().expect("must fail");
        assert!(matches!(err, IngestError::Config(_)));
    }
}
