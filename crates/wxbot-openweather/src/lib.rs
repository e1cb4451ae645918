//! OpenWeatherMap adapter (reqwest).
//!
//! Implements the `wxbot-core` WeatherPort over the free OpenWeatherMap API:
//! current conditions plus the 3-hourly 5-day forecast, metric units only.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use wxbot_core::{
    weather::{sample_daily, Forecast, ForecastEntry, WeatherPort, WeatherSnapshot},
    Error, Result,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Config(format!("failed to build http client: {e}")))?;

        Ok(Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    async fn get_json<T>(&self, endpoint: &str, location: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}/data/2.5/{endpoint}", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", location),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| Error::WeatherUnavailable(format!("{endpoint} request failed: {e}")))?;

        let status = res.status();
        if status.is_client_error() {
            // The API answers 404 for unknown cities and 400 for garbage
            // input; both read as "no weather for that location" to the user.
            return Err(Error::WeatherNotFound {
                location: location.to_string(),
            });
        }
        if !status.is_success() {
            return Err(Error::WeatherUnavailable(format!(
                "{endpoint} returned status {status}"
            )));
        }

        res.json::<T>()
            .await
            .map_err(|e| Error::WeatherUnavailable(format!("failed to parse {endpoint} response: {e}")))
    }
}

#[async_trait]
impl WeatherPort for OpenWeatherClient {
    async fn current(&self, location: &str) -> Result<WeatherSnapshot> {
        let parsed: OwCurrentResponse = self.get_json("weather", location).await?;
        let (condition, description) = primary_condition(&parsed.weather);

        Ok(WeatherSnapshot {
            city: parsed.name,
            country: parsed.sys.country,
            temp_c: parsed.main.temp,
            condition,
            description,
            wind_mps: parsed.wind.speed,
            humidity: parsed.main.humidity,
            sunrise: parsed.sys.sunrise,
            sunset: parsed.sys.sunset,
        })
    }

    async fn forecast(&self, location: &str) -> Result<Forecast> {
        let parsed: OwForecastResponse = self.get_json("forecast", location).await?;

        let entries = parsed
            .list
            .into_iter()
            .map(|e| {
                let (condition, description) = primary_condition(&e.weather);
                ForecastEntry {
                    timestamp: e.dt,
                    temp_c: e.main.temp,
                    condition,
                    description,
                    wind_mps: e.wind.speed,
                }
            })
            .collect();

        Ok(Forecast {
            city: parsed.city.name,
            country: parsed.city.country,
            entries: sample_daily(entries),
        })
    }
}

fn primary_condition(weather: &[OwWeather]) -> (String, String) {
    weather
        .first()
        .map(|w| (w.main.clone(), w.description.clone()))
        .unwrap_or_else(|| ("Unknown".to_string(), "unknown conditions".to_string()))
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    sys: OwSys,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}
