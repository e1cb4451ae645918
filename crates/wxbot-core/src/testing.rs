//! Shared in-crate test doubles for the ports.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    config::Config,
    domain::ChatId,
    messaging::MessagingPort,
    weather::{Forecast, ForecastEntry, WeatherPort, WeatherSnapshot},
    Error, Result,
};

pub fn test_config(enhanced: bool) -> Config {
    Config {
        telegram_bot_token: "test-token".to_string(),
        weather_api_key: "test-key".to_string(),
        weather_api_base: "http://localhost".to_string(),
        subscribers_file: "subscribers.json".into(),
        enhanced,
    }
}

#[derive(Default)]
pub struct RecordingMessenger {
    sent: Mutex<Vec<(ChatId, String)>>,
}

impl RecordingMessenger {
    pub fn sent(&self) -> Vec<(ChatId, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessagingPort for RecordingMessenger {
    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<()> {
        self.sent.lock().unwrap().push((chat_id, html.to_string()));
        Ok(())
    }
}

/// Deterministic provider: resolves any location to fixed conditions, or
/// fails for the configured locations.
#[derive(Default)]
pub struct FakeWeather {
    failing: Vec<String>,
}

impl FakeWeather {
    pub fn failing_for(location: &str) -> Self {
        Self {
            failing: vec![location.to_string()],
        }
    }

    fn check(&self, location: &str) -> Result<()> {
        if self.failing.iter().any(|l| l == location) {
            return Err(Error::WeatherNotFound {
                location: location.to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl WeatherPort for FakeWeather {
    async fn current(&self, location: &str) -> Result<WeatherSnapshot> {
        self.check(location)?;
        Ok(WeatherSnapshot {
            city: location.to_string(),
            country: "GB".to_string(),
            temp_c: 7.6,
            condition: "Rain".to_string(),
            description: "light rain".to_string(),
            wind_mps: 4.1,
            humidity: 81,
            sunrise: 1_700_000_000,
            sunset: 1_700_030_000,
        })
    }

    async fn forecast(&self, location: &str) -> Result<Forecast> {
        self.check(location)?;
        Ok(Forecast {
            city: location.to_string(),
            country: "XX".to_string(),
            entries: (0..5)
                .map(|i| ForecastEntry {
                    timestamp: 1_700_000_000 + i * 86_400,
                    temp_c: 9.9,
                    condition: "Clouds".to_string(),
                    description: "broken clouds".to_string(),
                    wind_mps: 2.5,
                })
                .collect(),
        })
    }
}
