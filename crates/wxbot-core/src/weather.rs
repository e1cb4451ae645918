//! Weather data model and the provider port.

use async_trait::async_trait;

use crate::Result;

/// Current conditions for one location, as resolved by the provider.
///
/// Transient: produced per request, never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct WeatherSnapshot {
    pub city: String,
    pub country: String,
    pub temp_c: f64,
    /// Coarse category ("Clear", "Rain", ...); drives the emoji lookup.
    pub condition: String,
    /// Fine-grained text ("light rain").
    pub description: String,
    pub wind_mps: f64,
    pub humidity: u8,
    /// Epoch seconds.
    pub sunrise: i64,
    /// Epoch seconds.
    pub sunset: i64,
}

/// One representative ~24h step of a 5-day forecast.
#[derive(Clone, Debug, PartialEq)]
pub struct ForecastEntry {
    /// Epoch seconds.
    pub timestamp: i64,
    pub temp_c: f64,
    pub condition: String,
    pub description: String,
    pub wind_mps: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Forecast {
    pub city: String,
    pub country: String,
    pub entries: Vec<ForecastEntry>,
}

/// Weather provider port.
///
/// OpenWeatherMap is the first implementation. Locations are untrusted free
/// text; validation is left entirely to the provider, and provider rejections
/// surface as `Error::WeatherNotFound`. Units are fixed to metric.
#[async_trait]
pub trait WeatherPort: Send + Sync {
    async fn current(&self, location: &str) -> Result<WeatherSnapshot>;
    async fn forecast(&self, location: &str) -> Result<Forecast>;
}

/// Provider forecast steps per sampled calendar day (3-hour resolution).
pub const STEPS_PER_DAY: usize = 8;

/// Reduce the provider's 3-hourly forecast list to one representative entry
/// per calendar day across the 5-day window.
pub fn sample_daily(entries: Vec<ForecastEntry>) -> Vec<ForecastEntry> {
    entries.into_iter().step_by(STEPS_PER_DAY).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(timestamp: i64) -> ForecastEntry {
        ForecastEntry {
            timestamp,
            temp_c: 10.0,
            condition: "Clouds".to_string(),
            description: "scattered clouds".to_string(),
            wind_mps: 3.0,
        }
    }

    #[test]
    fn samples_one_entry_per_day_over_five_days() {
        // 5 days of 3-hourly steps, as the provider returns them.
        let entries: Vec<_> = (0..40).map(|i| entry(i * 3 * 3600)).collect();

        let sampled = sample_daily(entries);

        assert_eq!(sampled.len(), 5);
        let expected: Vec<i64> = [0, 8, 16, 24, 32]
            .iter()
            .map(|i| i * 3 * 3600)
            .collect();
        let got: Vec<i64> = sampled.iter().map(|e| e.timestamp).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn sampling_a_short_list_keeps_the_first_entry() {
        let sampled = sample_daily(vec![entry(100), entry(200)]);
        assert_eq!(sampled.len(), 1);
        assert_eq!(sampled[0].timestamp, 100);
    }

    #[test]
    fn sampling_an_empty_list_is_empty() {
        assert!(sample_daily(Vec::new()).is_empty());
    }
}
