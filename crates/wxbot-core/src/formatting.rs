//! Reply templates: weather payloads to Telegram HTML, plus the
//! condition → emoji table.

use chrono::{DateTime, Local};

use crate::weather::{Forecast, WeatherSnapshot};

/// Escape HTML special characters for Telegram HTML parse mode.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Map the provider's coarse condition category to a decorative emoji.
///
/// Total: unknown categories fall back to the rainbow, never error.
pub fn emoji_for(condition: &str) -> &'static str {
    match condition {
        "Clear" => "☀️",
        "Clouds" => "☁️",
        "Rain" => "🌧️",
        "Snow" => "❄️",
        "Thunderstorm" => "⛈️",
        "Drizzle" => "🌦️",
        "Mist" | "Smoke" | "Haze" | "Fog" => "🌫️",
        "Dust" | "Sand" | "Ash" | "Squall" => "💨",
        "Tornado" => "🌪️",
        _ => "🌈",
    }
}

/// Render current conditions.
///
/// Enhanced adds the emoji title, humidity and local sunrise/sunset lines and
/// rounds the temperature; the basic variant reports it as-is.
pub fn format_current(snapshot: &WeatherSnapshot, enhanced: bool) -> String {
    let place = escape_html(&format!("{}, {}", snapshot.city, snapshot.country));
    let description = escape_html(&snapshot.description);

    if !enhanced {
        return format!(
            "🌍 <b>Location</b>: {place}\n\
             🌡️ <b>Temperature</b>: {}°C\n\
             🌥️ <b>Weather</b>: {description}\n\
             💨 <b>Wind Speed</b>: {} m/s",
            snapshot.temp_c, snapshot.wind_mps,
        );
    }

    format!(
        "{} <b>Current Weather in {place}</b>\n\n\
         🌡️ <b>Temperature</b>: {}°C\n\
         🌥️ <b>Weather</b>: {description}\n\
         💧 <b>Humidity</b>: {}%\n\
         💨 <b>Wind Speed</b>: {} m/s\n\
         🌅 <b>Sunrise</b>: {}\n\
         🌇 <b>Sunset</b>: {}",
        emoji_for(&snapshot.condition),
        snapshot.temp_c.round(),
        snapshot.humidity,
        snapshot.wind_mps,
        local_time(snapshot.sunrise),
        local_time(snapshot.sunset),
    )
}

/// Render a 5-day forecast: one block per sampled entry.
pub fn format_forecast(forecast: &Forecast) -> String {
    let place = escape_html(&format!("{}, {}", forecast.city, forecast.country));
    let mut out = format!("5-Day Forecast for {place}:\n");

    for entry in &forecast.entries {
        out.push('\n');
        out.push_str(&format!(
            "{}:\n\
             {} {}\n\
             🌡️ Temp: {}°C\n\
             💨 Wind: {} m/s\n",
            local_date(entry.timestamp),
            emoji_for(&entry.condition),
            escape_html(&entry.description),
            entry.temp_c.round(),
            entry.wind_mps,
        ));
    }

    out
}

fn local_time(epoch_secs: i64) -> String {
    DateTime::from_timestamp(epoch_secs, 0)
        .map(|dt| dt.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn local_date(epoch_secs: i64) -> String {
    DateTime::from_timestamp(epoch_secs, 0)
        .map(|dt| dt.with_timezone(&Local).format("%a %b %d %Y").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::ForecastEntry;

    fn london() -> WeatherSnapshot {
        WeatherSnapshot {
            city: "London".to_string(),
            country: "GB".to_string(),
            temp_c: 7.6,
            condition: "Rain".to_string(),
            description: "light rain".to_string(),
            wind_mps: 4.1,
            humidity: 81,
            sunrise: 1_700_000_000,
            sunset: 1_700_030_000,
        }
    }

    #[test]
    fn emoji_table_is_total() {
        assert_eq!(emoji_for("Clear"), "☀️");
        assert_eq!(emoji_for("Tornado"), "🌪️");
        assert_eq!(emoji_for("Haze"), "🌫️");
        assert_eq!(emoji_for("Squall"), "💨");
        // Anything outside the known categories falls back, never errors.
        assert_eq!(emoji_for(""), "🌈");
        assert_eq!(emoji_for("Plasma"), "🌈");
        assert_eq!(emoji_for("clear"), "🌈");
    }

    #[test]
    fn enhanced_current_rounds_and_includes_extras() {
        let text = format_current(&london(), true);
        assert!(text.contains("London, GB"));
        assert!(text.contains("8°C"));
        assert!(text.contains("Humidity"));
        assert!(text.contains("Sunrise"));
        assert!(text.starts_with("🌧️"));
    }

    #[test]
    fn basic_current_keeps_the_raw_temperature() {
        let text = format_current(&london(), false);
        assert!(text.contains("7.6°C"));
        assert!(!text.contains("Humidity"));
        assert!(!text.contains("Sunrise"));
    }

    #[test]
    fn city_names_are_html_escaped() {
        let mut snapshot = london();
        snapshot.city = "<b>Oops".to_string();
        let text = format_current(&snapshot, true);
        assert!(text.contains("&lt;b&gt;Oops"));
        assert!(!text.contains("<b>Oops"));
    }

    #[test]
    fn forecast_renders_one_block_per_entry() {
        let forecast = Forecast {
            city: "Paris".to_string(),
            country: "FR".to_string(),
            entries: (0..5)
                .map(|i| ForecastEntry {
                    timestamp: 1_700_000_000 + i * 86_400,
                    temp_c: 10.4,
                    condition: "Clouds".to_string(),
                    description: "overcast clouds".to_string(),
                    wind_mps: 3.2,
                })
                .collect(),
        };

        let text = format_forecast(&forecast);
        assert!(text.starts_with("5-Day Forecast for Paris, FR:"));
        assert_eq!(text.matches("overcast clouds").count(), 5);
        assert_eq!(text.matches("10°C").count(), 5);
    }
}
