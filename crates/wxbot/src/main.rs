use std::sync::Arc;

use tokio::sync::Mutex;

use wxbot_core::{config::Config, store::SubscriberStore, weather::WeatherPort};
use wxbot_openweather::OpenWeatherClient;

#[tokio::main]
async fn main() -> Result<(), wxbot_core::Error> {
    wxbot_core::logging::init("wxbot")?;

    let cfg = Arc::new(Config::load()?);

    let store = Arc::new(Mutex::new(SubscriberStore::load(
        cfg.subscribers_file.clone(),
    )?));

    let weather: Arc<dyn WeatherPort> = Arc::new(OpenWeatherClient::new(
        cfg.weather_api_key.clone(),
        cfg.weather_api_base.clone(),
    )?);

    wxbot_telegram::router::run_polling(cfg, store, weather)
        .await
        .map_err(|e| wxbot_core::Error::Telegram(format!("bot failed: {e}")))?;

    Ok(())
}
