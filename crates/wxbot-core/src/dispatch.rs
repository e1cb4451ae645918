//! Inbound message routing: command parsing and the reply flow.
//!
//! Each message is handled independently; the only state a handler touches is
//! the subscriber store. Provider and persistence failures are converted to
//! user-visible replies here and never propagate past the handler.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info};

use crate::{
    config::Config,
    domain::ChatId,
    formatting::{escape_html, format_current, format_forecast},
    messaging::MessagingPort,
    store::SubscriberStore,
    weather::WeatherPort,
    Error, Result,
};

/// A parsed inbound message, in the fixed priority order of dispatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    Subscribe(String),
    Unsubscribe,
    Forecast(String),
    Help,
    /// Unrecognized slash command (or empty text): no reply at all.
    Ignored,
    /// Free text treated as a city name.
    CityLookup(String),
}

/// Split `/cmd@botname arg...` into the lowercased keyword and the rest.
fn split_command(text: &str) -> (String, String) {
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("").trim();
    let rest = parts.next().unwrap_or("").trim().to_string();

    let cmd = first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase();

    (cmd, rest)
}

pub fn parse_message(text: &str) -> Command {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Command::Ignored;
    }
    if !trimmed.starts_with('/') {
        return Command::CityLookup(trimmed.to_string());
    }

    let (cmd, arg) = split_command(trimmed);
    match cmd.as_str() {
        "start" => Command::Start,
        "help" => Command::Help,
        "unsubscribe" => Command::Unsubscribe,
        "subscribe" if !arg.is_empty() => Command::Subscribe(arg),
        "forecast" if !arg.is_empty() => Command::Forecast(arg),
        // Unknown commands, and subscribe/forecast without an argument, fall
        // through to the silent branch.
        _ => Command::Ignored,
    }
}

pub struct CommandDispatcher {
    cfg: Arc<Config>,
    store: Arc<Mutex<SubscriberStore>>,
    weather: Arc<dyn WeatherPort>,
    messenger: Arc<dyn MessagingPort>,
}

impl CommandDispatcher {
    pub fn new(
        cfg: Arc<Config>,
        store: Arc<Mutex<SubscriberStore>>,
        weather: Arc<dyn WeatherPort>,
        messenger: Arc<dyn MessagingPort>,
    ) -> Self {
        Self {
            cfg,
            store,
            weather,
            messenger,
        }
    }

    /// Handle one inbound text message end to end.
    ///
    /// Only transport failures surface to the caller.
    pub async fn handle(&self, chat_id: ChatId, text: &str) -> Result<()> {
        match parse_message(text) {
            Command::Start => self.send(chat_id, &welcome_text(self.cfg.enhanced)).await,
            Command::Help if self.cfg.enhanced => self.send(chat_id, HELP_TEXT).await,
            Command::Help | Command::Ignored => Ok(()),
            Command::Subscribe(location) => self.handle_subscribe(chat_id, &location).await,
            Command::Unsubscribe => self.handle_unsubscribe(chat_id).await,
            Command::Forecast(location) if self.cfg.enhanced => {
                self.handle_forecast(chat_id, &location).await
            }
            // The basic variant has no forecast command.
            Command::Forecast(_) => Ok(()),
            Command::CityLookup(city) => self.handle_city(chat_id, &city).await,
        }
    }

    async fn handle_subscribe(&self, chat_id: ChatId, location: &str) -> Result<()> {
        let outcome = {
            let mut store = self.store.lock().await;
            store.subscribe(chat_id, location)
        };

        match outcome {
            Ok(()) => {
                info!(chat_id = chat_id.0, location, "subscribed");
                self.send(chat_id, &subscribed_text(location, self.cfg.enhanced))
                    .await
            }
            Err(Error::AlreadySubscribed) => self.send(chat_id, ALREADY_SUBSCRIBED_TEXT).await,
            Err(e) => {
                // Write-through failed after the in-memory append. Keep the
                // in-memory state and still confirm to the user.
                error!(chat_id = chat_id.0, error = %e, "failed to persist subscriber list");
                self.send(chat_id, &subscribed_text(location, self.cfg.enhanced))
                    .await
            }
        }
    }

    async fn handle_unsubscribe(&self, chat_id: ChatId) -> Result<()> {
        let outcome = {
            let mut store = self.store.lock().await;
            store.unsubscribe(chat_id)
        };

        if let Err(e) = outcome {
            error!(chat_id = chat_id.0, error = %e, "failed to persist subscriber list");
        }
        info!(chat_id = chat_id.0, "unsubscribed");
        self.send(chat_id, unsubscribed_text(self.cfg.enhanced)).await
    }

    async fn handle_forecast(&self, chat_id: ChatId, location: &str) -> Result<()> {
        match self.weather.forecast(location).await {
            Ok(forecast) => self.send(chat_id, &format_forecast(&forecast)).await,
            Err(e) => {
                info!(location, error = %e, "forecast lookup failed");
                self.send(chat_id, &forecast_failed_text(location)).await
            }
        }
    }

    async fn handle_city(&self, chat_id: ChatId, city: &str) -> Result<()> {
        match self.weather.current(city).await {
            Ok(snapshot) => {
                let mut reply = format_current(&snapshot, self.cfg.enhanced);
                if self.cfg.enhanced {
                    // Suggest subscribing with the provider's resolved name,
                    // not the raw user input.
                    reply.push_str(&format!(
                        "\n\nWant daily updates? Use /subscribe {}",
                        escape_html(&snapshot.city)
                    ));
                }
                self.send(chat_id, &reply).await
            }
            Err(e) => {
                info!(city, error = %e, "current weather lookup failed");
                self.send(chat_id, city_lookup_failed_text(self.cfg.enhanced))
                    .await
            }
        }
    }

    async fn send(&self, chat_id: ChatId, text: &str) -> Result<()> {
        self.messenger.send_html(chat_id, text).await
    }
}

const ALREADY_SUBSCRIBED_TEXT: &str =
    "You are already subscribed. Use /unsubscribe to stop updates.";

const HELP_TEXT: &str = "Here's how you can use the Weather Bot:\n\n\
- Send a city name to get current weather.\n\
- /subscribe &lt;city&gt;: Get daily weather updates.\n\
- /unsubscribe: Stop daily updates.\n\
- /forecast &lt;city&gt;: Get a 5-day forecast.\n\
- /help: See this message.";

fn welcome_text(enhanced: bool) -> String {
    if enhanced {
        "Welcome to the Weather Bot! 🌤️\n\n\
         You can:\n\
         - Send a location or city name to get weather updates.\n\
         - Use /subscribe &lt;city&gt; to get daily weather updates.\n\
         - Use /unsubscribe to stop updates.\n\
         - Use /forecast &lt;city&gt; to get a 5-day forecast.\n\
         - Use /help to see this message again.\n\n\
         Enjoy your weather updates! ☀️🌧️❄️"
            .to_string()
    } else {
        "Welcome to the Weather Bot! 🌤️\n\
         You can:\n\
         - Send a location or city name to get weather updates.\n\
         - Use /subscribe &lt;city&gt; to subscribe to daily weather updates.\n\
         - Use /unsubscribe to stop updates."
            .to_string()
    }
}

fn subscribed_text(location: &str, enhanced: bool) -> String {
    let location = escape_html(location);
    if enhanced {
        format!(
            "You have subscribed to daily weather updates for {location}. \
             You'll receive updates every day at 8:00 AM."
        )
    } else {
        format!("You have subscribed to daily weather updates for {location}.")
    }
}

fn unsubscribed_text(enhanced: bool) -> &'static str {
    if enhanced {
        "You have unsubscribed from daily weather updates. \
         You can always subscribe again using /subscribe &lt;city&gt;."
    } else {
        "You have unsubscribed from daily weather updates."
    }
}

fn forecast_failed_text(location: &str) -> String {
    format!(
        "Sorry, I couldn't fetch the forecast for {}. \
         Please check the city name and try again.",
        escape_html(location)
    )
}

fn city_lookup_failed_text(enhanced: bool) -> &'static str {
    if enhanced {
        "Sorry, I couldn't find the weather for that location. \
         Please try again with a different city name!"
    } else {
        "Sorry, I couldn't find the weather for that location. Please try again!"
    }
}
