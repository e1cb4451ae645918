//! Daily push scheduler: a single recurring trigger at 08:00 local time that
//! fans the current-weather path out to every subscriber.

use std::sync::Arc;

use chrono::{DateTime, Local, Timelike};
use tokio::{sync::Mutex, task::JoinHandle, time::sleep};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::{
    config::Config,
    domain::Subscriber,
    formatting::{escape_html, format_current},
    messaging::MessagingPort,
    store::SubscriberStore,
    weather::WeatherPort,
};

/// Daily push hour, local wall clock. Fixed; no configuration surface.
const PUSH_HOUR: u32 = 8;

const MINUTES_PER_DAY: usize = 24 * 60;

/// Next 08:00 local strictly after `now`.
///
/// Minute-granularity scan over the local timeline (rather than a fixed 24h
/// offset), so DST transitions cannot skip or double a firing.
pub fn next_push(now: DateTime<Local>) -> DateTime<Local> {
    let mut t = now + chrono::Duration::minutes(1);
    t = t
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(t);

    for _ in 0..=MINUTES_PER_DAY {
        if t.hour() == PUSH_HOUR && t.minute() == 0 {
            return t;
        }
        t += chrono::Duration::minutes(1);
    }
    t
}

pub struct DailyScheduler {
    cfg: Arc<Config>,
    store: Arc<Mutex<SubscriberStore>>,
    weather: Arc<dyn WeatherPort>,
    messenger: Arc<dyn MessagingPort>,
    cancel: CancellationToken,
}

impl DailyScheduler {
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
            cancel: CancellationToken::new(),
        }
    }

    /// Spawn the recurring push task. Runs until `stop()`.
    pub fn start(self: &Arc<Self>) -> JoinHandle<()> {
        let scheduler = Arc::clone(self);
        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            loop {
                let next = next_push(Local::now());
                let wait = (next - Local::now()).to_std().unwrap_or_default();
                info!(next = %next, "daily push scheduled");

                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = sleep(wait) => scheduler.fan_out().await,
                }
            }
        })
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Deliver the current-weather update to every subscriber.
    ///
    /// Each delivery is independent: one failing fetch or send never aborts
    /// the remaining fan-out.
    pub async fn fan_out(&self) {
        let subscribers = self.store.lock().await.list();
        info!(count = subscribers.len(), "sending daily weather updates");
        for subscriber in subscribers {
            self.push_update(&subscriber).await;
        }
    }

    async fn push_update(&self, subscriber: &Subscriber) {
        let Subscriber { chat_id, location } = subscriber;

        let text = match self.weather.current(location).await {
            Ok(snapshot) => format_current(&snapshot, self.cfg.enhanced),
            Err(e) => {
                info!(chat_id = chat_id.0, location = %location, error = %e, "daily update fetch failed");
                format!(
                    "Could not fetch weather for {}. Please check the location name.",
                    escape_html(location)
                )
            }
        };

        if let Err(e) = self.messenger.send_html(*chat_id, &text).await {
            error!(chat_id = chat_id.0, error = %e, "daily update send failed");
        }
    }
}
