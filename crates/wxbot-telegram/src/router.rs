use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};
use tokio::sync::Mutex;
use tracing::{error, info};

use wxbot_core::{
    config::Config, dispatch::CommandDispatcher, domain::ChatId, messaging::MessagingPort,
    scheduler::DailyScheduler, store::SubscriberStore, weather::WeatherPort,
};

use crate::TelegramNotifier;

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<CommandDispatcher>,
}

pub async fn run_polling(
    cfg: Arc<Config>,
    store: Arc<Mutex<SubscriberStore>>,
    weather: Arc<dyn WeatherPort>,
) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    if let Ok(me) = bot.get_me().await {
        info!(username = me.username(), "weather bot started");
    }
    info!(
        subscribers = store.lock().await.len(),
        enhanced = cfg.enhanced,
        "subscriber list loaded"
    );

    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramNotifier::new(bot.clone()));

    let command_dispatcher = Arc::new(CommandDispatcher::new(
        cfg.clone(),
        store.clone(),
        weather.clone(),
        messenger.clone(),
    ));

    let scheduler = Arc::new(DailyScheduler::new(cfg, store, weather, messenger));
    scheduler.start();

    let state = Arc::new(AppState {
        dispatcher: command_dispatcher,
    });

    let handler = dptree::entry().branch(Update::filter_message().endpoint(handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .build()
        .dispatch()
        .await;

    scheduler.stop();

    Ok(())
}

async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    // Photos, stickers, voice and the rest are out of scope for a weather bot.
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let chat_id = ChatId(msg.chat.id.0);
    if let Err(e) = state.dispatcher.handle(chat_id, text).await {
        error!(chat_id = chat_id.0, error = %e, "failed to reply");
    }

    Ok(())
}
