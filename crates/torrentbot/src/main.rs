mod config;

use std::sync::Arc;

use config::Settings;
use telegram::{BotConfig, TelegramClient, TorrentBot};
use teloxide::Bot;
use tokio_util::sync::CancellationToken;
use torrent::TorrentApi;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    let _ = dotenv::dotenv();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            eprintln!("Please check your environment or the .env file");
            std::process::exit(1);
        }
    };
    init_logging(&settings);

    // Authenticate with qBittorrent
    let daemon = TorrentApi::new(
        &settings.qbit_host,
        &settings.qbit_username,
        &settings.qbit_password,
    );
    if let Err(e) = daemon.login().await {
        tracing::error!("Failed to login to qBittorrent at {}: {}", settings.qbit_host, e);
        std::process::exit(1);
    }
    match daemon.version().await {
        Ok(version) => tracing::info!("Connected to qBittorrent {}", version),
        Err(e) => tracing::warn!("Could not read the qBittorrent version: {}", e),
    }

    let messenger = TelegramClient::new(Bot::new(&settings.telegram_token));
    match messenger.username().await {
        Ok(name) => tracing::info!("Logged in to Telegram as @{}", name.unwrap_or_default()),
        Err(e) => {
            tracing::error!("Failed to reach Telegram: {}", e);
            std::process::exit(1);
        }
    }

    let config = BotConfig::new()
        .with_allowed_users(settings.allowed_users)
        .with_locations(settings.locations)
        .with_set_commands(settings.set_commands);
    let bot = match TorrentBot::new(Arc::new(messenger), Arc::new(daemon), config) {
        Ok(bot) => bot,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Shutting down");
                    cancel.cancel();
                }
                Err(e) => tracing::warn!("Can't listen for Ctrl-C: {}", e),
            }
        }
    });

    bot.run(cancel).await;
}

fn init_logging(settings: &Settings) {
    let level = if settings.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);

    if settings.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
