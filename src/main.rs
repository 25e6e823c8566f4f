use crate::{
    config::{ActionConfig, AppConfig, FileArgs, PollArgs, TelegramConfig},
    preview::PreviewSender,
    util::setup_tracing,
};
use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use telegram_notify::{FileSource, Response, Sender, TelegramFile, TelegramMessage, TelegramPoll};
use tracing::{info, warn};

mod config;
mod preview;
mod util;

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // load .env file
    setup_tracing();

    let config = AppConfig::parse();

    info!("Building {} message", config.action);

    let sender = PreviewSender;

    let response = match &config.action {
        ActionConfig::File(args) => send_file(&sender, &config.telegram, args)?,
        ActionConfig::Poll(args) => send_poll(&sender, &config.telegram, args)?,
    };

    let Some(response) = response else {
        warn!("Message was not sent");
        return Ok(());
    };

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &response).context("Failed to write response")?;
    writeln!(stdout)?;

    Ok(())
}

fn send_file(
    sender: &impl Sender,
    telegram: &TelegramConfig,
    args: &FileArgs,
) -> Result<Option<Response>> {
    let source = if args.remote {
        FileSource::remote(&args.file)
    } else {
        FileSource::from(args.file.as_str())
    };

    let mut message = address(TelegramFile::new(&args.caption), telegram).attach(
        source,
        args.kind,
        args.filename.as_deref(),
    );
    if let Some(parse_mode) = telegram.parse_mode {
        message = message.parse_mode(parse_mode);
    }

    info!(
        "Sending {} as {}",
        args.file,
        if message.has_attachment() {
            "upload"
        } else {
            "reference"
        }
    );

    message
        .send(sender)
        .with_context(|| format!("Failed to send {} `{}`", args.kind, args.file))
}

fn send_poll(
    sender: &impl Sender,
    telegram: &TelegramConfig,
    args: &PollArgs,
) -> Result<Option<Response>> {
    address(TelegramPoll::new(&args.question), telegram)
        .choices(&args.choices)
        .send(sender)
        .context("Failed to send poll")
}

/// Applies recipient and extra fields shared by all messages.
fn address<M: TelegramMessage>(message: M, telegram: &TelegramConfig) -> M {
    let message = match &telegram.chat_id {
        Some(chat_id) => message.to(chat_id),
        None => {
            warn!("No chat id configured, the request has no recipient");
            message
        }
    };

    message.options(
        telegram
            .options
            .iter()
            .map(|option| (option.key.as_str(), option.value.as_str())),
    )
}
