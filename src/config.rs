use clap::{Args, Parser, Subcommand};
use indoc::indoc;
use telegram_notify::{FileKind, ParseMode};

const AFTER_HELP: &str = indoc! {"
    All options can also be set through the environment or a `.env` file:
      TELEGRAM_CHAT_ID     recipient chat id or @channel
      TELEGRAM_PARSE_MODE  Markdown, MarkdownV2 or HTML
      TELEGRAM_OPTIONS     extra Bot API fields, e.g. disable_notification=true
      LOG_LEVEL            tracing filter, defaults to info

    The request is not sent. Its parameters are printed as JSON instead.
"};

#[derive(Clone, Debug, Parser)]
#[command(version, about = "Build Telegram file and poll requests", after_help = AFTER_HELP)]
pub struct AppConfig {
    /// Message to build
    #[command(subcommand)]
    pub action: ActionConfig,

    #[command(flatten)]
    pub telegram: TelegramConfig,
}

#[derive(Clone, Debug, Subcommand)]
pub enum ActionConfig {
    /// Send a file with a caption
    File(FileArgs),
    /// Send a poll
    Poll(PollArgs),
}

impl std::fmt::Display for ActionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionConfig::File(args) => write!(f, "File({})", args.kind),
            ActionConfig::Poll(_) => write!(f, "Poll"),
        }
    }
}

#[derive(Clone, Debug, Args)]
pub struct TelegramConfig {
    #[arg(long = "chat-id", env = "TELEGRAM_CHAT_ID", global = true)]
    pub chat_id: Option<String>,

    /// Formatting of file captions
    #[arg(long = "parse-mode", env = "TELEGRAM_PARSE_MODE", global = true)]
    pub parse_mode: Option<ParseMode>,

    /// Additional Bot API fields as `key=value`
    #[arg(
        long,
        num_args = 1..,
        value_delimiter = ',',
        value_parser = parse_api_option,
        env = "TELEGRAM_OPTIONS",
        global = true
    )]
    pub options: Vec<ApiOption>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiOption {
    pub key: String,
    pub value: String,
}

fn parse_api_option(s: &str) -> Result<ApiOption, String> {
    let parts: Vec<&str> = s.split('=').map(str::trim).collect();
    if parts.len() != 2 || parts[0].is_empty() {
        return Err(format!("Invalid option format: {s}"));
    }
    Ok(ApiOption {
        key: parts[0].to_string(),
        value: parts[1].to_string(),
    })
}

#[derive(Clone, Debug, Args)]
pub struct FileArgs {
    /// Local path, `file_id` or URL
    pub file: String,

    #[arg(long, default_value_t = FileKind::Document)]
    pub kind: FileKind,

    #[arg(long, default_value = "")]
    pub caption: String,

    /// Name shown to the recipient for uploaded documents
    #[arg(long)]
    pub filename: Option<String>,

    /// Never upload, even if FILE names a local file
    #[arg(long)]
    pub remote: bool,
}

#[derive(Clone, Debug, Args)]
pub struct PollArgs {
    #[arg(long)]
    pub question: String,

    #[arg(long, num_args = 1.., value_delimiter = ',', required = true)]
    pub choices: Vec<String>,
}
