// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info};
use std::io::Write;
use std::path::PathBuf;

use newsbridge::app_config::{self, Config, parse_flag};
use newsbridge::app_controller::Controller;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate and format a plain-text article
    Translate {
        /// Text file holding the article body
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Article title, used as context (defaults to the file name)
        #[arg(long)]
        title: Option<String>,

        /// Output file (defaults to <name>.<lang>.txt next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Stop after the translate stage, without formatting
        #[arg(long)]
        raw: bool,
    },

    /// Translate a short text such as a title or summary
    Short {
        /// Text to translate
        text: String,
    },

    /// Translate an article JSON object (title, summary, content)
    Article {
        /// JSON file holding the article
        #[arg(value_name = "JSON_FILE")]
        input: PathBuf,

        /// Output file (defaults to <name>.<lang>.json next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check that the inference service is reachable
    Check,

    /// Generate shell completions for newsbridge
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// newsbridge - translate and format news articles with an LLM
#[derive(Parser, Debug)]
#[command(name = "newsbridge")]
#[command(version)]
#[command(about = "Article translation and formatting through an LLM")]
#[command(long_about = "newsbridge splits long articles into chunks, translates them through an \
Ollama chat model, then formats the result into readable paragraphs.

EXAMPLES:
    newsbridge translate story.txt                   # Writes story.vi.txt
    newsbridge translate story.txt --raw -o out.txt  # Translation only, no formatting
    newsbridge short \"Fed raises interest rates\"     # Title or summary
    newsbridge article article.json                  # Writes article.vi.json
    newsbridge --model llama3.2:3b check             # Test the connection
    newsbridge completions bash > newsbridge.bash    # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. If the file doesn't exist,
    a default one is created. OLLAMA_BASE_URL, OLLAMA_MODEL and
    ENABLE_TRANSLATION override the corresponding settings.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config: PathBuf,

    /// Inference service base URL
    #[arg(long, global = true, env = "OLLAMA_BASE_URL")]
    endpoint: Option<String>,

    /// Model name to use for translation
    #[arg(short, long, global = true, env = "OLLAMA_MODEL")]
    model: Option<String>,

    /// Turn translation on (1/true/yes) or off (any other value)
    #[arg(long, global = true, env = "ENABLE_TRANSLATION", value_parser = parse_flag)]
    enable_translation: Option<bool>,

    /// Source language code (e.g., 'en')
    #[arg(short, long, global = true)]
    source_language: Option<String>,

    /// Target language code (e.g., 'vi')
    #[arg(short, long, global = true)]
    target_language: Option<String>,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger::new(LevelFilter::Trace)))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour and tag for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let (colour, tag) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", colour, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Apply command-line and environment overrides on top of the file
fn apply_overrides(config: &mut Config, cli: &CommandLineOptions) {
    if let Some(endpoint) = &cli.endpoint {
        config.translation.endpoint = endpoint.clone();
    }
    if let Some(model) = &cli.model {
        config.translation.model = model.clone();
    }
    if let Some(enabled) = cli.enable_translation {
        config.translation.enabled = enabled;
    }
    if let Some(source_language) = &cli.source_language {
        config.source_language = source_language.clone();
    }
    if let Some(target_language) = &cli.target_language {
        config.target_language = target_language.clone();
    }
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info until the config says otherwise
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "newsbridge", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = Config::load_or_create(&cli.config)?;
    apply_overrides(&mut config, &cli);
    log::set_max_level(config.log_level.to_level_filter());
    config.validate()?;

    let controller = Controller::with_config(config)?;

    match &cli.command {
        Commands::Translate { input, title, output, raw } => {
            controller
                .translate_file(input, title.as_deref(), output.as_deref(), *raw)
                .await?;
        }
        Commands::Short { text } => {
            let translated = controller.translate_short(text).await?;
            println!("{}", translated);
        }
        Commands::Article { input, output } => {
            controller.translate_article_file(input, output.as_deref()).await?;
        }
        Commands::Check => {
            controller.check_connection().await?;
            info!("Inference service is ready");
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}
