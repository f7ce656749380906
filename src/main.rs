// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{warn, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use clap::{Args, Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use subdeck::app_config::{self, Config};
use subdeck::app_controller::Controller;

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
    /// Extract segments from one subtitle/media pair (default command)
    Extract(ExtractArgs),

    /// Process every video in a directory that has a matching subtitle file
    Folder {
        /// Directory to scan recursively
        #[arg(value_name = "INPUT_DIR")]
        input_dir: PathBuf,

        #[command(flatten)]
        shared: SharedArgs,
    },

    /// Generate shell completions for subdeck
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// Subtitle file (.ass, .ssa, .vtt or .srt)
    #[arg(value_name = "SUBTITLE")]
    subtitle_file: PathBuf,

    /// Media file to cut audio and frames from
    #[arg(value_name = "MEDIA")]
    media_file: PathBuf,

    /// Second subtitle track to pair with each line
    #[arg(long, value_name = "FILE")]
    translation: Option<PathBuf>,

    #[command(flatten)]
    shared: SharedArgs,
}

#[derive(Args, Debug, Clone)]
struct SharedArgs {
    /// Milliseconds added before and after every line
    #[arg(long, value_name = "MS")]
    padding: Option<u64>,

    /// Largest start-time distance when pairing translation lines
    #[arg(long, value_name = "MS")]
    max_diff: Option<u64>,

    /// Also grab a still frame for every line
    #[arg(long)]
    frames: bool,

    /// Skip loudness normalization of the audio clips
    #[arg(long)]
    no_normalize: bool,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// subdeck - subtitle lines to flashcard audio
///
/// Cuts the audio of every subtitle line out of a video and writes a deck
/// manifest for flashcard import.
#[derive(Parser, Debug)]
#[command(name = "subdeck")]
#[command(version)]
#[command(about = "Subtitle-driven audio clip and flashcard deck extractor")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "subdeck parses a subtitle file and cuts the audio of every line out of the matching video.

EXAMPLES:
    subdeck movie.ass movie.mkv                          # Extract with default config
    subdeck -f movie.srt movie.mkv                       # Regenerate existing files
    subdeck --padding 500 movie.vtt movie.mp4            # Wider audio clips
    subdeck --translation movie.en.srt movie.ja.ass movie.mkv
    subdeck --frames movie.ass movie.mkv                 # Also grab a frame per line
    subdeck folder /videos/                              # Every video with a subtitle next to it
    subdeck completions bash > subdeck.bash              # Generate bash completions

OUTPUT:
    Files are written to a directory named after the video: one .txt, .mp3
    (and .jpg) per line, plus <video>.tsv for flashcard import.

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Subtitle file (.ass, .ssa, .vtt or .srt)
    #[arg(value_name = "SUBTITLE")]
    subtitle_file: Option<PathBuf>,

    /// Media file to cut audio and frames from
    #[arg(value_name = "MEDIA")]
    media_file: Option<PathBuf>,

    /// Second subtitle track to pair with each line
    #[arg(long, value_name = "FILE")]
    translation: Option<PathBuf>,

    #[command(flatten)]
    shared: SharedArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Prefix and ANSI colour for level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌ ", "1;31"),
            Level::Warn => ("🚧 ", "1;33"),
            Level::Info => (" ", "1;32"),
            Level::Debug => ("🔍 ", "1;36"),
            Level::Trace => ("📋 ", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.target().starts_with("subdeck")
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (prefix, colour) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                colour, now, prefix, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Start at trace so the max level alone decides what is shown
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subdeck", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Extract(args)) => run_extract(args).await,
        Some(Commands::Folder { input_dir, shared }) => {
            let controller = build_controller(&shared)?;
            controller.run_folder(input_dir, shared.force_overwrite).await
        }
        None => {
            // Default behavior - top-level args mean `extract`
            let subtitle_file = cli.subtitle_file.ok_or_else(|| {
                anyhow!("SUBTITLE is required when no subcommand is specified")
            })?;
            let media_file = cli.media_file.ok_or_else(|| {
                anyhow!("MEDIA is required when no subcommand is specified")
            })?;

            run_extract(ExtractArgs {
                subtitle_file,
                media_file,
                translation: cli.translation,
                shared: cli.shared,
            })
            .await
        }
    }
}

async fn run_extract(args: ExtractArgs) -> Result<()> {
    if !args.subtitle_file.is_file() {
        return Err(anyhow!("Subtitle file does not exist: {:?}", args.subtitle_file));
    }

    let controller = build_controller(&args.shared)?;
    controller
        .run(
            &args.subtitle_file,
            &args.media_file,
            args.translation.as_deref(),
            args.shared.force_overwrite,
        )
        .await?;

    Ok(())
}

// Load or create the configuration, apply CLI overrides and set the log level
fn build_controller(shared: &SharedArgs) -> Result<Controller> {
    let mut config = load_or_create_config(&shared.config_path)?;

    if let Some(padding) = shared.padding {
        config.padding_ms = padding;
    }
    if let Some(max_diff) = shared.max_diff {
        config.max_diff_ms = max_diff;
    }
    if shared.frames {
        config.media.extract_frames = true;
    }
    if shared.no_normalize {
        config.media.normalize_audio = false;
    }
    if let Some(log_level) = &shared.log_level {
        config.log_level = log_level.clone().into();
    }

    log::set_max_level(config.log_level.to_level_filter());

    Controller::with_config(config)
}

fn load_or_create_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        return Config::from_file(config_path);
    }

    warn!("Config file not found at '{}', creating default config.", config_path);
    let config = Config::default();
    config
        .save(config_path)
        .context("Failed to write default config")?;
    info!("Default configuration written to {}", config_path);

    Ok(config)
}
