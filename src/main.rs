// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use subtrans::app_config::{self, Config};
use subtrans::file_utils::FileManager;
use subtrans::subtitle::{self, detect};
use subtrans::translation::{apply_translation, TranslatedCues, TranslationJob};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
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
    /// Print the detected format of each file
    Detect {
        /// Subtitle files to classify
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,
    },

    /// Parse a file and show its cues and parse diagnostics
    Inspect {
        /// Subtitle file to inspect
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print the parsed document as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the translation job for a file as JSON
    Export {
        /// Subtitle file to export
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Target language tag (repeatable, overrides the config)
        #[arg(short, long = "target")]
        targets: Vec<String>,

        /// Maximum characters per line (overrides the config)
        #[arg(short = 'w', long)]
        line_width: Option<usize>,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write translated cue text back into a copy of the file
    Apply {
        /// Source subtitle file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Translation result JSON files, one per language
        #[arg(value_name = "TRANSLATIONS", required = true)]
        translations: Vec<PathBuf>,

        /// Output directory (overrides the config)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Force overwrite of existing output files
        #[arg(short, long)]
        force_overwrite: bool,
    },

    /// Verify that files survive a parse/serialize round trip
    Check {
        /// Subtitle file or directory to verify
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },

    /// Generate shell completions for subtrans
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// subtrans - structure-preserving subtitle translation support
///
/// Parses SRT, WebVTT and ASS/SSA files, exports their text for translation and
/// writes translated text back without touching timing or styling.
#[derive(Parser, Debug)]
#[command(name = "subtrans")]
#[command(version)]
#[command(about = "Structure-preserving subtitle translation support")]
#[command(long_about = "subtrans parses SRT, WebVTT and ASS/SSA subtitles into a uniform cue model,
exports the translatable text and writes translations back with timing and styling intact.

EXAMPLES:
    subtrans detect movie.srt clip.vtt            # Print the detected format
    subtrans inspect --json episode.ass           # Dump the parsed document
    subtrans export -t fr -t zh-TW movie.srt      # Write the translation job to stdout
    subtrans apply movie.srt movie.fr.json        # Write movie.fr.srt
    subtrans check /subtitles/                    # Round-trip every subtitle in a tree
    subtrans completions bash > subtrans.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config: PathBuf,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
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
        // The logger accepts everything; `log::set_max_level` does the filtering
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:<5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() {
    if let Err(e) = run() {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Initialize the logger once with info level by default
    // The level is updated after loading the config
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "subtrans", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli.config, cli.log_level)?;

    match cli.command {
        Commands::Detect { files } => run_detect(&files),
        Commands::Inspect { file, json } => run_inspect(&file, json),
        Commands::Export { file, targets, line_width, output } => {
            run_export(config, &file, targets, line_width, output.as_deref())
        }
        Commands::Apply { file, translations, output_dir, force_overwrite } => {
            run_apply(config, &file, &translations, output_dir, force_overwrite)
        }
        Commands::Check { path } => run_check(&path),
        Commands::Completions { .. } => Ok(()),
    }
}

/// Load the configuration, creating a default one when missing
fn load_config(config_path: &Path, cli_log_level: Option<CliLogLevel>) -> Result<Config> {
    // If log level is set via command line, apply it immediately
    if let Some(level) = cli_log_level {
        let level: app_config::LogLevel = level.into();
        log::set_max_level(level.into());
    }

    let mut config = if config_path.exists() {
        Config::from_file(config_path)?
    } else {
        warn!("Config file not found at {:?}, creating default config.", config_path);
        let config = Config::default();
        config.save(config_path)?;
        config
    };

    match cli_log_level {
        Some(level) => config.log_level = level.into(),
        None => log::set_max_level(config.log_level.into()),
    }

    config.validate().context("Configuration validation failed")?;
    debug!("Loaded configuration: {:?}", config);
    Ok(config)
}

fn run_detect(files: &[PathBuf]) -> Result<()> {
    for file in files {
        let content = FileManager::read_subtitle(file)?;
        let name = file.to_string_lossy();
        println!("{}: {}", name, detect(Some(name.as_ref()), &content));
    }
    Ok(())
}

fn run_inspect(file: &Path, json: bool) -> Result<()> {
    let content = FileManager::read_subtitle(file)?;
    let document = subtitle::parse_with_hint(Some(file.to_string_lossy().as_ref()), &content)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&document)?);
        return Ok(());
    }

    println!("{:?}: {} document, {} cue(s)", file, document.dialect, document.cues.len());
    for (position, cue) in document.cues.iter().enumerate() {
        println!("[{}] {}", position, cue.timing_label(document.dialect));
        for line in &cue.text_lines {
            println!("    {}", line);
        }
    }
    for issue in &document.issues {
        warn!("{}", issue);
    }
    Ok(())
}

fn run_export(
    mut config: Config,
    file: &Path,
    targets: Vec<String>,
    line_width: Option<usize>,
    output: Option<&Path>,
) -> Result<()> {
    if !targets.is_empty() {
        config.target_languages = targets;
    }
    if let Some(width) = line_width {
        config.line_width = width;
    }
    config.validate()?;

    let content = FileManager::read_subtitle(file)?;
    let name = file.file_name().unwrap_or_default().to_string_lossy().to_string();
    let document = subtitle::parse_with_hint(Some(&name), &content)?;
    let job = TranslationJob::from_document(&name, &document, &config.target_languages, config.line_width);

    let job_json = serde_json::to_string_pretty(&job).context("Failed to serialize translation job")?;
    match output {
        Some(path) => {
            FileManager::write_to_file(path, &job_json)?;
            info!(
                "Exported {} cue(s), {} line(s) to {:?}",
                job.cues.len(),
                job.line_count(),
                path
            );
        }
        None => println!("{}", job_json),
    }
    Ok(())
}

fn run_apply(
    config: Config,
    file: &Path,
    translations: &[PathBuf],
    output_dir: Option<PathBuf>,
    force_overwrite: bool,
) -> Result<()> {
    let content = FileManager::read_subtitle(file)?;
    let document = subtitle::parse_with_hint(Some(file.to_string_lossy().as_ref()), &content)?;

    let output_dir = output_dir.or(config.output.directory);
    let overwrite = force_overwrite || config.output.overwrite;

    for translation_path in translations {
        let translation_json = FileManager::read_to_string(translation_path)?;
        let translation: TranslatedCues = serde_json::from_str(&translation_json)
            .with_context(|| format!("Failed to parse translation file: {:?}", translation_path))?;

        let output_path = FileManager::generate_output_path(file, output_dir.as_deref(), &translation.language);
        if FileManager::file_exists(&output_path) && !overwrite {
            warn!("Output file {:?} already exists, skipping (use -f to overwrite)", output_path);
            continue;
        }

        let translated = apply_translation(&document, &translation)
            .with_context(|| format!("Failed to apply {:?}", translation_path))?;
        FileManager::write_to_file(&output_path, &subtitle::serialize(&translated))?;
        info!("Wrote {} translation to {:?}", translation.language, output_path);
    }
    Ok(())
}

fn run_check(path: &Path) -> Result<()> {
    let files = if path.is_dir() {
        FileManager::find_subtitle_files(path)?
    } else if path.is_file() {
        vec![path.to_path_buf()]
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", path));
    };

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")?
            .progress_chars("#>-"),
    );

    let mut failures = 0;
    for file in &files {
        progress.set_message(file.file_name().unwrap_or_default().to_string_lossy().to_string());

        let content = FileManager::read_subtitle(file)?;
        match subtitle::round_trip(Some(file.to_string_lossy().as_ref()), &content) {
            Ok(report) if report.is_lossless() => {
                debug!(
                    "{:?}: {} cue(s), textually equal: {}",
                    file, report.cues, report.textually_equal
                );
                for issue in &report.issues {
                    progress.suspend(|| warn!("{:?}: {}", file, issue));
                }
            }
            Ok(report) => {
                failures += 1;
                progress.suspend(|| error!("{:?}: {} document does not round-trip", file, report.dialect));
            }
            Err(e) => {
                failures += 1;
                progress.suspend(|| error!("{:?}: {}", file, e));
            }
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    if failures > 0 {
        return Err(anyhow!("{} of {} file(s) failed the round trip", failures, files.len()));
    }
    info!("{} file(s) round-trip losslessly", files.len());
    Ok(())
}
