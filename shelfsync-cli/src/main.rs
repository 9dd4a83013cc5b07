use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::LevelFilter;
use shelfsync_catalog::types::EntityType;

mod commands;
mod error;
mod progress;
mod settings;

pub(crate) use error::CliError;

use settings::{Overrides, Settings};

#[derive(Parser)]
#[command(name = "shelfsync")]
#[command(about = "Import catalog CSV batches into the storefront database", long_about = None)]
struct Cli {
    /// Settings file (default: ./shelfsync.toml, then the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding inbox/, uploads/ and archive/
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Directory receiving generated images
    #[arg(short, long, global = true)]
    output_dir: Option<PathBuf>,

    /// Catalog database file (default: <data-dir>/catalog.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// More output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only print warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply every CSV waiting in the inbox, oldest name first
    Run {
        /// Plan and report without writing anything
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Image conversion workers (0 = one per core)
        #[arg(short, long)]
        workers: Option<usize>,
    },

    /// Apply a single CSV file
    Import {
        /// CSV file to apply
        file: PathBuf,

        /// Leave the file where it is after a successful import
        #[arg(long)]
        no_archive: bool,

        /// Plan and report without writing anything
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Image conversion workers (0 = one per core)
        #[arg(short, long)]
        workers: Option<usize>,
    },

    /// Show catalog statistics
    Stats,

    /// List recorded slug redirects
    Redirects {
        /// Only show redirects for this entity type (category, product)
        #[arg(short, long)]
        entity: Option<EntityType>,
    },

    /// List recent import runs
    Runs {
        /// Number of runs to show, newest first
        #[arg(short, long, default_value_t = 10)]
        limit: u32,

        /// Also list the skipped rows of each run
        #[arg(short, long)]
        errors: bool,
    },

    /// Show or edit a category's SEO title and description
    Seo {
        /// Category slug
        slug: String,

        /// New SEO title (empty string clears it)
        #[arg(short, long)]
        title: Option<String>,

        /// New SEO description (empty string clears it)
        #[arg(long)]
        description: Option<String>,
    },

    /// Inspect settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show effective settings and where each one came from
    Show,
    /// Print the user settings file path
    Path,
}

/// Print an empty line through the logger.
pub(crate) fn log_blank() {
    log::info!("");
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => LevelFilter::Warn,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stdout)
        .format(|buf, record| match record.level() {
            log::Level::Info => writeln!(buf, "{}", record.args()),
            level => writeln!(buf, "{}: {}", level.as_str().to_lowercase(), record.args()),
        })
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    if let Err(e) = run(cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let workers = match &cli.command {
        Commands::Run { workers, .. } | Commands::Import { workers, .. } => *workers,
        _ => None,
    };
    let overrides = Overrides {
        config: cli.config,
        data_dir: cli.data_dir,
        output_dir: cli.output_dir,
        database: cli.db,
        workers,
    };
    let settings = Settings::load(&overrides)?;
    let quiet = cli.quiet;

    match cli.command {
        Commands::Run { dry_run, .. } => commands::sync::run_inbox(&settings, dry_run, quiet),
        Commands::Import {
            file,
            no_archive,
            dry_run,
            ..
        } => commands::sync::run_import(&settings, file, no_archive, dry_run, quiet),
        Commands::Stats => commands::stats::run_stats(&settings),
        Commands::Redirects { entity } => commands::redirects::run_redirects(&settings, entity),
        Commands::Runs { limit, errors } => commands::runs::run_runs(&settings, limit, errors),
        Commands::Seo {
            slug,
            title,
            description,
        } => commands::seo::run_seo(
            &settings,
            &slug,
            commands::seo::SeoEdit { title, description },
        ),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(&settings),
            ConfigAction::Path => commands::config::run_config_path(),
        },
    }
}
