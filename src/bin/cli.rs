use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use terminal_pet::config::Config;
use terminal_pet::error::{PetError, Result};
use terminal_pet::output::{self, OutputFormat};
use terminal_pet::package::{self, formula, ArchiveSource, PackageDescriptor, ReleaseInfo};
use terminal_pet::storage::Store;
use terminal_pet::{hooks, install, render};

#[derive(Parser)]
#[command(
    name = "terminal-pet",
    about = "A tiny terminal pet that reacts to your git activity",
    version,
    author
)]
struct Cli {
    /// State directory (defaults to ~/.terminal-pet)
    #[arg(long, global = true, env = "TERMINAL_PET_HOME")]
    state_dir: Option<PathBuf>,

    /// Config file path (defaults to config.toml in the state directory)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show pet status
    Status {
        /// Output format (console, json)
        #[arg(long, short = 'f', default_value = "console")]
        format: String,

        /// Skip the animation after the status text
        #[arg(long)]
        no_animate: bool,
    },

    /// Run pet continuously, reading persisted state and rendering
    Pet {
        /// Poll interval in seconds
        #[arg(long)]
        poll_interval: Option<u64>,
    },

    /// Feed the pet an event (commit, test-pass, test-fail, merge-conflict, ...)
    Event { name: String },

    /// Install the terminal-pet binary to a default location (or provide --dest)
    Install {
        /// Destination path for the installed binary
        #[arg(long)]
        dest: Option<PathBuf>,
    },

    /// Install git post-commit hooks (Unix and Windows variants)
    HookInstall {
        /// Repository root
        #[arg(long, default_value = ".")]
        repo: PathBuf,

        /// Overwrite hooks not written by terminal-pet
        #[arg(long)]
        force: bool,
    },

    /// Generate a starter config.toml in the state directory
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },

    /// Release packaging: render, check and install from a formula
    #[command(subcommand)]
    Package(PackageCommands),
}

#[derive(Subcommand)]
enum PackageCommands {
    /// Render a Homebrew formula for a GitHub release
    Render {
        #[arg(long, default_value = env!("CARGO_PKG_NAME"))]
        name: String,

        #[arg(long, default_value = "A tiny terminal pet")]
        description: String,

        /// GitHub owner/repo
        #[arg(long, default_value = "omapem/terminal-pet")]
        repo: String,

        /// Release version (semver, without the leading `v`)
        #[arg(long = "release-version", default_value = env!("CARGO_PKG_VERSION"))]
        release_version: String,

        /// Target triple of the release archive
        #[arg(long, default_value = "x86_64-unknown-linux-gnu")]
        target: String,

        /// Archive checksum (hex)
        #[arg(long, conflicts_with = "archive")]
        sha256: Option<String>,

        /// Compute the checksum from this archive
        #[arg(long)]
        archive: Option<PathBuf>,

        /// Write the formula to a file instead of stdout
        #[arg(long = "output", short = 'o')]
        out_path: Option<PathBuf>,
    },

    /// Verify a formula, optionally against its release archive
    Check {
        formula: PathBuf,

        /// Local copy of the release archive
        #[arg(long, conflicts_with = "download")]
        archive: Option<PathBuf>,

        /// Download the archive from the formula's url
        #[arg(long)]
        download: bool,

        /// Output format (console, json)
        #[arg(long, short = 'f', default_value = "console")]
        format: String,
    },

    /// Verify the archive and install the formula's binary
    Install {
        formula: PathBuf,

        /// Local copy of the release archive (downloads the url otherwise)
        #[arg(long)]
        archive: Option<PathBuf>,

        /// Target bin directory
        #[arg(long)]
        bin_dir: Option<PathBuf>,
    },

    /// Write an archive's SHA-256 into a formula
    Stamp {
        formula: PathBuf,

        #[arg(long)]
        archive: PathBuf,
    },

    /// List all packaging checks
    ListChecks,
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    match run(cli) {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("TERMINAL_PET_LOG")
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<i32> {
    let store = Store::resolve(cli.state_dir);
    let config_path = cli.config.unwrap_or_else(|| store.config_path());
    let load_config = || Config::load(&config_path);

    match cli.command {
        // `event` runs from git hooks and `init` repairs a broken config;
        // neither reads the config file.
        Some(Commands::Event { name }) => cmd_event(&store, &name),
        Some(Commands::Init { force }) => cmd_init(&config_path, force),
        None => cmd_status(&store, &config_or_default(&config_path), "console".into(), false),
        Some(Commands::Status { format, no_animate }) => {
            cmd_status(&store, &config_or_default(&config_path), format, no_animate)
        }
        Some(Commands::Pet { poll_interval }) => cmd_pet(&store, &load_config()?, poll_interval),
        Some(Commands::Install { dest }) => cmd_install(&load_config()?, dest),
        Some(Commands::HookInstall { repo, force }) => {
            cmd_hook_install(&load_config()?, &repo, force)
        }
        Some(Commands::Package(cmd)) => cmd_package(&load_config()?, cmd),
    }
}

fn config_or_default(path: &Path) -> Config {
    Config::load(path).unwrap_or_else(|e| {
        tracing::warn!(error = %e, path = %path.display(), "ignoring invalid config, using defaults");
        Config::default()
    })
}

fn parse_format(format_str: &str) -> OutputFormat {
    OutputFormat::from_str_lenient(format_str).unwrap_or_else(|| {
        eprintln!("Warning: unknown format '{}', using console", format_str);
        OutputFormat::Console
    })
}

fn cmd_status(store: &Store, config: &Config, format_str: String, no_animate: bool) -> Result<i32> {
    let format = parse_format(&format_str);
    let report = terminal_pet::status(store);
    print!("{}", output::render_status(&report, format)?);

    let animate = !no_animate && format == OutputFormat::Console && std::io::stdout().is_terminal();
    if animate {
        render::render_once(
            &mut std::io::stdout(),
            report.state.mood,
            config.pet.frame_delay(),
        )?;
    }
    Ok(0)
}

fn cmd_pet(store: &Store, config: &Config, poll_interval: Option<u64>) -> Result<i32> {
    let secs = poll_interval.unwrap_or(config.pet.poll_interval_secs).max(1);
    println!("Starting pet mode (press Ctrl+C to quit). Reading state and rendering...");

    let shutdown = Arc::new(AtomicBool::new(false));
    for signal in [signal_hook::consts::SIGINT, signal_hook::consts::SIGTERM] {
        signal_hook::flag::register(signal, Arc::clone(&shutdown))?;
    }

    render::run_loop(
        &mut std::io::stdout(),
        store,
        Duration::from_secs(secs),
        config.pet.frame_delay(),
        shutdown,
    )?;
    Ok(0)
}

fn cmd_event(store: &Store, name: &str) -> Result<i32> {
    let saved = terminal_pet::record_event(store, name)?;
    println!(
        "Applied event: {}\nNew state: mood={} energy={} xp={} level={}",
        name, saved.mood, saved.energy, saved.xp, saved.level
    );
    Ok(0)
}

fn cmd_install(config: &Config, dest: Option<PathBuf>) -> Result<i32> {
    let dest = match dest {
        Some(d) => d,
        None => install::default_destination(config.install.bin_dir.as_deref())?,
    };
    let installed = install::install_self(&dest)?;
    println!("Installed terminal-pet to {}", installed.display());
    Ok(0)
}

fn cmd_hook_install(config: &Config, repo: &Path, force: bool) -> Result<i32> {
    let binary = install::installed_binary(config.install.bin_dir.as_deref());
    match hooks::install_post_commit(repo, binary.as_deref(), force || config.hooks.force) {
        Ok(installed) => {
            println!("Installed post-commit hook at {}", installed.unix.display());
            println!(
                "Installed Windows post-commit hook at {}",
                installed.windows.display()
            );
            Ok(0)
        }
        Err(PetError::HookConflict(path)) => {
            eprintln!(
                "{} already exists and was not written by terminal-pet. Use --force to overwrite.",
                path.display()
            );
            Ok(1)
        }
        Err(e) => Err(e),
    }
}

fn cmd_init(path: &Path, force: bool) -> Result<i32> {
    if path.exists() && !force {
        eprintln!("{} already exists. Use --force to overwrite.", path.display());
        return Ok(1);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, Config::starter_toml())?;
    println!("Created {}", path.display());
    Ok(0)
}

fn cmd_package(config: &Config, cmd: PackageCommands) -> Result<i32> {
    match cmd {
        PackageCommands::Render {
            name,
            description,
            repo,
            release_version,
            target,
            sha256,
            archive,
            out_path,
        } => {
            let version = semver::Version::parse(&release_version).map_err(|e| {
                PetError::Descriptor(format!("version '{}': {}", release_version, e))
            })?;
            let release = ReleaseInfo {
                name,
                description,
                repo,
                version,
                target,
            };
            let sha256 = match (sha256, archive) {
                (Some(sha), _) => sha,
                (None, Some(path)) => package::archive::sha256_hex(&std::fs::read(path)?),
                (None, None) => package::PLACEHOLDER_SHA256.to_string(),
            };
            let rendered = formula::render(&PackageDescriptor::for_release(&release, sha256));
            match out_path {
                Some(out) => std::fs::write(&out, &rendered)?,
                None => print!("{}", rendered),
            }
            Ok(0)
        }

        PackageCommands::Check {
            formula: formula_path,
            archive,
            download,
            format,
        } => {
            let format = parse_format(&format);
            let source = match (archive, download) {
                (Some(path), _) => Some(ArchiveSource::File(path)),
                (None, true) => Some(ArchiveSource::Download(
                    terminal_pet::load_formula(&formula_path)?.url,
                )),
                (None, false) => None,
            };
            let report = terminal_pet::check_formula(&formula_path, source.as_ref())?;
            print!("{}", output::render_check_report(&report, format)?);

            // Exit code: 0 = pass, 1 = a check failed
            Ok(if report.verdict.pass { 0 } else { 1 })
        }

        PackageCommands::Install {
            formula: formula_path,
            archive,
            bin_dir,
        } => {
            let bin_dir = match bin_dir.or_else(|| config.install.bin_dir.clone()) {
                Some(dir) => dir,
                None => install::default_bin_dir(&dirs::home_dir().ok_or(PetError::NoHomeDir)?),
            };
            let dest = terminal_pet::install_formula(&formula_path, archive.as_deref(), &bin_dir)?;
            println!("Installed {}", dest.display());
            Ok(0)
        }

        PackageCommands::Stamp {
            formula: formula_path,
            archive,
        } => {
            let sha = package::archive::sha256_hex(&std::fs::read(&archive)?);
            let text = std::fs::read_to_string(&formula_path)?;
            std::fs::write(&formula_path, formula::stamp(&text, &sha)?)?;
            println!("sha256 {} written to {}", sha, formula_path.display());
            Ok(0)
        }

        PackageCommands::ListChecks => {
            println!("{:<10} NAME", "ID");
            println!("{}", "-".repeat(40));
            for (id, name) in package::CheckEngine::new().list_checks() {
                println!("{:<10} {}", id, name);
            }
            Ok(0)
        }
    }
}
