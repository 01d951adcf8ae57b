use build_size::cmd;
use build_size::cmd::report::ReportOptions;
use build_size::config::{BuildInputs, ConfigFile, ConfigLoader, ReportInputs};
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use std::process;

/// Build size tracker for CI
///
/// build-size records the size of every file in a build directory per commit
/// and reports per-file size changes on pull requests.
#[derive(Parser)]
#[command(name = "build-size", author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Disable emoji output (useful for CI/CD or accessibility)
    #[arg(long, global = true)]
    no_emoji: bool,

    /// Local snapshot cache directory (overrides .build-size.toml)
    #[arg(long, global = true, env = "BUILD_SIZE_CACHE_DIR", value_name = "DIR")]
    cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Inputs identifying one build
///
/// Missing values are rejected by input validation, not by clap, so the
/// error names both the flag and its environment variable.
#[derive(Args)]
struct BuildArgs {
    /// Build output directory to measure
    #[arg(long, env = "BUILD_SIZE_DIR")]
    dir: Option<PathBuf>,

    /// Commit SHA of the build
    #[arg(long, env = "GITHUB_SHA")]
    sha: Option<String>,

    /// Build label, e.g. the bundle name
    #[arg(long, env = "BUILD_SIZE_LABEL")]
    label: Option<String>,
}

impl From<BuildArgs> for BuildInputs {
    fn from(args: BuildArgs) -> Self {
        Self {
            dir: args.dir.unwrap_or_default(),
            sha: args.sha.unwrap_or_default(),
            label: args.label.unwrap_or_default(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Record the size of every file in the build directory
    Snapshot {
        #[command(flatten)]
        build: BuildArgs,
    },

    /// Compare the build with the closest snapshot and post the diff
    Report {
        #[command(flatten)]
        build: BuildArgs,

        /// Pull request to comment on
        #[arg(long, env = "BUILD_SIZE_PR")]
        pr: Option<String>,

        /// Token used to post the comment
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Repository in OWNER/REPO form (defaults to the current checkout)
        #[arg(long, env = "GITHUB_REPOSITORY")]
        repo: Option<String>,

        /// Print the comment instead of posting it
        #[arg(short, long)]
        dry_run: bool,

        /// Output the diff as JSON (for CI/CD integration)
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn load_config(cache_dir: Option<PathBuf>) -> anyhow::Result<(PathBuf, ConfigFile)> {
    let workdir = std::env::current_dir()?;
    let mut config = ConfigLoader::load(&workdir)?;
    if let Some(dir) = cache_dir {
        config.cache_dir = dir;
    }
    Ok((workdir, config))
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Snapshot { build } => {
            let (workdir, config) = load_config(cli.cache_dir)?;
            cmd::cmd_snapshot(&build.into(), &config, &workdir)
        }
        Commands::Report {
            build,
            pr,
            token,
            repo,
            dry_run,
            json,
        } => {
            let (workdir, config) = load_config(cli.cache_dir)?;
            let options = ReportOptions { dry_run, json, repo };
            cmd::cmd_report(
                &build.into(),
                &ReportInputs {
                    pr: pr.unwrap_or_default(),
                    token: token.unwrap_or_default(),
                },
                &config,
                &workdir,
                &options,
            )
        }
        Commands::Completions { shell } => {
            cmd::cmd_completions(shell, &mut Cli::command());
            Ok(())
        }
    }
}

fn main() {
    // Initialize logger (use RUST_LOG env var to control verbosity)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    build_size::fmt::set_emoji_enabled(!cli.no_emoji);

    if let Err(e) = run(cli) {
        use build_size::error::ErrorFormatter;
        eprintln!("{}", ErrorFormatter::format(&e));
        let exit_code = ErrorFormatter::exit_code(&e);
        process::exit(exit_code);
    }
}
