//! progenrtr CLI - Generate projects from template repositories

use anyhow::Result;
use clap::{CommandFactory, FromArgMatches, Parser};
use colored::Colorize;
use progenrtr_core::{
    list_projects, Command, ConfigResolver, GenerateArgs, InvocationArgs, ProductConfig,
    ProjectGenerator,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// progenrtr product configuration
#[derive(Clone)]
pub struct ProGenrtrConfig;

impl ProductConfig for ProGenrtrConfig {
    fn name(&self) -> &'static str {
        "progenrtr"
    }

    fn display_name(&self) -> &'static str {
        "ProGenrtr"
    }

    fn cli_description(&self) -> &'static str {
        "Generate new projects from template repositories"
    }

    fn default_fallback_config(&self) -> PathBuf {
        PathBuf::from(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../../templates/fallback.ini"
        ))
    }

    fn fallback_config_env(&self) -> &'static str {
        "PROGENRTR_FALLBACK_CONFIG"
    }
}

#[derive(Parser, Debug)]
#[command(name = "progenrtr")]
#[command(version)]
pub struct Args {
    /// Specify the config file to use
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// List the available project types
    #[arg(short, long)]
    pub list: bool,

    /// Limit the list to a specific language (used with --list)
    #[arg(long = "lang", value_name = "LANGUAGE", requires = "list")]
    pub lang: Option<String>,

    /// Print debug logging to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// The language of the project to create
    #[arg(value_name = "LANGUAGE", required_unless_present = "list", conflicts_with = "list")]
    pub language: Option<String>,

    /// The type of project to create, as defined in the config
    #[arg(value_name = "PROJECT_TYPE", required_unless_present = "list", conflicts_with = "list")]
    pub project_type: Option<String>,

    /// The path at which to create the new project
    #[arg(value_name = "PROJECT_PATH", required_unless_present = "list", conflicts_with = "list")]
    pub project_path: Option<PathBuf>,
}

impl TryFrom<Args> for InvocationArgs {
    type Error = anyhow::Error;

    fn try_from(args: Args) -> Result<Self> {
        let command = if args.list {
            Command::List {
                language: args.lang,
            }
        } else {
            match (args.language, args.project_type, args.project_path) {
                (Some(language), Some(project_type), Some(path)) => {
                    Command::Generate(GenerateArgs {
                        language,
                        project_type,
                        path,
                    })
                }
                _ => anyhow::bail!("LANGUAGE, PROJECT_TYPE and PROJECT_PATH are required"),
            }
        };

        Ok(InvocationArgs {
            config: args.config,
            command,
        })
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Parse the command line, describing the CLI with the product's own text
fn parse_args(config: &ProGenrtrConfig) -> Args {
    let matches = Args::command()
        .about(config.cli_description())
        .get_matches();
    Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
}

fn main() {
    let config = ProGenrtrConfig;
    let args = parse_args(&config);
    init_tracing(args.verbose);

    if let Err(e) = run(config, args) {
        eprintln!("{} {:#}", "ERROR:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(config: ProGenrtrConfig, args: Args) -> Result<()> {
    let invocation = InvocationArgs::try_from(args)?;

    let resolved = ConfigResolver::new(&config).resolve(invocation)?;

    match &resolved.args.command {
        Command::List { language } => {
            let stdout = std::io::stdout();
            list_projects(&resolved.catalog, language.as_deref(), &mut stdout.lock())
        }
        Command::Generate(generate) => {
            ProjectGenerator::new(&config).run(&resolved, generate)?;
            Ok(())
        }
    }
}
