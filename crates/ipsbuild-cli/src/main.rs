use clap::{Parser, Subcommand};
use ipsbuild::{
    commands::{
        build::{self, BuildCommand},
        config::{self, ConfigAction},
        parse::{self, ParseCommand},
        version::{self, VersionCommand},
    },
    config_manager, init_tracing, logger, GlobalOpts,
};

#[derive(Parser)]
#[command(name = "ipsbuild")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "IPS plugin builder",
    long_about = "ipsbuild turns an IPS plugin source tree into the XML file IPS imports."
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the XML manifest of a plugin
    Build(BuildCommand),
    /// Parse a PHP array file and print it as JSON
    Parse(ParseCommand),
    /// Show the version derived from git
    Version(VersionCommand),
    /// Configure ipsbuild
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match config_manager::Config::load() {
        Ok(config) => Some(config),
        Err(e) => {
            eprintln!("Warning: Failed to load config: {}", e);
            None
        }
    };
    let verbosity = cli
        .global
        .verbosity_level(config.as_ref().and_then(|c| c.verbosity));

    if let Err(e) = logger::init_with_verbosity(verbosity, None) {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }
    init_tracing(verbosity);

    let result = match cli.command {
        Commands::Build(cmd) => build::handle_build(cmd, &config.unwrap_or_default()).map(|_| ()),
        Commands::Parse(cmd) => parse::handle_parse(cmd),
        Commands::Version(cmd) => version::handle_version(cmd),
        Commands::Config { action } => config::handle_config(action, &cli.global),
    };

    if let Err(e) = result {
        logger::error(&format!("{:#}", e));
        if verbosity > 0 {
            logger::show_log_path();
        }
        std::process::exit(1);
    }
}
