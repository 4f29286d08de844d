use clap::{Parser, Subcommand};
use rootmap::{
    commands::{
        config::{self, ConfigAction},
        load::{self, LoadCommand},
        parse::{self, ParseCommand},
        paths::{self, PathsCommand},
        tree::{self, TreeCommand},
    },
    logger, GlobalOpts,
};
use rootmap_config::LoaderConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "rootmap")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Rootmap manifest inspector",
    long_about = "rootmap reads the manifests that reflection builds write next to compiled \
                  libraries, and previews the package trees they materialize into."
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the records, libraries and skipped lines of a rootmap
    Parse(ParseCommand),
    /// Materialize a rootmap into a package tree and print it
    Tree(TreeCommand),
    /// Show where a binding package's library and rootmap live
    Paths(PathsCommand),
    /// Load a compiled binding package and print its tree
    Load(LoadCommand),
    /// Show or change the configuration
    #[command(subcommand_required = false, arg_required_else_help = false)]
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

fn init_logging(verbosity: u8) {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| logger::verbosity_to_filter(verbosity).into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    let verbosity = cli.global.verbosity_level();

    if let Err(e) = logger::init_with_verbosity(verbosity, &LoaderConfig::dir()) {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }
    init_logging(verbosity);

    let result = match cli.command {
        Commands::Parse(cmd) => parse::handle_parse(cmd, &cli.global),
        Commands::Tree(cmd) => tree::handle_tree(cmd, &cli.global),
        Commands::Paths(cmd) => paths::handle_paths(cmd, &cli.global),
        Commands::Load(cmd) => load::handle_load(cmd, &cli.global),
        Commands::Config { action } => config::handle_config(action, &cli.global),
    };

    if let Err(e) = result {
        logger::error(&format!("{:#}", e));
        logger::show_log_path();
        std::process::exit(1);
    }
}
