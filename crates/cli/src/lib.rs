pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use shopfront_core::config::{AppConfig, LoadOptions, LogFormat};
use tracing_subscriber::EnvFilter;

use crate::commands::cart::CartAction;
use crate::commands::recommend::RecommendArgs;

#[derive(Debug, Parser)]
#[command(
    name = "shopfront",
    about = "Shopfront storefront CLI",
    long_about = "Search the product catalog, compute upsell recommendations, manage a local cart, and inspect configuration.",
    after_help = "Examples:\n  shopfront search \"rtx 4070\"\n  shopfront recommend --product 12\n  shopfront recommend --cart cart.json\n  shopfront doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Rank the catalog against a free-text query and print one page of results")]
    Search {
        query: String,
        #[arg(long, default_value_t = 0, help = "Zero-based result page")]
        page: usize,
    },
    #[command(about = "Suggest complementary products for a product, a category, or a cart file")]
    Recommend {
        #[arg(long, conflicts_with_all = ["category", "cart"], help = "Viewed product id")]
        product: Option<String>,
        #[arg(long, conflicts_with = "cart", help = "Anchor category")]
        category: Option<String>,
        #[arg(
            long = "exclude",
            conflicts_with_all = ["product", "cart"],
            help = "Product id to leave out of category offers (repeatable)"
        )]
        exclude: Vec<String>,
        #[arg(long, help = "Cart file whose contents anchor the recommendation")]
        cart: Option<PathBuf>,
    },
    #[command(about = "Inspect or modify a local cart file")]
    Cart {
        #[arg(long, default_value = "cart.json", help = "Cart file path")]
        file: PathBuf,
        #[command(subcommand)]
        action: CartCommand,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config and catalog reachability")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

#[derive(Debug, Subcommand)]
enum CartCommand {
    #[command(about = "Add a catalog product to the cart")]
    Add {
        id: String,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
    },
    #[command(about = "Set the quantity of a cart line (0 removes it)")]
    Set { id: String, quantity: u32 },
    #[command(about = "Remove a cart line")]
    Remove { id: String },
    #[command(about = "Print the cart and its subtotal")]
    Show,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    if let Ok(config) = AppConfig::load(LoadOptions::default()) {
        if let Err(error) = init_logging(&config) {
            eprintln!("logging initialization failed: {error}");
        }
    }

    let result = match cli.command {
        Command::Search { query, page } => commands::search::run(&query, page),
        Command::Recommend { product, category, exclude, cart } => {
            commands::recommend::run(RecommendArgs { product, category, exclude, cart })
        }
        Command::Cart { file, action } => {
            let action = match action {
                CartCommand::Add { id, quantity } => CartAction::Add { id, quantity },
                CartCommand::Set { id, quantity } => CartAction::Set { id, quantity },
                CartCommand::Remove { id } => CartAction::Remove { id },
                CartCommand::Show => CartAction::Show,
            };
            commands::cart::run(&file, action)
        }
        Command::Config => commands::config::run(),
        Command::Doctor { json } => commands::doctor::run(json),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Installs the global subscriber. Log lines go to stderr so stdout stays
/// machine-readable.
fn init_logging(config: &AppConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(config.logging.level.trim())
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|error| anyhow::anyhow!("{error}"))
}
