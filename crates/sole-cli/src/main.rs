mod account;
mod browse;
mod output;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sole_core::{SearchSource, SneakerSource};
use sole_kicks::KicksClient;
use sole_store::UserStore;

#[derive(Debug, Parser)]
#[command(name = "sole-cli")]
#[command(about = "Sneaker search across StockX and GOAT")]
struct Cli {
    /// Print results as JSON instead of aligned text
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Keyword search, optionally narrowed by brand
    Search {
        keyword: String,
        #[arg(long)]
        brand: Option<String>,
        #[arg(long, default_value = "both")]
        source: SearchSource,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long, default_value = "1")]
        page: u32,
        /// Shoe size for GOAT prices; defaults to the signed-in user's size
        #[arg(long)]
        size: Option<String>,
        /// Merge both marketplaces into one alternating list
        #[arg(long)]
        interleaved: bool,
    },
    /// The configured brand from both marketplaces
    Curated {
        #[arg(long, default_value = "both")]
        source: SearchSource,
        #[arg(long)]
        size: Option<String>,
        #[arg(long)]
        interleaved: bool,
    },
    /// Full record for one product by slug or id
    Detail {
        id: String,
        #[arg(long, default_value = "stockx")]
        source: SneakerSource,
    },
    /// Create an account
    Register {
        username: String,
        #[arg(long, env = "SOLE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign in as an existing account
    Login {
        username: String,
        #[arg(long, env = "SOLE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Like a sneaker, or unlike it if already liked
    Like {
        #[arg(value_name = "STYLE_ID")]
        style_id: String,
    },
    /// List liked sneakers with current marketplace data
    Liked,
    /// Set the preferred shoe size; omit the size to clear it
    SetSize { size: Option<String> },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = sole_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = UserStore::open(config.users_path.clone()).await?;
    let json = cli.json;

    match cli.command {
        Commands::Search {
            keyword,
            brand,
            source,
            limit,
            page,
            size,
            interleaved,
        } => {
            let kicks = client(&config)?;
            let args = browse::SearchArgs {
                keyword,
                brand,
                source,
                limit: limit.unwrap_or(config.search_limit),
                page,
                size,
                interleaved,
            };
            browse::run_search(&kicks, &store, args, json).await?;
        }
        Commands::Curated {
            source,
            size,
            interleaved,
        } => {
            let kicks = client(&config)?;
            browse::run_curated(&kicks, &store, &config, source, size, interleaved, json).await?;
        }
        Commands::Detail { id, source } => {
            let kicks = client(&config)?;
            browse::run_detail(&kicks, source, &id, json).await?;
        }
        Commands::Register { username, password } => {
            account::run_register(&store, &username, &password, json).await?;
        }
        Commands::Login { username, password } => {
            account::run_login(&store, &username, &password, json).await?;
        }
        Commands::Logout => account::run_logout(&store).await?,
        Commands::Whoami => account::run_whoami(&store, json).await?,
        Commands::Like { style_id } => account::run_like(&store, &style_id, json).await?,
        Commands::Liked => {
            let kicks = client(&config)?;
            account::run_liked(&kicks, &store, config.liked_fetch_concurrency, json).await?;
        }
        Commands::SetSize { size } => {
            account::run_set_size(&store, size.as_deref(), json).await?;
        }
    }

    Ok(())
}

fn client(config: &sole_core::AppConfig) -> anyhow::Result<Arc<KicksClient>> {
    if config.kicks_api_key.is_none() {
        tracing::warn!("KICKS_API_KEY is not set; upstream requests will be rejected");
    }
    Ok(Arc::new(KicksClient::from_config(config)?))
}
