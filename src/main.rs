use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use stay_content::client::{CmsClient, InMemoryCms, NotionClient};
use stay_content::config::{self, Config, DataSources, EnvDataSources, StaticDataSources};
use stay_content::constants;
use stay_content::logging;
use stay_content::server;
use stay_content::types::Collection;
use stay_content::ContentService;

#[derive(Parser)]
#[command(name = "stay_content")]
#[command(about = "Hospitality site content service backed by a headless CMS")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the TOML config file (optional; defaults apply when missing)
    #[arg(long, default_value = constants::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Serve pages from a JSON fixture instead of the live CMS. Keys are
    /// collection names (rooms, plans, journal, ...), values are raw page arrays.
    #[arg(long)]
    fixtures: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Port to listen on (overrides config and PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Run the aggregate connectivity check and print the report
    Status,
    /// Fetch one collection and print it
    Fetch {
        /// One of: rooms, plans, journal, stories, experiences, cuisines, dishes, chefs
        #[arg(long = "type")]
        kind: String,
    },
    /// Look up a room by slug
    Room {
        #[arg(long)]
        slug: String,
    },
}

fn build_service(cli: &Cli, config: &Config) -> anyhow::Result<ContentService> {
    let (client, sources): (Arc<dyn CmsClient>, Arc<dyn DataSources>) = match &cli.fixtures {
        Some(path) => {
            info!(fixtures = %path.display(), "Using fixture-backed CMS");
            (Arc::new(InMemoryCms::from_fixture(path)?), Arc::new(StaticDataSources::all()))
        }
        None => {
            let token = config::cms_token();
            if token.is_none() {
                warn!("{} is not set; CMS queries will fail and collections will be empty", constants::NOTION_TOKEN_ENV);
            }
            (Arc::new(NotionClient::new(&config.cms, token)), Arc::new(EnvDataSources))
        }
    };
    Ok(ContentService::new(client, sources))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging
    logging::init_logging();

    let cli = Cli::parse();
    let mut config = Config::load(&cli.config)?;
    let service = build_service(&cli, &config)?;

    match &cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server.port = *port;
            }
            server::start_server(service, &config.bind_addr()).await?;
        }
        Commands::Status => {
            let report = service.check_connectivity().await;
            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.success {
                anyhow::bail!("connectivity check failed");
            }
        }
        Commands::Fetch { kind } => {
            let collection = Collection::from_query_key(kind).ok_or_else(|| {
                anyhow::anyhow!("Unknown type '{}'. Valid types: {}", kind, Collection::queryable_keys())
            })?;
            let data = service.fetch(collection).await;
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Commands::Room { slug } => match service.room_by_slug(slug).await {
            Some(room) => println!("{}", serde_json::to_string_pretty(&room)?),
            None => anyhow::bail!("Room not found: {}", slug),
        },
    }

    Ok(())
}
