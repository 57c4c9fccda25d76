use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::info;

use tk_reader::app::ports::{MarkupFetcherPort, PageStorePort};
use tk_reader::config::Config;
use tk_reader::infra::http_client::ReqwestFetcher;
use tk_reader::observability::logging::init_logging;
use tk_reader::resolver::{raw_url, PageResolver};
use tk_reader::storage::json_file::JsonFileStore;

#[derive(Parser)]
#[command(name = "tk-reader")]
#[command(about = "Resolve TwoKinds comic pages by index")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one page by index (0 is the latest page)
    Page {
        #[arg(long)]
        index: u32,
    },
    /// Report the number of pages in the archive
    ArchiveLength {
        /// Recompute even if a cached value exists
        #[arg(long)]
        refresh: bool,
    },
    /// Print the reader URL for an index without any network access
    RawUrl {
        #[arg(long)]
        index: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load environment variables
    dotenv::dotenv().ok();

    init_logging();

    let config = Config::load()?;

    match cli.command {
        Commands::Page { index } => {
            let resolver = build_resolver(&config)?;
            info!("resolving page {}", index);
            let page = resolver.resolve(index).await;
            if page.is_resolved() {
                println!("page:      {}", page.index);
                println!("reader:    {}", page.raw_url);
                println!("image:     {}", page.remote_url);
                println!("published: {}", page.timestamp);
            } else {
                println!("page {index} could not be resolved");
            }
        }
        Commands::ArchiveLength { refresh } => {
            let resolver = build_resolver(&config)?;
            let length = resolver.archive_length(refresh).await;
            if length == 0 {
                println!("archive length unknown");
            } else {
                println!("{length}");
            }
        }
        Commands::RawUrl { index } => {
            println!("{}", raw_url(index));
        }
    }

    Ok(())
}

fn build_resolver(config: &Config) -> anyhow::Result<PageResolver> {
    let fetcher: Arc<dyn MarkupFetcherPort> = Arc::new(ReqwestFetcher::new(&config.http)?);
    let store: Arc<dyn PageStorePort> = Arc::new(JsonFileStore::open(&config.store_path)?);
    Ok(PageResolver::new(fetcher, store))
}
