use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wikifuzz_core::{Acl, IndexCache, PageStore};

#[derive(Debug, Parser)]
#[command(
    name = "wikifuzz-web",
    about = "Permission-scoped fuzzy page search server for a wiki page store"
)]
struct Cli {
    /// Directory holding the wiki's page files.
    #[arg(long)]
    root: PathBuf,

    /// Access rules file (`pattern subject level` per line).
    #[arg(long)]
    acl: PathBuf,

    /// Where per-identity index caches are written.
    #[arg(long, default_value = "data/cache")]
    cache_dir: PathBuf,

    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    #[arg(long, default_value_t = 8080)]
    port: u16,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let acl = Acl::load(&cli.acl)
        .with_context(|| format!("failed to load acl rules from {}", cli.acl.display()))?;
    let cache = IndexCache::new(cli.cache_dir, PageStore::new(cli.root), acl);
    wikifuzz_web::serve_web(cache, &cli.host, cli.port)
}
