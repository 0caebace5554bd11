//! Per-invocation state shared by CLI commands.

use std::path::PathBuf;

use tracing::debug;

use crate::cli::Cli;
use crate::config::Config;
use crate::error::Result;
use crate::hierarchy::{CachedLookup, Hierarchies};
use crate::search::FilterRegistry;
use crate::storage::Database;

pub struct AppContext {
    /// Project directory holding `config.toml` and the hierarchy store.
    pub root: PathBuf,
    pub config: Config,
    pub json: bool,
    pub registry: FilterRegistry,
}

impl AppContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config = Config::load(cli.config.as_deref(), &cli.root)?;
        let registry = cli.registry.parse()?;
        Ok(Self {
            root: cli.root.clone(),
            config,
            json: cli.json,
            registry,
        })
    }

    pub fn database_path(&self) -> PathBuf {
        self.config.hierarchy.database_path(&self.root)
    }

    /// Open (creating if needed) the hierarchy store.
    pub fn open_database(&self) -> Result<Database> {
        Database::open(self.database_path())
    }

    /// Load both hierarchies from the store.
    ///
    /// A project that never imported anything gets empty hierarchies rather
    /// than a freshly created database file.
    pub fn load_hierarchies(&self) -> Result<Hierarchies> {
        let path = self.database_path();
        if !path.exists() {
            debug!(path = %path.display(), "No hierarchy store; using empty hierarchies");
            return Hierarchies::empty();
        }
        Database::open(&path)?
            .load_hierarchy()?
            .into_hierarchies(self.config.hierarchy.only_associated_to_products)
    }

    /// Hierarchies behind the configured expansion cache.
    pub fn lookup(&self) -> Result<CachedLookup<Hierarchies>> {
        let hierarchy = &self.config.hierarchy;
        let capacity = if hierarchy.cache_enabled {
            hierarchy.cache_capacity
        } else {
            0
        };
        Ok(CachedLookup::new(self.load_hierarchies()?, capacity))
    }
}
