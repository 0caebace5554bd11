use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{FacetError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub hierarchy: HierarchyConfig,
}

impl Config {
    pub fn load(explicit_path: Option<&Path>, root: &Path) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("FACETQ_CONFIG").ok().map(PathBuf::from));

        if let Some(path) = explicit {
            if let Some(patch) = Self::load_patch(&path)? {
                config.merge_patch(patch);
            }
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(project) = Self::load_project(root)? {
                config.merge_patch(project);
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        let Some(dir) = dirs::config_dir() else {
            return Ok(None);
        };
        Self::load_patch(&dir.join("facetq/config.toml"))
    }

    fn load_project(root: &Path) -> Result<Option<ConfigPatch>> {
        Self::load_patch(&root.join("config.toml"))
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| FacetError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| FacetError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.search {
            self.search.merge(patch);
        }
        if let Some(patch) = patch.hierarchy {
            self.hierarchy.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(value) = env_string("FACETQ_SEARCH_BASE_URL") {
            self.search.base_url = value;
        }
        if let Some(value) = env_string("FACETQ_SEARCH_APP_ID") {
            self.search.app_id = value;
        }
        if let Some(value) = env_string("FACETQ_SEARCH_API_KEY") {
            self.search.api_key = value;
        }
        if let Some(value) = env_string("FACETQ_SEARCH_INDEX") {
            self.search.index_name = value;
        }
        if let Some(value) = env_u64("FACETQ_SEARCH_TIMEOUT_SECS")? {
            self.search.timeout_secs = value;
        }

        if let Some(value) = env_string("FACETQ_HIERARCHY_DATABASE") {
            self.hierarchy.database = PathBuf::from(value);
        }
        if let Some(value) = env_bool("FACETQ_HIERARCHY_CACHE_ENABLED") {
            self.hierarchy.cache_enabled = value;
        }
        if let Some(value) = env_usize("FACETQ_HIERARCHY_CACHE_CAPACITY")? {
            self.hierarchy.cache_capacity = value;
        }

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.search.max_length == 0 {
            return Err(FacetError::Config(
                "search.max_length must be at least 1".to_string(),
            ));
        }
        if self.search.default_length == 0 || self.search.default_length > self.search.max_length {
            return Err(FacetError::Config(format!(
                "search.default_length must be between 1 and {}",
                self.search.max_length
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Empty means the hosted default derived from `app_id`.
    pub base_url: String,
    pub app_id: String,
    #[serde(skip_serializing)]
    pub api_key: String,
    pub index_name: String,
    pub timeout_secs: u64,
    pub default_length: u32,
    pub max_length: u32,
    /// Sort order name -> replica index name.
    pub replicas: BTreeMap<String, String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        let mut replicas = BTreeMap::new();
        replicas.insert("created.desc".to_string(), "products_created_desc".to_string());
        Self {
            base_url: String::new(),
            app_id: String::new(),
            api_key: String::new(),
            index_name: "products".to_string(),
            timeout_secs: 10,
            default_length: 50,
            max_length: 1000,
            replicas,
        }
    }
}

impl SearchConfig {
    fn merge(&mut self, patch: SearchPatch) {
        if let Some(value) = patch.base_url {
            self.base_url = value;
        }
        if let Some(value) = patch.app_id {
            self.app_id = value;
        }
        if let Some(value) = patch.api_key {
            self.api_key = value;
        }
        if let Some(value) = patch.index_name {
            self.index_name = value;
        }
        if let Some(value) = patch.timeout_secs {
            self.timeout_secs = value;
        }
        if let Some(value) = patch.default_length {
            self.default_length = value;
        }
        if let Some(value) = patch.max_length {
            self.max_length = value;
        }
        if let Some(values) = patch.replicas {
            self.replicas.extend(values);
        }
    }

    /// Base URL of the search API, falling back to the hosted endpoint for
    /// the configured application.
    pub fn resolved_base_url(&self) -> Result<String> {
        if !self.base_url.is_empty() {
            return Ok(self.base_url.trim_end_matches('/').to_string());
        }
        if self.app_id.is_empty() {
            return Err(FacetError::MissingConfig("search.app_id".to_string()));
        }
        Ok(format!("https://{}-dsn.algolia.net", self.app_id))
    }

    /// Fails unless both credentials are set.
    pub fn require_credentials(&self) -> Result<()> {
        if self.app_id.is_empty() {
            return Err(FacetError::MissingConfig("search.app_id".to_string()));
        }
        if self.api_key.is_empty() {
            return Err(FacetError::MissingConfig("search.api_key".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HierarchyConfig {
    /// Relative paths resolve against the facetq root directory.
    pub database: PathBuf,
    pub cache_enabled: bool,
    pub cache_capacity: usize,
    pub only_associated_to_products: bool,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from("hierarchy.db"),
            cache_enabled: true,
            cache_capacity: 1024,
            only_associated_to_products: true,
        }
    }
}

impl HierarchyConfig {
    fn merge(&mut self, patch: HierarchyPatch) {
        if let Some(value) = patch.database {
            self.database = value;
        }
        if let Some(value) = patch.cache_enabled {
            self.cache_enabled = value;
        }
        if let Some(value) = patch.cache_capacity {
            self.cache_capacity = value;
        }
        if let Some(value) = patch.only_associated_to_products {
            self.only_associated_to_products = value;
        }
    }

    #[must_use]
    pub fn database_path(&self, root: &Path) -> PathBuf {
        if self.database.is_absolute() {
            self.database.clone()
        } else {
            root.join(&self.database)
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub search: Option<SearchPatch>,
    pub hierarchy: Option<HierarchyPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SearchPatch {
    pub base_url: Option<String>,
    pub app_id: Option<String>,
    pub api_key: Option<String>,
    pub index_name: Option<String>,
    pub timeout_secs: Option<u64>,
    pub default_length: Option<u32>,
    pub max_length: Option<u32>,
    pub replicas: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct HierarchyPatch {
    pub database: Option<PathBuf>,
    pub cache_enabled: Option<bool>,
    pub cache_capacity: Option<usize>,
    pub only_associated_to_products: Option<bool>,
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key).ok().map(|value| {
        matches!(
            value.to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

fn env_u64(key: &str) -> Result<Option<u64>> {
    match std::env::var(key) {
        Ok(value) => value.parse::<u64>().map(Some).map_err(|err| {
            FacetError::Config(format!("invalid {key} value {value}: {err}"))
        }),
        Err(_) => Ok(None),
    }
}

fn env_usize(key: &str) -> Result<Option<usize>> {
    match std::env::var(key) {
        Ok(value) => value.parse::<usize>().map(Some).map_err(|err| {
            FacetError::Config(format!("invalid {key} value {value}: {err}"))
        }),
        Err(_) => Ok(None),
    }
}
