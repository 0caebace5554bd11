//! Running query documents against the hosted search index.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::collection::{FacetFilterCollection, FilterRegistry, QueryDocument};
use super::facets::{FacetCounts, convert_facet_payload};
use super::params::RequestParams;
use crate::config::SearchConfig;
use crate::error::{FacetError, Result};
use crate::hierarchy::HierarchyLookup;

/// Sort order that maps to the newest-first replica.
pub const RECENT_REPLICA_KEY: &str = "created.desc";

/// Anything that can answer a query document for a given index.
pub trait QueryExecutor {
    fn execute(&self, index: &str, document: &QueryDocument) -> Result<SearchResponse>;
}

/// Raw search response; fields we do not read are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub hits: Vec<SearchHit>,
    #[serde(default)]
    pub nb_hits: u64,
    #[serde(default)]
    pub facets: FacetCounts,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(rename = "objectID", default)]
    pub object_id: Option<String>,
}

impl SearchHit {
    /// The entity id of the hit, falling back to the index object id.
    pub fn entity_id(&self) -> Option<String> {
        match &self.id {
            Some(Value::String(id)) => Some(id.clone()),
            Some(Value::Number(id)) => Some(id.to_string()),
            _ => self.object_id.clone(),
        }
    }
}

/// Executor backed by the search index REST API.
pub struct HttpQueryExecutor {
    client: reqwest::blocking::Client,
    base_url: String,
    app_id: String,
    api_key: String,
}

impl std::fmt::Debug for HttpQueryExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpQueryExecutor")
            .field("base_url", &self.base_url)
            .field("app_id", &self.app_id)
            .finish_non_exhaustive()
    }
}

impl HttpQueryExecutor {
    pub fn from_config(config: &SearchConfig) -> Result<Self> {
        config.require_credentials()?;
        let base_url = config.resolved_base_url()?;
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url,
            app_id: config.app_id.clone(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn query_url(&self, index: &str) -> String {
        format!(
            "{}/1/indexes/{}/query",
            self.base_url,
            urlencoding::encode(index)
        )
    }
}

impl QueryExecutor for HttpQueryExecutor {
    fn execute(&self, index: &str, document: &QueryDocument) -> Result<SearchResponse> {
        let url = self.query_url(index);
        debug!(%url, filters_len = document.filters.len(), "Querying search index");

        let response = self
            .client
            .post(&url)
            .header("X-Algolia-Application-Id", &self.app_id)
            .header("X-Algolia-API-Key", &self.api_key)
            .json(document)
            .send()?;

        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            warn!(status = status.as_u16(), index, "Search index rejected query");
            return Err(FacetError::SearchIndex {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|err| FacetError::InvalidSearchResponse(err.to_string()))
    }
}

/// Index (or replica) that serves `sort_by`.
///
/// `relevant` or no sort order uses the main index, `recent` the
/// newest-first replica; any other value must be a configured replica key.
pub fn resolve_index(config: &SearchConfig, sort_by: Option<&str>) -> Result<String> {
    let key = match sort_by {
        None | Some("relevant") => return Ok(config.index_name.clone()),
        Some("recent") => RECENT_REPLICA_KEY,
        Some(other) => other,
    };
    config
        .replicas
        .get(key)
        .cloned()
        .ok_or_else(|| FacetError::UnknownSortOrder(key.to_string()))
}

/// Result of one product search.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    /// Entity ids in rank order.
    pub ids: Vec<String>,
    pub total_hits: u64,
    /// Facet counts keyed by request parameter name.
    pub facets: FacetCounts,
    pub index: String,
    pub document: QueryDocument,
}

/// A query document ready to be sent.
#[derive(Debug, Clone)]
pub struct PreparedSearch {
    pub index: String,
    pub collection: FacetFilterCollection,
}

/// Request parameters in, ranked ids out.
pub struct ProductSearch<'a> {
    config: &'a SearchConfig,
    lookup: &'a dyn HierarchyLookup,
    registry: FilterRegistry,
}

impl<'a> ProductSearch<'a> {
    pub fn new(config: &'a SearchConfig, lookup: &'a dyn HierarchyLookup) -> Self {
        Self {
            config,
            lookup,
            registry: FilterRegistry::default(),
        }
    }

    #[must_use]
    pub const fn with_registry(mut self, registry: FilterRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Validate parameters and build the document without sending it.
    pub fn prepare(&self, params: &RequestParams) -> Result<PreparedSearch> {
        let pagination = params.pagination(self.config.default_length, self.config.max_length)?;
        let index = resolve_index(self.config, params.sort_by())?;
        let collection = FacetFilterCollection::build(params, self.registry, self.lookup, pagination)?;
        Ok(PreparedSearch { index, collection })
    }

    pub fn run(&self, params: &RequestParams, executor: &dyn QueryExecutor) -> Result<SearchOutcome> {
        let prepared = self.prepare(params)?;
        let document = prepared.collection.query();
        let response = executor.execute(&prepared.index, &document)?;

        let ids: Vec<String> = response.hits.iter().filter_map(SearchHit::entity_id).collect();
        debug!(
            index = %prepared.index,
            hits = ids.len(),
            total_hits = response.nb_hits,
            "Search completed"
        );

        Ok(SearchOutcome {
            ids,
            total_hits: response.nb_hits,
            facets: convert_facet_payload(response.facets),
            index: prepared.index,
            document,
        })
    }
}
