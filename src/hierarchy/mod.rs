//! Location and job-function hierarchies.
//!
//! Filters never touch the trees directly; they go through
//! [`HierarchyLookup`], which lets the collection run against the in-memory
//! [`Hierarchies`], a [`CachedLookup`] wrapper, or a test double.

mod cache;
mod forest;
mod job_function;
mod location;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub use cache::{CacheStats, CachedLookup};
pub use forest::Forest;
pub use job_function::{JobFunctionHierarchy, JobFunctionNode, JobTitle};
pub use location::{LocationHierarchy, LocationNode};

use crate::error::Result;

/// Read-only hierarchy queries needed to resolve inclusive filters.
///
/// Every method returns a deduplicated list in a deterministic order, and
/// unknown ids contribute nothing.
pub trait HierarchyLookup {
    /// Ancestors plus descendants of the given locations, inputs included.
    fn inclusive_location_ids(&self, ids: &[String]) -> Vec<String>;

    /// Country codes of the given locations.
    fn location_country_codes(&self, ids: &[String]) -> Vec<String>;

    /// Ancestors plus descendants of the given job functions, inputs included.
    fn inclusive_job_function_ids(&self, ids: &[i64]) -> Vec<i64>;

    /// Job functions the given job titles belong to.
    fn job_functions_for_titles(&self, title_ids: &[i64]) -> Vec<i64>;
}

/// Raw hierarchy rows, as imported from JSON or read back from storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyData {
    #[serde(default)]
    pub locations: Vec<LocationNode>,
    #[serde(default)]
    pub job_functions: Vec<JobFunctionNode>,
    #[serde(default)]
    pub job_titles: Vec<JobTitle>,
}

impl HierarchyData {
    /// Build both hierarchies, checking the forest invariant.
    pub fn into_hierarchies(self, only_associated_to_products: bool) -> Result<Hierarchies> {
        let locations = LocationHierarchy::new(self.locations)?;
        let job_functions = JobFunctionHierarchy::new(self.job_functions, self.job_titles)?;
        Ok(Hierarchies::new(
            locations,
            job_functions,
            only_associated_to_products,
        ))
    }
}

/// Both hierarchies loaded in memory.
#[derive(Debug, Clone)]
pub struct Hierarchies {
    pub locations: LocationHierarchy,
    pub job_functions: JobFunctionHierarchy,
    only_associated_to_products: bool,
}

impl Hierarchies {
    pub fn new(
        locations: LocationHierarchy,
        job_functions: JobFunctionHierarchy,
        only_associated_to_products: bool,
    ) -> Self {
        info!(
            locations = locations.len(),
            job_functions = job_functions.len(),
            job_titles = job_functions.title_count(),
            "Loaded hierarchies"
        );
        Self {
            locations,
            job_functions,
            only_associated_to_products,
        }
    }

    /// Hierarchies with no nodes; every expansion is empty.
    pub fn empty() -> Result<Self> {
        Ok(Self {
            locations: LocationHierarchy::new(Vec::new())?,
            job_functions: JobFunctionHierarchy::new(Vec::new(), Vec::new())?,
            only_associated_to_products: true,
        })
    }

    pub const fn only_associated_to_products(&self) -> bool {
        self.only_associated_to_products
    }
}

impl HierarchyLookup for Hierarchies {
    fn inclusive_location_ids(&self, ids: &[String]) -> Vec<String> {
        let expanded = self
            .locations
            .inclusive_ids(ids, self.only_associated_to_products);
        if expanded.is_empty() && !ids.is_empty() {
            debug!(?ids, "No known locations among requested ids");
        }
        expanded.into_iter().collect()
    }

    fn location_country_codes(&self, ids: &[String]) -> Vec<String> {
        self.locations.country_codes(ids)
    }

    fn inclusive_job_function_ids(&self, ids: &[i64]) -> Vec<i64> {
        self.job_functions.inclusive_ids(ids).into_iter().collect()
    }

    fn job_functions_for_titles(&self, title_ids: &[i64]) -> Vec<i64> {
        self.job_functions
            .job_functions_for_titles(title_ids)
            .into_iter()
            .collect()
    }
}
