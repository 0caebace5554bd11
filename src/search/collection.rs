//! Builds every filter and group for one request and assembles the final
//! filter expression and query document.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::facet_filters::{FacetFilterInstance, FacetFilterKind, Operator};
use super::facets::FACET_FIELDS;
use super::groups::{FacetFilterGroupInstance, GroupKind};
use super::params::{Pagination, RequestParams};
use crate::error::{FacetError, Result};
use crate::hierarchy::HierarchyLookup;

/// Which filter kinds a search applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterRegistry {
    /// Product search.
    #[default]
    Products,
    /// Add-on search.
    Addons,
    /// Product search hiding the caller's own products.
    NotMyOwn,
}

const COMMON_FILTERS: [FacetFilterKind; 17] = [
    FacetFilterKind::IsActive,
    FacetFilterKind::Status,
    FacetFilterKind::IsGeneric,
    FacetFilterKind::IsInternational,
    FacetFilterKind::InclusiveLocation,
    FacetFilterKind::ExactLocation,
    FacetFilterKind::PrimarySimilarWeb,
    FacetFilterKind::SecondarySimilarWeb,
    FacetFilterKind::JobFunction,
    FacetFilterKind::InclusiveJobFunctionChildren,
    FacetFilterKind::Industry,
    FacetFilterKind::DurationMoreThan,
    FacetFilterKind::DurationLessThan,
    FacetFilterKind::PriceMoreThan,
    FacetFilterKind::PriceLessThan,
    FacetFilterKind::ChannelType,
    FacetFilterKind::CustomerId,
];

const CATEGORICAL_FILTERS: [FacetFilterKind; 3] = [
    FacetFilterKind::Diversity,
    FacetFilterKind::EmploymentType,
    FacetFilterKind::SeniorityLevel,
];

impl FilterRegistry {
    pub const ALL: [Self; 3] = [Self::Products, Self::Addons, Self::NotMyOwn];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Addons => "addons",
            Self::NotMyOwn => "not_my_own",
        }
    }

    /// Filter kinds in registration order.
    pub fn filters(self) -> Vec<FacetFilterKind> {
        let mut kinds = COMMON_FILTERS.to_vec();
        kinds.extend(CATEGORICAL_FILTERS);
        match self {
            Self::Products => kinds.push(FacetFilterKind::ProductsOnly),
            Self::Addons => kinds.push(FacetFilterKind::AddonsOnly),
            Self::NotMyOwn => kinds.extend([
                FacetFilterKind::ProductsOnly,
                FacetFilterKind::IsNotMyOwnProduct,
            ]),
        }
        kinds
    }

    pub fn groups(self) -> &'static [GroupKind] {
        &GroupKind::ALL
    }
}

impl fmt::Display for FilterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterRegistry {
    type Err = FacetError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|registry| registry.as_str() == s.trim())
            .ok_or_else(|| {
                FacetError::invalid_parameter(
                    "registry",
                    s,
                    format!(
                        "expected one of: {}",
                        Self::ALL.iter().map(|r| r.as_str()).join(", ")
                    ),
                )
            })
    }
}

/// Everything needed to build one request's filter expression.
#[derive(Debug, Clone)]
pub struct FacetFilterCollection {
    registry: FilterRegistry,
    filters: Vec<FacetFilterInstance>,
    groups: Vec<FacetFilterGroupInstance>,
    expression: String,
    pagination: Pagination,
    query: Option<String>,
}

impl FacetFilterCollection {
    /// Build every registered filter and group for `params`.
    ///
    /// A request without any filtering parameter yields an empty collection
    /// (empty expression), whatever the registry's structural filters are.
    pub fn build(
        params: &RequestParams,
        registry: FilterRegistry,
        lookup: &dyn HierarchyLookup,
        pagination: Pagination,
    ) -> Result<Self> {
        params.validate()?;
        let present_keys = params.present_keys();

        let mut filters = Vec::new();
        for kind in Self::context_kinds(registry) {
            filters.push(kind.spec().instantiate(params, lookup)?);
        }

        // Structural filters always resolve, so groups built on them would
        // otherwise activate for a request that filters nothing.
        let groups: Vec<FacetFilterGroupInstance> = if present_keys.is_empty() {
            Vec::new()
        } else {
            registry
                .groups()
                .iter()
                .filter_map(|kind| kind.spec().activate(&present_keys, &filters))
                .collect()
        };

        // Group-only members are context, not part of the expression.
        let registered = registry.filters();
        filters.retain(|instance| registered.contains(&instance.kind()));

        let expression = if present_keys.is_empty() {
            String::new()
        } else {
            assemble(&filters, &groups)
        };

        debug!(
            registry = %registry,
            filters = filters.iter().filter(|f| !f.is_empty()).count(),
            groups = groups.len(),
            expression_len = expression.len(),
            "Built facet filter collection"
        );

        Ok(Self {
            registry,
            filters,
            groups,
            expression,
            pagination,
            query: params.name().map(str::to_string),
        })
    }

    /// Registered filters plus any filter a group needs as context.
    fn context_kinds(registry: FilterRegistry) -> Vec<FacetFilterKind> {
        let mut kinds = registry.filters();
        for group in registry.groups() {
            for member in group.spec().filters {
                if !kinds.contains(member) {
                    kinds.push(*member);
                }
            }
        }
        kinds
    }

    pub const fn registry(&self) -> FilterRegistry {
        self.registry
    }

    /// Instances of the registered filters, in registration order.
    pub fn filters(&self) -> &[FacetFilterInstance] {
        &self.filters
    }

    pub fn filter(&self, kind: FacetFilterKind) -> Option<&FacetFilterInstance> {
        self.filters.iter().find(|instance| instance.kind() == kind)
    }

    pub fn active_groups(&self) -> &[FacetFilterGroupInstance] {
        &self.groups
    }

    pub fn active_group_kinds(&self) -> BTreeSet<GroupKind> {
        self.groups.iter().map(FacetFilterGroupInstance::kind).collect()
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn is_empty(&self) -> bool {
        self.expression.is_empty()
    }

    pub const fn pagination(&self) -> Pagination {
        self.pagination
    }

    /// The document sent to the search index.
    pub fn query(&self) -> QueryDocument {
        QueryDocument {
            get_ranking_info: true,
            analytics: true,
            enable_ab_test: false,
            attributes_to_retrieve: vec!["id".to_string()],
            attributes_to_snippet: vec!["*:20".to_string()],
            snippet_ellipsis_text: "…".to_string(),
            response_fields: vec!["*".to_string()],
            facets: FACET_FIELDS.iter().map(|field| (*field).to_string()).collect(),
            filters: self.expression.clone(),
            sum_or_filters_scores: false,
            length: self.pagination.length,
            offset: self.pagination.offset,
            query: self.query.clone(),
        }
    }
}

/// `(and1) AND (and2) ... AND (or1 OR or2 ...) AND (group1 OR group2 ...)`
fn assemble(filters: &[FacetFilterInstance], groups: &[FacetFilterGroupInstance]) -> String {
    let mut parts: Vec<String> = filters
        .iter()
        .filter(|f| f.operator() == Operator::And && !f.is_empty())
        .map(|f| format!("({})", f.fragment()))
        .collect();

    let or_fragments: Vec<&str> = filters
        .iter()
        .filter(|f| f.operator() == Operator::Or && !f.is_empty())
        .map(FacetFilterInstance::fragment)
        .collect();
    if !or_fragments.is_empty() {
        parts.push(format!("({})", or_fragments.join(" OR ")));
    }

    if !groups.is_empty() {
        parts.push(format!(
            "({})",
            groups.iter().map(FacetFilterGroupInstance::fragment).join(" OR ")
        ));
    }

    parts.join(" AND ")
}

/// Search request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryDocument {
    pub get_ranking_info: bool,
    pub analytics: bool,
    #[serde(rename = "enableABTest")]
    pub enable_ab_test: bool,
    pub attributes_to_retrieve: Vec<String>,
    pub attributes_to_snippet: Vec<String>,
    pub snippet_ellipsis_text: String,
    pub response_fields: Vec<String>,
    pub facets: Vec<String>,
    pub filters: String,
    pub sum_or_filters_scores: bool,
    pub length: u32,
    pub offset: u32,
    /// Free-text query from the `name` parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}
