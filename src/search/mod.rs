//! Facet filter compilation for product search.
//!
//! Request parameters are turned into single-field filters
//! ([`facet_filters`]), composite group filters ([`groups`]) and finally one
//! filter expression packaged as a [`QueryDocument`] ([`collection`]).
//! [`executor`] sends that document to the hosted index.

pub mod collection;
pub mod executor;
pub mod facet_filters;
pub mod facets;
pub mod groups;
pub mod params;
pub mod scores;

pub use collection::{FacetFilterCollection, FilterRegistry, QueryDocument};
pub use executor::{
    HttpQueryExecutor, PreparedSearch, ProductSearch, QueryExecutor, SearchHit, SearchOutcome,
    SearchResponse, resolve_index,
};
pub use facet_filters::{
    CHANNEL_TYPES, FacetFilterInstance, FacetFilterKind, FacetFilterSpec, Operator,
};
pub use facets::{FACET_FIELDS, FacetCounts, convert_facet_payload, parameter_for_field};
pub use groups::{FacetFilterGroupInstance, FacetFilterGroupSpec, GroupKind};
pub use params::{EXACT_MATCH_PARAMETERS, Pagination, RequestParams, SEARCH_QUERY_PARAMETERS};
