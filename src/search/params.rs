//! Request parameters for product search.
//!
//! A request is a flat map of parameter name -> raw string. Array parameters
//! are comma-separated. Only the parameters in [`SEARCH_QUERY_PARAMETERS`]
//! count towards the "present keys" that group predicates look at.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::error::{FacetError, Result, suggest_similar_parameters};

/// Parameters that drive filtering.
pub const SEARCH_QUERY_PARAMETERS: [&str; 16] = [
    "includeLocationId",
    "exactLocationId",
    "industryId",
    "jobTitleId",
    "jobFunctionId",
    "durationFrom",
    "durationTo",
    "name",
    "channelType",
    "customerId",
    "categoryId",
    "diversityId",
    "employmentTypeId",
    "seniorityId",
    "priceTo",
    "priceFrom",
];

/// Parameters that limit results to exact categorical matches.
pub const EXACT_MATCH_PARAMETERS: [&str; 3] = ["seniorityId", "employmentTypeId", "diversityId"];

pub const SORT_PARAMETER: &str = "sortBy";
pub const LIMIT_PARAMETER: &str = "limit";
pub const OFFSET_PARAMETER: &str = "offset";

/// Offset/length window requested from the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub offset: u32,
    pub length: u32,
}

impl Pagination {
    pub const fn new(offset: u32, length: u32) -> Self {
        Self { offset, length }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(0, 50)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    values: BTreeMap<String, String>,
}

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from key/value pairs. A repeated key keeps its last value.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut params = Self::new();
        for (key, value) in pairs {
            params.insert(key, value);
        }
        params
    }

    /// Parse a URL query string such as `jobFunctionId=3&includeLocationId=nl`.
    ///
    /// A leading `?` is ignored and `+` decodes to a space.
    pub fn parse_query(query: &str) -> Result<Self> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = Self::new();

        for pair in query.split('&').filter(|pair| !pair.is_empty()) {
            let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = decode_component(raw_key, raw_key)?;
            let value = decode_component(raw_value, &key)?;
            params.insert(key, value);
        }

        Ok(params)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Raw value, untouched.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Comma-separated values of `key`, trimmed, blanks dropped.
    pub fn values(&self, key: &str) -> Vec<&str> {
        self.get(key)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|value| !value.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether `key` carries at least one non-blank value.
    pub fn is_present(&self, key: &str) -> bool {
        !self.values(key).is_empty()
    }

    /// Filtering parameters with a non-empty value.
    pub fn present_keys(&self) -> BTreeSet<&'static str> {
        SEARCH_QUERY_PARAMETERS
            .iter()
            .copied()
            .filter(|key| self.is_present(key))
            .collect()
    }

    /// Keys no part of product search understands.
    pub fn unknown_keys(&self) -> Vec<&str> {
        self.values
            .keys()
            .map(String::as_str)
            .filter(|key| !is_known_parameter(key))
            .collect()
    }

    /// Unknown keys paired with the closest known parameter names.
    pub fn unknown_key_suggestions(&self) -> Vec<(String, Vec<String>)> {
        let known = known_parameters();
        self.unknown_keys()
            .into_iter()
            .map(|key| (key.to_string(), suggest_similar_parameters(key, &known, 3)))
            .collect()
    }

    /// Free-text product name, if any.
    ///
    /// Absent exactly when `name` is missing from [`Self::present_keys`];
    /// commas inside a real name are kept.
    pub fn name(&self) -> Option<&str> {
        if !self.is_present("name") {
            return None;
        }
        self.get("name").map(str::trim)
    }

    pub fn sort_by(&self) -> Option<&str> {
        self.get(SORT_PARAMETER)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// Resolve `offset`/`limit`.
    ///
    /// The index never returns hits past `max_length`, so the window must
    /// end within it.
    pub fn pagination(&self, default_length: u32, max_length: u32) -> Result<Pagination> {
        let length = match self.get(LIMIT_PARAMETER).map(str::trim) {
            None | Some("") => default_length,
            Some(raw) => raw.parse::<u32>().map_err(|_| {
                FacetError::InvalidPagination(format!("limit {raw:?} is not a non-negative integer"))
            })?,
        };
        let offset = match self.get(OFFSET_PARAMETER).map(str::trim) {
            None | Some("") => 0,
            Some(raw) => raw.parse::<u32>().map_err(|_| {
                FacetError::InvalidPagination(format!("offset {raw:?} is not a non-negative integer"))
            })?,
        };

        if length == 0 || length > max_length {
            return Err(FacetError::InvalidPagination(format!(
                "limit must be between 1 and {max_length}, got {length}"
            )));
        }
        if u64::from(offset) + u64::from(length) > u64::from(max_length) {
            return Err(FacetError::InvalidPagination(format!(
                "offset + limit must not exceed {max_length}, got {}",
                u64::from(offset) + u64::from(length)
            )));
        }

        Ok(Pagination::new(offset, length))
    }

    /// Request-level checks that do not depend on any single filter.
    pub fn validate(&self) -> Result<()> {
        if self.is_present("jobTitleId") && self.is_present("jobFunctionId") {
            return Err(FacetError::ConflictingParameters {
                first: "jobTitleId".to_string(),
                second: "jobFunctionId".to_string(),
            });
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn decode_component(raw: &str, parameter: &str) -> Result<String> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(std::borrow::Cow::into_owned)
        .map_err(|err| FacetError::invalid_parameter(parameter, raw, format!("invalid percent-encoding: {err}")))
}

fn known_parameters() -> Vec<&'static str> {
    let mut known = SEARCH_QUERY_PARAMETERS.to_vec();
    known.extend([SORT_PARAMETER, LIMIT_PARAMETER, OFFSET_PARAMETER]);
    known
}

fn is_known_parameter(key: &str) -> bool {
    SEARCH_QUERY_PARAMETERS.contains(&key)
        || key == SORT_PARAMETER
        || key == LIMIT_PARAMETER
        || key == OFFSET_PARAMETER
}
