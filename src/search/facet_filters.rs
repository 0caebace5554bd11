//! Single-field facet filters.
//!
//! Every filter kind is one row of a static table ([`FacetFilterSpec`]):
//! indexed field, request parameter, optional fallback parameter, operator,
//! score, value validation and a resolver that turns raw request values into
//! the values actually matched on. Binding a spec to one request yields a
//! [`FacetFilterInstance`] holding the rendered fragment.

use std::fmt;

use itertools::Itertools;
use serde::Serialize;
use tracing::trace;

use super::params::RequestParams;
use super::scores;
use crate::error::{FacetError, Result};
use crate::hierarchy::HierarchyLookup;

/// Accepted values for `channelType`.
pub const CHANNEL_TYPES: [&str; 5] = [
    "job board",
    "social media",
    "community",
    "publication",
    "aggregator",
];

const MAX_IDENTIFIER_LEN: usize = 128;

/// How a fragment combines with the other fragments of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operator {
    And,
    Or,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => write!(f, "AND"),
            Self::Or => write!(f, "OR"),
        }
    }
}

/// Expected shape of each raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Opaque id restricted to `[A-Za-z0-9._-]`.
    Identifier,
    /// Non-negative integer, rendered in canonical form.
    Integer,
    /// One of [`CHANNEL_TYPES`], case-insensitive.
    ChannelType,
}

impl ValueKind {
    /// Validate and normalise one raw value of `parameter`.
    pub fn parse(self, parameter: &str, raw: &str) -> Result<String> {
        match self {
            Self::Identifier => {
                let valid = raw.len() <= MAX_IDENTIFIER_LEN
                    && raw
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
                if valid {
                    Ok(raw.to_string())
                } else {
                    Err(FacetError::invalid_parameter(
                        parameter,
                        raw,
                        "expected an identifier of letters, digits, '.', '-' or '_'",
                    ))
                }
            }
            Self::Integer => raw
                .parse::<i64>()
                .ok()
                .filter(|value| *value >= 0)
                .map(|value| value.to_string())
                .ok_or_else(|| {
                    FacetError::invalid_parameter(parameter, raw, "expected a non-negative integer")
                }),
            Self::ChannelType => CHANNEL_TYPES
                .iter()
                .find(|channel| channel.eq_ignore_ascii_case(raw))
                .map(|channel| (*channel).to_string())
                .ok_or_else(|| {
                    FacetError::invalid_parameter(
                        parameter,
                        raw,
                        format!("expected one of: {}", CHANNEL_TYPES.join(", ")),
                    )
                }),
        }
    }
}

/// How resolved values become a fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Render {
    /// `field:"v"<score=S>` per value, OR-joined.
    Terms,
    /// `field>=v`; the parameter takes a single value.
    AtLeast,
    /// `field<=v`; the parameter takes a single value.
    AtMost,
    /// A constant predicate that does not read the request.
    Fixed(&'static str),
}

/// Maps validated raw values to the values matched on.
pub type ResolveFn = fn(&[String], &dyn HierarchyLookup) -> Vec<String>;

/// Parameter consulted only when the primary parameter is absent.
#[derive(Debug, Clone, Copy)]
pub struct SecondaryParameter {
    pub name: &'static str,
    pub value_kind: ValueKind,
    /// Derives primary values from the secondary ones.
    pub to_primary: ResolveFn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetFilterKind {
    InclusiveLocation,
    ExactLocation,
    PrimarySimilarWeb,
    SecondarySimilarWeb,
    JobFunction,
    InclusiveJobFunctionChildren,
    Industry,
    IsActive,
    IsAvailableInJmp,
    IsGeneric,
    IsInternational,
    Status,
    ProductsOnly,
    AddonsOnly,
    IsNotMyOwnProduct,
    DurationMoreThan,
    DurationLessThan,
    PriceMoreThan,
    PriceLessThan,
    ChannelType,
    CustomerId,
    Diversity,
    EmploymentType,
    SeniorityLevel,
}

impl FacetFilterKind {
    pub const ALL: [Self; 24] = [
        Self::InclusiveLocation,
        Self::ExactLocation,
        Self::PrimarySimilarWeb,
        Self::SecondarySimilarWeb,
        Self::JobFunction,
        Self::InclusiveJobFunctionChildren,
        Self::Industry,
        Self::IsActive,
        Self::IsAvailableInJmp,
        Self::IsGeneric,
        Self::IsInternational,
        Self::Status,
        Self::ProductsOnly,
        Self::AddonsOnly,
        Self::IsNotMyOwnProduct,
        Self::DurationMoreThan,
        Self::DurationLessThan,
        Self::PriceMoreThan,
        Self::PriceLessThan,
        Self::ChannelType,
        Self::CustomerId,
        Self::Diversity,
        Self::EmploymentType,
        Self::SeniorityLevel,
    ];

    /// The static spec row for this kind.
    pub fn spec(self) -> &'static FacetFilterSpec {
        &FACET_FILTER_SPECS[self as usize]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InclusiveLocation => "inclusive_location",
            Self::ExactLocation => "exact_location",
            Self::PrimarySimilarWeb => "primary_similar_web",
            Self::SecondarySimilarWeb => "secondary_similar_web",
            Self::JobFunction => "job_function",
            Self::InclusiveJobFunctionChildren => "inclusive_job_function_children",
            Self::Industry => "industry",
            Self::IsActive => "is_active",
            Self::IsAvailableInJmp => "is_available_in_jmp",
            Self::IsGeneric => "is_generic",
            Self::IsInternational => "is_international",
            Self::Status => "status",
            Self::ProductsOnly => "products_only",
            Self::AddonsOnly => "addons_only",
            Self::IsNotMyOwnProduct => "is_not_my_own_product",
            Self::DurationMoreThan => "duration_more_than",
            Self::DurationLessThan => "duration_less_than",
            Self::PriceMoreThan => "price_more_than",
            Self::PriceLessThan => "price_less_than",
            Self::ChannelType => "channel_type",
            Self::CustomerId => "customer_id",
            Self::Diversity => "diversity",
            Self::EmploymentType => "employment_type",
            Self::SeniorityLevel => "seniority_level",
        }
    }
}

impl fmt::Display for FacetFilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the filter registry.
#[derive(Debug, Clone, Copy)]
pub struct FacetFilterSpec {
    pub kind: FacetFilterKind,
    pub field_name: &'static str,
    /// `None` for structural filters that do not read the request.
    pub parameter_name: Option<&'static str>,
    pub secondary: Option<SecondaryParameter>,
    pub operator: Operator,
    pub score: u32,
    pub value_kind: ValueKind,
    pub render: Render,
    pub resolve: ResolveFn,
}

impl FacetFilterSpec {
    /// Structural filters apply to every request regardless of parameters.
    pub const fn is_structural(&self) -> bool {
        self.parameter_name.is_none()
    }

    const fn is_range(&self) -> bool {
        matches!(self.render, Render::AtLeast | Render::AtMost)
    }

    /// Bind this filter to one request.
    pub fn instantiate(
        &'static self,
        params: &RequestParams,
        lookup: &dyn HierarchyLookup,
    ) -> Result<FacetFilterInstance> {
        if let Render::Fixed(predicate) = self.render {
            return Ok(FacetFilterInstance {
                spec: self,
                values: Vec::new(),
                fragment: predicate.to_string(),
            });
        }

        let raw = self.raw_values(params, lookup)?;
        let values = (self.resolve)(&raw, lookup);
        let fragment = self.render_values(&values);
        trace!(filter = %self.kind, %fragment, "Rendered facet filter");

        Ok(FacetFilterInstance {
            spec: self,
            values,
            fragment,
        })
    }

    /// Validated primary values, or primary values derived from the
    /// secondary parameter when the primary one is absent.
    fn raw_values(&self, params: &RequestParams, lookup: &dyn HierarchyLookup) -> Result<Vec<String>> {
        let Some(name) = self.parameter_name else {
            return Ok(Vec::new());
        };

        let primary = parse_all(params, name, self.value_kind)?;
        if self.is_range() && primary.len() > 1 {
            return Err(FacetError::invalid_parameter(
                name,
                params.get(name).unwrap_or_default(),
                "expected a single value",
            ));
        }
        if !primary.is_empty() {
            return Ok(primary);
        }

        match self.secondary {
            Some(secondary) => {
                let raw = parse_all(params, secondary.name, secondary.value_kind)?;
                if raw.is_empty() {
                    Ok(raw)
                } else {
                    Ok((secondary.to_primary)(&raw, lookup))
                }
            }
            None => Ok(primary),
        }
    }

    fn render_values(&self, values: &[String]) -> String {
        match self.render {
            Render::Terms => values
                .iter()
                .map(|value| {
                    format!(
                        "{}:\"{}\"<score={}>",
                        self.field_name,
                        escape_value(value),
                        self.score
                    )
                })
                .join(" OR "),
            Render::AtLeast => values
                .first()
                .map(|value| format!("{}>={value}", self.field_name))
                .unwrap_or_default(),
            Render::AtMost => values
                .first()
                .map(|value| format!("{}<={value}", self.field_name))
                .unwrap_or_default(),
            Render::Fixed(predicate) => predicate.to_string(),
        }
    }
}

/// A filter spec bound to the values of one request.
#[derive(Debug, Clone)]
pub struct FacetFilterInstance {
    spec: &'static FacetFilterSpec,
    values: Vec<String>,
    fragment: String,
}

impl FacetFilterInstance {
    pub const fn spec(&self) -> &'static FacetFilterSpec {
        self.spec
    }

    pub const fn kind(&self) -> FacetFilterKind {
        self.spec.kind
    }

    pub const fn operator(&self) -> Operator {
        self.spec.operator
    }

    /// Resolved values; empty for fixed predicates.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// True when nothing was rendered.
    pub fn is_empty(&self) -> bool {
        self.fragment.is_empty()
    }
}

fn parse_all(params: &RequestParams, name: &str, kind: ValueKind) -> Result<Vec<String>> {
    let mut parsed: Vec<String> = Vec::new();
    for raw in params.values(name) {
        let value = kind.parse(name, raw)?;
        if !parsed.contains(&value) {
            parsed.push(value);
        }
    }
    Ok(parsed)
}

fn escape_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn parse_ids(raw: &[String]) -> Vec<i64> {
    raw.iter().filter_map(|value| value.parse().ok()).collect()
}

// =============================================================================
// Resolvers
// =============================================================================

fn literal(raw: &[String], _: &dyn HierarchyLookup) -> Vec<String> {
    raw.to_vec()
}

fn no_values(_: &[String], _: &dyn HierarchyLookup) -> Vec<String> {
    Vec::new()
}

fn constant_true(_: &[String], _: &dyn HierarchyLookup) -> Vec<String> {
    vec!["True".to_string()]
}

fn inclusive_locations(raw: &[String], lookup: &dyn HierarchyLookup) -> Vec<String> {
    lookup.inclusive_location_ids(raw)
}

/// Traffic-share ranking only makes sense for a single location.
fn primary_country_codes(raw: &[String], lookup: &dyn HierarchyLookup) -> Vec<String> {
    if raw.len() > 1 {
        return Vec::new();
    }
    lookup.location_country_codes(raw)
}

fn all_country_codes(raw: &[String], lookup: &dyn HierarchyLookup) -> Vec<String> {
    lookup.location_country_codes(raw)
}

fn inclusive_job_functions(raw: &[String], lookup: &dyn HierarchyLookup) -> Vec<String> {
    lookup
        .inclusive_job_function_ids(&parse_ids(raw))
        .into_iter()
        .map(|id| id.to_string())
        .collect()
}

fn job_functions_for_titles(raw: &[String], lookup: &dyn HierarchyLookup) -> Vec<String> {
    lookup
        .job_functions_for_titles(&parse_ids(raw))
        .into_iter()
        .map(|id| id.to_string())
        .collect()
}

// =============================================================================
// Registry table
// =============================================================================

const fn terms(
    kind: FacetFilterKind,
    field_name: &'static str,
    parameter_name: &'static str,
    operator: Operator,
    score: u32,
    value_kind: ValueKind,
    resolve: ResolveFn,
) -> FacetFilterSpec {
    FacetFilterSpec {
        kind,
        field_name,
        parameter_name: Some(parameter_name),
        secondary: None,
        operator,
        score,
        value_kind,
        render: Render::Terms,
        resolve,
    }
}

const fn range(
    kind: FacetFilterKind,
    field_name: &'static str,
    parameter_name: &'static str,
    render: Render,
) -> FacetFilterSpec {
    FacetFilterSpec {
        kind,
        field_name,
        parameter_name: Some(parameter_name),
        secondary: None,
        operator: Operator::And,
        score: scores::UNSCORED,
        value_kind: ValueKind::Integer,
        render,
        resolve: literal,
    }
}

const fn fixed(kind: FacetFilterKind, field_name: &'static str, predicate: &'static str) -> FacetFilterSpec {
    FacetFilterSpec {
        kind,
        field_name,
        parameter_name: None,
        secondary: None,
        operator: Operator::And,
        score: scores::UNSCORED,
        value_kind: ValueKind::Identifier,
        render: Render::Fixed(predicate),
        resolve: no_values,
    }
}

const fn boolean_boost(kind: FacetFilterKind, field_name: &'static str, score: u32) -> FacetFilterSpec {
    FacetFilterSpec {
        kind,
        field_name,
        parameter_name: None,
        secondary: None,
        operator: Operator::Or,
        score,
        value_kind: ValueKind::Identifier,
        render: Render::Terms,
        resolve: constant_true,
    }
}

/// Indexed by `FacetFilterKind as usize`.
static FACET_FILTER_SPECS: [FacetFilterSpec; 24] = [
    terms(
        FacetFilterKind::InclusiveLocation,
        "searchable_locations_mapbox_ids",
        "includeLocationId",
        Operator::Or,
        scores::INCLUSIVE_LOCATION,
        ValueKind::Identifier,
        inclusive_locations,
    ),
    terms(
        FacetFilterKind::ExactLocation,
        "searchable_locations_ids",
        "exactLocationId",
        Operator::And,
        scores::EXACT_LOCATION,
        ValueKind::Identifier,
        literal,
    ),
    terms(
        FacetFilterKind::PrimarySimilarWeb,
        "primary_similarweb_location",
        "includeLocationId",
        Operator::Or,
        scores::PRIMARY_SIMILARWEB_LOCATION,
        ValueKind::Identifier,
        primary_country_codes,
    ),
    terms(
        FacetFilterKind::SecondarySimilarWeb,
        "secondary_similarweb_location",
        "includeLocationId",
        Operator::Or,
        scores::SECONDARY_SIMILARWEB_LOCATION,
        ValueKind::Identifier,
        all_country_codes,
    ),
    terms(
        FacetFilterKind::JobFunction,
        "searchable_job_functions_ids",
        "jobFunctionId",
        Operator::Or,
        scores::JOB_FUNCTION,
        ValueKind::Integer,
        literal,
    ),
    FacetFilterSpec {
        kind: FacetFilterKind::InclusiveJobFunctionChildren,
        field_name: "searchable_job_functions_ids",
        parameter_name: Some("jobFunctionId"),
        secondary: Some(SecondaryParameter {
            name: "jobTitleId",
            value_kind: ValueKind::Integer,
            to_primary: job_functions_for_titles,
        }),
        operator: Operator::Or,
        score: scores::DESCENDANT_JOB_FUNCTIONS,
        value_kind: ValueKind::Integer,
        render: Render::Terms,
        resolve: inclusive_job_functions,
    },
    terms(
        FacetFilterKind::Industry,
        "searchable_industries_ids",
        "industryId",
        Operator::Or,
        scores::INDUSTRY,
        ValueKind::Integer,
        literal,
    ),
    fixed(FacetFilterKind::IsActive, "is_active", "is_active:true"),
    fixed(FacetFilterKind::IsAvailableInJmp, "available_in_jmp", "available_in_jmp:true"),
    boolean_boost(FacetFilterKind::IsGeneric, "is_generic", scores::IS_GENERIC),
    boolean_boost(FacetFilterKind::IsInternational, "is_international", scores::IS_INTERNATIONAL),
    fixed(FacetFilterKind::Status, "filterable_status", "filterable_status:\"Active\""),
    fixed(FacetFilterKind::ProductsOnly, "is_product", "is_product:true"),
    fixed(FacetFilterKind::AddonsOnly, "is_addon", "is_addon:true"),
    fixed(FacetFilterKind::IsNotMyOwnProduct, "is_my_own_product", "is_my_own_product:false"),
    range(FacetFilterKind::DurationMoreThan, "duration_days", "durationFrom", Render::AtLeast),
    range(FacetFilterKind::DurationLessThan, "duration_days", "durationTo", Render::AtMost),
    range(FacetFilterKind::PriceMoreThan, "list_price", "priceFrom", Render::AtLeast),
    range(FacetFilterKind::PriceLessThan, "list_price", "priceTo", Render::AtMost),
    terms(
        FacetFilterKind::ChannelType,
        "channel_type",
        "channelType",
        Operator::And,
        scores::UNSCORED,
        ValueKind::ChannelType,
        literal,
    ),
    terms(
        FacetFilterKind::CustomerId,
        "customer_id",
        "customerId",
        Operator::And,
        scores::UNSCORED,
        ValueKind::Identifier,
        literal,
    ),
    terms(
        FacetFilterKind::Diversity,
        "diversity",
        "diversityId",
        Operator::And,
        scores::CATEGORICAL,
        ValueKind::Integer,
        literal,
    ),
    terms(
        FacetFilterKind::EmploymentType,
        "employment_type",
        "employmentTypeId",
        Operator::And,
        scores::CATEGORICAL,
        ValueKind::Integer,
        literal,
    ),
    terms(
        FacetFilterKind::SeniorityLevel,
        "seniority_level",
        "seniorityId",
        Operator::And,
        scores::CATEGORICAL,
        ValueKind::Integer,
        literal,
    ),
];
