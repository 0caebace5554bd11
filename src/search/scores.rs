//! Relevance scores attached to filter terms.
//!
//! The index keeps the highest score among matching OR terms
//! (`sumOrFiltersScores: false`), so only the relative order matters.

// Single-field filters, highest first.
pub const EXACT_LOCATION: u32 = 1000;
pub const INCLUSIVE_LOCATION: u32 = 500;
pub const JOB_FUNCTION: u32 = 250;
pub const PRIMARY_SIMILARWEB_LOCATION: u32 = 240;
pub const DESCENDANT_JOB_FUNCTIONS: u32 = 125;
pub const IS_GENERIC: u32 = 83;
pub const IS_INTERNATIONAL: u32 = 80;
pub const SECONDARY_SIMILARWEB_LOCATION: u32 = 62;
pub const INDUSTRY: u32 = 41;

/// Exact-match categorical filters (diversity, employment type, seniority).
pub const CATEGORICAL: u32 = 1;
/// Filters that constrain without ranking.
pub const UNSCORED: u32 = 0;

// Group filters, highest first.
pub const JOBFUNCTION_INDUSTRY_AND_LOCATION: u32 = 1000;
pub const JOBFUNCTION_AND_LOCATION: u32 = 500;
pub const GENERIC_AND_LOCATION: u32 = 166;
pub const JOBFUNCTION_AND_INTERNATIONAL: u32 = 83;
pub const INDUSTRY_AND_LOCATION: u32 = 60;
pub const INDUSTRY_AND_INTERNATIONAL: u32 = 40;
pub const GENERIC_AND_INTERNATIONAL: u32 = 20;

/// Single-field tiers in ranking order.
pub const FILTER_TIERS: [(&str, u32); 7] = [
    ("exact location", EXACT_LOCATION),
    ("inclusive location", INCLUSIVE_LOCATION),
    ("job function", JOB_FUNCTION),
    ("descendant job functions", DESCENDANT_JOB_FUNCTIONS),
    ("generic board", IS_GENERIC),
    ("international board", IS_INTERNATIONAL),
    ("industry", INDUSTRY),
];

/// Group tiers in ranking order.
pub const GROUP_TIERS: [(&str, u32); 7] = [
    ("job function x industry x location", JOBFUNCTION_INDUSTRY_AND_LOCATION),
    ("job function x location", JOBFUNCTION_AND_LOCATION),
    ("generic x location", GENERIC_AND_LOCATION),
    ("job function x international", JOBFUNCTION_AND_INTERNATIONAL),
    ("industry x location", INDUSTRY_AND_LOCATION),
    ("industry x international", INDUSTRY_AND_INTERNATIONAL),
    ("generic x international", GENERIC_AND_INTERNATIONAL),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn strictly_descending(tiers: &[(&str, u32)]) -> bool {
        tiers.windows(2).all(|pair| pair[0].1 > pair[1].1)
    }

    #[test]
    fn test_filter_tiers_strictly_descending() {
        assert!(strictly_descending(&FILTER_TIERS));
    }

    #[test]
    fn test_group_tiers_strictly_descending() {
        assert!(strictly_descending(&GROUP_TIERS));
    }

    #[test]
    fn test_similarweb_scores_sit_between_tiers() {
        assert!(PRIMARY_SIMILARWEB_LOCATION < JOB_FUNCTION);
        assert!(PRIMARY_SIMILARWEB_LOCATION > DESCENDANT_JOB_FUNCTIONS);
        assert!(SECONDARY_SIMILARWEB_LOCATION > INDUSTRY);
        assert!(CATEGORICAL > UNSCORED);
        assert!(INDUSTRY > CATEGORICAL);
    }
}
