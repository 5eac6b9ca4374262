use serde::{Deserialize, Serialize};

/// Aggregation granularity, derived from the zoom level.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// One counter per country.
    AggregateCountry,
    /// One counter per sub-region (city or known metro area).
    AggregateRegion,
    /// One card per member.
    Individual,
}

/// Highest zoom still rendered as per-country counters.
pub const COUNTRY_MAX_ZOOM: f64 = 4.0;
/// Highest zoom still rendered as per-region counters.
pub const REGION_MAX_ZOOM: f64 = 7.0;

/// Maps a zoom level to its display mode.
///
/// Total over `f64`: fractional zooms fall into the band they exceed, and NaN
/// maps to the coarsest mode. Call this on every camera change instead of
/// caching the result.
pub fn select_display_mode(zoom: f64) -> DisplayMode {
    if zoom.is_nan() || zoom <= COUNTRY_MAX_ZOOM {
        DisplayMode::AggregateCountry
    } else if zoom <= REGION_MAX_ZOOM {
        DisplayMode::AggregateRegion
    } else {
        DisplayMode::Individual
    }
}

impl DisplayMode {
    pub fn is_aggregate(self) -> bool {
        !matches!(self, DisplayMode::Individual)
    }

    pub fn label(self) -> &'static str {
        match self {
            DisplayMode::AggregateCountry => "country",
            DisplayMode::AggregateRegion => "region",
            DisplayMode::Individual => "individual",
        }
    }
}

impl std::fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::{DisplayMode, select_display_mode};

    #[test]
    fn band_boundaries_are_exact() {
        assert_eq!(select_display_mode(4.0), DisplayMode::AggregateCountry);
        assert_eq!(select_display_mode(5.0), DisplayMode::AggregateRegion);
        assert_eq!(select_display_mode(7.0), DisplayMode::AggregateRegion);
        assert_eq!(select_display_mode(8.0), DisplayMode::Individual);
    }

    #[test]
    fn total_over_all_reals() {
        assert_eq!(select_display_mode(-3.0), DisplayMode::AggregateCountry);
        assert_eq!(select_display_mode(0.0), DisplayMode::AggregateCountry);
        assert_eq!(select_display_mode(4.5), DisplayMode::AggregateRegion);
        assert_eq!(select_display_mode(7.25), DisplayMode::Individual);
        assert_eq!(select_display_mode(18.0), DisplayMode::Individual);
        assert_eq!(select_display_mode(f64::INFINITY), DisplayMode::Individual);
        assert_eq!(select_display_mode(f64::NEG_INFINITY), DisplayMode::AggregateCountry);
        assert_eq!(select_display_mode(f64::NAN), DisplayMode::AggregateCountry);
    }

    #[test]
    fn only_individual_is_not_aggregate() {
        assert!(DisplayMode::AggregateCountry.is_aggregate());
        assert!(DisplayMode::AggregateRegion.is_aggregate());
        assert!(!DisplayMode::Individual.is_aggregate());
        assert_eq!(DisplayMode::AggregateRegion.to_string(), "region");
    }
}
