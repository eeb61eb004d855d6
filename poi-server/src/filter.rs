//! Marker visibility from toggle state.
//!
//! Restaurants are filtered by category, stations and bus stops by their own
//! independent toggles. When no restaurant category is selected at all, every
//! restaurant is shown.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::Category;

/// What a marker represents, for filtering purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    Restaurant(Category),
    Station,
    BusStop,
}

/// A single user-facing toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Toggle {
    Category(Category),
    Stations,
    BusStops,
}

/// Error returned when a toggle key isn't recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown filter toggle: {0}")]
pub struct UnknownToggle(pub String);

impl Toggle {
    /// Every recognized toggle.
    pub const ALL: [Toggle; 7] = [
        Toggle::Category(Category::Drugstore),
        Toggle::Category(Category::Convenience),
        Toggle::Category(Category::Cafe),
        Toggle::Category(Category::Super),
        Toggle::Category(Category::Default),
        Toggle::Stations,
        Toggle::BusStops,
    ];

    /// Parse a toggle key.
    ///
    /// Accepts category tokens (`cafe`), the kind tokens `stations` and
    /// `bus_stops`, and the form-control spelling with a `filter-` prefix and
    /// dashes (`filter-cafe`, `filter-bus-stops`). `other` is an alias for
    /// the default category.
    pub fn parse(key: &str) -> Result<Self, UnknownToggle> {
        let token = key.trim();
        let token = token.strip_prefix("filter-").unwrap_or(token);
        let token = token.replace('-', "_");

        match token.as_str() {
            "stations" => Ok(Toggle::Stations),
            "bus_stops" => Ok(Toggle::BusStops),
            "other" => Ok(Toggle::Category(Category::Default)),
            t => Category::from_token(t)
                .map(Toggle::Category)
                .ok_or_else(|| UnknownToggle(key.to_string())),
        }
    }

    /// Canonical token for this toggle.
    pub fn as_str(&self) -> &'static str {
        match self {
            Toggle::Category(c) => c.as_str(),
            Toggle::Stations => "stations",
            Toggle::BusStops => "bus_stops",
        }
    }
}

impl fmt::Display for Toggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current on/off state of every toggle.
///
/// Everything starts off: restaurants are then shown by the fail-open rule,
/// stations and bus stops are hidden. When deserialized, missing toggles are
/// off and unrecognized keys are an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterState {
    pub drugstore: bool,
    pub convenience: bool,
    pub cafe: bool,
    #[serde(rename = "super")]
    pub super_: bool,
    pub default: bool,
    pub stations: bool,
    pub bus_stops: bool,
}

impl FilterState {
    /// Whether the given toggle is on.
    pub fn get(&self, toggle: Toggle) -> bool {
        match toggle {
            Toggle::Category(c) => self.category(c),
            Toggle::Stations => self.stations,
            Toggle::BusStops => self.bus_stops,
        }
    }

    /// Turn a toggle on or off.
    pub fn set(&mut self, toggle: Toggle, on: bool) {
        let slot = match toggle {
            Toggle::Category(Category::Drugstore) => &mut self.drugstore,
            Toggle::Category(Category::Convenience) => &mut self.convenience,
            Toggle::Category(Category::Cafe) => &mut self.cafe,
            Toggle::Category(Category::Super) => &mut self.super_,
            Toggle::Category(Category::Default) => &mut self.default,
            Toggle::Stations => &mut self.stations,
            Toggle::BusStops => &mut self.bus_stops,
        };
        *slot = on;
    }

    /// Builder-style variant of [`FilterState::set`].
    pub fn with(mut self, toggle: Toggle, on: bool) -> Self {
        self.set(toggle, on);
        self
    }

    fn category(&self, category: Category) -> bool {
        match category {
            Category::Drugstore => self.drugstore,
            Category::Convenience => self.convenience,
            Category::Cafe => self.cafe,
            Category::Super => self.super_,
            Category::Default => self.default,
        }
    }

    /// Whether any restaurant category is selected.
    pub fn any_category(&self) -> bool {
        Category::ALL.into_iter().any(|c| self.category(c))
    }
}

/// Decide whether a marker should be shown.
///
/// # Examples
///
/// ```
/// use poi_server::domain::Category;
/// use poi_server::filter::{FilterState, MarkerKind, Toggle, is_visible};
///
/// let nothing = FilterState::default();
/// assert!(is_visible(MarkerKind::Restaurant(Category::Super), &nothing));
/// assert!(!is_visible(MarkerKind::Station, &nothing));
///
/// let cafes = nothing.with(Toggle::Category(Category::Cafe), true);
/// assert!(!is_visible(MarkerKind::Restaurant(Category::Super), &cafes));
/// ```
pub fn is_visible(kind: MarkerKind, state: &FilterState) -> bool {
    match kind {
        MarkerKind::Station => state.stations,
        MarkerKind::BusStop => state.bus_stops,
        MarkerKind::Restaurant(category) => !state.any_category() || state.category(category),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESTAURANTS: [MarkerKind; 5] = [
        MarkerKind::Restaurant(Category::Drugstore),
        MarkerKind::Restaurant(Category::Convenience),
        MarkerKind::Restaurant(Category::Cafe),
        MarkerKind::Restaurant(Category::Super),
        MarkerKind::Restaurant(Category::Default),
    ];

    #[test]
    fn nothing_selected_shows_all_restaurants() {
        let state = FilterState::default();
        for kind in RESTAURANTS {
            assert!(is_visible(kind, &state), "{kind:?} should be visible");
        }
    }

    #[test]
    fn stations_and_bus_stops_hidden_by_default() {
        let state = FilterState::default();
        assert!(!is_visible(MarkerKind::Station, &state));
        assert!(!is_visible(MarkerKind::BusStop, &state));
    }

    #[test]
    fn only_cafe_selected() {
        let state = FilterState::default().with(Toggle::Category(Category::Cafe), true);

        for kind in RESTAURANTS {
            let expected = kind == MarkerKind::Restaurant(Category::Cafe);
            assert_eq!(is_visible(kind, &state), expected, "{kind:?}");
        }
        assert!(!is_visible(MarkerKind::Station, &state));
        assert!(!is_visible(MarkerKind::BusStop, &state));
    }

    #[test]
    fn default_category_is_a_real_selection() {
        let state = FilterState::default().with(Toggle::Category(Category::Default), true);
        assert!(is_visible(MarkerKind::Restaurant(Category::Default), &state));
        assert!(!is_visible(MarkerKind::Restaurant(Category::Cafe), &state));
    }

    #[test]
    fn transport_toggles_do_not_disable_fail_open() {
        let state = FilterState::default()
            .with(Toggle::Stations, true)
            .with(Toggle::BusStops, true);

        assert!(!state.any_category());
        assert!(is_visible(MarkerKind::Station, &state));
        assert!(is_visible(MarkerKind::BusStop, &state));
        for kind in RESTAURANTS {
            assert!(is_visible(kind, &state));
        }
    }

    #[test]
    fn set_and_get_every_toggle() {
        for toggle in Toggle::ALL {
            let mut state = FilterState::default();
            assert!(!state.get(toggle));
            state.set(toggle, true);
            assert!(state.get(toggle));
            for other in Toggle::ALL.into_iter().filter(|t| *t != toggle) {
                assert!(!state.get(other), "{toggle} leaked into {other}");
            }
        }
    }

    #[test]
    fn parse_tokens() {
        assert_eq!(Toggle::parse("cafe"), Ok(Toggle::Category(Category::Cafe)));
        assert_eq!(Toggle::parse("filter-cafe"), Ok(Toggle::Category(Category::Cafe)));
        assert_eq!(Toggle::parse("filter-bus-stops"), Ok(Toggle::BusStops));
        assert_eq!(Toggle::parse("bus_stops"), Ok(Toggle::BusStops));
        assert_eq!(Toggle::parse("filter-stations"), Ok(Toggle::Stations));
        assert_eq!(
            Toggle::parse("filter-other"),
            Ok(Toggle::Category(Category::Default))
        );
        assert_eq!(
            Toggle::parse("filter-student"),
            Err(UnknownToggle("filter-student".to_string()))
        );
    }

    #[test]
    fn parse_roundtrips_canonical_tokens() {
        for toggle in Toggle::ALL {
            assert_eq!(Toggle::parse(toggle.as_str()), Ok(toggle));
        }
    }

    #[test]
    fn state_deserializes_with_missing_fields() {
        let state: FilterState = serde_json::from_str(r#"{"super": true}"#).unwrap();
        assert!(state.super_);
        assert!(!state.cafe);
        assert!(!state.stations);
    }

    #[test]
    fn state_rejects_unknown_keys() {
        assert!(serde_json::from_str::<FilterState>(r#"{"filter-cafe": true}"#).is_err());
        assert!(serde_json::from_str::<FilterState>(r#"{"cafe": true, "cafee": true}"#).is_err());
        assert!(serde_json::from_str::<FilterState>(r#"{"super_": true}"#).is_err());
    }
}
