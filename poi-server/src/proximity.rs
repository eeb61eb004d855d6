//! Nearest-facility search.
//!
//! A linear scan using haversine distance. The candidate sets here are a few
//! hundred stations and bus stops, so no spatial index is kept.

use crate::domain::{BusStop, Coordinate, Station};

/// Mean Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Anything with a position on the map.
pub trait Located {
    fn coordinate(&self) -> Coordinate;
}

impl Located for Station {
    fn coordinate(&self) -> Coordinate {
        self.coordinate
    }
}

impl Located for BusStop {
    fn coordinate(&self) -> Coordinate {
        self.coordinate
    }
}

impl Located for Coordinate {
    fn coordinate(&self) -> Coordinate {
        *self
    }
}

/// The closest candidate and its distance, rounded to whole meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest<'a, T> {
    pub target: &'a T,
    pub distance_m: u32,
}

/// Great-circle distance between two coordinates in meters (unrounded).
pub fn haversine_m(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat().to_radians();
    let lat2 = b.lat().to_radians();
    let d_lat = (b.lat() - a.lat()).to_radians();
    let d_lng = (b.lng() - a.lng()).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    // Clamp guards against rounding pushing h fractionally above 1 for antipodes.
    let c = 2.0 * h.sqrt().min(1.0).asin();

    EARTH_RADIUS_M * c
}

/// Distance between two coordinates rounded to the nearest meter.
pub fn distance_m(a: Coordinate, b: Coordinate) -> u32 {
    round_meters(haversine_m(a, b))
}

fn round_meters(d: f64) -> u32 {
    // Half a circumference is ~20,015 km, well within u32.
    d.round() as u32
}

/// Find the candidate closest to `point`.
///
/// Returns `None` when `candidates` is empty. When two candidates are equally
/// close, the first one in iteration order wins.
///
/// # Examples
///
/// ```
/// use poi_server::domain::Coordinate;
/// use poi_server::proximity::nearest;
///
/// let here = Coordinate::new(36.0641, 136.2193).unwrap();
/// let none: Vec<Coordinate> = Vec::new();
/// assert!(nearest(here, &none).is_none());
///
/// let one = [here];
/// let found = nearest(here, &one).unwrap();
/// assert_eq!(found.distance_m, 0);
/// ```
pub fn nearest<T: Located>(point: Coordinate, candidates: &[T]) -> Option<Nearest<'_, T>> {
    let mut best: Option<(&T, f64)> = None;

    for candidate in candidates {
        let d = haversine_m(point, candidate.coordinate());
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((candidate, d)),
        }
    }

    best.map(|(target, d)| Nearest {
        target,
        distance_m: round_meters(d),
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn any_coord() -> impl Strategy<Value = Coordinate> {
        (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lng)| Coordinate::new(lat, lng).unwrap())
    }

    proptest! {
        #[test]
        fn symmetric(a in any_coord(), b in any_coord()) {
            prop_assert_eq!(distance_m(a, b), distance_m(b, a));
        }

        #[test]
        fn self_distance_is_zero(a in any_coord()) {
            prop_assert_eq!(distance_m(a, a), 0);
        }

        /// The reported nearest is never farther than any other candidate.
        #[test]
        fn nearest_is_minimal(
            p in any_coord(),
            candidates in proptest::collection::vec(any_coord(), 1..20),
        ) {
            let found = nearest(p, &candidates).unwrap();
            for c in &candidates {
                prop_assert!(found.distance_m <= distance_m(p, *c));
            }
        }
    }
}
