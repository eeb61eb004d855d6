//! Geographic coordinate type and validation of raw feed values.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// Error returned when a raw latitude/longitude pair cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid coordinate: {reason}")]
pub struct InvalidCoordinate {
    reason: &'static str,
}

impl InvalidCoordinate {
    /// Human-readable description of what was wrong.
    pub fn reason(&self) -> &'static str {
        self.reason
    }
}

/// A latitude/longitude pair in degrees.
///
/// Both components are guaranteed to be finite. Construct via [`Coordinate::new`]
/// or [`validate`].
///
/// # Examples
///
/// ```
/// use poi_server::domain::Coordinate;
///
/// let fukui = Coordinate::new(36.0641, 136.2193).unwrap();
/// assert_eq!(fukui.lat(), 36.0641);
///
/// assert!(Coordinate::new(f64::NAN, 136.0).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    lat: f64,
    lng: f64,
}

impl Coordinate {
    /// Create a coordinate from numeric components.
    pub fn new(lat: f64, lng: f64) -> Result<Self, InvalidCoordinate> {
        if !lat.is_finite() {
            return Err(InvalidCoordinate {
                reason: "latitude is not finite",
            });
        }
        if !lng.is_finite() {
            return Err(InvalidCoordinate {
                reason: "longitude is not finite",
            });
        }
        Ok(Self { lat, lng })
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn lng(&self) -> f64 {
        self.lng
    }
}

impl fmt::Debug for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coordinate({}, {})", self.lat, self.lng)
    }
}

/// Validate a raw latitude/longitude pair as delivered by a feed.
///
/// JSON numbers are used directly. JSON strings are trimmed and parsed, so
/// `"36.06"` is accepted. Anything else (missing, `null`, booleans, blank or
/// non-numeric strings) is rejected, as are non-finite results.
pub fn validate(lat: &Value, lng: &Value) -> Result<Coordinate, InvalidCoordinate> {
    let lat = to_number(lat).ok_or(InvalidCoordinate {
        reason: "latitude is not a number",
    })?;
    let lng = to_number(lng).ok_or(InvalidCoordinate {
        reason: "longitude is not a number",
    })?;
    Coordinate::new(lat, lng)
}

fn to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            s.parse::<f64>().ok()
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_numbers() {
        let c = validate(&json!(36.06), &json!(136.22)).unwrap();
        assert_eq!(c.lat(), 36.06);
        assert_eq!(c.lng(), 136.22);
    }

    #[test]
    fn accepts_numeric_strings() {
        let c = validate(&json!(" 36.06 "), &json!("136.22")).unwrap();
        assert_eq!(c.lat(), 36.06);
        assert_eq!(c.lng(), 136.22);
    }

    #[test]
    fn rejects_non_numeric_latitude() {
        let err = validate(&json!("abc"), &json!(136.0)).unwrap_err();
        assert_eq!(err.reason(), "latitude is not a number");
    }

    #[test]
    fn rejects_missing_and_null() {
        assert!(validate(&Value::Null, &json!(136.0)).is_err());
        assert!(validate(&json!(36.0), &Value::Null).is_err());
        assert!(validate(&json!(""), &json!(136.0)).is_err());
        assert!(validate(&json!(true), &json!(136.0)).is_err());
    }

    #[test]
    fn rejects_non_finite_strings() {
        assert!(validate(&json!("NaN"), &json!(136.0)).is_err());
        assert!(validate(&json!(36.0), &json!("inf")).is_err());
        assert!(validate(&json!("-infinity"), &json!(136.0)).is_err());
    }

    #[test]
    fn new_rejects_non_finite() {
        assert!(Coordinate::new(f64::INFINITY, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::NEG_INFINITY).is_err());
        assert!(Coordinate::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn error_display() {
        let err = Coordinate::new(f64::NAN, 0.0).unwrap_err();
        assert_eq!(err.to_string(), "invalid coordinate: latitude is not finite");
    }

    #[test]
    fn debug() {
        let c = Coordinate::new(36.5, 136.25).unwrap();
        assert_eq!(format!("{:?}", c), "Coordinate(36.5, 136.25)");
    }
}
