use serde::{Deserialize, Serialize};

/// A normalized two-axis reading. Each value is expected to be between -1.0
/// and 1.0 where positive X is right and positive Y is up. Values are not
/// validated; anything out of range classifies as "no region".
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
pub struct AxisSample {
    pub x: f64,
    pub y: f64,
}

impl AxisSample {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// A sample with no deflection on either axis
    pub fn center() -> Self {
        Self::default()
    }
}

impl From<(f64, f64)> for AxisSample {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Returns a value between -1.0 and 1.0 based on the given value with its
/// minimum and maximum values.
pub fn normalize_signed_value(raw_value: f64, min: f64, max: f64) -> f64 {
    let mid = (max + min) / 2.0;
    let event_value = raw_value - mid;

    // Normalize the value
    if event_value >= 0.0 {
        let maximum = max - mid;
        if maximum == 0.0 {
            return 0.0;
        }
        event_value / maximum
    } else {
        let minimum = min - mid;
        let value = event_value / minimum;
        -value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_signed_value() {
        assert_eq!(normalize_signed_value(0.0, -100.0, 100.0), 0.0);
        assert_eq!(normalize_signed_value(100.0, -100.0, 100.0), 1.0);
        assert_eq!(normalize_signed_value(-100.0, -100.0, 100.0), -1.0);
        assert_eq!(normalize_signed_value(50.0, -100.0, 100.0), 0.5);
        // Unsigned ranges like touchpads are centered on their midpoint
        assert_eq!(normalize_signed_value(512.0, 0.0, 1024.0), 0.0);
        assert_eq!(normalize_signed_value(0.0, 0.0, 1024.0), -1.0);
        assert_eq!(normalize_signed_value(1024.0, 0.0, 1024.0), 1.0);
    }

    #[test]
    fn test_normalize_empty_range() {
        assert_eq!(normalize_signed_value(7.0, 7.0, 7.0), 0.0);
    }
}
