use std::{fmt::Debug, fmt::Display, str::FromStr};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A region is one of a fixed set of named zones that an axis sample can be
/// quantized into. Every region type has exactly one "no region" value.
pub trait Region: Copy + PartialEq + Debug + Display {
    /// The value that represents "no region is active"
    const NONE: Self;

    /// Returns true if this is the "no region" value
    fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}

/// Error returned when parsing a region name fails
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown region name: '{0}'")]
pub struct ParseRegionError(pub String);

/// One of the four quadrants of a D-pad surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    #[default]
    None,
}

impl Region for Corner {
    const NONE: Self = Corner::None;
}

impl Corner {
    /// All corners in clockwise order starting at the top left
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomRight,
        Corner::BottomLeft,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Corner::TopLeft => "top_left",
            Corner::TopRight => "top_right",
            Corner::BottomLeft => "bottom_left",
            Corner::BottomRight => "bottom_right",
            Corner::None => "none",
        }
    }
}

impl Display for Corner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Corner {
    type Err = ParseRegionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top_left" => Ok(Corner::TopLeft),
            "top_right" => Ok(Corner::TopRight),
            "bottom_left" => Ok(Corner::BottomLeft),
            "bottom_right" => Ok(Corner::BottomRight),
            "none" => Ok(Corner::None),
            _ => Err(ParseRegionError(s.to_string())),
        }
    }
}

/// One of the four edges of a D-pad surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Up,
    Down,
    Left,
    Right,
    #[default]
    None,
}

impl Region for Side {
    const NONE: Self = Side::None;
}

impl Side {
    /// All sides in the order they are tested during classification
    pub const ALL: [Side; 4] = [Side::Up, Side::Down, Side::Left, Side::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Up => "up",
            Side::Down => "down",
            Side::Left => "left",
            Side::Right => "right",
            Side::None => "none",
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Side {
    type Err = ParseRegionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Side::Up),
            "down" => Ok(Side::Down),
            "left" => Ok(Side::Left),
            "right" => Ok(Side::Right),
            "none" => Ok(Side::None),
            _ => Err(ParseRegionError(s.to_string())),
        }
    }
}

/// A region from either classification scheme. This allows devices using
/// different schemes to report into the same event stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(untagged)]
pub enum DpadRegion {
    Corner(Corner),
    Side(Side),
}

impl DpadRegion {
    /// Returns true if the wrapped region is the "no region" value
    pub fn is_none(&self) -> bool {
        match self {
            DpadRegion::Corner(corner) => corner.is_none(),
            DpadRegion::Side(side) => side.is_none(),
        }
    }
}

impl Display for DpadRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DpadRegion::Corner(corner) => write!(f, "{corner}"),
            DpadRegion::Side(side) => write!(f, "{side}"),
        }
    }
}

impl From<Corner> for DpadRegion {
    fn from(value: Corner) -> Self {
        DpadRegion::Corner(value)
    }
}

impl From<Side> for DpadRegion {
    fn from(value: Side) -> Self {
        DpadRegion::Side(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_parse_back() {
        for corner in Corner::ALL {
            assert_eq!(corner.to_string().parse::<Corner>(), Ok(corner));
        }
        for side in Side::ALL {
            assert_eq!(side.to_string().parse::<Side>(), Ok(side));
        }
        assert!("middle".parse::<Side>().is_err());
    }

    #[test]
    fn test_none_values() {
        assert!(Corner::None.is_none());
        assert!(Side::None.is_none());
        assert!(!Corner::TopLeft.is_none());
        assert!(DpadRegion::from(Side::None).is_none());
        assert!(!DpadRegion::from(Side::Up).is_none());
    }

    #[test]
    fn test_serialize_snake_case() {
        let value = serde_json::to_string(&DpadRegion::Corner(Corner::BottomRight)).unwrap();
        assert_eq!(value, "\"bottom_right\"");
        let value = serde_json::to_string(&DpadRegion::Side(Side::Left)).unwrap();
        assert_eq!(value, "\"left\"");
    }
}
