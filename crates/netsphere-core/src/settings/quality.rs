use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, FromRepr, IntoStaticStr};
use thiserror::Error;

/// Error for invalid enum value conversion
#[derive(Debug, Error)]
#[error("Invalid {type_name} value: {value}")]
pub struct InvalidEnumValueError {
    type_name: &'static str,
    value: i64,
}

impl InvalidEnumValueError {
    pub fn new(type_name: &'static str, value: i64) -> Self {
        Self { type_name, value }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    IntoStaticStr,
    Display,
    EnumString,
    EnumIter,
    FromRepr,
)]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum GraphicsQuality {
    #[strum(serialize = "Low")]
    Low = 0,
    #[strum(serialize = "Medium")]
    Medium = 1,
    #[default]
    #[strum(serialize = "High")]
    High = 2,
}

impl GraphicsQuality {
    /// Decode the byte the game stores; anything above High reads as High.
    pub fn from_live(raw: u8) -> Self {
        Self::from_repr(raw).unwrap_or(Self::High)
    }

    pub fn as_raw(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for GraphicsQuality {
    type Error = InvalidEnumValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_repr(value)
            .ok_or_else(|| InvalidEnumValueError::new("GraphicsQuality", value as i64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_from_live_clamps_to_high() {
        assert_eq!(GraphicsQuality::from_live(0), GraphicsQuality::Low);
        assert_eq!(GraphicsQuality::from_live(1), GraphicsQuality::Medium);
        assert_eq!(GraphicsQuality::from_live(2), GraphicsQuality::High);
        assert_eq!(GraphicsQuality::from_live(3), GraphicsQuality::High);
        assert_eq!(GraphicsQuality::from_live(255), GraphicsQuality::High);
    }

    #[test]
    fn test_try_from_rejects_unknown() {
        assert!(GraphicsQuality::try_from(1).is_ok());
        let err = GraphicsQuality::try_from(7).unwrap_err();
        assert_eq!(err.to_string(), "Invalid GraphicsQuality value: 7");
    }

    #[test]
    fn test_labels_in_order() {
        let labels: Vec<&'static str> = GraphicsQuality::iter().map(Into::into).collect();
        assert_eq!(labels, ["Low", "Medium", "High"]);
    }

    #[test]
    fn test_parse_ignores_case() {
        assert_eq!("medium".parse::<GraphicsQuality>().unwrap(), GraphicsQuality::Medium);
        assert_eq!("HIGH".parse::<GraphicsQuality>().unwrap(), GraphicsQuality::High);
        assert!("ultra".parse::<GraphicsQuality>().is_err());
    }
}
