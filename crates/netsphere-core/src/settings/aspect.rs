//! Aspect ratio presets and nearest-match resolution.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectRatio {
    pub label: &'static str,
    pub value: f32,
}

/// Presets offered by the overlay, in display order.
pub const ASPECT_RATIOS: [AspectRatio; 5] = [
    AspectRatio { label: "4:3", value: 1.333 },
    AspectRatio { label: "16:9", value: 1.777 },
    AspectRatio { label: "16:10", value: 1.6 },
    AspectRatio { label: "5:3", value: 1.666 },
    AspectRatio { label: "5:4", value: 1.25 },
];

/// Index into [`ASPECT_RATIOS`]; only valid indices can be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AspectRatioIndex(usize);

impl AspectRatioIndex {
    pub fn new(index: usize) -> Option<Self> {
        (index < ASPECT_RATIOS.len()).then_some(Self(index))
    }

    pub fn from_label(label: &str) -> Option<Self> {
        ASPECT_RATIOS
            .iter()
            .position(|r| r.label == label.trim())
            .map(Self)
    }

    pub fn get(self) -> usize {
        self.0
    }

    pub fn preset(self) -> &'static AspectRatio {
        &ASPECT_RATIOS[self.0]
    }

    pub fn label(self) -> &'static str {
        self.preset().label
    }

    pub fn value(self) -> f32 {
        self.preset().value
    }

    pub fn all() -> impl Iterator<Item = Self> {
        (0..ASPECT_RATIOS.len()).map(Self)
    }
}

impl Default for AspectRatioIndex {
    /// 16:9
    fn default() -> Self {
        Self(1)
    }
}

impl fmt::Display for AspectRatioIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error)]
#[error("Unknown aspect ratio '{0}' (expected one of 4:3, 16:9, 16:10, 5:3, 5:4 or an index 0-4)")]
pub struct ParseAspectRatioError(String);

impl FromStr for AspectRatioIndex {
    type Err = ParseAspectRatioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s)
            .or_else(|| s.trim().parse().ok().and_then(Self::new))
            .ok_or_else(|| ParseAspectRatioError(s.to_string()))
    }
}

/// Index of the table entry closest to `observed`.
///
/// Ties go to the lowest index. A non-finite observation matches nothing
/// and yields 0; an empty table yields `None`.
pub fn nearest_index(table: &[f32], observed: f32) -> Option<usize> {
    if table.is_empty() {
        return None;
    }

    let mut best = 0;
    let mut min_diff = f32::MAX;
    for (i, value) in table.iter().enumerate() {
        let diff = (observed - value).abs();
        if diff < min_diff {
            min_diff = diff;
            best = i;
        }
    }
    Some(best)
}

/// Map a ratio read from the game onto the closest preset.
pub fn resolve_aspect_index(observed: f32) -> AspectRatioIndex {
    let values = ASPECT_RATIOS.map(|r| r.value);
    AspectRatioIndex(nearest_index(&values, observed).unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_exact_presets() {
        for index in AspectRatioIndex::all() {
            assert_eq!(resolve_aspect_index(index.value()), index);
        }
    }

    #[test]
    fn test_resolve_between_presets() {
        // |1.70 - 1.666| = 0.034 beats |1.70 - 1.777| = 0.077
        assert_eq!(resolve_aspect_index(1.70).get(), 3);
        assert_eq!(resolve_aspect_index(2.33).label(), "16:9");
        assert_eq!(resolve_aspect_index(1.0).label(), "5:4");
    }

    #[test]
    fn test_ties_pick_lowest_index() {
        assert_eq!(nearest_index(&[1.0, 2.0], 1.5), Some(0));
        assert_eq!(nearest_index(&[2.0, 1.0, 2.0], 2.0), Some(0));
    }

    #[test]
    fn test_non_finite_and_empty() {
        assert_eq!(resolve_aspect_index(f32::NAN).get(), 0);
        assert_eq!(nearest_index(&[], 1.0), None);
    }

    #[test]
    fn test_index_bounds() {
        assert!(AspectRatioIndex::new(4).is_some());
        assert!(AspectRatioIndex::new(5).is_none());
        assert_eq!(AspectRatioIndex::default().label(), "16:9");
    }

    #[test]
    fn test_parse_label_or_index() {
        assert_eq!("16:10".parse::<AspectRatioIndex>().unwrap().get(), 2);
        assert_eq!("4".parse::<AspectRatioIndex>().unwrap().label(), "5:4");
        assert!("21:9".parse::<AspectRatioIndex>().is_err());
        assert!("9".parse::<AspectRatioIndex>().is_err());
    }
}
