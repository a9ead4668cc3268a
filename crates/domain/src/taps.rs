use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Detected onset times of a performance, in seconds, sorted ascending.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct TapTimestamps {
    times: Vec<f64>,
}

impl TapTimestamps {
    pub fn new(times: Vec<f64>) -> Result<Self, DomainError> {
        for (index, &value) in times.iter().enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(DomainError::InvalidTap { index, value });
            }
        }
        for (index, pair) in times.windows(2).enumerate() {
            if pair[1] < pair[0] {
                return Err(DomainError::UnsortedTaps {
                    index: index + 1,
                    previous: pair[0],
                    current: pair[1],
                });
            }
        }
        Ok(Self { times })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.times
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn last(&self) -> Option<f64> {
        self.times.last().copied()
    }

    /// Differences between consecutive taps.
    pub fn gaps(&self) -> impl Iterator<Item = f64> + '_ {
        self.times.windows(2).map(|pair| pair[1] - pair[0])
    }

    /// Smallest strictly positive gap. Taps sharing a timestamp do not count.
    pub fn min_positive_gap(&self) -> Option<f64> {
        self.gaps()
            .filter(|gap| *gap > 0.0)
            .fold(None, |min, gap| match min {
                Some(current) if current <= gap => Some(current),
                _ => Some(gap),
            })
    }
}

impl TryFrom<Vec<f64>> for TapTimestamps {
    type Error = DomainError;

    fn try_from(times: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(times)
    }
}

impl From<TapTimestamps> for Vec<f64> {
    fn from(taps: TapTimestamps) -> Self {
        taps.times
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_sorted_taps() {
        let taps = TapTimestamps::new(vec![0.0, 0.5, 0.5, 1.5]).unwrap();
        assert_eq!(taps.len(), 4);
        assert_eq!(taps.last(), Some(1.5));
        assert_eq!(taps.gaps().collect::<Vec<_>>(), vec![0.5, 0.0, 1.0]);
    }

    #[test]
    fn rejects_unsorted_and_negative() {
        assert_eq!(
            TapTimestamps::new(vec![0.0, 1.0, 0.5]),
            Err(DomainError::UnsortedTaps {
                index: 2,
                previous: 1.0,
                current: 0.5
            })
        );
        assert!(matches!(
            TapTimestamps::new(vec![-0.1, 0.5]),
            Err(DomainError::InvalidTap { index: 0, .. })
        ));
        assert!(TapTimestamps::new(vec![0.0, f64::NAN]).is_err());
        assert!(TapTimestamps::new(vec![0.0, f64::INFINITY]).is_err());
    }

    #[test]
    fn min_positive_gap_skips_duplicates() {
        let taps = TapTimestamps::new(vec![0.0, 0.0, 0.75, 1.0]).unwrap();
        assert_eq!(taps.min_positive_gap(), Some(0.25));
        let flat = TapTimestamps::new(vec![2.0, 2.0]).unwrap();
        assert_eq!(flat.min_positive_gap(), None);
        assert_eq!(TapTimestamps::empty().min_positive_gap(), None);
    }

    #[test]
    fn deserializes_with_validation() {
        let taps: TapTimestamps = serde_json::from_str("[0.0, 0.25, 1.0]").unwrap();
        assert_eq!(taps.as_slice(), &[0.0, 0.25, 1.0]);
        assert!(serde_json::from_str::<TapTimestamps>("[1.0, 0.25]").is_err());
    }
}
