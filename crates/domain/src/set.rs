use derive_more::{Display, Into};
use thiserror::Error;

#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Reps(u32);

impl Reps {
    pub fn new(value: u32) -> Result<Self, RepsError> {
        if !(0..1000).contains(&value) {
            return Err(RepsError::OutOfRange);
        }

        Ok(Self(value))
    }
}

impl TryFrom<&str> for Reps {
    type Error = RepsError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().parse::<u32>() {
            Ok(parsed_value) => Reps::new(parsed_value),
            Err(_) => Err(RepsError::ParseError),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum RepsError {
    #[error("Reps must be in the range 0 to 999")]
    OutOfRange,
    #[error("Reps must be an integer")]
    ParseError,
}

#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, PartialOrd)]
pub struct Weight(f32);

impl Weight {
    pub fn new(value: f32) -> Result<Self, WeightError> {
        if !(0.0..1000.0).contains(&value) {
            return Err(WeightError::OutOfRange);
        }

        let scaled = value * 10.0;

        if (scaled - scaled.round()).abs() > 1e-3 {
            return Err(WeightError::InvalidResolution);
        }

        Ok(Self(scaled.round() / 10.0))
    }
}

impl TryFrom<&str> for Weight {
    type Error = WeightError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.replace(',', ".").trim().parse::<f32>() {
            Ok(parsed_value) => Weight::new(parsed_value),
            Err(_) => Err(WeightError::ParseError),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum WeightError {
    #[error("Weight must be in the range 0.0 to 999.9")]
    OutOfRange,
    #[error("Weight must be a multiple of 0.1")]
    InvalidResolution,
    #[error("Weight must be a decimal")]
    ParseError,
}

/// A performed set. A missing weight denotes a body weight exercise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetRecord {
    pub weight: Option<Weight>,
    pub reps: Reps,
}

impl SetRecord {
    #[must_use]
    pub fn volume(&self) -> f32 {
        #[allow(clippy::cast_precision_loss)]
        let reps = u32::from(self.reps) as f32;
        self.weight.map_or(reps, |w| f32::from(w) * reps)
    }

    /// Estimated one-rep max according to Epley.
    #[must_use]
    pub fn estimated_one_rep_max(&self) -> Option<f32> {
        let weight = f32::from(self.weight?);
        let reps = u32::from(self.reps);
        match reps {
            0 => None,
            1 => Some(weight),
            #[allow(clippy::cast_precision_loss)]
            _ => Some(weight * (1.0 + reps as f32 / 30.0)),
        }
    }
}

/// Format sets the way they are usually written down, e.g. `80 x 8, 8, 7, 85 x 5`.
#[must_use]
pub fn format_sets(sets: &[SetRecord]) -> String {
    let mut parts: Vec<String> = vec![];
    let mut current: Option<Option<Weight>> = None;

    for set in sets {
        if current == Some(set.weight) {
            parts.push(set.reps.to_string());
        } else {
            let weight = set
                .weight
                .map_or_else(|| String::from("BW"), |w| w.to_string());
            parts.push(format!("{weight} x {}", set.reps));
            current = Some(set.weight);
        }
    }

    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("0", Ok(Reps(0)))]
    #[case(" 12 ", Ok(Reps(12)))]
    #[case("999", Ok(Reps(999)))]
    #[case("1000", Err(RepsError::OutOfRange))]
    #[case("1.5", Err(RepsError::ParseError))]
    #[case("", Err(RepsError::ParseError))]
    fn test_reps_try_from(#[case] value: &str, #[case] expected: Result<Reps, RepsError>) {
        assert_eq!(Reps::try_from(value), expected);
    }

    #[rstest]
    #[case("0", Ok(Weight(0.0)))]
    #[case("82.5", Ok(Weight(82.5)))]
    #[case("82,5", Ok(Weight(82.5)))]
    #[case("999.9", Ok(Weight(999.9)))]
    #[case("1000", Err(WeightError::OutOfRange))]
    #[case("-5", Err(WeightError::OutOfRange))]
    #[case("82.55", Err(WeightError::InvalidResolution))]
    #[case("heavy", Err(WeightError::ParseError))]
    fn test_weight_try_from(#[case] value: &str, #[case] expected: Result<Weight, WeightError>) {
        assert_eq!(Weight::try_from(value), expected);
    }

    #[test]
    fn test_set_record_volume() {
        assert_approx_eq!(
            SetRecord {
                weight: Some(Weight(80.0)),
                reps: Reps(8)
            }
            .volume(),
            640.0
        );
        assert_approx_eq!(
            SetRecord {
                weight: None,
                reps: Reps(12)
            }
            .volume(),
            12.0
        );
    }

    #[rstest]
    #[case(Some(Weight(100.0)), Reps(1), Some(100.0))]
    #[case(Some(Weight(100.0)), Reps(10), Some(133.333))]
    #[case(Some(Weight(100.0)), Reps(0), None)]
    #[case(None, Reps(10), None)]
    fn test_set_record_estimated_one_rep_max(
        #[case] weight: Option<Weight>,
        #[case] reps: Reps,
        #[case] expected: Option<f32>,
    ) {
        let result = SetRecord { weight, reps }.estimated_one_rep_max();
        match expected {
            Some(expected) => assert_approx_eq!(result.unwrap(), expected, 0.001),
            None => assert_eq!(result, None),
        }
    }

    #[test]
    fn test_format_sets() {
        assert_eq!(format_sets(&[]), "");
        assert_eq!(
            format_sets(&[
                SetRecord {
                    weight: Some(Weight(80.0)),
                    reps: Reps(8)
                },
                SetRecord {
                    weight: Some(Weight(80.0)),
                    reps: Reps(8)
                },
                SetRecord {
                    weight: Some(Weight(80.0)),
                    reps: Reps(7)
                },
                SetRecord {
                    weight: Some(Weight(82.5)),
                    reps: Reps(5)
                },
            ]),
            "80 x 8, 8, 7, 82.5 x 5"
        );
        assert_eq!(
            format_sets(&[
                SetRecord {
                    weight: None,
                    reps: Reps(12)
                },
                SetRecord {
                    weight: None,
                    reps: Reps(10)
                },
            ]),
            "BW x 12, 10"
        );
    }
}
