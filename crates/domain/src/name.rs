use derive_more::{AsRef, Display};

/// Name of an exercise.
///
/// Two names refer to the same exercise if their keys are equal, so spelling
/// differences in letter case do not split the history of an exercise.
#[derive(AsRef, Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name(String);

impl Name {
    pub fn new(name: &str) -> Result<Self, NameError> {
        let normalized = name.split_whitespace().collect::<Vec<_>>().join(" ");

        if normalized.is_empty() {
            return Err(NameError::Empty);
        }

        let len = normalized.chars().count();

        if len > 64 {
            return Err(NameError::TooLong(len));
        }

        Ok(Name(normalized))
    }

    #[must_use]
    pub fn key(&self) -> String {
        self.0.to_lowercase()
    }

    #[must_use]
    pub fn is(&self, other: &Name) -> bool {
        self.key() == other.key()
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum NameError {
    #[error("Name must not be empty")]
    Empty,
    #[error("Name is {0} characters long, at most 64 are allowed")]
    TooLong(usize),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("Bench Press", Ok(Name("Bench Press".to_string())))]
    #[case("  Bench   Press  ", Ok(Name("Bench Press".to_string())))]
    #[case("", Err(NameError::Empty))]
    #[case("   ", Err(NameError::Empty))]
    #[case(
        "Single Arm Dumbbell Row On Incline Bench With Pause At The Top Of Each Rep",
        Err(NameError::TooLong(74))
    )]
    fn test_name_new(#[case] name: &str, #[case] expected: Result<Name, NameError>) {
        assert_eq!(Name::new(name), expected);
    }

    #[test]
    fn test_name_is() {
        let a = Name::new("Bench Press").unwrap();
        assert!(a.is(&Name::new("bench press").unwrap()));
        assert!(!a.is(&Name::new("Incline Bench Press").unwrap()));
        assert_eq!(a.key(), "bench press");
    }
}
