//! Recovery of sets from free-text notes.
//!
//! Notes are written by hand and follow no strict format. The parser knows the
//! common ways of writing sets down and silently ignores everything else:
//!
//!  - `80 x 8`, `80kg x 8`, `80x8`: one set of 8 reps at 80
//!  - `80 x 8, 8, 7`: three sets at 80, later reps continue the last weight
//!  - `3x10 @ 60kg`, `3 x 10 60kg`: three sets of 10 reps at 60
//!  - `bw x 12`, `bodyweight x 12`: one set without weight
//!  - `8 @ 60`, `8 reps at 60`: one set of 8 reps at 60
//!
//! Segments are separated by `,`, `;` or line breaks.

use std::sync::LazyLock;

use regex::Regex;

use crate::{Reps, SetRecord, Weight};

static SETS_REPS_WEIGHT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(\d+)\s*x\s*(\d+)\s*(?:(?:@|\bat\b)\s*(\d+(?:\.\d+)?)\s*(?:kgs?|lbs?)?|(\d+(?:\.\d+)?)\s*(?:kgs?|lbs?)\b)",
    )
    .expect("valid regex")
});

static WEIGHT_REPS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:(\d+(?:\.\d+)?)\s*(?:kgs?|lbs?)?|\b(bw|bodyweight))\s*x\s*(\d+)")
        .expect("valid regex")
});

static REPS_AT_WEIGHT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\s*(?:reps?)?\s*(?:@|\bat\b)\s*(\d+(?:\.\d+)?)").expect("valid regex")
});

static REPS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s*(?:reps?)?$").expect("valid regex"));

#[must_use]
pub fn parse(notes: &str) -> Vec<SetRecord> {
    let normalized = notes.to_lowercase().replace(['×', '*'], "x");
    let mut sets = vec![];
    let mut current_weight: Option<Weight> = None;

    for segment in normalized
        .split([',', ';', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        if let Some((count, reps, weight)) = sets_of_reps(segment) {
            current_weight = Some(weight);
            sets.extend(std::iter::repeat_n(
                SetRecord {
                    weight: Some(weight),
                    reps,
                },
                count,
            ));
            continue;
        }

        let mut matched = false;
        for captures in WEIGHT_REPS.captures_iter(segment) {
            let Some(reps) = captures
                .get(3)
                .and_then(|r| Reps::try_from(r.as_str()).ok())
            else {
                continue;
            };
            let weight = if captures.get(2).is_some() {
                None
            } else {
                match captures
                    .get(1)
                    .and_then(|w| Weight::try_from(w.as_str()).ok())
                {
                    Some(weight) => Some(weight),
                    None => continue,
                }
            };
            matched = true;
            current_weight = weight;
            sets.push(SetRecord { weight, reps });
        }
        if matched {
            continue;
        }

        if let Some(captures) = REPS_AT_WEIGHT.captures(segment) {
            if let (Some(reps), Some(weight)) = (
                captures.get(1).and_then(|r| Reps::try_from(r.as_str()).ok()),
                captures
                    .get(2)
                    .and_then(|w| Weight::try_from(w.as_str()).ok()),
            ) {
                current_weight = Some(weight);
                sets.push(SetRecord {
                    weight: Some(weight),
                    reps,
                });
            }
            continue;
        }

        if let Some(reps) = REPS
            .captures(segment)
            .and_then(|c| c.get(1))
            .and_then(|r| Reps::try_from(r.as_str()).ok())
        {
            sets.push(SetRecord {
                weight: current_weight,
                reps,
            });
        }
    }

    sets
}

/// Number of sets, reps and weight of a `3x10 @ 60` segment.
///
/// A weight followed by `x` starts the next set instead, as in `60x10 70kg x 8`.
fn sets_of_reps(segment: &str) -> Option<(usize, Reps, Weight)> {
    let captures = SETS_REPS_WEIGHT.captures(segment)?;
    if segment[captures.get(0)?.end()..]
        .trim_start()
        .starts_with('x')
    {
        return None;
    }
    let count = captures
        .get(1)?
        .as_str()
        .parse::<usize>()
        .ok()
        .filter(|count| (1..=99).contains(count))?;
    let reps = Reps::try_from(captures.get(2)?.as_str()).ok()?;
    let weight = Weight::try_from(captures.get(3).or_else(|| captures.get(4))?.as_str()).ok()?;
    Some((count, reps, weight))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn set(weight: Option<f32>, reps: u32) -> SetRecord {
        SetRecord {
            weight: weight.map(|w| Weight::new(w).unwrap()),
            reps: Reps::new(reps).unwrap(),
        }
    }

    #[rstest]
    #[case::empty("", vec![])]
    #[case::text_only("felt great today", vec![])]
    #[case::single("80 x 8", vec![set(Some(80.0), 8)])]
    #[case::unit("80kg x 8", vec![set(Some(80.0), 8)])]
    #[case::compact("80x8", vec![set(Some(80.0), 8)])]
    #[case::times_sign("80 × 8", vec![set(Some(80.0), 8)])]
    #[case::asterisk("80*8", vec![set(Some(80.0), 8)])]
    #[case::decimal("82.5 x 5", vec![set(Some(82.5), 5)])]
    #[case::pounds("185lbs x 5", vec![set(Some(185.0), 5)])]
    #[case::continued(
        "80 x 8, 8, 7",
        vec![set(Some(80.0), 8), set(Some(80.0), 8), set(Some(80.0), 7)]
    )]
    #[case::changing_weight(
        "80x8; 85x6\n85 x 5",
        vec![set(Some(80.0), 8), set(Some(85.0), 6), set(Some(85.0), 5)]
    )]
    #[case::sets_reps_at(
        "3x10 @ 60kg",
        vec![set(Some(60.0), 10), set(Some(60.0), 10), set(Some(60.0), 10)]
    )]
    #[case::sets_reps_unit(
        "2 x 12 20kg",
        vec![set(Some(20.0), 12), set(Some(20.0), 12)]
    )]
    #[case::bodyweight("BW x 12, 10", vec![set(None, 12), set(None, 10)])]
    #[case::bodyweight_long("bodyweight x 15", vec![set(None, 15)])]
    #[case::reps_at("8 reps @ 60, 7", vec![set(Some(60.0), 8), set(Some(60.0), 7)])]
    #[case::reps_at_word("10 at 25", vec![set(Some(25.0), 10)])]
    #[case::reps_only("12 reps, 10", vec![set(None, 12), set(None, 10)])]
    #[case::surrounding_text(
        "top set 100x3 felt heavy, then 90 x 5",
        vec![set(Some(100.0), 3), set(Some(90.0), 5)]
    )]
    #[case::multiple_in_segment(
        "60x10 70x8",
        vec![set(Some(60.0), 10), set(Some(70.0), 8)]
    )]
    #[case::weight_with_unit_then_next_set(
        "60x10 70kg x 8",
        vec![set(Some(60.0), 10), set(Some(70.0), 8)]
    )]
    #[case::too_many_sets_read_as_weight("100 x 5 @ 8", vec![set(Some(100.0), 5)])]
    #[case::invalid_weight("1234 x 5, 5", vec![set(None, 5)])]
    #[case::invalid_reps("80 x 1000", vec![])]
    #[case::stray_number_in_text("week 3", vec![])]
    fn test_parse(#[case] notes: &str, #[case] expected: Vec<SetRecord>) {
        assert_eq!(parse(notes), expected);
    }
}
