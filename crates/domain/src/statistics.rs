use std::ops::RangeInclusive;

use chrono::{Duration, NaiveDate};
use strum::{Display, EnumString};

/// Range of dates shown in a progress table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub first: NaiveDate,
    pub last: NaiveDate,
}

impl Interval {
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first <= date && date <= self.last
    }
}

impl From<RangeInclusive<NaiveDate>> for Interval {
    fn from(range: RangeInclusive<NaiveDate>) -> Self {
        let (first, last) = range.into_inner();
        Self { first, last }
    }
}

#[derive(Debug, Display, EnumString, Clone, Copy, PartialEq, Eq)]
#[strum(ascii_case_insensitive)]
pub enum DefaultInterval {
    #[strum(serialize = "all")]
    All,
    #[strum(serialize = "1y")]
    Year,
    #[strum(serialize = "6m")]
    HalfYear,
    #[strum(serialize = "3m")]
    Quarter,
    #[strum(serialize = "1m")]
    Month,
}

impl DefaultInterval {
    /// Length in days, `None` for an unlimited interval.
    #[must_use]
    pub fn days(self) -> Option<i64> {
        match self {
            DefaultInterval::All => None,
            DefaultInterval::Year => Some(365),
            DefaultInterval::HalfYear => Some(182),
            DefaultInterval::Quarter => Some(91),
            DefaultInterval::Month => Some(30),
        }
    }
}

/// Interval ending today which covers the recent part of a series of dates.
///
/// If nothing was recorded within the default interval, the interval is
/// extended back to the earliest date so that the table is not empty.
#[must_use]
pub fn init_interval(
    dates: &[NaiveDate],
    default_interval: DefaultInterval,
    today: NaiveDate,
) -> Interval {
    let earliest = dates.iter().min().copied().unwrap_or(today);
    let latest = dates.iter().max().copied().unwrap_or(today);

    let first = match default_interval.days() {
        Some(days) if latest >= today - Duration::days(days) => today - Duration::days(days),
        _ => earliest,
    };

    Interval { first, last: today }
}

/// Average of each value and up to `radius` neighbouring values on either side.
///
/// Neighbours are counted by position, not by distance in days. At both ends of
/// the series the window shrinks to the values available.
#[must_use]
pub fn centered_moving_average(
    data: &[(NaiveDate, f32)],
    radius: usize,
) -> Vec<(NaiveDate, f32)> {
    (0..data.len())
        .map(|i| {
            let window = &data[i.saturating_sub(radius)..(i + radius + 1).min(data.len())];
            let sum = window.iter().map(|(_, value)| value).sum::<f32>();
            #[allow(clippy::cast_precision_loss)]
            (data[i].0, sum / window.len() as f32)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, month, day).unwrap()
    }

    #[test]
    fn test_interval_contains() {
        let interval = Interval::from(date(3, 1)..=date(3, 31));

        assert_eq!(
            interval,
            Interval {
                first: date(3, 1),
                last: date(3, 31)
            }
        );
        assert!(interval.contains(date(3, 1)));
        assert!(interval.contains(date(3, 31)));
        assert!(!interval.contains(date(2, 28)));
        assert!(!interval.contains(date(4, 1)));
    }

    #[rstest]
    #[case("all", Ok(DefaultInterval::All))]
    #[case("1Y", Ok(DefaultInterval::Year))]
    #[case("6m", Ok(DefaultInterval::HalfYear))]
    #[case("3M", Ok(DefaultInterval::Quarter))]
    #[case("2w", Err(strum::ParseError::VariantNotFound))]
    fn test_default_interval_from_str(
        #[case] value: &str,
        #[case] expected: Result<DefaultInterval, strum::ParseError>,
    ) {
        assert_eq!(value.parse::<DefaultInterval>(), expected);
    }

    #[rstest]
    #[case::nothing_recorded(&[], DefaultInterval::Month, date(5, 16))]
    #[case::recent_training(
        &[date(1, 10), date(6, 2), date(6, 9)],
        DefaultInterval::Month,
        date(5, 16)
    )]
    #[case::long_break(
        &[date(1, 10), date(2, 20)],
        DefaultInterval::Month,
        date(1, 10)
    )]
    #[case::everything(
        &[date(2, 20), date(1, 10), date(6, 9)],
        DefaultInterval::All,
        date(1, 10)
    )]
    fn test_init_interval(
        #[case] dates: &[NaiveDate],
        #[case] default_interval: DefaultInterval,
        #[case] first: NaiveDate,
    ) {
        assert_eq!(
            init_interval(dates, default_interval, date(6, 15)),
            Interval {
                first,
                last: date(6, 15)
            }
        );
    }

    #[rstest]
    #[case::empty(1, &[], &[])]
    #[case::no_smoothing(0, &[100.0, 105.0, 95.0], &[100.0, 105.0, 95.0])]
    #[case::radius_one(1, &[100.0, 104.0, 102.0, 110.0], &[102.0, 102.0, 105.333_336, 106.0])]
    #[case::radius_exceeds_series(3, &[100.0, 110.0, 120.0], &[110.0, 110.0, 110.0])]
    fn test_centered_moving_average(
        #[case] radius: usize,
        #[case] values: &[f32],
        #[case] expected: &[f32],
    ) {
        let data = values
            .iter()
            .zip(1..)
            .map(|(value, day)| (date(4, day), *value))
            .collect::<Vec<_>>();

        assert_eq!(
            centered_moving_average(&data, radius),
            expected
                .iter()
                .zip(1..)
                .map(|(value, day)| (date(4, day), *value))
                .collect::<Vec<_>>()
        );
    }
}
