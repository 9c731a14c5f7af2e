//! Year filter for tracks: `"all"`, a single year, or an inclusive `"start-end"` range.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::track::TrackRecord;

/// Inclusive range of calendar years. Unbounded when empty (`"all"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct YearRange {
    pub from: Option<i32>,
    pub to: Option<i32>,
}

impl YearRange {
    /// Accepts every year.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn between(from: i32, to: i32) -> Self {
        Self {
            from: Some(from.min(to)),
            to: Some(from.max(to)),
        }
    }

    pub fn is_all(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    pub fn contains_year(&self, year: i32) -> bool {
        self.from.map_or(true, |from| year >= from) && self.to.map_or(true, |to| year <= to)
    }

    pub fn contains(&self, time: &DateTime<Utc>) -> bool {
        self.contains_year(time.year())
    }

    /// Widen the range so it includes the year of `time`.
    pub fn add(&mut self, time: &DateTime<Utc>) {
        let year = time.year();
        self.from = Some(self.from.map_or(year, |from| from.min(year)));
        self.to = Some(self.to.map_or(year, |to| to.max(year)));
    }

    /// Smallest range covering all given start times; `None` when there are none.
    pub fn covering<'a>(times: impl IntoIterator<Item = &'a DateTime<Utc>>) -> Option<Self> {
        let mut range: Option<YearRange> = None;
        for time in times {
            range.get_or_insert_with(YearRange::all).add(time);
        }
        range
    }

    /// Range spanned by the start times of `tracks`.
    pub fn from_tracks(tracks: &[TrackRecord]) -> Option<Self> {
        Self::covering(tracks.iter().map(|t| &t.start_time))
    }

    /// Number of years in a bounded range.
    pub fn count(&self) -> Option<u32> {
        match (self.from, self.to) {
            (Some(from), Some(to)) => Some((to - from + 1) as u32),
            _ => None,
        }
    }
}

impl FromStr for YearRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::all());
        }

        let bad = || Error::parameter(format!("Bad year range: {}", s));
        let parse_year = |part: &str| -> Result<i32, Error> {
            if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
                return Err(bad());
            }
            part.parse::<i32>().map_err(|_| bad())
        };

        match s.split_once('-') {
            None => {
                let year = parse_year(s)?;
                Ok(Self {
                    from: Some(year),
                    to: Some(year),
                })
            }
            Some((start, end)) => {
                let from = parse_year(start)?;
                let to = parse_year(end)?;
                if from > to {
                    return Err(bad());
                }
                Ok(Self {
                    from: Some(from),
                    to: Some(to),
                })
            }
        }
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.from, self.to) {
            (Some(from), Some(to)) if from == to => write!(f, "{}", from),
            (Some(from), Some(to)) => write!(f, "{}-{}", from, to),
            _ => write!(f, "all"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse() {
        assert_eq!("all".parse::<YearRange>().unwrap(), YearRange::all());
        assert_eq!(
            "2019".parse::<YearRange>().unwrap(),
            YearRange::between(2019, 2019)
        );
        assert_eq!(
            " 2017-2020 ".parse::<YearRange>().unwrap(),
            YearRange::between(2017, 2020)
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "20x9", "2020-", "-2020", "2021-2019", "2019-2020-2021", "+2019"] {
            let err = bad.parse::<YearRange>().unwrap_err();
            assert!(matches!(err, Error::Parameter(_)), "{:?}", bad);
        }
    }

    #[test]
    fn test_contains() {
        let range: YearRange = "2018-2019".parse().unwrap();
        let inside = Utc.with_ymd_and_hms(2019, 12, 31, 23, 59, 59).unwrap();
        let outside = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        assert!(range.contains(&inside));
        assert!(!range.contains(&outside));
        assert!(YearRange::all().contains(&outside));
    }

    #[test]
    fn test_covering() {
        let times = [
            Utc.with_ymd_and_hms(2016, 5, 1, 8, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2014, 5, 1, 8, 0, 0).unwrap(),
        ];
        let range = YearRange::covering(&times).unwrap();
        assert_eq!(range, YearRange::between(2014, 2016));
        assert_eq!(range.count(), Some(3));
        assert_eq!(range.to_string(), "2014-2016");
        assert!(YearRange::covering(&Vec::<DateTime<Utc>>::new()).is_none());
    }
}
