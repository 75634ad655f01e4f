use std::fmt::{self, Display};

use chrono::NaiveTime;
use regex::Regex;
use serde::Serialize;

pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Minutes since midnight on the representative day, always below [`MINUTES_PER_DAY`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct MinuteOfDay(u16);

impl MinuteOfDay {
    pub fn new(minutes: u16) -> Option<Self> {
        (minutes < MINUTES_PER_DAY).then_some(Self(minutes))
    }

    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self((hour * 60 + minute) as u16))
        } else {
            None
        }
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    /// Absolute distance in minutes, without wrapping around midnight
    pub fn distance(self, other: MinuteOfDay) -> u16 {
        self.0.abs_diff(other.0)
    }

    pub fn to_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(u32::from(self.0 / 60), u32::from(self.0 % 60), 0)
            .unwrap_or_default()
    }
}

impl Display for MinuteOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_time().format("%-I:%M %p"))
    }
}

/// Pulls the time of day out of a trip timestamp.
///
/// The feed has used a few layouts over the years (`2024-03-01 08:00:09.123`,
/// ISO 8601 with a `T` separator, bare `08:00`, spreadsheet exports like
/// `3/1/2024 7:05 PM`), so rather than trying a list of chrono formats we take
/// the first `H:MM` group and an `AM`/`PM` marker if one follows it.
/// Date and seconds are ignored.
pub struct TimeOfDayParser {
    re_time: Regex,
}

impl TimeOfDayParser {
    pub fn new() -> Self {
        // Compile once, this runs for every row of the trip table
        let re_time =
            Regex::new(r"(?:^|\D)(\d{1,2}):(\d{2})(?::\d{2}(?:\.\d+)?)?(?:\s*([AaPp])[Mm]\b)?")
                .unwrap();
        Self { re_time }
    }

    pub fn parse(&self, timestamp: &str) -> Option<MinuteOfDay> {
        let captures = self.re_time.captures(timestamp)?;
        let hour = captures.get(1)?.as_str().parse::<u32>().ok()?;
        let minute = captures.get(2)?.as_str().parse::<u32>().ok()?;

        let hour = match captures.get(3).map(|m| m.as_str()) {
            None => hour,
            Some(_) if hour == 0 || hour > 12 => return None,
            Some("a" | "A") => hour % 12,
            Some(_) => hour % 12 + 12,
        };
        MinuteOfDay::from_hm(hour, minute)
    }
}

impl Default for TimeOfDayParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_timestamp_layouts() {
        let parser = TimeOfDayParser::new();

        assert_eq!(parser.parse("2024-03-01 08:00:09.123"), MinuteOfDay::new(480));
        assert_eq!(parser.parse("2024-03-01T13:20:00Z"), MinuteOfDay::new(800));
        assert_eq!(parser.parse("08:10"), MinuteOfDay::new(490));
        assert_eq!(parser.parse("3/1/2024 7:05"), MinuteOfDay::new(425));
        assert_eq!(parser.parse("2024-03-01 23:59:59"), MinuteOfDay::new(1439));
    }

    #[test]
    fn test_parse_twelve_hour_clock() {
        let parser = TimeOfDayParser::new();

        assert_eq!(parser.parse("3/1/2024 7:05 PM"), MinuteOfDay::new(1145));
        assert_eq!(parser.parse("3/1/2024 7:05 AM"), MinuteOfDay::new(425));
        assert_eq!(parser.parse("3/1/2024 12:10 AM"), MinuteOfDay::new(10));
        assert_eq!(parser.parse("12:30 PM"), MinuteOfDay::new(750));
        assert_eq!(parser.parse("7:05:33 pm"), MinuteOfDay::new(1145));
        assert_eq!(parser.parse("7:05PM"), MinuteOfDay::new(1145));
        assert_eq!(parser.parse("13:00 PM"), None);
        assert_eq!(parser.parse("0:15 AM"), None);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let parser = TimeOfDayParser::new();

        assert_eq!(parser.parse(""), None);
        assert_eq!(parser.parse("not a time"), None);
        assert_eq!(parser.parse("2024-03-01"), None);
        assert_eq!(parser.parse("25:00"), None);
        assert_eq!(parser.parse("12:75"), None);
    }

    #[test]
    fn test_minute_of_day_bounds() {
        assert!(MinuteOfDay::new(0).is_some());
        assert!(MinuteOfDay::new(1439).is_some());
        assert!(MinuteOfDay::new(1440).is_none());
    }

    #[test]
    fn test_distance_does_not_wrap() {
        let early = MinuteOfDay::new(10).unwrap();
        let late = MinuteOfDay::new(1430).unwrap();
        assert_eq!(early.distance(late), 1420);
        assert_eq!(late.distance(early), 1420);
    }

    #[test]
    fn test_display() {
        assert_eq!(MinuteOfDay::new(0).unwrap().to_string(), "12:00 AM");
        assert_eq!(MinuteOfDay::new(480).unwrap().to_string(), "8:00 AM");
        assert_eq!(MinuteOfDay::new(720).unwrap().to_string(), "12:00 PM");
        assert_eq!(MinuteOfDay::new(800).unwrap().to_string(), "1:20 PM");
    }
}
