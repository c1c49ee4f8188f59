//! Minute:second display for timeline sequences.

use crate::{Seconds, TimelineError};
use std::fmt;

/// A single `MM:SS` instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    pub minutes: u32,
    pub seconds: u32,
}

impl Clock {
    pub fn from_seconds(t: Seconds) -> Self {
        Self {
            minutes: t / 60,
            seconds: t % 60,
        }
    }

    /// Total seconds, or `None` when the clock doesn't fit in [`Seconds`].
    pub fn to_seconds(&self) -> Option<Seconds> {
        self.minutes.checked_mul(60)?.checked_add(self.seconds)
    }

    /// Parse `MM:SS`. Seconds must be below 60.
    pub fn parse(s: &str) -> Result<Self, TimelineError> {
        let invalid = || TimelineError::InvalidLabel(s.to_string());
        let (mm, ss) = s.trim().split_once(':').ok_or_else(invalid)?;
        let minutes = mm.parse::<u32>().map_err(|_| invalid())?;
        let seconds = ss.parse::<u32>().map_err(|_| invalid())?;
        if seconds >= 60 {
            return Err(invalid());
        }
        let clock = Self { minutes, seconds };
        clock.to_seconds().ok_or_else(invalid)?;
        Ok(clock)
    }
}

impl fmt::Display for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes, self.seconds)
    }
}

pub fn format_clock(t: Seconds) -> String {
    Clock::from_seconds(t).to_string()
}

/// Display label `MM:SS-MM:SS` covering `[start_time, start_time + duration)`.
pub fn label(start_time: Seconds, duration: Seconds) -> String {
    format!(
        "{}-{}",
        Clock::from_seconds(start_time),
        Clock::from_seconds(start_time.saturating_add(duration))
    )
}

/// Parse a label back into `(start, end)` seconds.
pub fn parse_label(s: &str) -> Result<(Seconds, Seconds), TimelineError> {
    let invalid = || TimelineError::InvalidLabel(s.to_string());
    let (start, end) = s.split_once('-').ok_or_else(invalid)?;
    let start = Clock::parse(start)?.to_seconds().ok_or_else(invalid)?;
    let end = Clock::parse(end)?.to_seconds().ok_or_else(invalid)?;
    if end < start {
        return Err(invalid());
    }
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_zero_pads() {
        assert_eq!(label(0, 1), "00:00-00:01");
        assert_eq!(label(1, 5), "00:01-00:06");
        assert_eq!(label(7, 1), "00:07-00:08");
    }

    #[test]
    fn test_label_rolls_over_minutes() {
        assert_eq!(label(59, 2), "00:59-01:01");
        assert_eq!(format_clock(125), "02:05");
        assert_eq!(format_clock(6000), "100:00");
    }

    #[test]
    fn test_parse_label() {
        assert_eq!(parse_label("00:01-00:06").unwrap(), (1, 6));
        assert_eq!(parse_label("00:59-01:01").unwrap(), (59, 61));
        assert!(parse_label("00:06-00:01").is_err());
        assert!(parse_label("00:61-01:00").is_err());
        assert!(parse_label("0001-0002").is_err());
        assert!(parse_label("garbage").is_err());
    }

    #[test]
    fn test_clock_parse() {
        let clock = Clock::parse("01:30").unwrap();
        assert_eq!(clock.minutes, 1);
        assert_eq!(clock.seconds, 30);
        assert_eq!(clock.to_seconds(), Some(90));
    }

    #[test]
    fn test_oversized_clock_is_rejected() {
        assert!(matches!(
            Clock::parse("99999999:00"),
            Err(TimelineError::InvalidLabel(_))
        ));
        assert!(parse_label("99999999:00-99999999:01").is_err());
        let clock = Clock {
            minutes: u32::MAX,
            seconds: 0,
        };
        assert_eq!(clock.to_seconds(), None);
    }

    #[test]
    fn test_label_saturates_at_max() {
        assert_eq!(label(Seconds::MAX, 1), label(Seconds::MAX, 0));
    }
}
