//! Compact duration tokens (`30m`, `2h`, `1w`) used by `/mute`.

use std::sync::OnceLock;

use chrono::{DateTime, TimeDelta, Utc};
use regex::Regex;

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// Unit character of a duration token.
///
/// Months and years are fixed approximations (30 and 365 days), not calendar arithmetic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DurationUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
    Years,
}

impl DurationUnit {
    pub fn from_char(c: char) -> Option<Self> {
        Some(match c {
            's' => Self::Seconds,
            'm' => Self::Minutes,
            'h' => Self::Hours,
            'd' => Self::Days,
            'w' => Self::Weeks,
            'M' => Self::Months,
            'y' => Self::Years,
            _ => return None,
        })
    }

    pub fn seconds(self) -> i64 {
        match self {
            Self::Seconds => 1,
            Self::Minutes => MINUTE,
            Self::Hours => HOUR,
            Self::Days => DAY,
            Self::Weeks => 7 * DAY,
            Self::Months => 30 * DAY,
            Self::Years => 365 * DAY,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Self::Seconds => "sec.",
            Self::Minutes => "min.",
            Self::Hours => "h.",
            Self::Days => "d.",
            Self::Weeks => "w.",
            Self::Months => "M.",
            Self::Years => "y.",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedDuration {
    pub amount: u64,
    pub unit: DurationUnit,
    /// Span between `now` and `expiry`.
    pub seconds: i64,
    pub expiry: DateTime<Utc>,
    pub label: String,
}

fn token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([0-9]+)([smhdwMy])$").expect("valid regex"))
}

/// Parse `<digits><unit>` relative to `now`.
///
/// Returns `None` for any other shape, including amounts that overflow the timestamp range.
pub fn parse_duration(token: &str, now: DateTime<Utc>) -> Option<ParsedDuration> {
    let caps = token_re().captures(token)?;
    let amount = caps[1].parse::<u64>().ok()?;
    let unit = caps[2].chars().next().and_then(DurationUnit::from_char)?;

    let secs = i64::try_from(amount).ok()?.checked_mul(unit.seconds())?;
    let expiry = now.checked_add_signed(TimeDelta::try_seconds(secs)?)?;

    Some(ParsedDuration {
        amount,
        unit,
        seconds: secs,
        expiry,
        label: format!("{amount} {}", unit.suffix()),
    })
}
