//! Signed time-shift offsets
//!
//! Grammar: a mandatory sign, then an hour count suffixed `h` and/or a
//! minute count suffixed `m`, at least one of the two. `+15m`, `-1h`,
//! `+1h30m`. Zero-magnitude offsets are rejected, and the magnitude is
//! capped at 12 hours with its own error so callers can tell a typo from
//! an out-of-range request.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum OffsetError {
    #[error("invalid offset '{0}': expected a sign then hours/minutes, e.g. +15m, -1h or +1h30m")]
    InvalidFormat(String),

    #[error("offset '{0}' has zero magnitude")]
    Zero(String),

    #[error("offset '{0}' exceeds the maximum of 12 hours")]
    TooLarge(String),
}

/// A parsed, validated shift offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftOffset {
    minutes: i32,
}

impl ShiftOffset {
    /// Largest accepted magnitude
    pub const MAX_MINUTES: i32 = 12 * 60;

    /// Signed magnitude in minutes
    pub fn minutes(&self) -> i32 {
        self.minutes
    }
}

impl fmt::Display for ShiftOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.minutes < 0 { '-' } else { '+' };
        let magnitude = self.minutes.abs();
        let (hours, minutes) = (magnitude / 60, magnitude % 60);
        match (hours, minutes) {
            (0, m) => write!(f, "{}{}m", sign, m),
            (h, 0) => write!(f, "{}{}h", sign, h),
            (h, m) => write!(f, "{}{}h{}m", sign, h, m),
        }
    }
}

impl FromStr for ShiftOffset {
    type Err = OffsetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || OffsetError::InvalidFormat(s.to_string());

        let mut chars = s.trim().chars().peekable();
        let negative = match chars.next() {
            Some('+') => false,
            Some('-') => true,
            _ => return Err(invalid()),
        };

        let first = take_digits(&mut chars).ok_or_else(invalid)?;
        let (hours, minutes) = match chars.next() {
            Some('m') => (0, first),
            Some('h') => match take_digits(&mut chars) {
                Some(m) => {
                    if chars.next() != Some('m') {
                        return Err(invalid());
                    }
                    (first, m)
                }
                None => (first, 0),
            },
            _ => return Err(invalid()),
        };
        if chars.next().is_some() {
            return Err(invalid());
        }

        let magnitude = hours
            .checked_mul(60)
            .and_then(|h| h.checked_add(minutes))
            .ok_or_else(|| OffsetError::TooLarge(s.to_string()))?;
        if magnitude == 0 {
            return Err(OffsetError::Zero(s.to_string()));
        }
        if magnitude > i64::from(Self::MAX_MINUTES) {
            return Err(OffsetError::TooLarge(s.to_string()));
        }

        let magnitude = magnitude as i32;
        Ok(Self {
            minutes: if negative { -magnitude } else { magnitude },
        })
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<i64> {
    let mut digits = String::new();
    while let Some(c) = chars.peek().filter(|c| c.is_ascii_digit()) {
        digits.push(*c);
        chars.next();
    }
    digits.parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_forms() {
        assert_eq!("+15m".parse::<ShiftOffset>().unwrap().minutes(), 15);
        assert_eq!("-1h".parse::<ShiftOffset>().unwrap().minutes(), -60);
        assert_eq!("+1h30m".parse::<ShiftOffset>().unwrap().minutes(), 90);
        assert_eq!("-12h".parse::<ShiftOffset>().unwrap().minutes(), -720);
    }

    #[test]
    fn sign_is_mandatory() {
        assert_eq!(
            "15m".parse::<ShiftOffset>(),
            Err(OffsetError::InvalidFormat("15m".to_string()))
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            "+".parse::<ShiftOffset>(),
            Err(OffsetError::InvalidFormat(_))
        ));
        assert!(matches!(
            "+h".parse::<ShiftOffset>(),
            Err(OffsetError::InvalidFormat(_))
        ));
        assert!(matches!(
            "+30x".parse::<ShiftOffset>(),
            Err(OffsetError::InvalidFormat(_))
        ));
        assert!(matches!(
            "+30m9h".parse::<ShiftOffset>(),
            Err(OffsetError::InvalidFormat(_))
        ));
    }

    #[test]
    fn zero_magnitude_is_its_own_error() {
        assert_eq!(
            "+0m".parse::<ShiftOffset>(),
            Err(OffsetError::Zero("+0m".to_string()))
        );
    }

    #[test]
    fn cap_is_a_distinct_error() {
        assert_eq!(
            "+12h1m".parse::<ShiftOffset>(),
            Err(OffsetError::TooLarge("+12h1m".to_string()))
        );
        // exactly 12h is allowed
        assert!("+12h".parse::<ShiftOffset>().is_ok());
    }

    #[test]
    fn huge_magnitudes_fail_instead_of_overflowing() {
        // i64::MAX hours would overflow the minute conversion
        assert_eq!(
            "+9223372036854775807h".parse::<ShiftOffset>(),
            Err(OffsetError::TooLarge("+9223372036854775807h".to_string()))
        );
        assert!(matches!(
            "-9223372036854775807h59m".parse::<ShiftOffset>(),
            Err(OffsetError::TooLarge(_))
        ));
        // beyond i64 entirely: the digit run itself fails to parse
        assert!(matches!(
            "+99999999999999999999m".parse::<ShiftOffset>(),
            Err(OffsetError::InvalidFormat(_))
        ));
    }

    #[test]
    fn display_roundtrip() {
        for text in ["+15m", "-1h", "+1h30m"] {
            let offset: ShiftOffset = text.parse().unwrap();
            assert_eq!(offset.to_string(), text);
        }
    }
}
