// Copyright 2025 Headway Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Field value types for transit feed tables
//!
//! Parse failures here are data-quality conditions surfaced to callers as
//! recoverable errors; the storage layer itself never parses text.

use crate::error::{HeadwayError, Result};
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

pub use rust_decimal::Decimal;

/// 24-bit RGB color, written in feeds as exactly six hexadecimal digits
/// with no leading `#` (e.g. `FFD700`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(u32);

impl Color {
    pub const fn new(rgb: u32) -> Self {
        Self(rgb & 0x00FF_FFFF)
    }

    pub const fn rgb(&self) -> u32 {
        self.0
    }

    pub const fn red(&self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn green(&self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn blue(&self) -> u8 {
        self.0 as u8
    }
}

impl FromStr for Color {
    type Err = HeadwayError;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(HeadwayError::InvalidData(format!(
                "Invalid color '{}': expected six hexadecimal digits",
                s
            )));
        }
        // Validated above, cannot fail
        let rgb = u32::from_str_radix(s, 16).map_err(|e| {
            HeadwayError::InvalidData(format!("Invalid color '{}': {}", s, e))
        })?;
        Ok(Self(rgb))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06X}", self.0)
    }
}

/// ISO 4217 currency code, stored uppercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CurrencyCode([u8; 3]);

impl CurrencyCode {
    pub fn as_str(&self) -> &str {
        // Constructed from ASCII letters only
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl FromStr for CurrencyCode {
    type Err = HeadwayError;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(|b| b.is_ascii_alphabetic()) {
            return Err(HeadwayError::InvalidData(format!(
                "Invalid currency code '{}': expected three letters",
                s
            )));
        }
        Ok(Self([
            bytes[0].to_ascii_uppercase(),
            bytes[1].to_ascii_uppercase(),
            bytes[2].to_ascii_uppercase(),
        ]))
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time of day as seconds since midnight of the service day.
///
/// The hour may exceed 23: a trip leaving at 25:10:00 runs at 01:10 on the
/// morning after its service day, which is how feeds express times past
/// midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeOfDay(u32);

impl TimeOfDay {
    pub fn from_hms(hours: u32, minutes: u32, seconds: u32) -> Result<Self> {
        if minutes > 59 || seconds > 59 {
            return Err(HeadwayError::InvalidData(format!(
                "Invalid time {}:{:02}:{:02}: minutes and seconds must be below 60",
                hours, minutes, seconds
            )));
        }
        Ok(Self(hours * 3600 + minutes * 60 + seconds))
    }

    pub const fn from_seconds(seconds: u32) -> Self {
        Self(seconds)
    }

    pub const fn seconds_since_midnight(&self) -> u32 {
        self.0
    }

    pub const fn hour(&self) -> u32 {
        self.0 / 3600
    }

    pub const fn minute(&self) -> u32 {
        (self.0 / 60) % 60
    }

    pub const fn second(&self) -> u32 {
        self.0 % 60
    }
}

impl FromStr for TimeOfDay {
    type Err = HeadwayError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || {
            HeadwayError::InvalidData(format!(
                "Invalid time '{}': expected H:MM:SS or HH:MM:SS",
                s
            ))
        };

        let mut parts = s.split(':');
        let (hours, minutes, seconds) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(h), Some(m), Some(sec), None) => (h, m, sec),
            _ => return Err(invalid()),
        };

        if hours.is_empty() || minutes.len() != 2 || seconds.len() != 2 {
            return Err(invalid());
        }

        let hours: u32 = hours.parse().map_err(|_| invalid())?;
        let minutes: u32 = minutes.parse().map_err(|_| invalid())?;
        let seconds: u32 = seconds.parse().map_err(|_| invalid())?;

        Self::from_hms(hours, minutes, seconds)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour(), self.minute(), self.second())
    }
}

/// BCP-47 style language tag, e.g. `en` or `nl-BE`.
///
/// Validation is intentionally shallow: ASCII alphanumeric subtags joined
/// by `-`, with the language subtag lowercased. Full registry checks are a
/// validator concern, not a storage one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale(String);

impl Locale {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Locale {
    type Err = HeadwayError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || {
            HeadwayError::InvalidData(format!(
                "Invalid language tag '{}': expected alphanumeric subtags separated by '-'",
                s
            ))
        };

        if s.is_empty() {
            return Err(invalid());
        }

        let mut subtags = s.split('-');
        let language = subtags.next().ok_or_else(invalid)?;
        if language.is_empty()
            || language.len() > 8
            || !language.bytes().all(|b| b.is_ascii_alphabetic())
        {
            return Err(invalid());
        }

        let mut normalized = language.to_ascii_lowercase();
        for subtag in subtags {
            if subtag.is_empty()
                || subtag.len() > 8
                || !subtag.bytes().all(|b| b.is_ascii_alphanumeric())
            {
                return Err(invalid());
            }
            normalized.push('-');
            normalized.push_str(subtag);
        }

        Ok(Self(normalized))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// IANA timezone identifier, e.g. `America/New_York`.
///
/// Stored as the raw identifier; resolving it against the tz database
/// happens in the calendar validators downstream.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Timezone(String);

impl Timezone {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Timezone {
    type Err = HeadwayError;

    fn from_str(s: &str) -> Result<Self> {
        let valid = !s.is_empty()
            && !s.starts_with('/')
            && !s.ends_with('/')
            && s.bytes()
                .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'/' | b'_' | b'+' | b'-'));
        if !valid {
            return Err(HeadwayError::InvalidData(format!(
                "Invalid timezone identifier '{}'",
                s
            )));
        }
        Ok(Self(s.to_string()))
    }
}

impl fmt::Display for Timezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parses a service date written as `YYYYMMDD` (e.g. `20260115`).
pub fn parse_service_date(s: &str) -> Result<NaiveDate> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(HeadwayError::InvalidData(format!(
            "Invalid service date '{}': expected YYYYMMDD",
            s
        )));
    }
    NaiveDate::parse_from_str(s, "%Y%m%d")
        .map_err(|e| HeadwayError::InvalidData(format!("Invalid service date '{}': {}", s, e)))
}

#[cfg(test)]
#[path = "value_test.rs"]
mod value_test;
