//! Validity window parsing.
//!
//! Discussions state their effective period as `Valid DDHHMMZ - DDHHMMZ`.
//! The tokens carry only day, hour and minute; year and month come from the
//! issuance date printed in the product header.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use meso_common::{MesoError, MesoResult, ValidityWindow, DEFAULT_UTC_OFFSET_HOURS};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

/// Six digits followed by `Z`: day, hour, minute in UTC.
static VALID_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9]{2})([0-9]{2})([0-9]{2})Z").expect("valid time regex should compile")
});

/// Index of the issuance line among the non-blank lines of the product block.
const ISSUANCE_LINE_INDEX: usize = 2;

/// Trailing characters of the issuance line holding the date, e.g. "Jan 05 2024".
const ISSUANCE_DATE_LEN: usize = 11;

const ISSUANCE_DATE_FORMAT: &str = "%b %d %Y";

/// Read the issuance date from a discussion's preformatted product block.
///
/// The third non-blank line is the issuance line
/// (`0245 PM CST Fri Jan 05 2024`); its last 11 characters are the date.
pub fn extract_issuance_date(preformatted: &str) -> MesoResult<NaiveDate> {
    let line = preformatted
        .lines()
        .filter(|l| !l.trim().is_empty())
        .nth(ISSUANCE_LINE_INDEX)
        .ok_or_else(|| {
            MesoError::UnparsableIssuanceDate(format!(
                "product block has fewer than {} non-blank lines",
                ISSUANCE_LINE_INDEX + 1
            ))
        })?
        .trim_end();

    let start = line
        .char_indices()
        .rev()
        .nth(ISSUANCE_DATE_LEN - 1)
        .map(|(i, _)| i)
        .ok_or_else(|| {
            MesoError::UnparsableIssuanceDate(format!("issuance line too short: '{}'", line))
        })?;
    let date_text = &line[start..];

    NaiveDate::parse_from_str(date_text, ISSUANCE_DATE_FORMAT).map_err(|e| {
        MesoError::UnparsableIssuanceDate(format!(
            "'{}' in line '{}': {}",
            date_text, line, e
        ))
    })
}

/// Resolves `DDHHMMZ` tokens against an issuance date.
#[derive(Debug, Clone, Copy)]
pub struct ValidityParser {
    utc_offset: Duration,
}

impl Default for ValidityParser {
    fn default() -> Self {
        Self::new(DEFAULT_UTC_OFFSET_HOURS)
    }
}

impl ValidityParser {
    /// Create a parser applying a fixed offset (in hours) to every token.
    pub fn new(utc_offset_hours: i32) -> Self {
        Self {
            utc_offset: Duration::hours(i64::from(utc_offset_hours)),
        }
    }

    /// Resolve a single `DDHHMMZ` token to local display time.
    ///
    /// Returns `None` when the token is not a calendar instant in the
    /// issuance month (day 31 in a 30-day month, hour 24, ...).
    pub fn resolve(&self, token: &str, issuance_date: NaiveDate) -> Option<NaiveDateTime> {
        let caps = VALID_TIME.captures(token)?;
        let day: u32 = caps[1].parse().ok()?;
        let hour: u32 = caps[2].parse().ok()?;
        let minute: u32 = caps[3].parse().ok()?;

        let utc = NaiveDate::from_ymd_opt(issuance_date.year(), issuance_date.month(), day)?
            .and_hms_opt(hour, minute, 0)?;
        Some(utc + self.utc_offset)
    }

    /// Parse the validity window from discussion text.
    ///
    /// The first two resolvable tokens, in order of appearance, are the
    /// start and end. Their order is not checked.
    pub fn parse(&self, text: &str, issuance_date: NaiveDate) -> MesoResult<ValidityWindow> {
        let mut resolved = Vec::with_capacity(2);

        for m in VALID_TIME.find_iter(text) {
            match self.resolve(m.as_str(), issuance_date) {
                Some(ts) => resolved.push(ts),
                None => warn!(
                    token = m.as_str(),
                    issuance_date = %issuance_date,
                    "Skipping unresolvable valid time"
                ),
            }
            if resolved.len() == 2 {
                break;
            }
        }

        match resolved[..] {
            [start, end] => {
                debug!(%start, %end, "Resolved validity window");
                Ok(ValidityWindow::new(start, end))
            }
            _ => Err(MesoError::NoValidityFound(format!(
                "need two DDHHMMZ times, resolved {}",
                resolved.len()
            ))),
        }
    }
}

/// Parse the validity window with the default fixed UTC offset.
pub fn parse_validity(text: &str, issuance_date: NaiveDate) -> MesoResult<ValidityWindow> {
    ValidityParser::default().parse(text, issuance_date)
}
