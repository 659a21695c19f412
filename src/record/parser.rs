use std::str::Split;

use chrono::NaiveDate;
use thiserror::Error;

use super::types::{LogLine, SessionRecord, UserRecord};

/// Date layout used by the log and by the report.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const USER_FIELDS: usize = 4;
const SESSION_FIELDS: usize = 5;

/// Reasons a single line cannot be turned into a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Line contains nothing but whitespace.
    #[error("empty line")]
    Empty,

    /// First field is neither `user` nor `session`.
    #[error("unknown record kind '{0}'")]
    UnknownKind(String),

    /// Wrong number of fields after the record kind.
    #[error("{kind} record has {found} fields, expected {expected}")]
    FieldCount {
        /// Record kind being parsed.
        kind: &'static str,
        /// Fields required after the kind.
        expected: usize,
        /// Fields actually present.
        found: usize,
    },

    /// A numeric field is not a non-negative integer.
    #[error("field {field} is not a non-negative integer: '{value}'")]
    InvalidInteger {
        /// Field name.
        field: &'static str,
        /// Offending text.
        value: String,
    },

    /// Date field is not `YYYY-MM-DD`.
    #[error("invalid date '{0}'")]
    InvalidDate(String),

    /// Browser field is not `<name> <version>`.
    #[error("invalid browser '{0}'")]
    InvalidBrowser(String),

    /// A required text field is empty.
    #[error("field {0} is empty")]
    MissingField(&'static str),
}

/// Parse one line (without its terminator) into a typed record.
///
/// Pure: the returned record borrows from `line`.
pub fn parse_line(line: &str) -> Result<LogLine<'_>, ParseError> {
    if line.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let mut fields = line.split(',');
    match fields.next() {
        Some("user") => parse_user(&mut fields).map(LogLine::User),
        Some("session") => parse_session(&mut fields).map(LogLine::Session),
        Some(other) => Err(ParseError::UnknownKind(other.to_string())),
        None => Err(ParseError::Empty),
    }
}

fn parse_user<'a>(fields: &mut Split<'a, char>) -> Result<UserRecord<'a>, ParseError> {
    let [id, first_name, last_name, age] = take_fields::<USER_FIELDS>("user", fields)?;
    Ok(UserRecord {
        id: non_empty("user_id", id)?,
        first_name,
        last_name,
        age: parse_u32("age", age)?,
    })
}

fn parse_session<'a>(fields: &mut Split<'a, char>) -> Result<SessionRecord<'a>, ParseError> {
    let [user, _session_id, browser, minutes, date] =
        take_fields::<SESSION_FIELDS>("session", fields)?;

    let (browser_name, browser_version) = browser
        .rsplit_once(' ')
        .filter(|(name, _)| !name.trim().is_empty())
        .ok_or_else(|| ParseError::InvalidBrowser(browser.to_string()))?;

    Ok(SessionRecord {
        user: non_empty("user_id", user)?,
        date: NaiveDate::parse_from_str(date, DATE_FORMAT)
            .map_err(|_| ParseError::InvalidDate(date.to_string()))?,
        browser_name,
        browser_version: parse_u32("browser_version", browser_version)?,
        duration_minutes: parse_u32("duration", minutes)?,
    })
}

/// Collect exactly `N` remaining fields, reporting the real count otherwise.
fn take_fields<'a, const N: usize>(
    kind: &'static str,
    fields: &mut Split<'a, char>,
) -> Result<[&'a str; N], ParseError> {
    let mut out = [""; N];
    let mut found = 0;
    for field in fields {
        if found < N {
            out[found] = field;
        }
        found += 1;
    }
    if found != N {
        return Err(ParseError::FieldCount {
            kind,
            expected: N,
            found,
        });
    }
    Ok(out)
}

fn parse_u32(field: &'static str, value: &str) -> Result<u32, ParseError> {
    // `u32::from_str` accepts a leading '+', which the log never contains.
    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(parsed) = value.parse() {
            return Ok(parsed);
        }
    }
    Err(ParseError::InvalidInteger {
        field,
        value: value.to_string(),
    })
}

fn non_empty<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ParseError> {
    if value.is_empty() {
        Err(ParseError::MissingField(field))
    } else {
        Ok(value)
    }
}
