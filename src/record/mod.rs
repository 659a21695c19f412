//! Session log line format.
//!
//! The log is comma-delimited with two record kinds and no header row:
//!
//! ```text
//! user,<user_id>,<first_name>,<last_name>,<age>
//! session,<user_id>,<session_id>,<browser> <version>,<minutes>,<YYYY-MM-DD>
//! ```
//!
//! Records borrow from the line they were parsed from, so parsing never
//! allocates on the success path.

mod parser;
mod types;

pub use parser::{parse_line, ParseError, DATE_FORMAT};
pub use types::{LogLine, SessionRecord, UserRecord};
