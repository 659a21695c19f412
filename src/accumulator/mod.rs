//! Running summaries folded one session at a time.
//!
//! Per-user state is kept as small as the report allows: counters, two
//! flags, and one date plus one interned browser key per session.

mod global;
mod user;

pub use global::{BrowserKey, GlobalAccumulator};
pub use user::UserAccumulator;
