//! # Single-pass session log aggregation
//!
//! Folds a session-activity log into a per-user and global summary without
//! ever holding the raw input in memory.
//!
//! ## Pipeline
//!
//! 1. **Parse**: each line becomes a typed [`LogLine`] or is rejected
//! 2. **Fold**: sessions update a [`GlobalAccumulator`] and one [`UserAccumulator`]
//! 3. **Finalize**: accumulators are sorted and formatted into a [`Report`]
//! 4. **Serialize**: the report is written as JSON
//!
//! Working memory is bounded by the per-user state the report needs (one
//! date and one 4-byte browser key per session), never by the size of the
//! input.
//!
//! ## Usage Example
//!
//! ```
//! use sessionstat::{aggregate, AggregatorConfig};
//!
//! let log = "user,0,Ada,Lovelace,36\nsession,0,0,Chrome 20,42,2017-03-01\n";
//! let outcome = aggregate(log.as_bytes(), AggregatorConfig::default())?;
//! assert_eq!(outcome.report.total_sessions, 1);
//! assert_eq!(outcome.report.all_browsers, "CHROME 20");
//! # Ok::<(), sessionstat::AggregateError>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod accumulator; // Running per-user and global summaries
pub mod engine;      // Single-pass driver and phase machine
pub mod io;          // File boundaries: input stream, report file
pub mod record;      // Line format and parser
pub mod report;      // Report structure, builder and JSON encoding
pub mod space;       // Retained-state accounting

pub use accumulator::{BrowserKey, GlobalAccumulator, UserAccumulator};
pub use engine::{
    AggregationEngine, AggregationOutcome, AggregatorConfig, MalformedLinePolicy,
    MalformedRecord, Phase,
};
pub use io::{aggregate_file, write_report_file};
pub use record::{parse_line, LogLine, ParseError, SessionRecord, UserRecord};
pub use report::{
    build_report, render_report, to_json_bytes, write_report, DateOrder, Report, UserStats,
};
pub use space::{SpaceProfile, SpaceTracker};

use std::io::BufRead;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can end an aggregation run.
#[derive(Error, Debug)]
pub enum AggregateError {
    /// Input file could not be opened.
    #[error("input {} is unavailable: {source}", .path.display())]
    InputUnavailable {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Reading from the input stream failed part way through.
    #[error("failed to read input: {0}")]
    Read(#[from] std::io::Error),

    /// A line was rejected while running under [`MalformedLinePolicy::Fail`].
    #[error("malformed record on line {line}: {reason}")]
    Malformed {
        /// 1-indexed line number.
        line: u64,
        /// Why the line was rejected.
        #[source]
        reason: MalformedRecord,
    },

    /// Tracked accumulator state grew past the configured budget.
    #[error("space budget exceeded: used {used} bytes > budget {budget} bytes")]
    SpaceBudgetExceeded {
        /// Bytes currently retained.
        used: usize,
        /// Configured budget.
        budget: usize,
    },

    /// Engine was driven out of order (e.g. fed after finishing).
    #[error("cannot {operation} while engine is {phase}")]
    InvalidPhase {
        /// Operation that was attempted.
        operation: &'static str,
        /// Phase the engine was in.
        phase: Phase,
    },

    /// Report could not be encoded.
    #[error("failed to encode report: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Report file could not be created or written.
    #[error("output {} is not writable: {source}", .path.display())]
    OutputUnwritable {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Aggregate a whole stream in one call.
///
/// Equivalent to building an [`AggregationEngine`] and calling
/// [`AggregationEngine::process`].
pub fn aggregate<R: BufRead>(
    reader: R,
    config: AggregatorConfig,
) -> Result<AggregationOutcome, AggregateError> {
    AggregationEngine::new(config).process(reader)
}
