//! Retained-state accounting and profiling
//!
//! Tracks the heap the accumulators keep alive so the bounded-memory
//! property can be checked from inside a run, not only from outside it.

mod tracker;

pub use tracker::SpaceTracker;

/// Detailed space profile (if enabled)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpaceProfile {
    /// Peak retained accumulator bytes
    pub max_state_bytes: usize,

    /// Retained bytes sampled over the run, as `(line_number, bytes)`.
    /// Downsampled as it fills, so its length never exceeds a fixed cap.
    pub timeline: Vec<(u64, usize)>,

    /// Longest single input line
    pub line_buffer_max: usize,
    /// Users registered
    pub users: usize,
    /// Distinct browser labels interned
    pub distinct_browsers: usize,
}

impl SpaceProfile {
    /// Generate report
    pub fn report(&self) -> String {
        format!(
            "Max state: {} bytes\nComponents:\n  Line buffer: {}\n  Users: {}\n  Browsers: {}\n  Samples: {}",
            self.max_state_bytes,
            self.line_buffer_max,
            self.users,
            self.distinct_browsers,
            self.timeline.len()
        )
    }
}
