use std::fmt;

use lasso::{Rodeo, Spur};

/// Interned `"NAME VERSION"` browser label.
///
/// Four bytes per occurrence instead of an owned `String`; resolve through
/// the [`GlobalAccumulator`] that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct BrowserKey(Spur);

/// Run-wide totals: session count and the distinct browser set.
///
/// The interner doubles as the distinct set, so each label is stored once no
/// matter how many sessions use it.
pub struct GlobalAccumulator {
    browsers: Rodeo,
    total_sessions: u64,
}

impl GlobalAccumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self {
            browsers: Rodeo::new(),
            total_sessions: 0,
        }
    }

    /// Fold one session with the given browser label.
    ///
    /// Returns the label's key and the number of bytes newly retained (zero
    /// when the label was already known).
    pub fn fold_session(&mut self, label: &str) -> (BrowserKey, usize) {
        self.total_sessions += 1;
        if let Some(key) = self.browsers.get(label) {
            return (BrowserKey(key), 0);
        }
        (BrowserKey(self.browsers.get_or_intern(label)), label.len())
    }

    /// Sessions folded so far.
    pub fn total_sessions(&self) -> u64 {
        self.total_sessions
    }

    /// Number of distinct browser labels seen.
    pub fn unique_browsers(&self) -> usize {
        self.browsers.len()
    }

    /// Label for a key issued by this accumulator.
    pub fn resolve(&self, key: BrowserKey) -> &str {
        self.browsers.resolve(&key.0)
    }

    /// Distinct labels, in first-seen order.
    pub fn distinct_browsers(&self) -> impl Iterator<Item = &str> + '_ {
        self.browsers.strings()
    }
}

impl Default for GlobalAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GlobalAccumulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobalAccumulator")
            .field("distinct_browsers", &self.browsers.len())
            .field("total_sessions", &self.total_sessions)
            .finish()
    }
}
