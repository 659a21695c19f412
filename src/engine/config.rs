use crate::report::DateOrder;

/// What to do with a line that cannot be folded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MalformedLinePolicy {
    /// Drop the line from every aggregate, count it, and keep going.
    #[default]
    Skip,
    /// Abort the run at the first bad line.
    Fail,
}

/// Configuration parameters for one aggregation run.
#[derive(Debug, Clone, Default)]
pub struct AggregatorConfig {
    /// Handling of unparseable lines, orphan sessions and duplicate users.
    pub malformed_policy: MalformedLinePolicy,
    /// Sort direction for each user's dates.
    pub date_order: DateOrder,
    /// Collect a [`SpaceProfile`](crate::SpaceProfile).
    pub profile_space: bool,
    /// Abort once tracked accumulator state exceeds this many bytes.
    pub space_budget_bytes: Option<usize>,
}

impl AggregatorConfig {
    /// Set the malformed line policy.
    pub fn with_malformed_policy(mut self, policy: MalformedLinePolicy) -> Self {
        self.malformed_policy = policy;
        self
    }

    /// Set the date sort direction.
    pub fn with_date_order(mut self, order: DateOrder) -> Self {
        self.date_order = order;
        self
    }

    /// Enable space profiling.
    pub fn with_space_profiling(mut self, enabled: bool) -> Self {
        self.profile_space = enabled;
        self
    }

    /// Cap retained accumulator state.
    pub fn with_space_budget(mut self, bytes: usize) -> Self {
        self.space_budget_bytes = Some(bytes);
        self
    }
}
