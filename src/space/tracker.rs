//! Space tracking for verification

/// Timeline samples kept before the sampling stride doubles
const TIMELINE_CAPACITY: usize = 64;

/// Tracks retained accumulator bytes during a run
#[derive(Debug)]
pub struct SpaceTracker {
    /// Current bytes retained
    current: usize,

    /// Maximum seen
    max: usize,

    /// Lines between timeline samples
    stride: u64,

    /// Profile data (if enabled)
    profile: Option<super::SpaceProfile>,
}

impl SpaceTracker {
    /// Create new tracker
    pub fn new(profile_enabled: bool) -> Self {
        Self {
            current: 0,
            max: 0,
            stride: 1,
            profile: profile_enabled.then(super::SpaceProfile::default),
        }
    }

    /// Account for newly retained state
    pub fn grow_state(&mut self, bytes: usize) {
        self.current += bytes;
        self.update_max();
    }

    /// Record the size of a line held in the reusable read buffer
    pub fn observe_line(&mut self, line_number: u64, len: usize) {
        let Some(p) = self.profile.as_mut() else {
            return;
        };
        p.line_buffer_max = p.line_buffer_max.max(len);

        if line_number % self.stride != 0 {
            return;
        }
        p.timeline.push((line_number, self.current));
        if p.timeline.len() >= TIMELINE_CAPACITY {
            // Keep every second sample; the survivors sit on multiples of the new stride.
            let mut idx = 0;
            p.timeline.retain(|_| {
                idx += 1;
                idx % 2 == 0
            });
            self.stride *= 2;
        }
    }

    /// Note a newly registered user
    pub fn note_user(&mut self) {
        if let Some(ref mut p) = self.profile {
            p.users += 1;
        }
    }

    /// Note a newly interned browser label
    pub fn note_browser(&mut self) {
        if let Some(ref mut p) = self.profile {
            p.distinct_browsers += 1;
        }
    }

    fn update_max(&mut self) {
        self.max = self.max.max(self.current);

        if let Some(ref mut p) = self.profile {
            p.max_state_bytes = self.max;
        }
    }

    /// Bytes currently retained
    pub fn current(&self) -> usize {
        self.current
    }

    /// Get maximum retained bytes
    pub fn max_space_used(&self) -> usize {
        self.max
    }

    /// Take profile (leaves tracker without one)
    pub fn take_profile(&mut self) -> Option<super::SpaceProfile> {
        self.profile.take()
    }
}
