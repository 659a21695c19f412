use std::collections::HashMap;
use std::fmt;
use std::io::BufRead;
use std::mem::{self, size_of};

use thiserror::Error;
use tracing::{debug, info, warn};

use super::{AggregatorConfig, MalformedLinePolicy};
use crate::accumulator::{GlobalAccumulator, UserAccumulator};
use crate::record::{parse_line, LogLine, ParseError, SessionRecord, UserRecord};
use crate::report::{build_report, Report};
use crate::space::{SpaceProfile, SpaceTracker};
use crate::AggregateError;

/// Lifecycle of an engine. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Created, nothing read yet.
    Idle,
    /// Folding lines.
    Streaming,
    /// Building the report.
    Finalizing,
    /// Report handed out; the engine holds no accumulator state.
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Idle => "idle",
            Phase::Streaming => "streaming",
            Phase::Finalizing => "finalizing",
            Phase::Done => "done",
        })
    }
}

/// Why a line could not be folded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedRecord {
    /// Line failed to parse.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Line bytes are not UTF-8.
    #[error("line is not valid UTF-8")]
    InvalidUtf8,

    /// Session refers to a user id with no earlier registration line.
    #[error("session for unregistered user '{0}'")]
    UnknownUser(String),

    /// A user id was registered a second time.
    #[error("user '{0}' registered twice")]
    DuplicateUser(String),
}

/// Everything a finished run produces.
#[derive(Debug)]
pub struct AggregationOutcome {
    /// Final report.
    pub report: Report,
    /// Physical lines read, blank and rejected lines included.
    pub lines_read: u64,
    /// Lines dropped under [`MalformedLinePolicy::Skip`].
    pub records_skipped: u64,
    /// Peak tracked accumulator bytes.
    pub space_used: usize,
    /// Detailed profile, when enabled.
    pub space_profile: Option<SpaceProfile>,
}

/// Drives one pass over a session log.
///
/// Raw lines live only in a single reusable buffer; what survives a fold
/// step is the accumulator state the report needs.
#[derive(Debug)]
pub struct AggregationEngine {
    config: AggregatorConfig,
    phase: Phase,
    global: GlobalAccumulator,
    /// Registration order.
    users: Vec<UserAccumulator>,
    /// User id -> index into `users`.
    user_index: HashMap<String, usize>,
    tracker: SpaceTracker,
    line_buffer: Vec<u8>,
    /// Scratch space for the current session's browser label.
    label: String,
    lines_read: u64,
    records_skipped: u64,
}

impl AggregationEngine {
    /// Create an idle engine.
    pub fn new(config: AggregatorConfig) -> Self {
        let tracker = SpaceTracker::new(config.profile_space);
        Self {
            config,
            phase: Phase::Idle,
            global: GlobalAccumulator::new(),
            users: Vec::new(),
            user_index: HashMap::new(),
            tracker,
            line_buffer: Vec::new(),
            label: String::new(),
            lines_read: 0,
            records_skipped: 0,
        }
    }

    /// Access configuration.
    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Physical lines seen so far.
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    /// Lines skipped so far.
    pub fn records_skipped(&self) -> u64 {
        self.records_skipped
    }

    /// Users registered so far.
    pub fn total_users(&self) -> usize {
        self.users.len()
    }

    /// Run-wide accumulator.
    pub fn global(&self) -> &GlobalAccumulator {
        &self.global
    }

    /// Read `reader` to the end, folding every line.
    ///
    /// May be called more than once before [`finish`](Self::finish); the
    /// streams are treated as one continuous log.
    pub fn consume<R: BufRead>(&mut self, mut reader: R) -> Result<(), AggregateError> {
        self.enter_streaming("consume input")?;

        let mut buffer = mem::take(&mut self.line_buffer);
        let result = self.stream(&mut reader, &mut buffer);
        self.line_buffer = buffer;
        result
    }

    fn stream<R: BufRead>(
        &mut self,
        reader: &mut R,
        buffer: &mut Vec<u8>,
    ) -> Result<(), AggregateError> {
        loop {
            buffer.clear();
            if reader.read_until(b'\n', buffer)? == 0 {
                return Ok(());
            }
            self.fold_raw(buffer)?;
        }
    }

    /// Fold a single line (terminator optional).
    pub fn feed_line(&mut self, line: &str) -> Result<(), AggregateError> {
        self.enter_streaming("feed a line")?;
        self.fold_raw(line.as_bytes())
    }

    /// End the stream and build the report.
    ///
    /// Accumulators are moved into the report builder, so the engine is
    /// empty afterwards and any further call fails with
    /// [`AggregateError::InvalidPhase`].
    pub fn finish(&mut self) -> Result<AggregationOutcome, AggregateError> {
        if !matches!(self.phase, Phase::Idle | Phase::Streaming) {
            return Err(AggregateError::InvalidPhase {
                operation: "finish",
                phase: self.phase,
            });
        }
        self.phase = Phase::Finalizing;

        // Only the accumulators are needed from here on.
        self.user_index = HashMap::new();
        self.line_buffer = Vec::new();
        let global = mem::take(&mut self.global);
        let users = mem::take(&mut self.users);
        let report = build_report(global, users, self.config.date_order);

        self.phase = Phase::Done;
        info!(
            lines = self.lines_read,
            skipped = self.records_skipped,
            users = report.total_users,
            sessions = report.total_sessions,
            browsers = report.unique_browsers_count,
            peak_state_bytes = self.tracker.max_space_used(),
            "aggregation finished"
        );

        Ok(AggregationOutcome {
            report,
            lines_read: self.lines_read,
            records_skipped: self.records_skipped,
            space_used: self.tracker.max_space_used(),
            space_profile: self.tracker.take_profile(),
        })
    }

    /// Consume the whole stream and finish.
    pub fn process<R: BufRead>(mut self, reader: R) -> Result<AggregationOutcome, AggregateError> {
        self.consume(reader)?;
        self.finish()
    }

    fn enter_streaming(&mut self, operation: &'static str) -> Result<(), AggregateError> {
        match self.phase {
            Phase::Idle => {
                debug!("streaming started");
                self.phase = Phase::Streaming;
                Ok(())
            }
            Phase::Streaming => Ok(()),
            phase => Err(AggregateError::InvalidPhase { operation, phase }),
        }
    }

    fn fold_raw(&mut self, raw: &[u8]) -> Result<(), AggregateError> {
        self.lines_read += 1;
        let line_number = self.lines_read;
        self.tracker.observe_line(line_number, raw.len());

        let Ok(text) = std::str::from_utf8(raw) else {
            return self.reject(line_number, MalformedRecord::InvalidUtf8);
        };
        let text = text.trim_end_matches(['\n', '\r']);
        if text.trim().is_empty() {
            return Ok(());
        }

        match parse_line(text) {
            Ok(LogLine::User(user)) => self.register_user(line_number, &user),
            Ok(LogLine::Session(session)) => self.fold_session(line_number, &session),
            Err(err) => self.reject(line_number, err.into()),
        }
    }

    fn register_user(
        &mut self,
        line_number: u64,
        user: &UserRecord<'_>,
    ) -> Result<(), AggregateError> {
        if self.user_index.contains_key(user.id) {
            return self.reject(line_number, MalformedRecord::DuplicateUser(user.id.to_string()));
        }

        let accumulator = UserAccumulator::new(user.display_name());
        self.tracker.grow_state(
            size_of::<UserAccumulator>()
                + accumulator.heap_bytes()
                + size_of::<(String, usize)>()
                + user.id.len(),
        );
        self.tracker.note_user();

        self.user_index.insert(user.id.to_string(), self.users.len());
        self.users.push(accumulator);
        debug!(line = line_number, user = user.id, "registered user");
        self.check_budget()
    }

    fn fold_session(
        &mut self,
        line_number: u64,
        session: &SessionRecord<'_>,
    ) -> Result<(), AggregateError> {
        let Some(&idx) = self.user_index.get(session.user) else {
            return self.reject(line_number, MalformedRecord::UnknownUser(session.user.to_string()));
        };

        session.write_browser_label(&mut self.label);
        let (browser, interned) = self.global.fold_session(&self.label);
        if interned > 0 {
            self.tracker.note_browser();
        }

        let user = &mut self.users[idx];
        let before = user.heap_bytes();
        user.fold(session, browser);
        let grown = user.heap_bytes().saturating_sub(before);

        self.tracker.grow_state(interned + grown);
        self.check_budget()
    }

    fn reject(&mut self, line_number: u64, reason: MalformedRecord) -> Result<(), AggregateError> {
        match self.config.malformed_policy {
            MalformedLinePolicy::Skip => {
                self.records_skipped += 1;
                warn!(line = line_number, %reason, "skipping malformed record");
                Ok(())
            }
            MalformedLinePolicy::Fail => Err(AggregateError::Malformed {
                line: line_number,
                reason,
            }),
        }
    }

    fn check_budget(&self) -> Result<(), AggregateError> {
        match self.config.space_budget_bytes {
            Some(budget) if self.tracker.current() > budget => {
                Err(AggregateError::SpaceBudgetExceeded {
                    used: self.tracker.current(),
                    budget,
                })
            }
            _ => Ok(()),
        }
    }
}
