//! Shared helpers for integration tests: fixtures, snapshots, synthetic logs.

#![allow(dead_code)]

use std::fs::{self, File};
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use chrono::{Days, NaiveDate};

const BROWSERS: [&str; 4] = ["Chrome", "Firefox", "Safari", "Internet Explorer"];

pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn open_fixture(name: &str) -> BufReader<File> {
    let path = fixture_path(name);
    BufReader::new(File::open(&path).unwrap_or_else(|_| panic!("fixture {:?} not found", path)))
}

fn snapshot_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("snapshots")
}

pub fn assert_snapshot(name: &str, actual: &str) {
    let path = snapshot_root().join(name);
    if std::env::var("SESSIONSTAT_UPDATE_SNAPSHOTS").is_ok() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create snapshot directory");
        }
        fs::write(&path, actual).expect("write snapshot");
        return;
    }

    let expected =
        fs::read_to_string(&path).unwrap_or_else(|_| panic!("snapshot {:?} not found", path));
    if normalize(&expected) != normalize(actual) {
        panic!(
            "Snapshot mismatch for {:?}. Set SESSIONSTAT_UPDATE_SNAPSHOTS=1 to regenerate.\nExpected:\n{}\nActual:\n{}",
            path,
            expected,
            actual
        );
    }
}

fn normalize(input: &str) -> String {
    input.replace("\r\n", "\n").trim_end().to_string()
}

/// Deterministic session log generated on demand.
///
/// Emits `users` registration lines, then `sessions` session lines spread
/// round-robin across the users. Nothing beyond the current line is ever
/// materialized, so the reader itself adds no input-sized allocation.
#[derive(Debug)]
pub struct SyntheticLog {
    users: usize,
    sessions: usize,
    next_user: usize,
    next_session: usize,
    pending: Vec<u8>,
    pos: usize,
    bytes_emitted: usize,
}

impl SyntheticLog {
    pub fn new(users: usize, sessions: usize) -> Self {
        Self {
            users,
            sessions,
            next_user: 0,
            next_session: 0,
            pending: Vec::with_capacity(64),
            pos: 0,
            bytes_emitted: 0,
        }
    }

    /// Total bytes handed out so far.
    pub fn bytes_emitted(&self) -> usize {
        self.bytes_emitted
    }

    /// Whole log as a string (for small logs and benchmarks).
    pub fn to_text(users: usize, sessions: usize) -> String {
        let mut text = String::new();
        SyntheticLog::new(users, sessions)
            .read_to_string(&mut text)
            .expect("synthetic log is valid UTF-8");
        text
    }

    fn fill_next_line(&mut self) -> bool {
        if self.next_user < self.users {
            let id = self.next_user;
            self.next_user += 1;
            writeln!(self.pending, "user,{id},First{id},Last{id},{}", 18 + id % 60)
                .expect("write to Vec");
            return true;
        }
        if self.next_session < self.sessions {
            let i = self.next_session;
            self.next_session += 1;
            let date = NaiveDate::from_ymd_opt(2016, 1, 1).expect("valid date")
                + Days::new((i * 37 % 1000) as u64);
            writeln!(
                self.pending,
                "session,{},{},{} {},{},{}",
                i % self.users.max(1),
                i,
                BROWSERS[i % BROWSERS.len()],
                (i * 7) % 50,
                (i * 13) % 120,
                date.format("%Y-%m-%d")
            )
            .expect("write to Vec");
            return true;
        }
        false
    }
}

impl Read for SyntheticLog {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pos == self.pending.len() {
            self.pending.clear();
            self.pos = 0;
            if !self.fill_next_line() {
                return Ok(0);
            }
        }
        let n = (self.pending.len() - self.pos).min(buf.len());
        buf[..n].copy_from_slice(&self.pending[self.pos..self.pos + n]);
        self.pos += n;
        self.bytes_emitted += n;
        Ok(n)
    }
}
