// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Run reporting.
//!
//! A run of the organizer engine produces a [`RunReport`]: the
//! `scanned` and `moved` counters, plus one [`Decision`] per file the
//! pass looked at. The report is owned exclusively by the invocation
//! that produced it; nothing carries over between runs.
//!
//! Success and partial failure are first-class data here. A move that
//! fails mid-run lands in the report as [`Decision::MoveFailed`] with
//! its underlying cause instead of aborting the pass, so the caller
//! can inspect exactly what happened to every file.

use crate::fs::FsError;

use std::path::PathBuf;

/// Accumulated outcome of one organizer run.
#[derive(Debug, Default)]
pub struct RunReport {
    scanned: u64,
    moved: u64,
    decisions: Vec<Decision>,
}

impl RunReport {
    /// Construct new empty run report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of non-hidden regular files the pass considered.
    pub fn scanned(&self) -> u64 {
        self.scanned
    }

    /// Number of files actually relocated.
    ///
    /// Always zero for a dry run.
    pub fn moved(&self) -> u64 {
        self.moved
    }

    /// Per-file decisions in the order the pass made them.
    pub fn decisions(&self) -> &[Decision] {
        &self.decisions
    }

    /// Whether any per-file move failed during the run.
    pub fn has_failures(&self) -> bool {
        self.decisions
            .iter()
            .any(|decision| matches!(decision, Decision::MoveFailed { .. }))
    }

    pub(crate) fn count_scanned(&mut self) {
        self.scanned += 1;
    }

    pub(crate) fn count_moved(&mut self) {
        self.moved += 1;
    }

    pub(crate) fn record(&mut self, decision: Decision) {
        self.decisions.push(decision);
    }
}

/// Outcome of looking at one directory entry.
#[derive(Debug)]
pub enum Decision {
    /// Entry name begins with a dot; never scanned, never moved.
    SkipHidden { name: String },

    /// File is not older than the active age threshold.
    SkipTooNew { name: String },

    /// Dry run only: the move that a real run would perform.
    PlannedMove { name: String, destination: PathBuf },

    /// File was relocated to its category directory.
    Moved { name: String, destination: PathBuf },

    /// Move was attempted and failed; the run continued regardless.
    MoveFailed { name: String, source: FsError },
}

impl Decision {
    /// Name of the directory entry this decision was made for.
    pub fn name(&self) -> &str {
        match self {
            Self::SkipHidden { name }
            | Self::SkipTooNew { name }
            | Self::PlannedMove { name, .. }
            | Self::Moved { name, .. }
            | Self::MoveFailed { name, .. } => name,
        }
    }

    /// Target path of the decision, when one was computed.
    pub fn destination(&self) -> Option<&PathBuf> {
        match self {
            Self::PlannedMove { destination, .. } | Self::Moved { destination, .. } => {
                Some(destination)
            }
            _ => None,
        }
    }
}
