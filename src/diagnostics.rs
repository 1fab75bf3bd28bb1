// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::fmt;

use tracing::{debug, info, trace, warn};

use crate::event::Pitch;

/// Why a note event was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// A note on arrived while another note was still sounding.
    NoteAlreadyActive { active: Pitch },
    /// A note off (or zero velocity note on) didn't match the sounding note.
    NoMatchingNote { active: Option<Pitch> },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::NoteAlreadyActive { active } => {
                write!(f, "note {} is already active", active)
            }
            Rejection::NoMatchingNote { active: Some(active) } => {
                write!(f, "does not match active note {}", active)
            }
            Rejection::NoMatchingNote { active: None } => write!(f, "no note is active"),
        }
    }
}

/// Notices emitted while merging and scanning a timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The track chosen as the note source.
    NotesTrackSelected { track: usize },
    /// A second track with note on events. Its notes are ignored.
    ConflictingNotesTrack { track: usize, notes_track: usize },
    /// A note event dropped by the merger's per-track dedup.
    NoteRejectedInMerge {
        track: usize,
        tick: u64,
        pitch: Pitch,
        reason: Rejection,
    },
    /// A note event dropped by the scanner.
    NoteDroppedInScan {
        tick: u64,
        pitch: Pitch,
        reason: Rejection,
    },
    TempoChanged { tick: u64, tempo: u32 },
    /// A known control event with no effect on rendering.
    ControlIgnored { tick: u64, name: &'static str },
    UnknownControl { tick: u64, label: String },
    /// A note still sounding when the scan reached the final tick.
    UnterminatedNote {
        start_tick: u64,
        pitch: Pitch,
        closed: bool,
    },
    /// Queue sizes once merging is done.
    Merged {
        control_events: usize,
        note_events: usize,
    },
    /// Scan finished.
    Scanned { max_tick: u64, notes: usize },
}

impl Diagnostic {
    /// The verbosity the notice belongs to: 0 for warnings, 1 for progress, 2 for details
    /// and 3 for per-event tracing.
    pub fn verbosity(&self) -> u8 {
        match self {
            Diagnostic::ConflictingNotesTrack { .. }
            | Diagnostic::NoteRejectedInMerge { .. }
            | Diagnostic::NoteDroppedInScan { .. }
            | Diagnostic::UnterminatedNote { .. } => 0,
            Diagnostic::NotesTrackSelected { .. }
            | Diagnostic::Merged { .. }
            | Diagnostic::Scanned { .. } => 1,
            Diagnostic::TempoChanged { .. } | Diagnostic::UnknownControl { .. } => 2,
            Diagnostic::ControlIgnored { .. } => 3,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::NotesTrackSelected { track } => {
                write!(f, "using track {} as the notes track", track)
            }
            Diagnostic::ConflictingNotesTrack { track, notes_track } => write!(
                f,
                "track {} also contains notes, ignoring them in favour of track {}",
                track, notes_track
            ),
            Diagnostic::NoteRejectedInMerge {
                track,
                tick,
                pitch,
                reason,
            } => write!(
                f,
                "rejected note {} on track {} at tick {}: {}",
                pitch, track, tick, reason
            ),
            Diagnostic::NoteDroppedInScan {
                tick,
                pitch,
                reason,
            } => write!(f, "dropped note {} at tick {}: {}", pitch, tick, reason),
            Diagnostic::TempoChanged { tick, tempo } => {
                write!(f, "tempo set to {} us/beat at tick {}", tempo, tick)
            }
            Diagnostic::ControlIgnored { tick, name } => {
                write!(f, "{} at tick {}", name, tick)
            }
            Diagnostic::UnknownControl { tick, label } => {
                write!(f, "unrecognized event {} at tick {}", label, tick)
            }
            Diagnostic::UnterminatedNote {
                start_tick,
                pitch,
                closed,
            } => write!(
                f,
                "note {} started at tick {} never ended, {}",
                pitch,
                start_tick,
                if *closed { "closing it" } else { "dropping it" }
            ),
            Diagnostic::Merged {
                control_events,
                note_events,
            } => write!(
                f,
                "merged {} control events and {} note events",
                control_events, note_events
            ),
            Diagnostic::Scanned { max_tick, notes } => {
                write!(f, "scanned {} ticks, found {} notes", max_tick, notes)
            }
        }
    }
}

/// A sink for diagnostics. Reporting never affects the produced intervals.
pub trait Diagnostics {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Records diagnostics, mostly for tests.
impl Diagnostics for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Drops all diagnostics.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDiagnostics;

impl Diagnostics for NullDiagnostics {
    fn report(&mut self, _: Diagnostic) {}
}

/// Forwards diagnostics to tracing, mapping verbosity onto log levels.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn report(&mut self, diagnostic: Diagnostic) {
        let message = diagnostic.to_string();
        match diagnostic.verbosity() {
            0 => warn!("{}", message),
            1 => info!("{}", message),
            2 => debug!("{}", message),
            _ => trace!("{}", message),
        }
    }
}
