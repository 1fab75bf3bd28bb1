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
use serde::Deserialize;

use crate::diagnostics::{Diagnostic, Diagnostics, Rejection};
use crate::error::TaranisError;
use crate::event::{Control, EventKind, Pitch, TimedEvent};
use crate::interval::Interval;
use crate::merge::MergedTimeline;
use crate::tempo::{TempoMap, DEFAULT_TEMPO};

/// What to do with a note that is still sounding when the scan reaches the last tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum UnterminatedNotePolicy {
    /// Discard the note.
    #[default]
    #[serde(rename = "drop")]
    Drop,
    /// End the note on the last tick.
    #[serde(rename = "close")]
    CloseAtEnd,
}

/// The output of a scan.
#[derive(Debug, Clone)]
pub struct Scan {
    /// The note intervals in tick order. They never overlap.
    pub notes: Vec<Interval>,
    /// Every tempo change applied during the scan.
    pub tempo_map: TempoMap,
    /// The tick of the last end of track marker.
    pub max_tick: u64,
    pub ticks_per_beat: u16,
}

/// The note currently sounding.
#[derive(Debug, Clone, Copy)]
struct ActiveNote {
    pitch: Pitch,
    start_tick: u64,
    tempo: u32,
}

/// Mutable state for a single scan.
#[derive(Debug)]
struct PlaybackState {
    current_tick: u64,
    active_tempo: u32,
    active_note: Option<ActiveNote>,
}

/// Walks the merged timeline tick by tick, turning note on/off pairs into note intervals
/// while tracking tempo changes.
#[derive(Debug, Clone, Copy)]
pub struct Scanner {
    initial_tempo: u32,
    policy: UnterminatedNotePolicy,
}

impl Default for Scanner {
    fn default() -> Self {
        Scanner::new(DEFAULT_TEMPO, UnterminatedNotePolicy::default())
    }
}

impl Scanner {
    pub fn new(initial_tempo: u32, policy: UnterminatedNotePolicy) -> Scanner {
        Scanner {
            initial_tempo,
            policy,
        }
    }

    /// Scans the merged timeline, consuming both queues.
    ///
    /// At every tick all due control events are handled before any note event, so a tempo
    /// change always applies to a note starting on the same tick. Events on the same tick are
    /// drained completely before the cursor moves on.
    pub fn scan(
        &self,
        merged: MergedTimeline,
        diagnostics: &mut dyn Diagnostics,
    ) -> Result<Scan, TaranisError> {
        let MergedTimeline {
            mut control,
            mut notes,
            ticks_per_beat,
            ..
        } = merged;

        let max_tick = control
            .iter()
            .filter(|timed| timed.event.as_control() == Some(&Control::EndOfTrack))
            .map(|timed| timed.tick)
            .max()
            .ok_or(TaranisError::NoEndOfTrack)?;

        let mut state = PlaybackState {
            current_tick: 0,
            active_tempo: self.initial_tempo,
            active_note: None,
        };
        let mut tempo_map = TempoMap::new(self.initial_tempo);
        let mut intervals: Vec<Interval> = Vec::new();

        while state.current_tick <= max_tick {
            let tick = state.current_tick;

            if let Some(timed) = control.pop_due(tick) {
                handle_control(&mut state, &mut tempo_map, &timed, diagnostics);
                continue;
            }

            if let Some(timed) = notes.pop_due(tick) {
                if let Some(interval) =
                    handle_note(&mut state, &timed, ticks_per_beat, diagnostics)?
                {
                    intervals.push(interval);
                }
                continue;
            }

            // Nothing is due, so skip straight to the next event. Stepping one tick at a time
            // would land in the same place.
            let next = [control.peek_tick(), notes.peek_tick()]
                .into_iter()
                .flatten()
                .min();
            state.current_tick = next
                .filter(|next| *next > tick)
                .unwrap_or(max_tick + 1);
        }

        if let Some(active) = state.active_note.take() {
            let closed = self.policy == UnterminatedNotePolicy::CloseAtEnd;
            diagnostics.report(Diagnostic::UnterminatedNote {
                start_tick: active.start_tick,
                pitch: active.pitch,
                closed,
            });
            if closed {
                intervals.push(Interval::note(
                    active.pitch,
                    active.start_tick,
                    max_tick,
                    active.tempo,
                    ticks_per_beat,
                )?);
            }
        }

        diagnostics.report(Diagnostic::Scanned {
            max_tick,
            notes: intervals.len(),
        });

        Ok(Scan {
            notes: intervals,
            tempo_map,
            max_tick,
            ticks_per_beat,
        })
    }
}

fn handle_control(
    state: &mut PlaybackState,
    tempo_map: &mut TempoMap,
    timed: &TimedEvent,
    diagnostics: &mut dyn Diagnostics,
) {
    let tick = timed.tick;
    match timed.event.as_control() {
        Some(Control::Tempo(tempo)) => {
            state.active_tempo = *tempo;
            tempo_map.record(tick, *tempo);
            diagnostics.report(Diagnostic::TempoChanged {
                tick,
                tempo: *tempo,
            });
        }
        Some(Control::Unknown(label)) => diagnostics.report(Diagnostic::UnknownControl {
            tick,
            label: label.clone(),
        }),
        Some(control) => diagnostics.report(Diagnostic::ControlIgnored {
            tick,
            name: control.name(),
        }),
        None => {}
    }
}

fn handle_note(
    state: &mut PlaybackState,
    timed: &TimedEvent,
    ticks_per_beat: u16,
    diagnostics: &mut dyn Diagnostics,
) -> Result<Option<Interval>, TaranisError> {
    let tick = timed.tick;
    match *timed.event.kind() {
        EventKind::NoteOn { pitch, velocity } if !velocity.is_zero() => {
            match state.active_note {
                Some(active) => diagnostics.report(Diagnostic::NoteDroppedInScan {
                    tick,
                    pitch,
                    reason: Rejection::NoteAlreadyActive {
                        active: active.pitch,
                    },
                }),
                None => {
                    state.active_note = Some(ActiveNote {
                        pitch,
                        start_tick: tick,
                        tempo: state.active_tempo,
                    })
                }
            }
            Ok(None)
        }
        EventKind::NoteOn { pitch, .. } | EventKind::NoteOff { pitch, .. } => {
            match state.active_note {
                Some(active) if active.pitch == pitch => {
                    state.active_note = None;
                    Ok(Some(Interval::note(
                        pitch,
                        active.start_tick,
                        tick,
                        active.tempo,
                        ticks_per_beat,
                    )?))
                }
                active => {
                    diagnostics.report(Diagnostic::NoteDroppedInScan {
                        tick,
                        pitch,
                        reason: Rejection::NoMatchingNote {
                            active: active.map(|active| active.pitch),
                        },
                    });
                    Ok(None)
                }
            }
        }
        EventKind::Control(_) => Ok(None),
    }
}
