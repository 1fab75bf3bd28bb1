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
use crate::diagnostics::{Diagnostic, Diagnostics, Rejection};
use crate::error::TaranisError;
use crate::event::{EventKind, Pitch, TimedEvent};
use crate::queue::EventQueue;
use crate::timeline::Timeline;

/// The result of merging a timeline's tracks onto a single global timeline.
#[derive(Debug, Clone)]
pub struct MergedTimeline {
    /// Every non-note event from every track, by ascending tick.
    pub control: EventQueue,
    /// The accepted note events from the notes track, by ascending tick.
    pub notes: EventQueue,
    /// The index of the track the notes came from.
    pub notes_track: usize,
    pub ticks_per_beat: u16,
}

/// Merges the tracks of a timeline into a control queue and a note queue.
///
/// The first track with a note on event supplies the notes. Notes on any later track are
/// ignored. Note events from the notes track pass through a single voice filter that only
/// lets one note sound at a time, so the note queue always alternates between a note on and
/// its matching note off.
pub fn merge(
    timeline: &Timeline,
    diagnostics: &mut dyn Diagnostics,
) -> Result<MergedTimeline, TaranisError> {
    let tracks = timeline.tracks();
    if tracks.is_empty() {
        return Err(TaranisError::EmptyTimeline);
    }

    let has_note_on = |index: &usize| {
        tracks[*index]
            .iter()
            .any(|event| matches!(event.kind(), EventKind::NoteOn { .. }))
    };
    let notes_track = (0..tracks.len())
        .find(has_note_on)
        .ok_or(TaranisError::NoNotesFound)?;
    diagnostics.report(Diagnostic::NotesTrackSelected { track: notes_track });

    for track in (notes_track + 1..tracks.len()).filter(has_note_on) {
        diagnostics.report(Diagnostic::ConflictingNotesTrack { track, notes_track });
    }

    // Everything else first, the notes track last.
    let order = (0..tracks.len())
        .filter(|index| *index != notes_track)
        .chain(std::iter::once(notes_track));

    let mut control: Vec<TimedEvent> = Vec::new();
    let mut notes: Vec<TimedEvent> = Vec::new();
    for track in order {
        let mut tick: u64 = 0;
        let mut voice = SingleVoice::default();

        for event in tracks[track].iter() {
            tick += u64::from(event.delta_time());
            let timed = TimedEvent {
                tick,
                track,
                event: event.clone(),
            };

            if event.is_control() {
                control.push(timed);
                continue;
            }
            if track != notes_track {
                continue;
            }

            match voice.accept(&timed) {
                Ok(()) => notes.push(timed),
                Err((pitch, reason)) => diagnostics.report(Diagnostic::NoteRejectedInMerge {
                    track,
                    tick,
                    pitch,
                    reason,
                }),
            }
        }
    }

    let merged = MergedTimeline {
        control: EventQueue::from_unsorted(control),
        notes: EventQueue::from_unsorted(notes),
        notes_track,
        ticks_per_beat: timeline.ticks_per_beat(),
    };
    diagnostics.report(Diagnostic::Merged {
        control_events: merged.control.len(),
        note_events: merged.notes.len(),
    });

    Ok(merged)
}

/// Tracks the one note allowed to sound on a track.
#[derive(Debug, Default)]
struct SingleVoice {
    active: Option<Pitch>,
}

impl SingleVoice {
    /// Accepts or rejects a note event, updating the sounding note. A zero velocity note on
    /// counts as a note off.
    fn accept(&mut self, timed: &TimedEvent) -> Result<(), (Pitch, Rejection)> {
        match *timed.event.kind() {
            EventKind::NoteOn { pitch, velocity } if !velocity.is_zero() => match self.active {
                None => {
                    self.active = Some(pitch);
                    Ok(())
                }
                Some(active) => Err((pitch, Rejection::NoteAlreadyActive { active })),
            },
            EventKind::NoteOn { pitch, .. } | EventKind::NoteOff { pitch, .. } => {
                if self.active == Some(pitch) {
                    self.active = None;
                    Ok(())
                } else {
                    Err((
                        pitch,
                        Rejection::NoMatchingNote {
                            active: self.active,
                        },
                    ))
                }
            }
            EventKind::Control(_) => Ok(()),
        }
    }
}
