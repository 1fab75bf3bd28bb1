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
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::TaranisError;
use crate::event::{Control, Event, EventError};
use crate::tempo::bpm_to_tempo;

use super::Timeline;

/// A hand-written timeline. For example:
///
/// ```yaml
/// ticks_per_beat: 96
/// tracks:
///   - - { type: set_tempo, bpm: 100 }
///     - { type: end_of_track, delta: 384 }
///   - - { type: note_on, pitch: 60, velocity: 100 }
///     - { type: note_off, pitch: 60, delta: 96 }
///     - { type: end_of_track }
/// ```
#[derive(Deserialize)]
struct TimelineFile {
    ticks_per_beat: u16,
    #[serde(default)]
    tracks: Vec<Vec<EventEntry>>,
}

/// A single event. Which fields are required depends on the type.
#[derive(Deserialize)]
struct EventEntry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    delta: u32,
    pitch: Option<u8>,
    velocity: Option<u8>,
    tempo: Option<u32>,
    bpm: Option<f64>,
    program: Option<u8>,
    controller: Option<u8>,
    value: Option<u8>,
    name: Option<String>,
    sharps: Option<i8>,
    minor: Option<bool>,
    numerator: Option<u8>,
    /// The note value of a beat (4 for a quarter note), not the power of two stored in
    /// MIDI files.
    denominator: Option<u16>,
    channel: Option<u8>,
    port: Option<u8>,
}

/// Reads a YAML timeline from disk.
pub fn read(path: &Path) -> Result<Timeline, TaranisError> {
    parse(&fs::read_to_string(path)?)
}

/// Parses a YAML timeline.
pub fn parse(contents: &str) -> Result<Timeline, TaranisError> {
    let file: TimelineFile = serde_yml::from_str(contents)?;

    let tracks = file
        .tracks
        .into_iter()
        .enumerate()
        .map(|(track, entries)| {
            entries
                .into_iter()
                .enumerate()
                .map(|(index, entry)| {
                    entry
                        .into_event()
                        .map_err(|source| TaranisError::MalformedEvent {
                            track,
                            index,
                            source,
                        })
                })
                .collect::<Result<Vec<Event>, TaranisError>>()
        })
        .collect::<Result<Vec<Vec<Event>>, TaranisError>>()?;

    Timeline::new(file.ticks_per_beat, tracks)
}

impl EventEntry {
    fn into_event(self) -> Result<Event, EventError> {
        let delta = self.delta;
        let control = match self.kind.as_str() {
            "note_on" => return Event::note(delta, true, self.pitch, self.velocity),
            "note_off" => return Event::note(delta, false, self.pitch, self.velocity),
            "set_tempo" => match (self.tempo, self.bpm) {
                (Some(tempo), _) => Control::Tempo(tempo),
                (None, Some(bpm)) if bpm > 0.0 => Control::Tempo(bpm_to_tempo(bpm)),
                _ => {
                    return Err(EventError::MissingField {
                        kind: "set_tempo",
                        field: "tempo",
                    })
                }
            },
            "program_change" => Control::ProgramChange(required(
                self.program,
                "program_change",
                "program",
            )?),
            "control_change" => Control::ControlChange {
                controller: required(self.controller, "control_change", "controller")?,
                value: required(self.value, "control_change", "value")?,
            },
            "end_of_track" => Control::EndOfTrack,
            "key_signature" => Control::KeySignature {
                sharps: required(self.sharps, "key_signature", "sharps")?,
                minor: required(self.minor, "key_signature", "minor")?,
            },
            "time_signature" => Control::TimeSignature {
                numerator: required(self.numerator, "time_signature", "numerator")?,
                denominator: required(self.denominator, "time_signature", "denominator")?,
            },
            "channel_prefix" => Control::ChannelPrefix(required(
                self.channel,
                "channel_prefix",
                "channel",
            )?),
            "midi_port" => Control::MidiPort(required(self.port, "midi_port", "port")?),
            "track_name" => Control::TrackName(self.name.unwrap_or_default()),
            other => Control::Unknown(other.to_string()),
        };

        Ok(Event::control(delta, control))
    }
}

fn required<T>(value: Option<T>, kind: &'static str, field: &'static str) -> Result<T, EventError> {
    value.ok_or(EventError::MissingField { kind, field })
}
