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

/// The highest valid MIDI note number or velocity.
pub const MAX_DATA_VALUE: u8 = 127;

/// Errors raised when an event is constructed with invalid or missing fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventError {
    #[error("{kind} event is missing required field '{field}'")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },

    #[error("pitch {0} is outside of the range 0-127")]
    PitchOutOfRange(u8),

    #[error("velocity {0} is outside of the range 0-127")]
    VelocityOutOfRange(u8),
}

/// A MIDI note number in the range 0-127.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pitch(u8);

impl Pitch {
    /// Creates a new pitch, failing if the note number is out of range.
    pub fn new(note_number: u8) -> Result<Pitch, EventError> {
        if note_number > MAX_DATA_VALUE {
            return Err(EventError::PitchOutOfRange(note_number));
        }
        Ok(Pitch(note_number))
    }

    /// Gets the MIDI note number.
    pub fn as_int(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A note velocity in the range 0-127.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Velocity(u8);

impl Velocity {
    /// Creates a new velocity, failing if the value is out of range.
    pub fn new(velocity: u8) -> Result<Velocity, EventError> {
        if velocity > MAX_DATA_VALUE {
            return Err(EventError::VelocityOutOfRange(velocity));
        }
        Ok(Velocity(velocity))
    }

    pub fn as_int(&self) -> u8 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

/// Control and meta events. Only tempo changes and end of track markers affect rendering,
/// the rest are carried through for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    /// A tempo change, in microseconds per beat.
    Tempo(u32),
    ProgramChange(u8),
    ControlChange { controller: u8, value: u8 },
    EndOfTrack,
    KeySignature { sharps: i8, minor: bool },
    TimeSignature { numerator: u8, denominator: u16 },
    TrackName(String),
    ChannelPrefix(u8),
    MidiPort(u8),
    /// Anything else. The label describes the original event.
    Unknown(String),
}

impl Control {
    /// The short name of the control event, used for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Control::Tempo(_) => "set_tempo",
            Control::ProgramChange(_) => "program_change",
            Control::ControlChange { .. } => "control_change",
            Control::EndOfTrack => "end_of_track",
            Control::KeySignature { .. } => "key_signature",
            Control::TimeSignature { .. } => "time_signature",
            Control::TrackName(_) => "track_name",
            Control::ChannelPrefix(_) => "channel_prefix",
            Control::MidiPort(_) => "midi_port",
            Control::Unknown(_) => "unknown",
        }
    }
}

/// The kind of an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    NoteOn { pitch: Pitch, velocity: Velocity },
    NoteOff { pitch: Pitch, velocity: Velocity },
    Control(Control),
}

/// A single event as read from a track: its kind plus the number of ticks since the
/// previous event on the same track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    delta_time: u32,
    kind: EventKind,
}

impl Event {
    /// Creates a note on event.
    pub fn note_on(delta_time: u32, pitch: u8, velocity: u8) -> Result<Event, EventError> {
        Ok(Event {
            delta_time,
            kind: EventKind::NoteOn {
                pitch: Pitch::new(pitch)?,
                velocity: Velocity::new(velocity)?,
            },
        })
    }

    /// Creates a note off event.
    pub fn note_off(delta_time: u32, pitch: u8, velocity: u8) -> Result<Event, EventError> {
        Ok(Event {
            delta_time,
            kind: EventKind::NoteOff {
                pitch: Pitch::new(pitch)?,
                velocity: Velocity::new(velocity)?,
            },
        })
    }

    /// Creates a note event from fields that may be absent, as found in loosely structured
    /// input. A missing pitch is an error, a missing velocity defaults to 64 for note off
    /// and is an error for note on.
    pub fn note(
        delta_time: u32,
        on: bool,
        pitch: Option<u8>,
        velocity: Option<u8>,
    ) -> Result<Event, EventError> {
        let kind = if on { "note_on" } else { "note_off" };
        let pitch = pitch.ok_or(EventError::MissingField {
            kind,
            field: "pitch",
        })?;

        if on {
            let velocity = velocity.ok_or(EventError::MissingField {
                kind,
                field: "velocity",
            })?;
            Event::note_on(delta_time, pitch, velocity)
        } else {
            Event::note_off(delta_time, pitch, velocity.unwrap_or(64))
        }
    }

    /// Creates a control or meta event.
    pub fn control(delta_time: u32, control: Control) -> Event {
        Event {
            delta_time,
            kind: EventKind::Control(control),
        }
    }

    /// Ticks since the previous event on the same track.
    pub fn delta_time(&self) -> u32 {
        self.delta_time
    }

    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    /// True for note on and note off events.
    pub fn is_note(&self) -> bool {
        matches!(
            self.kind,
            EventKind::NoteOn { .. } | EventKind::NoteOff { .. }
        )
    }

    /// True for everything that isn't a note event.
    pub fn is_control(&self) -> bool {
        !self.is_note()
    }

    /// True only for a note on with a non-zero velocity.
    pub fn is_sounding_note_on(&self) -> bool {
        matches!(self.kind, EventKind::NoteOn { velocity, .. } if !velocity.is_zero())
    }

    /// The pitch of a note event.
    pub fn pitch(&self) -> Option<Pitch> {
        match self.kind {
            EventKind::NoteOn { pitch, .. } | EventKind::NoteOff { pitch, .. } => Some(pitch),
            EventKind::Control(_) => None,
        }
    }

    /// The velocity of a note event.
    pub fn velocity(&self) -> Option<Velocity> {
        match self.kind {
            EventKind::NoteOn { velocity, .. } | EventKind::NoteOff { velocity, .. } => {
                Some(velocity)
            }
            EventKind::Control(_) => None,
        }
    }

    /// The control payload of a control event.
    pub fn as_control(&self) -> Option<&Control> {
        match &self.kind {
            EventKind::Control(control) => Some(control),
            _ => None,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            EventKind::NoteOn { pitch, velocity } => write!(
                f,
                "note_on pitch={} velocity={} delta={}",
                pitch,
                velocity.as_int(),
                self.delta_time
            ),
            EventKind::NoteOff { pitch, velocity } => write!(
                f,
                "note_off pitch={} velocity={} delta={}",
                pitch,
                velocity.as_int(),
                self.delta_time
            ),
            EventKind::Control(control) => {
                write!(f, "{} delta={}", control.name(), self.delta_time)
            }
        }
    }
}

/// An event placed on the global timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedEvent {
    /// The absolute tick of the event, the running sum of the deltas on its track.
    pub tick: u64,
    /// The index of the track the event came from.
    pub track: usize,
    pub event: Event,
}
