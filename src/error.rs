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
use crate::event::EventError;
use crate::interval::IntervalError;

/// Errors that abort a conversion. Per-event anomalies found while merging or scanning
/// never surface here; they are reported through [`crate::diagnostics::Diagnostics`].
#[derive(Debug, thiserror::Error)]
pub enum TaranisError {
    #[error("the timeline has no tracks")]
    EmptyTimeline,

    #[error("no track contains a note on event")]
    NoNotesFound,

    #[error("no track contains an end of track marker")]
    NoEndOfTrack,

    #[error("malformed event {index} on track {track}: {source}")]
    MalformedEvent {
        track: usize,
        index: usize,
        #[source]
        source: EventError,
    },

    #[error("invalid interval: {0}")]
    Interval(#[from] IntervalError),

    #[error("unsupported MIDI timing: {0}")]
    UnsupportedTiming(String),

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("MIDI parse error: {0}")]
    Midi(#[from] midly::Error),

    #[error("timeline parse error: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("config load/parse error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
