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
use std::path::Path;

use tracing::{debug, info};

use crate::error::TaranisError;
use crate::event::Event;

pub mod smf;
pub mod yaml;

/// A symbolic timeline: the tracks of events in file order, each event holding the number of
/// ticks since the previous event on its track.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    ticks_per_beat: u16,
    tracks: Vec<Vec<Event>>,
}

impl Timeline {
    /// Creates a new timeline. Ticks per beat must be positive.
    pub fn new(ticks_per_beat: u16, tracks: Vec<Vec<Event>>) -> Result<Timeline, TaranisError> {
        if ticks_per_beat == 0 {
            return Err(TaranisError::UnsupportedTiming(
                "ticks per beat must be positive".to_string(),
            ));
        }

        Ok(Timeline {
            ticks_per_beat,
            tracks,
        })
    }

    /// Reads a timeline from disk. YAML files are read as hand-written timelines, anything
    /// else as a standard MIDI file.
    pub fn read(path: &Path) -> Result<Timeline, TaranisError> {
        let is_yaml = path
            .extension()
            .is_some_and(|ext| ext == "yaml" || ext == "yml");

        let timeline = if is_yaml {
            yaml::read(path)?
        } else {
            smf::read(path)?
        };

        info!(
            file = path.display().to_string(),
            tracks = timeline.tracks.len(),
            ticks_per_beat = timeline.ticks_per_beat,
            "Read timeline."
        );
        for (index, track) in timeline.tracks.iter().enumerate() {
            debug!(track = index, events = track.len(), "Track loaded.");
        }

        Ok(timeline)
    }

    pub fn ticks_per_beat(&self) -> u16 {
        self.ticks_per_beat
    }

    pub fn tracks(&self) -> &[Vec<Event>] {
        &self.tracks
    }
}
