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

/// Microseconds per beat for 120 BPM, the MIDI default when no tempo is set.
pub const DEFAULT_TEMPO: u32 = 500_000;

const MICROSECONDS_PER_SECOND: f64 = 1_000_000.0;
const MICROSECONDS_PER_MINUTE: f64 = 60_000_000.0;

/// Converts beats per minute to microseconds per beat.
pub fn bpm_to_tempo(bpm: f64) -> u32 {
    (MICROSECONDS_PER_MINUTE / bpm).round() as u32
}

/// Converts a tick count to seconds at the given tempo.
pub fn ticks_to_seconds(ticks: u64, tempo: u32, ticks_per_beat: u16) -> f64 {
    ticks as f64 * (f64::from(tempo) / MICROSECONDS_PER_SECOND) / f64::from(ticks_per_beat)
}

/// The tempo changes seen during a scan, in tick order.
#[derive(Debug, Clone, PartialEq)]
pub struct TempoMap {
    initial_tempo: u32,
    changes: Vec<(u64, u32)>,
}

impl TempoMap {
    pub fn new(initial_tempo: u32) -> TempoMap {
        TempoMap {
            initial_tempo,
            changes: Vec::new(),
        }
    }

    /// Records a tempo change. Changes must be recorded in tick order; a later change on
    /// the same tick wins.
    pub fn record(&mut self, tick: u64, tempo: u32) {
        self.changes.push((tick, tempo));
    }

    /// The tempo in force at the given tick.
    pub fn tempo_at(&self, tick: u64) -> u32 {
        let pos = self.changes.partition_point(|(change_tick, _)| *change_tick <= tick);
        if pos == 0 {
            self.initial_tempo
        } else {
            self.changes[pos - 1].1
        }
    }
}

impl Default for TempoMap {
    fn default() -> Self {
        TempoMap::new(DEFAULT_TEMPO)
    }
}
