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

use crate::event::Pitch;
use crate::tempo::ticks_to_seconds;

/// The reference frequency of A4 in Hz.
pub const DEFAULT_TUNING: f64 = 440.0;

/// The MIDI note number of A4.
const A4: i32 = 69;

/// Converts a MIDI pitch to a frequency in Hz given the frequency of A4.
pub fn frequency(pitch: Pitch, tuning: f64) -> f64 {
    2f64.powf(f64::from(i32::from(pitch.as_int()) - A4) / 12.0) * tuning
}

/// Whether an interval sounds a note or is silent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalKind {
    Note(Pitch),
    Silence,
}

/// A span of ticks that either sounds a single note or is silent. The tempo in force when the
/// interval was created travels with it, so later tempo changes never alter its length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    kind: IntervalKind,
    start_tick: u64,
    end_tick: u64,
    tempo: u32,
    ticks_per_beat: u16,
}

/// Errors raised when an interval is constructed with an invalid span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IntervalError {
    #[error("interval ends at tick {end_tick}, before its start at tick {start_tick}")]
    EndBeforeStart { start_tick: u64, end_tick: u64 },
}

impl Interval {
    /// Creates a note interval. Fails if the end precedes the start.
    pub fn note(
        pitch: Pitch,
        start_tick: u64,
        end_tick: u64,
        tempo: u32,
        ticks_per_beat: u16,
    ) -> Result<Interval, IntervalError> {
        Interval::new(
            IntervalKind::Note(pitch),
            start_tick,
            end_tick,
            tempo,
            ticks_per_beat,
        )
    }

    /// Creates a silent interval. Fails if the end precedes the start.
    pub fn silence(
        start_tick: u64,
        end_tick: u64,
        tempo: u32,
        ticks_per_beat: u16,
    ) -> Result<Interval, IntervalError> {
        Interval::new(
            IntervalKind::Silence,
            start_tick,
            end_tick,
            tempo,
            ticks_per_beat,
        )
    }

    fn new(
        kind: IntervalKind,
        start_tick: u64,
        end_tick: u64,
        tempo: u32,
        ticks_per_beat: u16,
    ) -> Result<Interval, IntervalError> {
        if end_tick < start_tick {
            return Err(IntervalError::EndBeforeStart {
                start_tick,
                end_tick,
            });
        }

        Ok(Interval {
            kind,
            start_tick,
            end_tick,
            tempo,
            ticks_per_beat,
        })
    }

    pub fn kind(&self) -> IntervalKind {
        self.kind
    }

    pub fn pitch(&self) -> Option<Pitch> {
        match self.kind {
            IntervalKind::Note(pitch) => Some(pitch),
            IntervalKind::Silence => None,
        }
    }

    pub fn is_silence(&self) -> bool {
        self.kind == IntervalKind::Silence
    }

    pub fn start_tick(&self) -> u64 {
        self.start_tick
    }

    pub fn end_tick(&self) -> u64 {
        self.end_tick
    }

    /// The tempo captured when the interval was created, in microseconds per beat.
    pub fn tempo(&self) -> u32 {
        self.tempo
    }

    pub fn ticks_per_beat(&self) -> u16 {
        self.ticks_per_beat
    }

    /// The length of the interval in ticks.
    pub fn duration_ticks(&self) -> u64 {
        self.end_tick - self.start_tick
    }

    /// The length of the interval in seconds at its captured tempo.
    pub fn duration_seconds(&self) -> f64 {
        ticks_to_seconds(self.duration_ticks(), self.tempo, self.ticks_per_beat)
    }

    /// The frequency of the interval, zero for silence.
    pub fn frequency(&self, tuning: f64) -> f64 {
        match self.kind {
            IntervalKind::Note(pitch) => frequency(pitch, tuning),
            IntervalKind::Silence => 0.0,
        }
    }

    /// Formats the interval for listing, with note frequencies worked out from the given A4
    /// frequency.
    pub fn display(&self, tuning: f64) -> IntervalDisplay<'_> {
        IntervalDisplay {
            interval: self,
            tuning,
        }
    }
}

/// Formats an interval at a particular tuning. See [`Interval::display`].
pub struct IntervalDisplay<'a> {
    interval: &'a Interval,
    tuning: f64,
}

impl fmt::Display for IntervalDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interval = self.interval;
        match interval.kind {
            IntervalKind::Note(pitch) => write!(
                f,
                "Note {} [{}, {}] {:.2} Hz",
                pitch,
                interval.start_tick,
                interval.end_tick,
                frequency(pitch, self.tuning)
            ),
            IntervalKind::Silence => write!(
                f,
                "Rest [{}, {}]",
                interval.start_tick, interval.end_tick
            ),
        }
    }
}

#[cfg(test)]
mod test {
    use std::error::Error;

    use crate::event::Pitch;
    use crate::tempo::DEFAULT_TEMPO;

    use super::{frequency, Interval, IntervalError, DEFAULT_TUNING};

    #[test]
    fn frequency_mapping() -> Result<(), Box<dyn Error>> {
        assert_eq!(440.0, frequency(Pitch::new(69)?, DEFAULT_TUNING));
        assert!((frequency(Pitch::new(57)?, DEFAULT_TUNING) - 220.0).abs() < 1e-9);
        assert!((frequency(Pitch::new(81)?, DEFAULT_TUNING) - 880.0).abs() < 1e-9);
        assert!((frequency(Pitch::new(60)?, DEFAULT_TUNING) - 261.625_565_300_6).abs() < 1e-6);

        let lowest = frequency(Pitch::new(0)?, DEFAULT_TUNING);
        assert!(lowest > 8.0 && lowest < 8.2);

        assert!((frequency(Pitch::new(69)?, 432.0) - 432.0).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn durations() -> Result<(), Box<dyn Error>> {
        let note = Interval::note(Pitch::new(60)?, 0, 96, DEFAULT_TEMPO, 96)?;
        assert_eq!(96, note.duration_ticks());
        assert!((note.duration_seconds() - 0.5).abs() < 1e-12);
        assert_eq!(Some(Pitch::new(60)?), note.pitch());

        let instant = Interval::note(Pitch::new(60)?, 10, 10, DEFAULT_TEMPO, 96)?;
        assert_eq!(0, instant.duration_ticks());
        assert_eq!(0.0, instant.duration_seconds());

        let silence = Interval::silence(51, 100, 1_000_000, 96)?;
        assert!(silence.is_silence());
        assert_eq!(0.0, silence.frequency(DEFAULT_TUNING));
        assert_eq!(49, silence.duration_ticks());
        Ok(())
    }

    #[test]
    fn end_before_start_is_rejected() -> Result<(), Box<dyn Error>> {
        assert_eq!(
            Err(IntervalError::EndBeforeStart {
                start_tick: 50,
                end_tick: 10
            }),
            Interval::note(Pitch::new(60)?, 50, 10, DEFAULT_TEMPO, 96)
        );
        assert_eq!(
            Err(IntervalError::EndBeforeStart {
                start_tick: 11,
                end_tick: 10
            }),
            Interval::silence(11, 10, DEFAULT_TEMPO, 96)
        );
        Ok(())
    }

    #[test]
    fn display() -> Result<(), Box<dyn Error>> {
        let note = Interval::note(Pitch::new(69)?, 0, 50, DEFAULT_TEMPO, 96)?;
        assert_eq!(
            "Note 69 [0, 50] 440.00 Hz",
            note.display(DEFAULT_TUNING).to_string()
        );
        assert_eq!("Note 69 [0, 50] 432.00 Hz", note.display(432.0).to_string());
        assert_eq!(
            "Rest [51, 100]",
            Interval::silence(51, 100, DEFAULT_TEMPO, 96)?
                .display(432.0)
                .to_string()
        );
        Ok(())
    }
}
