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
use std::convert::Infallible;
use std::f64::consts::PI;

use crate::interval::{Interval, IntervalError, IntervalKind, DEFAULT_TUNING};
use crate::tempo::TempoMap;

/// The default output sample rate.
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Fills the gaps between note intervals with silence, up to and including `until`.
///
/// A gap between notes is filled only when it spans more than one tick. The tail is always
/// filled, so the last interval ends at `until` or one tick before it. Each silence takes the
/// tempo in force at its first tick. A list with no gaps comes back unchanged.
pub fn insert_silence(
    intervals: Vec<Interval>,
    until: u64,
    tempo_map: &TempoMap,
    ticks_per_beat: u16,
) -> Result<Vec<Interval>, IntervalError> {
    let silence = |start: u64, end: u64| {
        Interval::silence(start, end, tempo_map.tempo_at(start), ticks_per_beat)
    };

    let mut filled = Vec::with_capacity(intervals.len() * 2 + 1);
    let mut cursor: u64 = 0;
    for interval in intervals {
        if interval.start_tick().saturating_sub(cursor) > 1 {
            filled.push(silence(cursor, interval.start_tick())?);
        }
        cursor = interval.end_tick() + 1;
        filled.push(interval);
    }

    if until > cursor {
        filled.push(silence(cursor, until)?);
    }

    Ok(filled)
}

/// Renders intervals as 16-bit square waves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Synthesizer {
    sample_rate: u32,
    tuning: f64,
}

impl Default for Synthesizer {
    fn default() -> Self {
        Synthesizer::new(DEFAULT_SAMPLE_RATE, DEFAULT_TUNING)
    }
}

impl Synthesizer {
    /// Creates a synthesizer for the given sample rate and A4 frequency.
    pub fn new(sample_rate: u32, tuning: f64) -> Synthesizer {
        Synthesizer {
            sample_rate,
            tuning,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// The number of samples an interval renders to.
    ///
    /// Notes are shortened to a whole number of wave periods so they never end on a partial
    /// cycle. Silence is rendered at its full length.
    pub fn sample_count(&self, interval: &Interval) -> usize {
        let duration = interval.duration_seconds();
        let duration = match interval.kind() {
            IntervalKind::Note(_) => {
                let frequency = interval.frequency(self.tuning);
                (duration * frequency).floor() / frequency
            }
            IntervalKind::Silence => duration,
        };

        let duration_ms = duration * 1000.0;
        (duration_ms * (f64::from(self.sample_rate) / 1000.0)).floor() as usize
    }

    /// Renders all intervals into a single buffer.
    pub fn render(&self, intervals: &[Interval]) -> Vec<i16> {
        let total = intervals.iter().map(|i| self.sample_count(i)).sum();
        let mut samples = Vec::with_capacity(total);
        let result: Result<usize, Infallible> = self.render_with(intervals, |sample| {
            samples.push(sample);
            Ok(())
        });
        match result {
            Ok(_) => samples,
            Err(never) => match never {},
        }
    }

    /// Renders intervals one sample at a time into a sink, stopping at the first sink error.
    /// Returns the number of samples rendered.
    pub fn render_with<E, F>(&self, intervals: &[Interval], mut sink: F) -> Result<usize, E>
    where
        F: FnMut(i16) -> Result<(), E>,
    {
        let mut rendered = 0;
        for interval in intervals {
            let count = self.sample_count(interval);
            match interval.kind() {
                IntervalKind::Note(_) => {
                    let frequency = interval.frequency(self.tuning);
                    for index in 0..count {
                        sink(self.square(frequency, index))?;
                    }
                }
                IntervalKind::Silence => {
                    for _ in 0..count {
                        sink(0)?;
                    }
                }
            }
            rendered += count;
        }
        Ok(rendered)
    }

    /// A full scale square wave sample: high while the sine at the same phase is positive,
    /// low otherwise.
    fn square(&self, frequency: f64, index: usize) -> i16 {
        let phase = 2.0 * PI * frequency * (index as f64 / f64::from(self.sample_rate));
        if phase.sin() > 0.0 {
            i16::MAX
        } else {
            i16::MIN
        }
    }
}

#[cfg(test)]
mod test {
    use std::error::Error;

    use crate::event::Pitch;
    use crate::interval::Interval;
    use crate::tempo::{TempoMap, DEFAULT_TEMPO};

    use super::{insert_silence, Synthesizer};

    fn note(pitch: u8, start: u64, end: u64) -> Result<Interval, Box<dyn Error>> {
        Ok(Interval::note(
            Pitch::new(pitch)?,
            start,
            end,
            DEFAULT_TEMPO,
            96,
        )?)
    }

    #[test]
    fn trailing_silence() -> Result<(), Box<dyn Error>> {
        let filled = insert_silence(vec![note(60, 0, 50)?], 100, &TempoMap::default(), 96)?;
        assert_eq!(
            vec![
                note(60, 0, 50)?,
                Interval::silence(51, 100, DEFAULT_TEMPO, 96)?
            ],
            filled
        );
        Ok(())
    }

    #[test]
    fn short_tail_is_still_filled() -> Result<(), Box<dyn Error>> {
        let filled = insert_silence(vec![note(60, 0, 98)?], 100, &TempoMap::default(), 96)?;
        assert_eq!(
            vec![
                note(60, 0, 98)?,
                Interval::silence(99, 100, DEFAULT_TEMPO, 96)?
            ],
            filled
        );

        // Ending one tick short leaves nothing to fill.
        let filled = insert_silence(vec![note(60, 0, 99)?], 100, &TempoMap::default(), 96)?;
        assert_eq!(vec![note(60, 0, 99)?], filled);
        Ok(())
    }

    #[test]
    fn gaps_become_silence() -> Result<(), Box<dyn Error>> {
        let mut tempo_map = TempoMap::default();
        tempo_map.record(30, 250_000);

        let filled = insert_silence(
            vec![note(60, 10, 20)?, note(62, 40, 50)?, note(64, 52, 60)?],
            60,
            &tempo_map,
            96,
        )?;
        assert_eq!(
            vec![
                Interval::silence(0, 10, DEFAULT_TEMPO, 96)?,
                note(60, 10, 20)?,
                Interval::silence(21, 40, DEFAULT_TEMPO, 96)?,
                note(62, 40, 50)?,
                // One tick gap, no silence.
                note(64, 52, 60)?,
            ],
            filled
        );

        let filled = insert_silence(vec![note(60, 0, 10)?], 60, &tempo_map, 96)?;
        assert_eq!(Interval::silence(11, 60, DEFAULT_TEMPO, 96)?, filled[1]);
        let filled = insert_silence(vec![note(60, 0, 40)?], 60, &tempo_map, 96)?;
        assert_eq!(Interval::silence(41, 60, 250_000, 96)?, filled[1]);
        Ok(())
    }

    #[test]
    fn contiguous_list_is_unchanged() -> Result<(), Box<dyn Error>> {
        let intervals = vec![
            note(60, 0, 10)?,
            Interval::silence(11, 30, DEFAULT_TEMPO, 96)?,
            note(62, 31, 31)?,
            note(64, 32, 90)?,
        ];
        let filled = insert_silence(intervals.clone(), 90, &TempoMap::default(), 96)?;
        assert_eq!(intervals, filled);

        let again = insert_silence(filled.clone(), 90, &TempoMap::default(), 96)?;
        assert_eq!(filled, again);
        Ok(())
    }

    #[test]
    fn note_sample_count_is_whole_periods() -> Result<(), Box<dyn Error>> {
        let synth = Synthesizer::default();

        // Half a second of A4 is exactly 220 periods.
        assert_eq!(22_050, synth.sample_count(&note(69, 0, 96)?));

        // Half a second of middle C is not, so the note is cut short.
        let c4 = note(60, 0, 96)?;
        let naive = (c4.duration_seconds() * 44_100.0).floor() as usize;
        let count = synth.sample_count(&c4);
        assert!(count > 0 && count < naive);
        let period_samples = (44_100.0 / c4.frequency(440.0)).ceil() as usize;
        assert!(naive - count <= period_samples);

        // The lowest note doesn't fit a single period in a tick.
        assert_eq!(0, synth.sample_count(&note(0, 0, 1)?));
        assert_eq!(0, synth.sample_count(&note(69, 5, 5)?));
        Ok(())
    }

    #[test]
    fn silence_sample_count() -> Result<(), Box<dyn Error>> {
        let synth = Synthesizer::new(48_000, 440.0);
        assert_eq!(
            24_000,
            synth.sample_count(&Interval::silence(0, 96, DEFAULT_TEMPO, 96)?)
        );
        assert_eq!(
            48_000,
            synth.sample_count(&Interval::silence(0, 96, 1_000_000, 96)?)
        );
        Ok(())
    }

    #[test]
    fn amplitudes() -> Result<(), Box<dyn Error>> {
        let synth = Synthesizer::default();
        let intervals = vec![
            note(69, 0, 20)?,
            Interval::silence(21, 40, DEFAULT_TEMPO, 96)?,
            note(45, 41, 90)?,
        ];
        let samples = synth.render(&intervals);

        let note_samples = synth.sample_count(&intervals[0]);
        let silence_samples = synth.sample_count(&intervals[1]);
        assert_eq!(
            intervals.iter().map(|i| synth.sample_count(i)).sum::<usize>(),
            samples.len()
        );

        let (first, rest) = samples.split_at(note_samples);
        let (silence, last) = rest.split_at(silence_samples);
        assert!(first.iter().all(|s| *s == i16::MAX || *s == i16::MIN));
        assert!(last.iter().all(|s| *s == i16::MAX || *s == i16::MIN));
        assert!(silence.iter().all(|s| *s == 0));

        // Sine is zero at the start of each note, so the square wave starts low and then
        // spends both halves of its period at the extremes.
        assert_eq!(i16::MIN, first[0]);
        assert_eq!(i16::MAX, first[1]);
        assert!(first.contains(&i16::MIN) && first.contains(&i16::MAX));
        Ok(())
    }

    #[test]
    fn sink_errors_stop_rendering() -> Result<(), Box<dyn Error>> {
        let synth = Synthesizer::default();
        let mut seen = 0;
        let result = synth.render_with(&[note(69, 0, 96)?], |_| {
            seen += 1;
            if seen == 10 {
                Err("full")
            } else {
                Ok(())
            }
        });
        assert_eq!(Err("full"), result);
        assert_eq!(10, seen);
        Ok(())
    }
}
