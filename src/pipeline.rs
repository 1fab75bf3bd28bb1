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
use std::time::Duration;

use tracing::{info, span, Level};

use crate::config::Settings;
use crate::diagnostics::Diagnostics;
use crate::error::TaranisError;
use crate::interval::Interval;
use crate::merge::merge;
use crate::scan::Scanner;
use crate::synth::{insert_silence, Synthesizer};
use crate::timeline::Timeline;
use crate::wav;

/// A rendered timeline.
#[derive(Debug, Clone)]
pub struct Rendering {
    /// The contiguous note and silence intervals, starting at tick 0.
    pub intervals: Vec<Interval>,
    pub samples: Vec<i16>,
    pub sample_rate: u32,
}

/// What was written by [`convert_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub intervals: usize,
    pub samples: usize,
    pub duration: Duration,
}

/// Merges and scans the timeline, then fills the gaps with silence.
pub fn intervals(
    timeline: &Timeline,
    settings: &Settings,
    diagnostics: &mut dyn Diagnostics,
) -> Result<Vec<Interval>, TaranisError> {
    settings.validate()?;

    let merged = merge(timeline, diagnostics)?;
    let scan = Scanner::new(settings.initial_tempo, settings.unterminated_notes)
        .scan(merged, diagnostics)?;

    Ok(insert_silence(
        scan.notes,
        scan.max_tick,
        &scan.tempo_map,
        scan.ticks_per_beat,
    )?)
}

/// One line per interval, with note frequencies at the configured tuning.
pub fn listing(intervals: &[Interval], settings: &Settings) -> Vec<String> {
    intervals
        .iter()
        .map(|interval| format!("- {}", interval.display(settings.tuning)))
        .collect()
}

/// Converts a timeline to samples in memory.
pub fn convert(
    timeline: &Timeline,
    settings: &Settings,
    diagnostics: &mut dyn Diagnostics,
) -> Result<Rendering, TaranisError> {
    let intervals = intervals(timeline, settings, diagnostics)?;
    let samples = Synthesizer::new(settings.sample_rate, settings.tuning).render(&intervals);

    Ok(Rendering {
        intervals,
        samples,
        sample_rate: settings.sample_rate,
    })
}

/// Reads a timeline file and writes it out as a WAV file, streaming the samples.
pub fn convert_file(
    input: &Path,
    output: &Path,
    settings: &Settings,
    diagnostics: &mut dyn Diagnostics,
) -> Result<Summary, TaranisError> {
    let span = span!(Level::INFO, "convert", input = input.display().to_string());
    let _enter = span.enter();

    let timeline = Timeline::read(input)?;
    let intervals = intervals(&timeline, settings, diagnostics)?;
    let synthesizer = Synthesizer::new(settings.sample_rate, settings.tuning);
    let samples = wav::render_to_file(output, &synthesizer, &intervals)?;

    let summary = Summary {
        intervals: intervals.len(),
        samples,
        duration: duration(samples, settings.sample_rate),
    };
    info!(
        intervals = summary.intervals,
        samples = summary.samples,
        duration = format!("{:.3}s", summary.duration.as_secs_f64()),
        "Conversion finished."
    );
    Ok(summary)
}

fn duration(samples: usize, sample_rate: u32) -> Duration {
    Duration::from_secs_f64(samples as f64 / f64::from(sample_rate))
}
