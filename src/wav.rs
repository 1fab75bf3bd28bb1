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
use std::io::{Seek, Write};
use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};
use tracing::info;

use crate::error::TaranisError;
use crate::interval::Interval;
use crate::synth::Synthesizer;

/// The format of every file we write: mono, 16-bit signed PCM.
pub fn spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

/// Renders intervals straight into a WAV file without holding the whole buffer in memory.
/// Returns the number of samples written.
pub fn render_to_file(
    path: &Path,
    synthesizer: &Synthesizer,
    intervals: &[Interval],
) -> Result<usize, TaranisError> {
    let writer = WavWriter::create(path, spec(synthesizer.sample_rate()))?;
    let written = render_to_writer(writer, synthesizer, intervals)?;
    info!(
        file = path.display().to_string(),
        samples = written,
        "Wrote WAV file."
    );
    Ok(written)
}

fn render_to_writer<W: Write + Seek>(
    mut writer: WavWriter<W>,
    synthesizer: &Synthesizer,
    intervals: &[Interval],
) -> Result<usize, TaranisError> {
    let written = synthesizer.render_with(intervals, |sample| writer.write_sample(sample))?;
    writer.finalize()?;
    Ok(written)
}
