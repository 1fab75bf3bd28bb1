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
use std::error::Error;
use std::path::PathBuf;

use clap::{crate_version, ArgAction, Parser};
use tracing_subscriber::EnvFilter;

use taranis::config::Settings;
use taranis::diagnostics::TracingDiagnostics;
use taranis::pipeline;
use taranis::scan::UnterminatedNotePolicy;
use taranis::timeline::Timeline;

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "Translates a MIDI file into a square wave WAV file."
)]
struct Cli {
    /// The MIDI file (or YAML timeline) to translate.
    input_file: PathBuf,
    /// Increases logging verbosity. Can be repeated.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
    /// The WAV file to write. Defaults to the input file with a .wav extension.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// A settings file to load.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// The output sample rate, overriding the settings file.
    #[arg(long)]
    sample_rate: Option<u32>,
    /// The frequency of A4 in Hz, overriding the settings file.
    #[arg(long)]
    tuning: Option<f64>,
    /// End notes that are still sounding at the end of the song instead of dropping them.
    #[arg(long)]
    close_unterminated: bool,
    /// Print the note and rest intervals instead of writing audio.
    #[arg(long)]
    list_intervals: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(sample_rate) = cli.sample_rate {
        settings.sample_rate = sample_rate;
    }
    if let Some(tuning) = cli.tuning {
        settings.tuning = tuning;
    }
    if cli.close_unterminated {
        settings.unterminated_notes = UnterminatedNotePolicy::CloseAtEnd;
    }

    let input = cli.input_file.canonicalize()?;
    let mut diagnostics = TracingDiagnostics;

    if cli.list_intervals {
        let timeline = Timeline::read(&input)?;
        let intervals = pipeline::intervals(&timeline, &settings, &mut diagnostics)?;
        println!("Intervals (count: {}):", intervals.len());
        for line in pipeline::listing(&intervals, &settings) {
            println!("{}", line);
        }
        return Ok(());
    }

    let output = cli
        .output
        .unwrap_or_else(|| input.with_extension("wav"));
    let summary = pipeline::convert_file(&input, &output, &settings, &mut diagnostics)?;
    println!(
        "Wrote {} ({} intervals, {:.3}s).",
        output.display(),
        summary.intervals,
        summary.duration.as_secs_f64()
    );

    Ok(())
}
