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
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use taranis::event::Pitch;
use taranis::interval::Interval;
use taranis::synth::Synthesizer;
use taranis::tempo::DEFAULT_TEMPO;

const TICKS_PER_BEAT: u16 = 480;

/// A scale of quarter notes separated by eighth rests.
fn generate_intervals(beats: u64) -> Vec<Interval> {
    let quarter = u64::from(TICKS_PER_BEAT);
    let eighth = quarter / 2;

    let mut intervals = Vec::new();
    let mut tick = 0;
    for beat in 0..beats {
        let pitch = Pitch::new(48 + (beat % 24) as u8).expect("pitch in range");
        let note = Interval::note(pitch, tick, tick + quarter, DEFAULT_TEMPO, TICKS_PER_BEAT)
            .expect("note ends after it starts");
        intervals.push(note);
        tick += quarter + 1;
        let rest = Interval::silence(tick, tick + eighth, DEFAULT_TEMPO, TICKS_PER_BEAT)
            .expect("rest ends after it starts");
        intervals.push(rest);
        tick += eighth + 1;
    }
    intervals
}

fn benchmark_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    for sample_rate in [22_050, 44_100, 96_000] {
        let synth = Synthesizer::new(sample_rate, 440.0);
        let intervals = generate_intervals(64);

        group.bench_with_input(
            BenchmarkId::new("buffered", sample_rate),
            &intervals,
            |b, intervals| b.iter(|| black_box(synth.render(black_box(intervals)))),
        );

        group.bench_with_input(
            BenchmarkId::new("streamed", sample_rate),
            &intervals,
            |b, intervals| {
                b.iter(|| {
                    let mut sum: i64 = 0;
                    let result: Result<usize, ()> = synth.render_with(black_box(intervals), |s| {
                        sum += i64::from(s);
                        Ok(())
                    });
                    black_box((result, sum))
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, benchmark_render);
criterion_main!(benches);
