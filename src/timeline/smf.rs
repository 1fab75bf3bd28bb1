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
use std::fs;
use std::path::Path;

use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};

use crate::error::TaranisError;
use crate::event::{Control, Event, EventError};

use super::Timeline;

/// Reads a standard MIDI file.
pub fn read(path: &Path) -> Result<Timeline, TaranisError> {
    let buf: Vec<u8> = fs::read(path)?;
    parse(&buf)
}

/// Parses a standard MIDI file held in memory. Only metrical timing is supported, as
/// time code timing has no notion of ticks per beat.
pub fn parse(buf: &[u8]) -> Result<Timeline, TaranisError> {
    let smf = Smf::parse(buf)?;
    let ticks_per_beat = match smf.header.timing {
        Timing::Metrical(ticks_per_beat) => ticks_per_beat.as_int(),
        Timing::Timecode(fps, subframes) => {
            return Err(TaranisError::UnsupportedTiming(format!(
                "SMPTE time code ({} fps, {} subframes per frame)",
                fps.as_int(),
                subframes
            )))
        }
    };

    let tracks = smf
        .tracks
        .iter()
        .enumerate()
        .map(|(track, events)| {
            events
                .iter()
                .enumerate()
                .map(|(index, event)| {
                    to_event(event).map_err(|source| TaranisError::MalformedEvent {
                        track,
                        index,
                        source,
                    })
                })
                .collect::<Result<Vec<Event>, TaranisError>>()
        })
        .collect::<Result<Vec<Vec<Event>>, TaranisError>>()?;

    Timeline::new(ticks_per_beat, tracks)
}

fn to_event(event: &TrackEvent) -> Result<Event, EventError> {
    let delta = event.delta.as_int();
    match event.kind {
        TrackEventKind::Midi { message, .. } => match message {
            MidiMessage::NoteOn { key, vel } => Event::note_on(delta, key.as_int(), vel.as_int()),
            MidiMessage::NoteOff { key, vel } => {
                Event::note_off(delta, key.as_int(), vel.as_int())
            }
            MidiMessage::ProgramChange { program } => Ok(Event::control(
                delta,
                Control::ProgramChange(program.as_int()),
            )),
            MidiMessage::Controller { controller, value } => Ok(Event::control(
                delta,
                Control::ControlChange {
                    controller: controller.as_int(),
                    value: value.as_int(),
                },
            )),
            other => Ok(Event::control(
                delta,
                Control::Unknown(format!("{:?}", other)),
            )),
        },
        TrackEventKind::Meta(meta) => Ok(Event::control(delta, to_control(meta))),
        TrackEventKind::SysEx(_) => Ok(Event::control(delta, Control::Unknown("sysex".into()))),
        TrackEventKind::Escape(_) => {
            Ok(Event::control(delta, Control::Unknown("escape".into())))
        }
    }
}

fn to_control(meta: MetaMessage) -> Control {
    match meta {
        MetaMessage::Tempo(tempo) => Control::Tempo(tempo.as_int()),
        MetaMessage::EndOfTrack => Control::EndOfTrack,
        MetaMessage::KeySignature(sharps, minor) => Control::KeySignature { sharps, minor },
        MetaMessage::TimeSignature(numerator, denominator_power, _, _) => {
            Control::TimeSignature {
                numerator,
                denominator: 1u16 << denominator_power.min(15),
            }
        }
        MetaMessage::TrackName(name) => Control::TrackName(String::from_utf8_lossy(name).into()),
        MetaMessage::MidiChannel(channel) => Control::ChannelPrefix(channel.as_int()),
        MetaMessage::MidiPort(port) => Control::MidiPort(port.as_int()),
        other => Control::Unknown(format!("{:?}", other)),
    }
}

#[cfg(test)]
mod test {
    use std::error::Error;

    use midly::num::{u15, u24, u28, u4, u7};
    use midly::{Format, Fps, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};

    use crate::error::TaranisError;
    use crate::event::{Control, EventKind};

    use super::{parse, read};

    fn meta(delta: u32, message: MetaMessage<'static>) -> TrackEvent<'static> {
        TrackEvent {
            delta: u28::new(delta),
            kind: TrackEventKind::Meta(message),
        }
    }

    fn midi(delta: u32, message: MidiMessage) -> TrackEvent<'static> {
        TrackEvent {
            delta: u28::new(delta),
            kind: TrackEventKind::Midi {
                channel: u4::new(0),
                message,
            },
        }
    }

    fn two_track_song() -> Smf<'static> {
        let mut smf = Smf::new(Header::new(
            Format::Parallel,
            Timing::Metrical(u15::new(96)),
        ));
        smf.tracks.push(vec![
            meta(0, MetaMessage::TrackName(b"conductor")),
            meta(0, MetaMessage::Tempo(u24::new(400_000))),
            meta(0, MetaMessage::TimeSignature(3, 2, 24, 8)),
            meta(100, MetaMessage::EndOfTrack),
        ]);
        smf.tracks.push(vec![
            midi(
                0,
                MidiMessage::ProgramChange {
                    program: u7::new(5),
                },
            ),
            midi(
                0,
                MidiMessage::NoteOn {
                    key: u7::new(60),
                    vel: u7::new(100),
                },
            ),
            midi(
                50,
                MidiMessage::NoteOff {
                    key: u7::new(60),
                    vel: u7::new(0),
                },
            ),
            midi(
                0,
                MidiMessage::PitchBend {
                    bend: midly::PitchBend(midly::num::u14::new(0x2000)),
                },
            ),
            meta(50, MetaMessage::EndOfTrack),
        ]);
        smf
    }

    #[test]
    fn parses_metrical_file() -> Result<(), Box<dyn Error>> {
        let mut buf = Vec::new();
        two_track_song().write_std(&mut buf)?;

        let timeline = parse(&buf)?;
        assert_eq!(96, timeline.ticks_per_beat());
        assert_eq!(2, timeline.tracks().len());

        let conductor = &timeline.tracks()[0];
        assert_eq!(
            Some(&Control::TrackName("conductor".to_string())),
            conductor[0].as_control()
        );
        assert_eq!(Some(&Control::Tempo(400_000)), conductor[1].as_control());
        assert_eq!(
            Some(&Control::TimeSignature {
                numerator: 3,
                denominator: 4
            }),
            conductor[2].as_control()
        );
        assert!(conductor
            .iter()
            .any(|event| event.as_control() == Some(&Control::EndOfTrack)
                && event.delta_time() == 100));

        let notes = &timeline.tracks()[1];
        assert_eq!(Some(&Control::ProgramChange(5)), notes[0].as_control());
        assert!(matches!(notes[1].kind(), EventKind::NoteOn { .. }));
        assert_eq!(Some(60), notes[1].pitch().map(|p| p.as_int()));
        assert!(matches!(notes[2].kind(), EventKind::NoteOff { .. }));
        assert_eq!(50, notes[2].delta_time());
        assert!(matches!(notes[3].as_control(), Some(Control::Unknown(_))));
        Ok(())
    }

    #[test]
    fn reads_from_disk() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("song.mid");
        two_track_song().save(&path)?;

        let timeline = read(&path)?;
        assert_eq!(2, timeline.tracks().len());
        Ok(())
    }

    #[test]
    fn rejects_timecode() -> Result<(), Box<dyn Error>> {
        let mut smf = Smf::new(Header::new(
            Format::SingleTrack,
            Timing::Timecode(Fps::Fps25, 40),
        ));
        smf.tracks.push(vec![meta(0, MetaMessage::EndOfTrack)]);
        let mut buf = Vec::new();
        smf.write_std(&mut buf)?;

        assert!(matches!(
            parse(&buf),
            Err(TaranisError::UnsupportedTiming(_))
        ));
        Ok(())
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            parse(b"not a midi file"),
            Err(TaranisError::Midi(_))
        ));
    }
}
