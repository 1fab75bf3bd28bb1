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
//! Converts MIDI timelines into monophonic square wave audio.
//!
//! A [`timeline::Timeline`] is merged into control and note queues ([`merge`]), scanned into
//! note intervals while following tempo changes ([`scan`]), padded with silence and rendered
//! to 16-bit samples ([`synth`]), then written out as a WAV file ([`wav`]).
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod event;
pub mod interval;
pub mod merge;
pub mod pipeline;
pub mod queue;
pub mod scan;
pub mod synth;
pub mod tempo;
pub mod timeline;
pub mod wav;

pub use error::TaranisError;
