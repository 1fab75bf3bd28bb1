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
use std::collections::VecDeque;

use crate::event::TimedEvent;

/// A queue of timed events ordered by ascending tick. The smallest remaining tick is
/// always at the front, and events sharing a tick keep the order they were pushed in.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: VecDeque<TimedEvent>,
}

impl EventQueue {
    /// Builds a queue from events in any order. The sort is stable, so events on the
    /// same tick keep their relative order.
    pub fn from_unsorted(mut events: Vec<TimedEvent>) -> EventQueue {
        events.sort_by_key(|event| event.tick);
        EventQueue {
            events: events.into(),
        }
    }

    /// Appends an event, keeping the queue ordered. Events on the same tick as existing
    /// ones go after them.
    pub fn push(&mut self, event: TimedEvent) {
        let pos = self.events.partition_point(|e| e.tick <= event.tick);
        self.events.insert(pos, event);
    }

    /// The tick of the next event.
    pub fn peek_tick(&self) -> Option<u64> {
        self.events.front().map(|event| event.tick)
    }

    /// Removes and returns the event with the smallest tick.
    pub fn pop(&mut self) -> Option<TimedEvent> {
        self.events.pop_front()
    }

    /// Pops the next event only if it falls on the given tick.
    pub fn pop_due(&mut self, tick: u64) -> Option<TimedEvent> {
        if self.peek_tick() == Some(tick) {
            self.pop()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimedEvent> {
        self.events.iter()
    }
}
