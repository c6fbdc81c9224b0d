/*
 *  Copyright (C) 2025  Markus Elias Gerber
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

use log::info;

use crate::process::{ProcessId, Time};

/// Memory state of a process when it starts running in a bounded memory mode
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct MemorySnapshot {
    pub load_time: Time,

    /// Aggregate usage of the whole frame table, in percent
    pub memory_usage: i64,

    /// Frames owned by the process, ascending
    pub frames: Vec<usize>,
}

/// Something observable that happened during the simulation
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
#[cfg_attr(feature = "serialize", serde(tag = "event", rename_all = "snake_case"))]
pub enum SimEvent {
    Running {
        time: Time,
        process_id: ProcessId,
        remaining_time: Time,
        /// `None` if memory is unlimited
        memory: Option<MemorySnapshot>,
    },
    Evicted {
        time: Time,
        frames: Vec<usize>,
    },
    Finished {
        time: Time,
        process_id: ProcessId,
        processes_remaining: usize,
    },
}

impl SimEvent {
    pub fn time(&self) -> Time {
        match self {
            SimEvent::Running { time, .. }
            | SimEvent::Evicted { time, .. }
            | SimEvent::Finished { time, .. } => *time,
        }
    }
}

/// Receives every [`SimEvent`] in the order it happened
pub trait EventSink {
    fn record(&mut self, event: SimEvent);
}

impl EventSink for Vec<SimEvent> {
    fn record(&mut self, event: SimEvent) {
        self.push(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn record(&mut self, event: SimEvent) {
        (**self).record(event);
    }
}

/// Writes every event to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEventSink;

impl EventSink for LogEventSink {
    fn record(&mut self, event: SimEvent) {
        info!("{}", event);
    }
}
