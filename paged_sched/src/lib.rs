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

mod error;
mod page_allocator;
mod process;
mod report;
mod scheduler;
mod sim_config;
mod util;
mod workload;

#[cfg(test)]
mod test;

pub use crate::error::SimError;
pub use crate::page_allocator::{Admission, FrameTable, PageAllocator};
pub use crate::process::{Process, ProcessId, ProcessSpec, Time};
pub use crate::report::{PerformanceReport, Throughput};
pub use crate::scheduler::{
    EventSink, LogEventSink, MemorySnapshot, RunStats, Scheduler, SimEvent, SimulationOutcome,
};
pub use crate::sim_config::{
    MemoryMode, SchedulingAlgorithm, SimConfig, DEFAULT_PAGE_SIZE, DEFAULT_QUANTUM,
    LOAD_TIME_PER_PAGE, MIN_EXECUTABLE_PAGES, THROUGHPUT_BIN_LENGTH,
};
pub use crate::util::process_list::{PriorityKey, ProcessList};
pub use crate::workload::parse_workload;
