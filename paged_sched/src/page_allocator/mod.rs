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

use log::trace;

use crate::{
    error::SimError,
    process::{Process, Time},
    sim_config::{MemoryMode, LOAD_TIME_PER_PAGE, MIN_EXECUTABLE_PAGES},
    util::process_list::ProcessList,
};

mod eviction;
mod frame_table;

pub use frame_table::FrameTable;


/// Outcome of a single [`PageAllocator::admit`] call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Admission {
    /// Frames taken from other processes to make room, ascending
    pub evicted_frames: Vec<usize>,

    /// Number of frames granted to the admitted process
    pub granted_pages: usize,

    /// Time needed to load the granted pages
    pub load_time: Time,
}

/// Decides how many frames a process gets before it may run and takes them
/// away from other ready processes if needed.
#[derive(Debug, Clone)]
pub struct PageAllocator {
    mode: MemoryMode,
    frames: FrameTable,
}

impl PageAllocator {
    pub fn new(mode: MemoryMode, total_frames: usize) -> Self {
        let total_frames = if mode.is_bounded() { total_frames } else { 0 };

        Self {
            mode,
            frames: FrameTable::new(total_frames),
        }
    }

    pub fn mode(&self) -> MemoryMode {
        self.mode
    }

    pub fn frames(&self) -> &FrameTable {
        &self.frames
    }

    /// Makes `process` executable under the configured memory mode.
    ///
    /// `ready` holds every other process that may lose pages. `process`
    /// itself must not be part of it.
    pub fn admit(
        &mut self,
        process: &mut Process,
        ready: &mut ProcessList,
    ) -> Result<Admission, SimError> {
        if !self.mode.is_bounded() {
            process.pending_load_time = 0;
            return Ok(Admission::default());
        }

        let outstanding = process.outstanding_pages();
        if outstanding == 0 {
            process.pending_load_time = 0;
            process.page_fault_count = 0;
            trace!("Process {} is fully resident", process.id);
            return Ok(Admission::default());
        }

        let free = self.frames.free_frame_count();
        let mut evicted_frames = Vec::new();

        let granted_pages = match self.mode {
            MemoryMode::Unlimited => return Ok(Admission::default()),
            MemoryMode::Swapping => {
                if outstanding > free {
                    evicted_frames = self.evict(ready, outstanding, process.id)?;
                }
                outstanding
            }
            MemoryMode::VirtualMemory | MemoryMode::Custom => {
                let resident = process.resident_frames.len();
                if outstanding <= free {
                    outstanding
                } else if resident >= MIN_EXECUTABLE_PAGES || free >= MIN_EXECUTABLE_PAGES {
                    // can already run (or will with the free frames), take what is free
                    free
                } else {
                    let needed = outstanding.min(MIN_EXECUTABLE_PAGES - resident);
                    if needed > free {
                        evicted_frames = self.evict(ready, needed, process.id)?;
                        needed
                    } else {
                        free
                    }
                }
            }
        };

        self.grant(process, granted_pages);

        Ok(Admission {
            evicted_frames,
            granted_pages,
            load_time: process.pending_load_time,
        })
    }

    /// Gives `count` free frames to `process` and charges it for loading them
    fn grant(&mut self, process: &mut Process, count: usize) {
        self.frames.claim(process.id, count);
        process.resident_frames = self.frames.frames_owned_by(process.id);

        process.pending_load_time = count as Time * LOAD_TIME_PER_PAGE;
        process.page_fault_count = process.outstanding_pages();
        process.remaining_time += process.page_fault_count as Time;

        let usage = self.frames.usage_of(count);
        process.memory_usage_percent += usage;
        self.frames.charge_usage(usage);

        trace!(
            "Granted {} frames to process {}: resident={:?}, faults={}, load_time={}",
            count,
            process.id,
            process.resident_frames,
            process.page_fault_count,
            process.pending_load_time
        );
    }

    /// Frees the `count` lowest frames of `process` and returns them
    fn free_pages(&mut self, process: &mut Process, count: usize) -> Vec<usize> {
        let freed = process.take_frames(count);
        self.frames.release(&freed);

        let usage = self.frames.usage_of(freed.len());
        process.memory_usage_percent -= usage;
        self.frames.refund_usage(usage);

        freed
    }

    /// Returns every frame of a finished process to the free pool
    ///
    /// Returns the released frames in ascending order.
    pub fn release(&mut self, process: &mut Process) -> Vec<usize> {
        if !self.mode.is_bounded() {
            return Vec::new();
        }

        let count = process.resident_frames.len();
        self.free_pages(process, count)
    }

    /// Checks that the frame table and the resident frames of `processes`
    /// agree with each other.
    ///
    /// `processes` has to contain every process that may own frames.
    pub fn verify_residency<'a>(&self, processes: impl IntoIterator<Item = &'a Process>) -> bool {
        if self.frames.free_frame_count() != self.frames.count_free_slots() {
            return false;
        }

        let mut resident_total = 0;
        for process in processes {
            let frames = &process.resident_frames;
            if frames.len() > process.total_pages {
                return false;
            }
            if !frames.windows(2).all(|pair| pair[0] < pair[1]) {
                return false;
            }
            if frames
                .iter()
                .any(|&frame| self.frames.owner_of(frame) != Some(process.id))
            {
                return false;
            }
            resident_total += frames.len();
        }

        self.frames.free_frame_count() + resident_total == self.frames.total_frames()
    }
}
