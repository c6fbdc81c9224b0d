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

pub type ProcessId = u64;

/// Simulated time units
pub type Time = u64;

/// A process as it is read from the workload, before the simulation touches it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct ProcessSpec {
    pub arrival_time: Time,
    pub id: ProcessId,
    pub bytes_requested: u64,
    pub job_time: Time,
}

impl ProcessSpec {
    pub fn new(arrival_time: Time, id: ProcessId, bytes_requested: u64, job_time: Time) -> Self {
        Self {
            arrival_time,
            id,
            bytes_requested,
            job_time,
        }
    }
}

/// A process and its simulation/memory state.
///
/// Following is always true:
/// `resident_frames.len() == resident_page_count <= total_pages`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct Process {
    pub(crate) id: ProcessId,
    pub(crate) arrival_time: Time,
    pub(crate) job_time: Time,

    /// CPU time left, only decremented by round-robin slices
    pub(crate) remaining_time: Time,

    /// Clock value at the end of the last slice this process ran
    pub(crate) last_scheduled_time: Time,

    pub(crate) completion_time: Time,

    pub(crate) bytes_requested: u64,

    /// `ceil(bytes_requested / page_size)`
    pub(crate) total_pages: usize,

    /// Frames currently owned by this process, ascending
    pub(crate) resident_frames: Vec<usize>,

    /// Load time charged by the last admission
    pub(crate) pending_load_time: Time,

    /// Pages still outstanding after the last admission
    pub(crate) page_fault_count: usize,

    /// Sum of `ceil(100 * pages / total_frames)` over all grants minus releases
    pub(crate) memory_usage_percent: i64,
}

impl Process {
    pub(crate) fn new(spec: ProcessSpec, total_pages: usize) -> Self {
        Self {
            id: spec.id,
            arrival_time: spec.arrival_time,
            job_time: spec.job_time,
            remaining_time: spec.job_time,
            last_scheduled_time: 0,
            completion_time: 0,
            bytes_requested: spec.bytes_requested,
            total_pages,
            resident_frames: Vec::new(),
            pending_load_time: 0,
            page_fault_count: 0,
            memory_usage_percent: 0,
        }
    }

    pub fn get_id(&self) -> ProcessId {
        self.id
    }

    pub fn get_arrival_time(&self) -> Time {
        self.arrival_time
    }

    pub fn get_job_time(&self) -> Time {
        self.job_time
    }

    pub fn get_remaining_time(&self) -> Time {
        self.remaining_time
    }

    pub fn get_last_scheduled_time(&self) -> Time {
        self.last_scheduled_time
    }

    pub fn get_completion_time(&self) -> Time {
        self.completion_time
    }

    pub fn get_bytes_requested(&self) -> u64 {
        self.bytes_requested
    }

    pub fn get_total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn get_resident_page_count(&self) -> usize {
        self.resident_frames.len()
    }

    pub fn get_resident_frames(&self) -> &[usize] {
        &self.resident_frames
    }

    pub fn get_pending_load_time(&self) -> Time {
        self.pending_load_time
    }

    pub fn get_page_fault_count(&self) -> usize {
        self.page_fault_count
    }

    pub fn get_memory_usage_percent(&self) -> i64 {
        self.memory_usage_percent
    }

    /// Pages that are not resident yet
    pub fn outstanding_pages(&self) -> usize {
        self.total_pages - self.resident_frames.len()
    }

    pub fn is_fully_resident(&self) -> bool {
        self.outstanding_pages() == 0
    }

    /// `completion_time - arrival_time`, only meaningful once finished
    pub fn turnaround(&self) -> Time {
        self.completion_time.saturating_sub(self.arrival_time)
    }

    /// Detaches the `count` lowest frames of this process and returns them
    pub(crate) fn take_frames(&mut self, count: usize) -> Vec<usize> {
        let count = count.min(self.resident_frames.len());
        self.resident_frames.drain(..count).collect()
    }
}
