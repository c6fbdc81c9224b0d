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

use core::fmt;
use core::str::FromStr;
use std::collections::VecDeque;

use crate::{
    error::SimError,
    process::{Process, ProcessId},
};

/// Value a [`ProcessList`] is ordered by.
///
/// The key is chosen per insertion: the same process is queued by arrival
/// time when it arrives, by last scheduled time when it is preempted and
/// ranked by resident pages when it is an eviction candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriorityKey {
    ArrivalTime,
    JobTime,
    LastScheduledTime,
    ResidentPageCount,
    CompletionTime,
}

impl PriorityKey {
    pub fn value_of(&self, process: &Process) -> u64 {
        match self {
            PriorityKey::ArrivalTime => process.arrival_time,
            PriorityKey::JobTime => process.job_time,
            PriorityKey::LastScheduledTime => process.last_scheduled_time,
            PriorityKey::ResidentPageCount => process.resident_frames.len() as u64,
            PriorityKey::CompletionTime => process.completion_time,
        }
    }

    /// Total order used by every list: key first, then id
    #[inline]
    fn rank(&self, process: &Process) -> (u64, ProcessId) {
        (self.value_of(process), process.id)
    }
}

impl FromStr for PriorityKey {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "arrival_time" => Ok(PriorityKey::ArrivalTime),
            "job_time" => Ok(PriorityKey::JobTime),
            "last_scheduled_time" => Ok(PriorityKey::LastScheduledTime),
            "resident_page_count" => Ok(PriorityKey::ResidentPageCount),
            "completion_time" => Ok(PriorityKey::CompletionTime),
            other => Err(SimError::UnknownPriorityKey(other.to_string())),
        }
    }
}

impl fmt::Display for PriorityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PriorityKey::ArrivalTime => "arrival_time",
            PriorityKey::JobTime => "job_time",
            PriorityKey::LastScheduledTime => "last_scheduled_time",
            PriorityKey::ResidentPageCount => "resident_page_count",
            PriorityKey::CompletionTime => "completion_time",
        };
        f.write_str(name)
    }
}

/// Owning list of processes, ordered by whatever [`PriorityKey`] the caller
/// inserts with.
///
/// Insertion walks backwards from the tail and stops behind the first
/// process that does not rank higher than the new one, so a list built
/// with a single key stays sorted by `(key, id)`.
#[derive(Debug, Clone, Default)]
pub struct ProcessList {
    items: VecDeque<Process>,
}

impl ProcessList {
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }

    pub fn insert(&mut self, process: Process, key: PriorityKey) {
        let rank = key.rank(&process);

        let mut index = self.items.len();
        while index > 0 && key.rank(&self.items[index - 1]) > rank {
            index -= 1;
        }

        self.items.insert(index, process);
    }

    /// Detaches and returns the first process
    pub fn remove_front(&mut self) -> Result<Process, SimError> {
        self.items.pop_front().ok_or(SimError::EmptyCollection)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn front(&self) -> Option<&Process> {
        self.items.front()
    }

    /// Process at position `index` (0 = front)
    pub fn at(&self, index: usize) -> Result<&Process, SimError> {
        self.items.get(index).ok_or(SimError::IndexOutOfRange {
            index,
            len: self.items.len(),
        })
    }

    pub(crate) fn at_mut(&mut self, index: usize) -> Result<&mut Process, SimError> {
        let len = self.items.len();
        self.items
            .get_mut(index)
            .ok_or(SimError::IndexOutOfRange { index, len })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Process> {
        self.items.iter()
    }

    /// Positions of all processes, ordered as if every process was
    /// reinserted into an empty list with `key`. The list itself is untouched.
    pub fn ranked_indices(&self, key: PriorityKey) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.items.len()).collect();
        indices.sort_by_key(|&index| key.rank(&self.items[index]));
        indices
    }

    pub fn into_vec(self) -> Vec<Process> {
        self.items.into()
    }
}

impl IntoIterator for ProcessList {
    type Item = Process;
    type IntoIter = std::collections::vec_deque::IntoIter<Process>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
