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

use crate::{process::ProcessId, util::usage_percent};

/// Fixed number of page frames, each either free or owned by one process.
///
/// `free_frame_count` is kept alongside the slots so admission decisions
/// do not have to scan the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameTable {
    slots: Vec<Option<ProcessId>>,

    /// Always equals the number of `None` slots
    free_frame_count: usize,

    /// Aggregate of the usage charged to all processes
    memory_usage: i64,
}

impl FrameTable {
    pub fn new(total_frames: usize) -> Self {
        Self {
            slots: vec![None; total_frames],
            free_frame_count: total_frames,
            memory_usage: 0,
        }
    }

    pub fn total_frames(&self) -> usize {
        self.slots.len()
    }

    pub fn free_frame_count(&self) -> usize {
        self.free_frame_count
    }

    pub fn memory_usage(&self) -> i64 {
        self.memory_usage
    }

    pub fn owner_of(&self, frame: usize) -> Option<ProcessId> {
        self.slots.get(frame).copied().flatten()
    }

    /// Hands the `count` lowest free frames to `owner`
    ///
    /// Returns the claimed frame indices in ascending order.
    /// Callers have to make sure that `count <= free_frame_count`.
    pub(crate) fn claim(&mut self, owner: ProcessId, count: usize) -> Vec<usize> {
        debug_assert!(count <= self.free_frame_count);

        let mut claimed = Vec::with_capacity(count);
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if claimed.len() == count {
                break;
            }

            if slot.is_none() {
                *slot = Some(owner);
                claimed.push(index);
            }
        }

        self.free_frame_count -= claimed.len();
        claimed
    }

    /// Marks `frames` as free again
    pub(crate) fn release(&mut self, frames: &[usize]) {
        for &frame in frames {
            debug_assert!(self.slots[frame].is_some(), "frame {} is already free", frame);
            if self.slots[frame].take().is_some() {
                self.free_frame_count += 1;
            }
        }
    }

    /// All frames owned by `owner`, ascending
    pub fn frames_owned_by(&self, owner: ProcessId) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| **slot == Some(owner))
            .map(|(index, _)| index)
            .collect()
    }

    /// Usage that `frames` frames account for, rounded up to whole percents
    pub(crate) fn usage_of(&self, frames: usize) -> i64 {
        usage_percent(frames, self.total_frames())
    }

    pub(crate) fn charge_usage(&mut self, usage: i64) {
        self.memory_usage += usage;
    }

    pub(crate) fn refund_usage(&mut self, usage: i64) {
        self.memory_usage -= usage;
    }

    /// Recounts the free slots, only used to verify `free_frame_count`
    pub fn count_free_slots(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_none()).count()
    }
}

#[cfg(test)]
mod test {
    use super::FrameTable;

    #[test]
    fn test_claim_lowest_free_frames() {
        let mut table = FrameTable::new(8);

        assert_eq!(table.claim(1, 3), vec![0, 1, 2]);
        assert_eq!(table.claim(2, 2), vec![3, 4]);
        assert_eq!(table.free_frame_count(), 3);

        table.release(&[1, 3]);
        assert_eq!(table.free_frame_count(), 5);
        assert_eq!(table.owner_of(1), None);
        assert_eq!(table.owner_of(4), Some(2));

        // holes are filled first
        assert_eq!(table.claim(3, 3), vec![1, 3, 5]);
        assert_eq!(table.frames_owned_by(3), vec![1, 3, 5]);
        assert_eq!(table.frames_owned_by(1), vec![0, 2]);
        assert_eq!(table.free_frame_count(), table.count_free_slots());
    }

    #[test]
    fn test_claim_nothing() {
        let mut table = FrameTable::new(2);
        assert!(table.claim(1, 0).is_empty());
        assert_eq!(table.free_frame_count(), 2);
        assert_eq!(table.owner_of(10), None);
    }

    #[test]
    fn test_usage() {
        let mut table = FrameTable::new(3);
        let usage = table.usage_of(1);
        assert_eq!(usage, 34);

        table.charge_usage(usage);
        table.charge_usage(table.usage_of(2));
        assert_eq!(table.memory_usage(), 101);

        table.refund_usage(usage);
        assert_eq!(table.memory_usage(), 67);
    }
}
