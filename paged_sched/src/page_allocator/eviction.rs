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

use log::debug;

use super::PageAllocator;
use crate::{
    error::SimError,
    process::ProcessId,
    sim_config::MemoryMode,
    util::process_list::ProcessList,
};

impl PageAllocator {
    /// Takes frames away from the processes in `ready` until at least
    /// `needed_pages` frames are free.
    ///
    /// Candidates are visited in ascending order of the mode's eviction key.
    /// In swapping mode a victim loses all of its frames, otherwise only as
    /// many as are still missing (its lowest frames first).
    ///
    /// Returns all evicted frames in ascending order.
    pub(super) fn evict(
        &mut self,
        ready: &mut ProcessList,
        needed_pages: usize,
        requester: ProcessId,
    ) -> Result<Vec<usize>, SimError> {
        let mut evicted = Vec::new();
        let mut candidates = ready.ranked_indices(self.mode.eviction_key()).into_iter();

        while self.frames.free_frame_count() < needed_pages {
            let index = match candidates.next() {
                Some(index) => index,
                None => {
                    return Err(SimError::AllocationCapacityExceeded {
                        process_id: requester,
                        required: needed_pages,
                        capacity: self.frames.free_frame_count(),
                    })
                }
            };

            let victim = ready.at_mut(index)?;
            let resident = victim.resident_frames.len();
            if resident == 0 {
                continue;
            }

            let count = match self.mode {
                MemoryMode::VirtualMemory | MemoryMode::Custom => {
                    resident.min(needed_pages - self.frames.free_frame_count())
                }
                MemoryMode::Unlimited | MemoryMode::Swapping => resident,
            };

            let freed = self.free_pages(victim, count);
            debug!("Evicting frames {:?} of process {}", freed, victim.id);
            evicted.extend(freed);
        }

        evicted.sort_unstable();
        Ok(evicted)
    }
}
