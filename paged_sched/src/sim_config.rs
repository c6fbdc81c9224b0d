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

use static_assertions::const_assert;

use crate::{error::SimError, process::Time, util::process_list::PriorityKey};

/// A process may only run once this many of its pages are resident
/// (or all of them, if it needs fewer)
pub const MIN_EXECUTABLE_PAGES: usize = 4;

/// Time it takes to load a single page into a frame
pub const LOAD_TIME_PER_PAGE: Time = 2;

/// Page size in KB
pub const DEFAULT_PAGE_SIZE: u64 = 4;

pub const DEFAULT_QUANTUM: Time = 10;

/// Width of a throughput bin used by the performance report
pub const THROUGHPUT_BIN_LENGTH: Time = 60;

const_assert!(MIN_EXECUTABLE_PAGES > 0);
const_assert!(DEFAULT_PAGE_SIZE > 0);
const_assert!(DEFAULT_QUANTUM > 0);

/// Which process gets the CPU next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub enum SchedulingAlgorithm {
    /// Run to completion in order of arrival
    FirstArrival,
    /// Preempt after `quantum`, requeue behind everyone who ran more recently
    RoundRobin,
    /// Run to completion, shortest job among the arrived ones first
    ShortestJobFirst,
}

impl SchedulingAlgorithm {
    /// Key used to queue newly arrived processes
    pub fn arrival_key(&self) -> PriorityKey {
        match self {
            SchedulingAlgorithm::ShortestJobFirst => PriorityKey::JobTime,
            SchedulingAlgorithm::FirstArrival | SchedulingAlgorithm::RoundRobin => {
                PriorityKey::ArrivalTime
            }
        }
    }
}

impl FromStr for SchedulingAlgorithm {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ff" => Ok(SchedulingAlgorithm::FirstArrival),
            "rr" => Ok(SchedulingAlgorithm::RoundRobin),
            "cs" => Ok(SchedulingAlgorithm::ShortestJobFirst),
            other => Err(SimError::InvalidConfig(format!(
                "unknown scheduling algorithm `{}` (expected one of ff, rr, cs)",
                other
            ))),
        }
    }
}

impl fmt::Display for SchedulingAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SchedulingAlgorithm::FirstArrival => "ff",
            SchedulingAlgorithm::RoundRobin => "rr",
            SchedulingAlgorithm::ShortestJobFirst => "cs",
        };
        f.write_str(name)
    }
}

/// How page frames are handed out to processes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub enum MemoryMode {
    /// No frame accounting at all
    Unlimited,
    /// All pages of a process have to be resident at once,
    /// victims lose every resident page
    Swapping,
    /// A process can run with [`MIN_EXECUTABLE_PAGES`] resident,
    /// victims only lose what is needed
    VirtualMemory,
    /// Same as [`MemoryMode::VirtualMemory`] but victims with the fewest
    /// resident pages go first
    Custom,
}

impl MemoryMode {
    pub fn is_bounded(&self) -> bool {
        !matches!(self, MemoryMode::Unlimited)
    }

    /// Frames a process of `total_pages` pages has to hold before it may run
    pub fn frames_to_run(&self, total_pages: usize) -> usize {
        match self {
            MemoryMode::Unlimited => 0,
            MemoryMode::Swapping => total_pages,
            MemoryMode::VirtualMemory | MemoryMode::Custom => {
                total_pages.min(MIN_EXECUTABLE_PAGES)
            }
        }
    }

    /// Key eviction candidates are ranked by (ascending, ties by id)
    pub fn eviction_key(&self) -> PriorityKey {
        match self {
            MemoryMode::Custom => PriorityKey::ResidentPageCount,
            MemoryMode::Unlimited | MemoryMode::Swapping | MemoryMode::VirtualMemory => {
                PriorityKey::LastScheduledTime
            }
        }
    }
}

impl FromStr for MemoryMode {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "u" => Ok(MemoryMode::Unlimited),
            "p" => Ok(MemoryMode::Swapping),
            "v" => Ok(MemoryMode::VirtualMemory),
            "cm" => Ok(MemoryMode::Custom),
            other => Err(SimError::InvalidConfig(format!(
                "unknown memory mode `{}` (expected one of u, p, v, cm)",
                other
            ))),
        }
    }
}

impl fmt::Display for MemoryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MemoryMode::Unlimited => "u",
            MemoryMode::Swapping => "p",
            MemoryMode::VirtualMemory => "v",
            MemoryMode::Custom => "cm",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct SimConfig {
    pub scheduling: SchedulingAlgorithm,

    pub memory: MemoryMode,

    /// Number of page frames. Ignored for [`MemoryMode::Unlimited`]
    pub total_frames: usize,

    /// Size of a single page, in the same unit as the memory requested by processes
    pub page_size: u64,

    /// Maximum slice for [`SchedulingAlgorithm::RoundRobin`]
    pub quantum: Time,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            scheduling: SchedulingAlgorithm::FirstArrival,
            memory: MemoryMode::Unlimited,
            total_frames: 0,
            page_size: DEFAULT_PAGE_SIZE,
            quantum: DEFAULT_QUANTUM,
        }
    }
}

impl SimConfig {
    pub fn new(scheduling: SchedulingAlgorithm, memory: MemoryMode) -> Self {
        Self {
            scheduling,
            memory,
            ..Default::default()
        }
    }

    /// Sets the frame count from a total memory size (same unit as `page_size`)
    pub fn with_memory_size(mut self, memory_size: u64) -> Self {
        self.total_frames = (memory_size / self.page_size.max(1)) as usize;
        self
    }

    pub fn with_total_frames(mut self, total_frames: usize) -> Self {
        self.total_frames = total_frames;
        self
    }

    pub fn with_quantum(mut self, quantum: Time) -> Self {
        self.quantum = quantum;
        self
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.page_size == 0 {
            return Err(SimError::InvalidConfig("page size has to be positive".into()));
        }

        if self.scheduling == SchedulingAlgorithm::RoundRobin && self.quantum == 0 {
            return Err(SimError::InvalidConfig(
                "round-robin needs a positive quantum".into(),
            ));
        }

        if self.memory.is_bounded() && self.total_frames == 0 {
            return Err(SimError::InvalidConfig(format!(
                "memory mode `{}` needs at least one frame",
                self.memory
            )));
        }

        Ok(())
    }

    /// Number of pages needed to hold `bytes`
    pub fn pages_for(&self, bytes: u64) -> usize {
        bytes.div_ceil(self.page_size) as usize
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_flags() {
        assert_eq!("ff".parse::<SchedulingAlgorithm>(), Ok(SchedulingAlgorithm::FirstArrival));
        assert_eq!("rr".parse::<SchedulingAlgorithm>(), Ok(SchedulingAlgorithm::RoundRobin));
        assert_eq!("cs".parse::<SchedulingAlgorithm>(), Ok(SchedulingAlgorithm::ShortestJobFirst));
        assert!("sjf".parse::<SchedulingAlgorithm>().is_err());

        assert_eq!("u".parse::<MemoryMode>(), Ok(MemoryMode::Unlimited));
        assert_eq!("p".parse::<MemoryMode>(), Ok(MemoryMode::Swapping));
        assert_eq!("v".parse::<MemoryMode>(), Ok(MemoryMode::VirtualMemory));
        assert_eq!("cm".parse::<MemoryMode>(), Ok(MemoryMode::Custom));
        assert!(matches!(
            "x".parse::<MemoryMode>(),
            Err(SimError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_memory_size_to_frames() {
        let config = SimConfig::new(SchedulingAlgorithm::FirstArrival, MemoryMode::Swapping)
            .with_memory_size(100);
        assert_eq!(config.total_frames, 25);
        assert_eq!(config.pages_for(0), 0);
        assert_eq!(config.pages_for(4), 1);
        assert_eq!(config.pages_for(5), 2);
    }

    #[test]
    fn test_validate() {
        assert!(SimConfig::default().validate().is_ok());

        let bounded = SimConfig::new(SchedulingAlgorithm::FirstArrival, MemoryMode::VirtualMemory);
        assert!(bounded.validate().is_err());
        assert!(bounded.clone().with_total_frames(8).validate().is_ok());

        let rr = SimConfig::new(SchedulingAlgorithm::RoundRobin, MemoryMode::Unlimited)
            .with_quantum(0);
        assert!(rr.validate().is_err());
    }

    #[test]
    fn test_frames_to_run() {
        assert_eq!(MemoryMode::Unlimited.frames_to_run(20), 0);
        assert_eq!(MemoryMode::Swapping.frames_to_run(20), 20);
        assert_eq!(MemoryMode::VirtualMemory.frames_to_run(20), 4);
        assert_eq!(MemoryMode::Custom.frames_to_run(3), 3);
    }

    #[test]
    fn test_eviction_key() {
        assert_eq!(MemoryMode::Custom.eviction_key(), PriorityKey::ResidentPageCount);
        assert_eq!(MemoryMode::Swapping.eviction_key(), PriorityKey::LastScheduledTime);
        assert_eq!(
            MemoryMode::VirtualMemory.eviction_key(),
            PriorityKey::LastScheduledTime
        );
    }
}
