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

use std::fmt;

use crate::{
    process::{Process, Time},
    scheduler::{RunStats, SimEvent},
    sim_config::THROUGHPUT_BIN_LENGTH,
};

struct FrameList<'a>(&'a [usize]);

impl fmt::Display for FrameList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, frame) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", frame)?;
        }
        write!(f, "]")
    }
}

impl fmt::Display for SimEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimEvent::Running {
                time,
                process_id,
                remaining_time,
                memory,
            } => {
                write!(
                    f,
                    "{}, RUNNING, id={}, remaining-time={}",
                    time, process_id, remaining_time
                )?;
                if let Some(memory) = memory {
                    write!(
                        f,
                        ", load-time={}, mem-usage={}%, mem-addresses={}",
                        memory.load_time,
                        memory.memory_usage,
                        FrameList(&memory.frames)
                    )?;
                }
                Ok(())
            }
            SimEvent::Evicted { time, frames } => {
                write!(f, "{}, EVICTED, mem-addresses={}", time, FrameList(frames))
            }
            SimEvent::Finished {
                time,
                process_id,
                processes_remaining,
            } => write!(
                f,
                "{}, FINISHED, id={}, proc-remaining={}",
                time, process_id, processes_remaining
            ),
        }
    }
}

/// Completions per [`THROUGHPUT_BIN_LENGTH`] interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct Throughput {
    /// Rounded up
    pub average: u64,
    pub min: u64,
    pub max: u64,
}

impl Throughput {
    /// Puts every completion time into consecutive bins starting at time 1
    /// and summarizes the bin counts.
    pub fn from_completions(completion_times: impl IntoIterator<Item = Time>, makespan: Time) -> Self {
        let bin_count = makespan.div_ceil(THROUGHPUT_BIN_LENGTH).max(1) as usize;
        let mut bins = vec![0u64; bin_count];

        for completion in completion_times {
            let index = completion.div_ceil(THROUGHPUT_BIN_LENGTH).max(1) as usize - 1;
            bins[index.min(bin_count - 1)] += 1;
        }

        let total: u64 = bins.iter().sum();
        Self {
            average: total.div_ceil(bin_count as u64),
            min: bins.iter().copied().min().unwrap_or(0),
            max: bins.iter().copied().max().unwrap_or(0),
        }
    }
}

/// End of run statistics
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct PerformanceReport {
    pub throughput: Throughput,

    /// Rounded up
    pub average_turnaround: Time,

    pub max_overhead: f64,
    pub average_overhead: f64,
    pub makespan: Time,
}

impl PerformanceReport {
    pub fn new<'a>(completed: impl IntoIterator<Item = &'a Process>, stats: &RunStats) -> Self {
        let makespan = stats.makespan();
        let throughput = Throughput::from_completions(
            completed.into_iter().map(|p| p.get_completion_time()),
            makespan,
        );

        let average_turnaround = if stats.completed_count == 0 {
            0
        } else {
            stats.total_turnaround.div_ceil(stats.completed_count as Time)
        };

        Self {
            throughput,
            average_turnaround,
            max_overhead: stats.max_overhead_ratio,
            average_overhead: stats.average_overhead_ratio(),
            makespan,
        }
    }
}

impl fmt::Display for PerformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Throughput {}, {}, {}",
            self.throughput.average, self.throughput.min, self.throughput.max
        )?;
        writeln!(f, "Turnaround time {}", self.average_turnaround)?;
        writeln!(
            f,
            "Time overhead {:.2} {:.2}",
            self.max_overhead, self.average_overhead
        )?;
        write!(f, "Makespan {}", self.makespan)
    }
}
