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

use std::collections::HashSet;

use log::{debug, trace, warn};

use crate::{
    error::SimError,
    page_allocator::PageAllocator,
    process::{Process, ProcessId, ProcessSpec, Time},
    sim_config::{SchedulingAlgorithm, SimConfig},
    util::process_list::{PriorityKey, ProcessList},
};

mod event;
mod stats;

pub use event::{EventSink, LogEventSink, MemorySnapshot, SimEvent};
pub use stats::RunStats;

#[cfg(test)]
mod test;

/// Everything a finished run leaves behind
#[derive(Debug)]
pub struct SimulationOutcome<E> {
    /// Finished processes, ordered by completion time
    pub completed: ProcessList,
    pub stats: RunStats,
    pub events: E,
}

/// Discrete event loop running one process at a time.
///
/// Processes are submitted up front into the incoming list, move to the
/// ready list once the clock reaches their arrival time and end up in the
/// completed list. A process is owned by exactly one of these lists, except
/// for the single iteration in which it runs.
pub struct Scheduler<E: EventSink> {
    config: SimConfig,

    /// Not yet arrived, ordered by arrival time
    incoming: ProcessList,

    /// Arrived and not yet finished
    ready: ProcessList,

    /// Finished, ordered by completion time
    completed: ProcessList,

    allocator: PageAllocator,

    stats: RunStats,

    /// Ids of all submitted processes
    known_ids: HashSet<ProcessId>,

    events: E,
}

impl<E: EventSink> Scheduler<E> {
    pub fn new(config: SimConfig, events: E) -> Result<Self, SimError> {
        config.validate()?;

        Ok(Self {
            allocator: PageAllocator::new(config.memory, config.total_frames),
            config,
            incoming: ProcessList::new(),
            ready: ProcessList::new(),
            completed: ProcessList::new(),
            stats: RunStats::default(),
            known_ids: HashSet::new(),
            events,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn current_time(&self) -> Time {
        self.stats.current_time
    }

    pub fn incoming(&self) -> &ProcessList {
        &self.incoming
    }

    pub fn ready(&self) -> &ProcessList {
        &self.ready
    }

    pub fn completed(&self) -> &ProcessList {
        &self.completed
    }

    pub fn allocator(&self) -> &PageAllocator {
        &self.allocator
    }

    pub fn events(&self) -> &E {
        &self.events
    }

    /// Adds a process to the workload.
    ///
    /// Rejects duplicate ids, zero job times and processes that need more
    /// frames to run than the memory has.
    pub fn submit(&mut self, spec: ProcessSpec) -> Result<(), SimError> {
        if spec.job_time == 0 {
            return Err(SimError::InvalidProcess {
                process_id: spec.id,
                reason: "job time has to be positive".into(),
            });
        }

        if self.known_ids.contains(&spec.id) {
            return Err(SimError::InvalidProcess {
                process_id: spec.id,
                reason: "duplicate process id".into(),
            });
        }

        let total_pages = self.config.pages_for(spec.bytes_requested);
        let required = self.config.memory.frames_to_run(total_pages);
        if required > self.config.total_frames {
            return Err(SimError::AllocationCapacityExceeded {
                process_id: spec.id,
                required,
                capacity: self.config.total_frames,
            });
        }

        self.known_ids.insert(spec.id);
        self.incoming
            .insert(Process::new(spec, total_pages), PriorityKey::ArrivalTime);
        Ok(())
    }

    pub fn submit_all(
        &mut self,
        specs: impl IntoIterator<Item = ProcessSpec>,
    ) -> Result<(), SimError> {
        for spec in specs {
            self.submit(spec)?;
        }
        Ok(())
    }

    /// `true` as long as there are processes that did not finish yet
    pub fn has_work(&self) -> bool {
        !self.incoming.is_empty() || !self.ready.is_empty()
    }

    /// Runs a single iteration of the event loop.
    ///
    /// Either dispatches the front of the ready list for one slice or, if
    /// nothing is ready, moves the clock forward to the next arrival.
    /// Returns `false` once there is nothing left to do.
    pub fn step(&mut self) -> Result<bool, SimError> {
        if self.ready.is_empty() {
            if self.incoming.is_empty() {
                return Ok(false);
            }

            let process = self.incoming.remove_front()?;
            self.stats.advance_to(process.arrival_time);
            trace!(
                "CPU idle, advancing to arrival of process {} at {}",
                process.id,
                self.stats.current_time
            );
            self.ready.insert(process, PriorityKey::ArrivalTime);
            return Ok(true);
        }

        let mut process = self.ready.remove_front()?;
        self.dispatch(&mut process)?;

        let preempted = self.run_slice(&mut process);
        self.admit_arrivals()?;
        process.last_scheduled_time = self.stats.current_time;

        if preempted {
            debug!(
                "Process {} preempted at {} with {} remaining",
                process.id, self.stats.current_time, process.remaining_time
            );
            self.ready.insert(process, PriorityKey::LastScheduledTime);
        } else {
            self.finish(process);
        }

        Ok(self.has_work())
    }

    /// Runs until both the incoming and the ready list are empty
    pub fn run_to_completion(&mut self) -> Result<&RunStats, SimError> {
        while self.step()? {}
        Ok(&self.stats)
    }

    /// Runs the whole workload and hands back the results
    pub fn run(mut self) -> Result<SimulationOutcome<E>, SimError> {
        self.run_to_completion()?;

        Ok(SimulationOutcome {
            completed: self.completed,
            stats: self.stats,
            events: self.events,
        })
    }

    /// Makes room for `process` and reports that it starts running
    fn dispatch(&mut self, process: &mut Process) -> Result<(), SimError> {
        let now = self.stats.current_time;
        let admission = self.allocator.admit(process, &mut self.ready)?;

        if !admission.evicted_frames.is_empty() {
            self.events.record(SimEvent::Evicted {
                time: now,
                frames: admission.evicted_frames,
            });
        }

        if self.config.scheduling == SchedulingAlgorithm::RoundRobin
            && process.page_fault_count as Time >= self.config.quantum
        {
            warn!(
                "Process {} is charged {} faults with a quantum of {} and makes no progress this slice",
                process.id, process.page_fault_count, self.config.quantum
            );
        }

        let memory = self.allocator.mode().is_bounded().then(|| MemorySnapshot {
            load_time: process.pending_load_time,
            memory_usage: self.allocator.frames().memory_usage(),
            frames: process.resident_frames.clone(),
        });

        debug!("Dispatching process {} at {}", process.id, now);
        self.events.record(SimEvent::Running {
            time: now,
            process_id: process.id,
            remaining_time: process.remaining_time,
            memory,
        });

        Ok(())
    }

    /// Advances the clock by one slice of `process`
    ///
    /// Returns `true` if the process has to be requeued.
    fn run_slice(&mut self, process: &mut Process) -> bool {
        match self.config.scheduling {
            SchedulingAlgorithm::FirstArrival | SchedulingAlgorithm::ShortestJobFirst => {
                self.stats
                    .advance_by(process.job_time + process.pending_load_time);
                false
            }
            SchedulingAlgorithm::RoundRobin => {
                let slice = process.remaining_time.min(self.config.quantum);
                process.remaining_time -= slice;
                self.stats.advance_by(slice + process.pending_load_time);
                process.remaining_time > 0
            }
        }
    }

    /// Moves every process that arrived by now into the ready list
    fn admit_arrivals(&mut self) -> Result<(), SimError> {
        let key = self.config.scheduling.arrival_key();

        while let Some(next) = self.incoming.front() {
            if next.arrival_time > self.stats.current_time {
                break;
            }

            let process = self.incoming.remove_front()?;
            trace!("Process {} arrived at {}", process.id, process.arrival_time);
            self.ready.insert(process, key);
        }

        Ok(())
    }

    fn finish(&mut self, mut process: Process) {
        let now = self.stats.current_time;
        self.stats.record_completion(&process);
        process.completion_time = now;

        if self.allocator.mode().is_bounded() {
            let released = self.allocator.release(&mut process);
            self.events.record(SimEvent::Evicted {
                time: now,
                frames: released,
            });
        }

        debug!(
            "Process {} finished at {} (turnaround {})",
            process.id,
            now,
            process.turnaround()
        );
        self.events.record(SimEvent::Finished {
            time: now,
            process_id: process.id,
            processes_remaining: self.ready.len(),
        });

        self.completed.insert(process, PriorityKey::CompletionTime);
    }
}
