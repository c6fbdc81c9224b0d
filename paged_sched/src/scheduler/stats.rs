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

use crate::process::{Process, Time};

/// Clock and run level aggregates of a simulation
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct RunStats {
    /// Never decreases. Equals the makespan once the run is over
    pub current_time: Time,

    pub completed_count: usize,

    /// Sum of `completion - arrival` over all finished processes
    pub total_turnaround: Time,

    /// Sum of `turnaround / job_time` over all finished processes
    pub total_overhead_ratio: f64,

    pub max_overhead_ratio: f64,
}

impl RunStats {
    pub fn makespan(&self) -> Time {
        self.current_time
    }

    pub(crate) fn advance_to(&mut self, time: Time) {
        self.current_time = self.current_time.max(time);
    }

    pub(crate) fn advance_by(&mut self, duration: Time) {
        self.current_time += duration;
    }

    /// Folds a process that finishes at the current time into the aggregates
    pub(crate) fn record_completion(&mut self, process: &Process) {
        let turnaround = self.current_time - process.arrival_time;
        self.total_turnaround += turnaround;

        let overhead = turnaround as f64 / process.job_time as f64;
        self.total_overhead_ratio += overhead;
        if overhead > self.max_overhead_ratio {
            self.max_overhead_ratio = overhead;
        }

        self.completed_count += 1;
    }

    pub fn average_turnaround(&self) -> f64 {
        if self.completed_count == 0 {
            return 0.0;
        }
        self.total_turnaround as f64 / self.completed_count as f64
    }

    pub fn average_overhead_ratio(&self) -> f64 {
        if self.completed_count == 0 {
            return 0.0;
        }
        self.total_overhead_ratio / self.completed_count as f64
    }
}
