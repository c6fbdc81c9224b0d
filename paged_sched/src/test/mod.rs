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

use crate::{
    parse_workload, PerformanceReport, Scheduler, SimConfig, SimEvent, SimulationOutcome,
};


pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Runs a workload given in the input file format
pub(crate) fn run_workload(config: SimConfig, text: &str) -> SimulationOutcome<Vec<SimEvent>> {
    init_logger();

    let mut scheduler = Scheduler::new(config, Vec::new()).unwrap();
    scheduler.submit_all(parse_workload(text).unwrap()).unwrap();
    scheduler.run().unwrap()
}

/// Transcript lines followed by the report lines
pub(crate) fn render(outcome: &SimulationOutcome<Vec<SimEvent>>) -> Vec<String> {
    let report = PerformanceReport::new(outcome.completed.iter(), &outcome.stats);

    outcome
        .events
        .iter()
        .map(|event| event.to_string())
        .chain(report.to_string().lines().map(str::to_owned))
        .collect()
}
