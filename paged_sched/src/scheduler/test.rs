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

use super::{LogEventSink, MemorySnapshot, Scheduler, SimEvent};
use crate::{
    error::SimError,
    process::{ProcessId, ProcessSpec, Time},
    sim_config::{MemoryMode, SchedulingAlgorithm, SimConfig},
};

fn running(time: Time, process_id: ProcessId, remaining_time: Time) -> SimEvent {
    SimEvent::Running {
        time,
        process_id,
        remaining_time,
        memory: None,
    }
}

fn running_with_memory(
    time: Time,
    process_id: ProcessId,
    remaining_time: Time,
    load_time: Time,
    memory_usage: i64,
    frames: &[usize],
) -> SimEvent {
    SimEvent::Running {
        time,
        process_id,
        remaining_time,
        memory: Some(MemorySnapshot {
            load_time,
            memory_usage,
            frames: frames.to_vec(),
        }),
    }
}

fn evicted(time: Time, frames: &[usize]) -> SimEvent {
    SimEvent::Evicted {
        time,
        frames: frames.to_vec(),
    }
}

fn finished(time: Time, process_id: ProcessId, processes_remaining: usize) -> SimEvent {
    SimEvent::Finished {
        time,
        process_id,
        processes_remaining,
    }
}

fn scheduler(config: SimConfig, specs: &[(Time, ProcessId, u64, Time)]) -> Scheduler<Vec<SimEvent>> {
    let mut scheduler = Scheduler::new(config, Vec::new()).unwrap();
    for &(arrival, id, bytes, job) in specs {
        scheduler
            .submit(ProcessSpec::new(arrival, id, bytes, job))
            .unwrap();
    }
    scheduler
}

fn completion_order(scheduler: &Scheduler<Vec<SimEvent>>) -> Vec<ProcessId> {
    scheduler.completed().iter().map(|p| p.get_id()).collect()
}

#[test]
fn test_first_arrival_unlimited() {
    let config = SimConfig::new(SchedulingAlgorithm::FirstArrival, MemoryMode::Unlimited);
    let outcome = scheduler(config, &[(0, 1, 100, 500), (0, 2, 100, 200)])
        .run()
        .unwrap();

    assert_eq!(
        outcome.events,
        vec![
            running(0, 1, 500),
            finished(500, 1, 1),
            running(500, 2, 200),
            finished(700, 2, 0),
        ]
    );
    assert_eq!(outcome.stats.makespan(), 700);
    assert_eq!(outcome.stats.completed_count, 2);
    assert_eq!(outcome.stats.total_turnaround, 1200);
    assert_eq!(outcome.stats.max_overhead_ratio, 3.5);
}

#[test]
fn test_round_robin_unlimited() {
    let config = SimConfig::new(SchedulingAlgorithm::RoundRobin, MemoryMode::Unlimited)
        .with_quantum(3);
    let outcome = scheduler(config, &[(0, 1, 0, 5), (0, 2, 0, 5)]).run().unwrap();

    assert_eq!(
        outcome.events,
        vec![
            running(0, 1, 5),
            running(3, 2, 5),
            running(6, 1, 2),
            finished(8, 1, 1),
            running(8, 2, 2),
            finished(10, 2, 0),
        ]
    );
    assert_eq!(outcome.stats.makespan(), 10);
    assert_eq!(outcome.stats.total_turnaround, 18);
    assert!((outcome.stats.total_overhead_ratio - 3.6).abs() < 1e-9);
    assert_eq!(outcome.stats.max_overhead_ratio, 2.0);

    let completion: Vec<(ProcessId, Time)> = outcome
        .completed
        .iter()
        .map(|p| (p.get_id(), p.get_completion_time()))
        .collect();
    assert_eq!(completion, vec![(1, 8), (2, 10)]);
}

#[test]
fn test_shortest_job_first_orders_arrivals_by_job_time() {
    let config = SimConfig::new(SchedulingAlgorithm::ShortestJobFirst, MemoryMode::Unlimited);
    let mut scheduler = scheduler(config, &[(0, 1, 0, 10), (1, 2, 0, 8), (2, 3, 0, 3)]);

    scheduler.run_to_completion().unwrap();

    assert_eq!(completion_order(&scheduler), vec![1, 3, 2]);
    assert_eq!(scheduler.current_time(), 21);
}

#[test]
fn test_first_arrival_ignores_job_time() {
    let config = SimConfig::new(SchedulingAlgorithm::FirstArrival, MemoryMode::Unlimited);
    let mut scheduler = scheduler(config, &[(0, 1, 0, 10), (1, 2, 0, 8), (2, 3, 0, 3)]);

    scheduler.run_to_completion().unwrap();

    assert_eq!(completion_order(&scheduler), vec![1, 2, 3]);
}

#[test]
fn test_idle_cpu_jumps_to_next_arrival() {
    let config = SimConfig::new(SchedulingAlgorithm::FirstArrival, MemoryMode::Unlimited);
    let outcome = scheduler(config, &[(30, 2, 0, 5), (5, 1, 0, 10)])
        .run()
        .unwrap();

    assert_eq!(
        outcome.events,
        vec![
            running(5, 1, 10),
            finished(15, 1, 0),
            running(30, 2, 5),
            finished(35, 2, 0),
        ]
    );
    assert_eq!(outcome.stats.total_turnaround, 15);
}

#[test]
fn test_swapping_releases_frames_on_finish() {
    let config = SimConfig::new(SchedulingAlgorithm::FirstArrival, MemoryMode::Swapping)
        .with_memory_size(16);
    let outcome = scheduler(config, &[(0, 1, 16, 5), (0, 2, 8, 3)]).run().unwrap();

    assert_eq!(
        outcome.events,
        vec![
            running_with_memory(0, 1, 5, 8, 100, &[0, 1, 2, 3]),
            evicted(13, &[0, 1, 2, 3]),
            finished(13, 1, 1),
            running_with_memory(13, 2, 3, 4, 50, &[0, 1]),
            evicted(20, &[0, 1]),
            finished(20, 2, 0),
        ]
    );
    assert_eq!(outcome.stats.makespan(), 20);
}

#[test]
fn test_round_robin_virtual_memory() {
    let config = SimConfig::new(SchedulingAlgorithm::RoundRobin, MemoryMode::VirtualMemory)
        .with_total_frames(4)
        .with_quantum(5);
    let outcome = scheduler(config, &[(0, 1, 32, 6), (0, 2, 16, 4)]).run().unwrap();

    let all = [0, 1, 2, 3];
    assert_eq!(
        outcome.events[..6],
        [
            // only 4 of 8 pages fit, the 4 missing pages are added to the remaining time
            running_with_memory(0, 1, 10, 8, 100, &all),
            evicted(13, &all),
            running_with_memory(13, 2, 4, 8, 100, &all),
            evicted(25, &all),
            finished(25, 2, 1),
            running_with_memory(25, 1, 9, 8, 100, &all),
        ]
    );
    // already at the threshold, nothing to load but the penalty is charged again
    assert_eq!(outcome.events[6], running_with_memory(38, 1, 8, 0, 100, &all));
    assert_eq!(
        outcome.events[outcome.events.len() - 2..],
        [evicted(58, &all), finished(58, 1, 0)]
    );
    assert_eq!(outcome.stats.makespan(), 58);
    assert_eq!(outcome.stats.total_turnaround, 83);
}

#[test]
fn test_residency_holds_after_every_step() {
    let config = SimConfig::new(SchedulingAlgorithm::RoundRobin, MemoryMode::Custom)
        .with_total_frames(6)
        .with_quantum(4);
    let mut scheduler = scheduler(
        config,
        &[(0, 1, 20, 9), (1, 2, 8, 3), (2, 3, 24, 7), (2, 4, 4, 12), (40, 5, 16, 2)],
    );

    while scheduler.step().unwrap() {
        let processes = scheduler
            .ready()
            .iter()
            .chain(scheduler.incoming().iter())
            .chain(scheduler.completed().iter());
        assert!(scheduler.allocator().verify_residency(processes));
    }

    assert_eq!(scheduler.completed().len(), 5);
    assert_eq!(scheduler.allocator().frames().free_frame_count(), 6);
}

#[test]
fn test_fully_resident_process_loads_nothing() {
    let config = SimConfig::new(SchedulingAlgorithm::RoundRobin, MemoryMode::Swapping)
        .with_total_frames(4)
        .with_quantum(2);
    let outcome = scheduler(config, &[(0, 1, 8, 4)]).run().unwrap();

    assert_eq!(
        outcome.events,
        vec![
            running_with_memory(0, 1, 4, 4, 50, &[0, 1]),
            running_with_memory(6, 1, 2, 0, 50, &[0, 1]),
            evicted(8, &[0, 1]),
            finished(8, 1, 0),
        ]
    );
}

#[test]
fn test_submit_rejects_invalid_processes() {
    let config = SimConfig::new(SchedulingAlgorithm::FirstArrival, MemoryMode::Swapping)
        .with_total_frames(4);
    let mut scheduler = Scheduler::new(config, Vec::new()).unwrap();

    scheduler.submit(ProcessSpec::new(0, 1, 16, 5)).unwrap();
    assert!(matches!(
        scheduler.submit(ProcessSpec::new(3, 1, 4, 5)),
        Err(SimError::InvalidProcess { process_id: 1, .. })
    ));
    assert!(matches!(
        scheduler.submit(ProcessSpec::new(0, 2, 4, 0)),
        Err(SimError::InvalidProcess { process_id: 2, .. })
    ));
    assert_eq!(
        scheduler.submit(ProcessSpec::new(0, 3, 20, 5)),
        Err(SimError::AllocationCapacityExceeded {
            process_id: 3,
            required: 5,
            capacity: 4,
        })
    );
    assert_eq!(scheduler.incoming().len(), 1);
}

#[test]
fn test_unlimited_accepts_any_size() {
    let config = SimConfig::new(SchedulingAlgorithm::FirstArrival, MemoryMode::Unlimited);
    let mut scheduler = Scheduler::new(config, Vec::new()).unwrap();
    assert!(scheduler.submit(ProcessSpec::new(0, 1, u32::MAX as u64, 5)).is_ok());
}

#[test]
fn test_partial_modes_accept_processes_larger_than_memory() {
    let config = SimConfig::new(SchedulingAlgorithm::RoundRobin, MemoryMode::VirtualMemory)
        .with_total_frames(4);
    let mut scheduler = Scheduler::new(config, Vec::new()).unwrap();
    assert!(scheduler.submit(ProcessSpec::new(0, 1, 32, 5)).is_ok());
    assert!(scheduler.submit(ProcessSpec::new(0, 2, 400, 5)).is_ok());

    // only the pages needed to run have to fit
    let config = SimConfig::new(SchedulingAlgorithm::RoundRobin, MemoryMode::Custom)
        .with_total_frames(2);
    let mut scheduler = Scheduler::new(config, Vec::new()).unwrap();
    assert!(scheduler.submit(ProcessSpec::new(0, 1, 8, 5)).is_ok());
    assert_eq!(
        scheduler.submit(ProcessSpec::new(0, 2, 12, 5)),
        Err(SimError::AllocationCapacityExceeded {
            process_id: 2,
            required: 3,
            capacity: 2,
        })
    );
    assert_eq!(
        scheduler.submit(ProcessSpec::new(0, 3, 40, 5)),
        Err(SimError::AllocationCapacityExceeded {
            process_id: 3,
            required: 4,
            capacity: 2,
        })
    );
}

#[test]
fn test_bounded_finish_always_reports_release() {
    let config = SimConfig::new(SchedulingAlgorithm::FirstArrival, MemoryMode::Swapping)
        .with_total_frames(4);
    let outcome = scheduler(config, &[(0, 1, 0, 5)]).run().unwrap();

    assert_eq!(
        outcome.events,
        vec![
            running_with_memory(0, 1, 5, 0, 0, &[]),
            evicted(5, &[]),
            finished(5, 1, 0),
        ]
    );
}

#[test]
fn test_new_rejects_invalid_config() {
    let config = SimConfig::new(SchedulingAlgorithm::FirstArrival, MemoryMode::VirtualMemory);
    assert!(matches!(
        Scheduler::new(config, Vec::new()),
        Err(SimError::InvalidConfig(_))
    ));
}

#[test]
fn test_empty_workload() {
    let config = SimConfig::default();
    let mut scheduler = Scheduler::new(config, Vec::new()).unwrap();

    assert!(!scheduler.step().unwrap());
    assert_eq!(scheduler.current_time(), 0);
    assert!(scheduler.events().is_empty());
}

#[test]
fn test_borrowed_and_log_sinks() {
    let _ = env_logger::builder().is_test(true).try_init();
    let config = SimConfig::new(SchedulingAlgorithm::RoundRobin, MemoryMode::Unlimited)
        .with_quantum(3);
    let specs = [ProcessSpec::new(0, 1, 0, 5), ProcessSpec::new(0, 2, 0, 5)];

    let mut events: Vec<SimEvent> = Vec::new();
    let mut borrowed = Scheduler::new(config.clone(), &mut events).unwrap();
    borrowed.submit_all(specs).unwrap();
    let borrowed_stats = borrowed.run_to_completion().unwrap().clone();
    drop(borrowed);
    assert_eq!(events.len(), 6);

    let mut logged = Scheduler::new(config, LogEventSink).unwrap();
    logged.submit_all(specs).unwrap();
    assert_eq!(logged.run_to_completion().unwrap(), &borrowed_stats);
}
