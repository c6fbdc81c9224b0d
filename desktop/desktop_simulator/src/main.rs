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

use std::{fs, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{debug, info};
use paged_sched::{
    parse_workload, MemoryMode, PerformanceReport, Scheduler, SchedulingAlgorithm, SimConfig,
    SimEvent, DEFAULT_QUANTUM,
};
use serde::Serialize;

/// Simulates CPU scheduling together with paged memory allocation
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Workload file, one `arrival id memory job_time` record per line
    #[arg(short = 'f', long = "file")]
    file: PathBuf,

    /// Scheduling algorithm: ff, rr or cs
    #[arg(short = 'a', long = "algorithm")]
    scheduling: SchedulingAlgorithm,

    /// Memory allocation: u, p, v or cm
    #[arg(short = 'm', long = "memory")]
    memory: MemoryMode,

    /// Memory size, required unless memory is unlimited
    #[arg(short = 's', long = "size")]
    memory_size: Option<u64>,

    /// Round-robin quantum
    #[arg(short = 'q', long = "quantum", default_value_t = DEFAULT_QUANTUM)]
    quantum: u64,

    /// Print a single JSON document instead of the transcript
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    config: &'a SimConfig,
    events: &'a [SimEvent],
    report: &'a PerformanceReport,
}

fn build_config(args: &Args) -> Result<SimConfig> {
    let mut config = SimConfig::new(args.scheduling, args.memory).with_quantum(args.quantum);

    match (args.memory.is_bounded(), args.memory_size) {
        (true, Some(size)) => config = config.with_memory_size(size),
        (true, None) => bail!("memory mode '{}' needs a memory size (-s)", args.memory),
        (false, _) => {}
    }

    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};
    Builder::from_env(Env::default())
        .format_module_path(false)
        .init();

    let args = Args::parse();
    let config = build_config(&args)?;
    debug!("Running with {:?}", config);

    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("could not read workload {}", args.file.display()))?;
    let workload = parse_workload(&text)
        .with_context(|| format!("invalid workload {}", args.file.display()))?;
    info!("Loaded {} processes", workload.len());

    let mut scheduler = Scheduler::new(config.clone(), Vec::new())?;
    scheduler
        .submit_all(workload)
        .context("workload does not fit the configuration")?;
    let outcome = scheduler.run()?;

    let report = PerformanceReport::new(outcome.completed.iter(), &outcome.stats);

    if args.json {
        let output = JsonOutput {
            config: &config,
            events: &outcome.events,
            report: &report,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for event in &outcome.events {
            println!("{}", event);
        }
        println!("{}", report);
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use clap::Parser;
    use paged_sched::{MemoryMode, SchedulingAlgorithm};

    use super::{build_config, Args};

    #[test]
    fn test_parse_args() {
        let args = Args::parse_from(["sim", "-f", "in.txt", "-a", "rr", "-m", "v", "-s", "64", "-q", "3"]);
        let config = build_config(&args).unwrap();

        assert_eq!(config.scheduling, SchedulingAlgorithm::RoundRobin);
        assert_eq!(config.memory, MemoryMode::VirtualMemory);
        assert_eq!(config.total_frames, 16);
        assert_eq!(config.quantum, 3);
        assert!(!args.json);
    }

    #[test]
    fn test_bounded_memory_needs_size() {
        let args = Args::parse_from(["sim", "-f", "in.txt", "-a", "ff", "-m", "p"]);
        assert!(build_config(&args).is_err());

        let args = Args::parse_from(["sim", "-f", "in.txt", "-a", "ff", "-m", "u"]);
        assert_eq!(build_config(&args).unwrap().total_frames, 0);
    }

    #[test]
    fn test_rejects_unknown_algorithm() {
        assert!(Args::try_parse_from(["sim", "-f", "in.txt", "-a", "lifo", "-m", "u"]).is_err());
    }
}
