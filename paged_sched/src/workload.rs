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

use crate::{error::SimError, process::ProcessSpec};

/// Parses a workload with one process per line:
/// `arrival_time id memory_requested job_time`.
///
/// Blank lines are skipped. Records are returned in the order they appear.
pub fn parse_workload(text: &str) -> Result<Vec<ProcessSpec>, SimError> {
    let mut specs = Vec::new();

    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        specs.push(parse_record(line, index + 1)?);
    }

    Ok(specs)
}

fn parse_record(line: &str, line_number: usize) -> Result<ProcessSpec, SimError> {
    let malformed = |reason: String| SimError::MalformedRecord {
        line: line_number,
        reason,
    };

    let mut fields = [0u64; 4];
    let mut tokens = line.split_whitespace();
    for (i, field) in fields.iter_mut().enumerate() {
        let token = tokens
            .next()
            .ok_or_else(|| malformed(format!("expected 4 fields, found {}", i)))?;
        *field = token
            .parse()
            .map_err(|_| malformed(format!("'{}' is not an unsigned integer", token)))?;
    }

    if tokens.next().is_some() {
        return Err(malformed("expected 4 fields, found more".into()));
    }

    let [arrival_time, id, bytes_requested, job_time] = fields;
    Ok(ProcessSpec::new(arrival_time, id, bytes_requested, job_time))
}
