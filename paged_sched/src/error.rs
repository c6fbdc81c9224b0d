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

use thiserror::Error;

use crate::process::ProcessId;

/// Every way a simulation can stop early.
///
/// None of these are recoverable at runtime: they either point at a broken
/// precondition on the input/configuration or at a programming error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error("tried to remove a process from an empty list")]
    EmptyCollection,

    #[error("index {index} is out of range for a list of {len} processes")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("unknown priority key `{0}`")]
    UnknownPriorityKey(String),

    /// Either a single process needs more frames than exist, or eviction ran
    /// out of resident pages before it could free enough frames.
    #[error("process {process_id} requires {required} frames but only {capacity} can be made available")]
    AllocationCapacityExceeded {
        process_id: ProcessId,
        required: usize,
        capacity: usize,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid process {process_id}: {reason}")]
    InvalidProcess {
        process_id: ProcessId,
        reason: String,
    },

    #[error("malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },
}
