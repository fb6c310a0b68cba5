use std::fmt;

use serde::Serialize;

use super::state::{Pid, Process, Ticks};

/// One contiguous dispatch of a process, covering `[t0, t1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slice {
    pub pid: Pid,
    pub t0: Ticks,
    pub t1: Ticks,
}

impl Slice {
    pub fn len(&self) -> Ticks {
        self.t1 - self.t0
    }

    pub fn is_empty(&self) -> bool {
        self.t1 == self.t0
    }
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}-{}] P{}", self.t0, self.t1, self.pid)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub process: Process,
    pub start: Ticks,
    pub finish: Ticks,
}

impl Completion {
    pub fn turnaround(&self) -> Ticks {
        self.finish - self.process.arrival
    }

    pub fn waiting(&self) -> Ticks {
        self.turnaround() - self.process.burst
    }

    pub fn response(&self) -> Ticks {
        self.start - self.process.arrival
    }
}

/// Everything an engine produces: one completion per process and the
/// dispatch slices in time order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    pub completions: Vec<Completion>,
    pub slices: Vec<Slice>,
}

impl Schedule {
    pub fn makespan(&self) -> Ticks {
        self.slices.last().map_or(0, |s| s.t1)
    }

    pub fn completion(&self, pid: Pid) -> Option<&Completion> {
        self.completions.iter().find(|c| c.process.pid == pid)
    }
}
