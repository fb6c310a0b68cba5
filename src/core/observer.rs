use std::num::NonZeroU64;

use rustc_hash::FxHashMap;
use thiserror::Error;

use super::{
    schedule::{Completion, Schedule, Slice},
    state::{Pid, ProcessSet, Ticks},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("expected {expected} completions, got {actual}")]
    CompletionCount { expected: usize, actual: usize },

    #[error("P{pid} started at {start} before arriving at {arrival}")]
    EarlyStart { pid: Pid, start: Ticks, arrival: Ticks },

    #[error("P{pid} finished at {finish} before starting at {start}")]
    FinishBeforeStart { pid: Pid, start: Ticks, finish: Ticks },

    #[error("P{pid} held the CPU for {held} ticks but its burst is {burst}")]
    NonPreemptiveSpan { pid: Pid, held: Ticks, burst: Ticks },

    #[error("P{pid} was served {served} ticks but its burst is {burst}")]
    Conservation { pid: Pid, served: Ticks, burst: Ticks },

    #[error("empty slice {slice}")]
    EmptySlice { slice: Slice },

    #[error("slice {next} overlaps {prev}")]
    Overlap { prev: Slice, next: Slice },

    #[error("slice {slice} exceeds the quantum of {quantum}")]
    QuantumExceeded { slice: Slice, quantum: Ticks },

    #[error("slice {slice} is shorter than the quantum of {quantum} but is not a final slice")]
    ShortSlice { slice: Slice, quantum: Ticks },

    #[error("P{pid} completion [{start}-{finish}] disagrees with its slices")]
    TimelineMismatch { pid: Pid, start: Ticks, finish: Ticks },

    #[error("CPU idle from {since} to {until} while P{pid} was ready")]
    IdleWithWork { since: Ticks, until: Ticks, pid: Pid },

    #[error("CPU idle from {since} to {until}, next arrival was {expected:?}")]
    IdleOvershoot {
        since: Ticks,
        until: Ticks,
        expected: Option<Ticks>,
    },
}

/// Checks a finished schedule against the properties every engine must hold.
#[derive(Debug, Clone, Copy)]
pub struct Observer {
    quantum: Option<NonZeroU64>,
}

// Everything recorded under one pid; several processes may share it
#[derive(Debug, Default)]
struct Service {
    burst: Ticks,
    served: Ticks,
    spans: Vec<(Ticks, Ticks)>,
    slices: Vec<Slice>,
}

impl Observer {
    pub fn non_preemptive() -> Self {
        Self { quantum: None }
    }

    pub fn round_robin(quantum: NonZeroU64) -> Self {
        Self {
            quantum: Some(quantum),
        }
    }

    pub fn check(&self, processes: &ProcessSet, schedule: &Schedule) -> Result<(), Violation> {
        if schedule.completions.len() != processes.len() {
            return Err(Violation::CompletionCount {
                expected: processes.len(),
                actual: schedule.completions.len(),
            });
        }

        for c in &schedule.completions {
            self.check_completion(c)?;
        }

        self.check_slices(&schedule.slices)?;
        self.check_service(schedule)?;
        self.check_idle(schedule)
    }

    fn check_completion(&self, c: &Completion) -> Result<(), Violation> {
        let pid = c.process.pid;
        if c.start < c.process.arrival {
            return Err(Violation::EarlyStart {
                pid,
                start: c.start,
                arrival: c.process.arrival,
            });
        }
        if c.finish < c.start {
            return Err(Violation::FinishBeforeStart {
                pid,
                start: c.start,
                finish: c.finish,
            });
        }
        if self.quantum.is_none() && c.finish - c.start != c.process.burst {
            return Err(Violation::NonPreemptiveSpan {
                pid,
                held: c.finish - c.start,
                burst: c.process.burst,
            });
        }
        Ok(())
    }

    fn check_slices(&self, slices: &[Slice]) -> Result<(), Violation> {
        for &slice in slices {
            if slice.is_empty() {
                return Err(Violation::EmptySlice { slice });
            }
            if let Some(q) = self.quantum {
                if slice.len() > q.get() {
                    return Err(Violation::QuantumExceeded {
                        slice,
                        quantum: q.get(),
                    });
                }
            }
        }

        for pair in slices.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            if prev.t1 > next.t0 {
                return Err(Violation::Overlap { prev, next });
            }
        }
        Ok(())
    }

    // Aggregated per pid so duplicate pids still balance
    fn check_service(&self, schedule: &Schedule) -> Result<(), Violation> {
        let mut service: FxHashMap<Pid, Service> = FxHashMap::default();

        for c in &schedule.completions {
            let entry = service.entry(c.process.pid).or_default();
            entry.burst += c.process.burst;
            entry.spans.push((c.start, c.finish));
        }

        for &slice in &schedule.slices {
            let entry = service.entry(slice.pid).or_default();
            entry.served += slice.len();
            entry.slices.push(slice);
        }

        for (&pid, s) in &mut service {
            if s.served != s.burst {
                return Err(Violation::Conservation {
                    pid,
                    served: s.served,
                    burst: s.burst,
                });
            }
            s.spans.sort_unstable();
            match self.quantum {
                None => Self::check_single_dispatch(pid, s)?,
                Some(q) => Self::check_preempted(pid, s, q.get())?,
            }
        }
        Ok(())
    }

    // Non-preemptive: exactly one slice per process, spanning start..finish
    fn check_single_dispatch(pid: Pid, s: &Service) -> Result<(), Violation> {
        let slices = s.slices.iter().map(|sl| (sl.t0, sl.t1));
        for (span, slice) in s.spans.iter().zip(slices) {
            if *span != slice {
                return Err(Violation::TimelineMismatch {
                    pid,
                    start: span.0,
                    finish: span.1,
                });
            }
        }
        if s.spans.len() != s.slices.len() {
            let &(start, finish) = s.spans.first().unwrap_or(&(0, 0));
            return Err(Violation::TimelineMismatch { pid, start, finish });
        }
        Ok(())
    }

    // Start is some slice's t0 and finish some slice's t1, the pid's slices
    // run from its earliest start to its latest finish, and a short slice
    // must end a process.
    fn check_preempted(pid: Pid, s: &Service, quantum: Ticks) -> Result<(), Violation> {
        let (Some(first), Some(last)) = (s.slices.first(), s.slices.last()) else {
            return Ok(());
        };
        let earliest = s.spans.iter().map(|&(start, _)| start).min();
        let latest = s.spans.iter().map(|&(_, finish)| finish).max();

        for &(start, finish) in &s.spans {
            let starts = s.slices.iter().any(|sl| sl.t0 == start);
            let ends = s.slices.iter().any(|sl| sl.t1 == finish);
            if !starts || !ends || earliest != Some(first.t0) || latest != Some(last.t1) {
                return Err(Violation::TimelineMismatch { pid, start, finish });
            }
        }

        for &slice in &s.slices {
            if slice.len() < quantum && !s.spans.iter().any(|&(_, finish)| finish == slice.t1) {
                return Err(Violation::ShortSlice { slice, quantum });
            }
        }
        Ok(())
    }

    fn check_idle(&self, schedule: &Schedule) -> Result<(), Violation> {
        let mut cpu_free_at = 0;
        for slice in &schedule.slices {
            if slice.t0 > cpu_free_at {
                Self::check_gap(&schedule.completions, cpu_free_at, slice.t0)?;
            }
            cpu_free_at = slice.t1;
        }
        Ok(())
    }

    // An idle gap is legal only if nothing was ready and it ends at the next arrival
    fn check_gap(completions: &[Completion], since: Ticks, until: Ticks) -> Result<(), Violation> {
        let mut next_arrival: Option<Ticks> = None;
        for c in completions.iter().filter(|c| c.finish > since) {
            if c.process.arrival <= since {
                return Err(Violation::IdleWithWork {
                    since,
                    until,
                    pid: c.process.pid,
                });
            }
            let arrival = c.process.arrival;
            next_arrival = Some(next_arrival.map_or(arrival, |t| t.min(arrival)));
        }

        if next_arrival != Some(until) {
            return Err(Violation::IdleOvershoot {
                since,
                until,
                expected: next_arrival,
            });
        }
        Ok(())
    }
}
