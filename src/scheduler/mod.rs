pub mod fcfs;
pub mod rr;
pub mod sjf;

use std::{fmt, num::NonZeroU64};

use crate::{
    SimError,
    core::{ProcessSet, Schedule, Ticks},
};
pub use fcfs::Fcfs;
pub use rr::RoundRobin;
pub use sjf::Sjf;

pub const DEFAULT_QUANTUM: Ticks = 4;

pub trait Scheduler {
    fn name(&self) -> &'static str;

    /// Fixed slice length for preemptive policies, `None` when a dispatched
    /// process always runs to completion.
    fn quantum(&self) -> Option<NonZeroU64> {
        None
    }

    fn schedule(&self, processes: &ProcessSet) -> Schedule;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Fcfs,
    Sjf,
    RoundRobin { quantum: NonZeroU64 },
}

impl Algorithm {
    /// `quantum` is only looked at for `rr`.
    pub fn parse(name: &str, quantum: Ticks) -> Result<Self, SimError> {
        match name.to_ascii_lowercase().as_str() {
            "fcfs" => Ok(Self::Fcfs),
            "sjf" => Ok(Self::Sjf),
            "rr" | "round_robin" => Ok(Self::RoundRobin {
                quantum: RoundRobin::new(quantum)?.quantum_ticks(),
            }),
            other => Err(SimError::invalid(format!(
                "unknown algorithm '{other}', expected fcfs, sjf or rr"
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Fcfs => Fcfs.name(),
            Self::Sjf => Sjf.name(),
            Self::RoundRobin { .. } => "rr",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RoundRobin { quantum } => write!(f, "rr (quantum {quantum})"),
            _ => f.write_str(self.name()),
        }
    }
}

/// Runs FCFS and returns completions in arrival order.
pub fn run_fcfs(processes: &ProcessSet) -> Schedule {
    Fcfs.schedule(processes)
}

/// Runs non-preemptive SJF and returns completions in input order.
pub fn run_sjf(processes: &ProcessSet) -> Schedule {
    Sjf.schedule(processes)
}

/// Runs Round-Robin and returns completions in arrival order plus the
/// slice timeline. Fails on a zero quantum.
pub fn run_rr(processes: &ProcessSet, quantum: Ticks) -> Result<Schedule, SimError> {
    Ok(RoundRobin::new(quantum)?.schedule(processes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_algorithm_names() {
        assert_eq!(Algorithm::parse("FCFS", 0).unwrap(), Algorithm::Fcfs);
        assert_eq!(Algorithm::parse("sjf", 0).unwrap(), Algorithm::Sjf);
        assert_eq!(
            Algorithm::parse("rr", 3).unwrap(),
            Algorithm::RoundRobin {
                quantum: NonZeroU64::new(3).unwrap()
            }
        );
    }

    #[test]
    fn rejects_zero_quantum_and_unknown_names() {
        assert!(matches!(
            Algorithm::parse("rr", 0),
            Err(SimError::InvalidArgument(_))
        ));
        assert!(matches!(
            Algorithm::parse("lottery", 4),
            Err(SimError::InvalidArgument(_))
        ));
        assert!(matches!(
            run_rr(&ProcessSet::default(), 0),
            Err(SimError::InvalidArgument(_))
        ));
    }

    #[test]
    fn displays_quantum() {
        let rr = Algorithm::parse("rr", 2).unwrap();
        assert_eq!(rr.to_string(), "rr (quantum 2)");
        assert_eq!(Algorithm::Sjf.to_string(), "sjf");
    }
}
