use rand::prelude::*;

use crate::{
    SimError,
    core::{Process, ProcessSet, Ticks},
};

/// Bernoulli arrivals with a bimodal burst length.
#[derive(Debug, Clone, Copy)]
pub struct WorkloadSpec {
    pub ticks: Ticks,
    pub p_arrival: f64,
    pub p_short: f64,
    pub short_burst: Ticks,
    pub long_burst: Ticks,
    pub seed: u64,
}

impl Default for WorkloadSpec {
    fn default() -> Self {
        Self {
            ticks: 40,
            p_arrival: 0.3,
            p_short: 0.3,
            short_burst: 2,
            long_burst: 6,
            seed: 0,
        }
    }
}

pub fn bernoulli(spec: &WorkloadSpec) -> Result<ProcessSet, SimError> {
    for (name, p) in [("p_arrival", spec.p_arrival), ("p_short", spec.p_short)] {
        if !(0.0..=1.0).contains(&p) {
            return Err(SimError::invalid(format!("{name} must be within [0, 1], got {p}")));
        }
    }

    let mut rng = StdRng::seed_from_u64(spec.seed);
    let mut processes = Vec::new();

    for t in 0..spec.ticks {
        if rng.random::<f64>() < spec.p_arrival {
            let burst = if rng.random::<f64>() < spec.p_short {
                spec.short_burst
            } else {
                spec.long_burst
            };

            processes.push(Process::new(processes.len() as u64 + 1, t, burst));
        }
    }

    ProcessSet::new(processes)
}
