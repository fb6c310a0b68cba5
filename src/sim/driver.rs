use tracing::info;

use super::report::SimReport;
use crate::{
    SimError,
    core::{Observer, ProcessSet},
    scheduler::{Algorithm, Fcfs, RoundRobin, Scheduler, Sjf},
};

pub struct Sim<S: Scheduler> {
    scheduler: S,
    processes: ProcessSet,
}

impl<S: Scheduler> Sim<S> {
    pub fn new(scheduler: S, processes: ProcessSet) -> Self {
        Self {
            scheduler,
            processes,
        }
    }

    /// Runs the scheduler once over the whole batch and checks the result.
    pub fn run(&self) -> Result<SimReport, SimError> {
        let name = self.scheduler.name();
        info!(algorithm = name, processes = self.processes.len(), "simulation started");

        let schedule = self.scheduler.schedule(&self.processes);

        let observer = match self.scheduler.quantum() {
            Some(q) => Observer::round_robin(q),
            None => Observer::non_preemptive(),
        };
        observer.check(&self.processes, &schedule)?;

        info!(
            algorithm = name,
            makespan = schedule.makespan(),
            slices = schedule.slices.len(),
            "simulation finished"
        );
        Ok(SimReport::new(name, &schedule))
    }
}

pub fn simulate(algorithm: Algorithm, processes: ProcessSet) -> Result<SimReport, SimError> {
    match algorithm {
        Algorithm::Fcfs => Sim::new(Fcfs, processes).run(),
        Algorithm::Sjf => Sim::new(Sjf, processes).run(),
        Algorithm::RoundRobin { quantum } => {
            Sim::new(RoundRobin::with_quantum(quantum), processes).run()
        }
    }
}
