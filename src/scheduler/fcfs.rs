use super::Scheduler;
use crate::core::{ProcessSet, Schedule, SimCtx, Ticks};

/// First-come first-served: arrival order, no preemption.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fcfs;

impl Scheduler for Fcfs {
    fn name(&self) -> &'static str {
        "fcfs"
    }

    fn schedule(&self, processes: &ProcessSet) -> Schedule {
        let mut ctx = SimCtx::new(processes.sorted_by_arrival());

        for id in 0..ctx.len() {
            ctx.idle_until(ctx.task(id).process.arrival);
            ctx.mark_ready(id);
            ctx.run(id, Ticks::MAX);
        }

        ctx.into_schedule()
    }
}
