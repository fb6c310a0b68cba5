use std::{collections::VecDeque, num::NonZeroU64};

use tracing::trace;

use super::Scheduler;
use crate::{
    SimError,
    core::{ProcessSet, Schedule, SimCtx, TaskId, TaskState, Ticks},
};

/// Preemptive Round-Robin with a fixed quantum.
#[derive(Debug, Clone, Copy)]
pub struct RoundRobin {
    quantum: NonZeroU64,
}

impl RoundRobin {
    pub fn new(quantum: Ticks) -> Result<Self, SimError> {
        NonZeroU64::new(quantum)
            .map(Self::with_quantum)
            .ok_or_else(|| SimError::invalid("round-robin quantum must be positive"))
    }

    pub fn with_quantum(quantum: NonZeroU64) -> Self {
        Self { quantum }
    }

    pub fn quantum_ticks(&self) -> NonZeroU64 {
        self.quantum
    }
}

// Ready queue and admission cursor for a single run
struct RunQueue {
    ctx: SimCtx,
    ready: VecDeque<TaskId>,
    // Tasks are arrival-sorted, so everything before `next` has been admitted
    next: TaskId,
}

impl RunQueue {
    fn admit_arrivals(&mut self) {
        while self.next < self.ctx.len() {
            let process = self.ctx.task(self.next).process;
            if process.arrival > self.ctx.now {
                break;
            }
            trace!(pid = process.pid, now = self.ctx.now, "admit");
            self.ctx.mark_ready(self.next);
            self.ready.push_back(self.next);
            self.next += 1;
        }
    }
}

impl Scheduler for RoundRobin {
    fn name(&self) -> &'static str {
        "rr"
    }

    fn quantum(&self) -> Option<NonZeroU64> {
        Some(self.quantum)
    }

    fn schedule(&self, processes: &ProcessSet) -> Schedule {
        let mut rq = RunQueue {
            ctx: SimCtx::new(processes.sorted_by_arrival()),
            ready: VecDeque::new(),
            next: 0,
        };
        rq.admit_arrivals();

        while !rq.ctx.all_finished() {
            let Some(id) = rq.ready.pop_front() else {
                let arrival = rq.ctx.task(rq.next).process.arrival;
                rq.ctx.idle_until(arrival);
                rq.admit_arrivals();
                continue;
            };

            rq.ctx.run(id, self.quantum.get());

            // Arrivals go ahead of the task being preempted at the same instant
            rq.admit_arrivals();
            if rq.ctx.task(id).state != TaskState::Finished {
                rq.ctx.preempt(id);
                rq.ready.push_back(id);
            }
        }

        rq.ctx.into_schedule()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Process, Slice};

    fn set(triples: &[(u64, u64, u64)]) -> ProcessSet {
        ProcessSet::new(
            triples
                .iter()
                .map(|&(pid, arrival, burst)| Process::new(pid, arrival, burst))
                .collect(),
        )
        .unwrap()
    }

    fn rr(quantum: Ticks) -> RoundRobin {
        RoundRobin::new(quantum).unwrap()
    }

    fn slices(triples: &[(u64, u64, u64)]) -> Vec<Slice> {
        triples
            .iter()
            .map(|&(pid, t0, t1)| Slice { pid, t0, t1 })
            .collect()
    }

    #[test]
    fn alternates_between_ready_processes() {
        let schedule = rr(2).schedule(&set(&[(1, 0, 4), (2, 1, 3)]));
        assert_eq!(
            schedule.slices,
            slices(&[(1, 0, 2), (2, 2, 4), (1, 4, 6), (2, 6, 7)])
        );

        let p1 = schedule.completion(1).unwrap();
        let p2 = schedule.completion(2).unwrap();
        assert_eq!((p1.start, p1.finish), (0, 6));
        assert_eq!((p2.start, p2.finish), (2, 7));
    }

    #[test]
    fn arrival_is_queued_ahead_of_preempted_process() {
        let schedule = rr(2).schedule(&set(&[(1, 0, 4), (2, 2, 2)]));
        assert_eq!(schedule.slices, slices(&[(1, 0, 2), (2, 2, 4), (1, 4, 6)]));
    }

    #[test]
    fn idles_until_next_arrival() {
        let schedule = rr(2).schedule(&set(&[(1, 0, 1), (2, 5, 3)]));
        assert_eq!(schedule.slices, slices(&[(1, 0, 1), (2, 5, 7), (2, 7, 8)]));
        let p2 = schedule.completion(2).unwrap();
        assert_eq!((p2.start, p2.finish), (5, 8));
    }

    #[test]
    fn late_first_arrival_starts_at_its_arrival() {
        let schedule = rr(3).schedule(&set(&[(1, 4, 2), (2, 4, 1)]));
        assert_eq!(schedule.slices, slices(&[(1, 4, 6), (2, 6, 7)]));
    }

    #[test]
    fn completions_come_out_in_arrival_order() {
        let schedule = rr(2).schedule(&set(&[(2, 3, 2), (1, 0, 3)]));
        let spans: Vec<_> = schedule
            .completions
            .iter()
            .map(|c| (c.process.pid, c.start, c.finish))
            .collect();
        assert_eq!(spans, vec![(1, 0, 3), (2, 3, 5)]);
        assert_eq!(schedule.slices, slices(&[(1, 0, 2), (1, 2, 3), (2, 3, 5)]));
    }

    #[test]
    fn large_quantum_degenerates_to_fcfs() {
        let schedule = rr(100).schedule(&set(&[(1, 0, 5), (2, 1, 3), (3, 2, 8)]));
        assert_eq!(schedule.slices, slices(&[(1, 0, 5), (2, 5, 8), (3, 8, 16)]));
    }

    #[test]
    fn zero_quantum_is_rejected() {
        assert!(matches!(RoundRobin::new(0), Err(SimError::InvalidArgument(_))));
    }

    #[test]
    fn empty_set_is_a_no_op() {
        assert_eq!(rr(1).schedule(&ProcessSet::default()), Schedule::default());
    }
}
