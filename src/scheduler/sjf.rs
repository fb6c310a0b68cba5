use std::cmp::Ordering;

use keyed_priority_queue::KeyedPriorityQueue;

use super::Scheduler;
use crate::core::{ProcessSet, Schedule, SimCtx, TaskId, Ticks};

/// Non-preemptive shortest-job-first.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sjf;

// Smallest burst wins, then earliest arrival, then input position.
// KeyedPriorityQueue is a max-heap, so Ord is reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ShortestFirst {
    burst: Ticks,
    arrival: Ticks,
    id: TaskId,
}

impl ShortestFirst {
    fn key(&self) -> (Ticks, Ticks, TaskId) {
        (self.burst, self.arrival, self.id)
    }
}

impl PartialOrd for ShortestFirst {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ShortestFirst {
    fn cmp(&self, other: &Self) -> Ordering {
        other.key().cmp(&self.key())
    }
}

impl Scheduler for Sjf {
    fn name(&self) -> &'static str {
        "sjf"
    }

    fn schedule(&self, processes: &ProcessSet) -> Schedule {
        let order = processes.arrival_order();
        let mut ctx = SimCtx::new(processes.as_slice().to_vec());
        let mut ready: KeyedPriorityQueue<TaskId, ShortestFirst> = KeyedPriorityQueue::new();
        let mut next = 0;

        while !ctx.all_finished() {
            while let Some(&id) = order.get(next) {
                let process = ctx.task(id).process;
                if process.arrival > ctx.now {
                    break;
                }
                ctx.mark_ready(id);
                ready.push(
                    id,
                    ShortestFirst {
                        burst: process.burst,
                        arrival: process.arrival,
                        id,
                    },
                );
                next += 1;
            }

            // Nothing ready: wait for the earliest unserved arrival and take
            // it without comparing bursts against anything arriving alongside.
            let id = match ready.pop() {
                Some((id, _)) => id,
                None => {
                    let id = order[next];
                    next += 1;
                    ctx.idle_until(ctx.task(id).process.arrival);
                    ctx.mark_ready(id);
                    id
                }
            };

            ctx.run(id, Ticks::MAX);
        }

        ctx.into_schedule()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Pid, Process};

    fn set(triples: &[(u64, u64, u64)]) -> ProcessSet {
        ProcessSet::new(
            triples
                .iter()
                .map(|&(pid, arrival, burst)| Process::new(pid, arrival, burst))
                .collect(),
        )
        .unwrap()
    }

    fn dispatch_order(schedule: &Schedule) -> Vec<Pid> {
        schedule.slices.iter().map(|s| s.pid).collect()
    }

    #[test]
    fn picks_shortest_ready_job_without_preempting() {
        let schedule = Sjf.schedule(&set(&[(1, 0, 7), (2, 2, 4), (3, 4, 1), (4, 5, 4)]));
        assert_eq!(dispatch_order(&schedule), vec![1, 3, 2, 4]);

        let spans: Vec<_> = schedule
            .completions
            .iter()
            .map(|c| (c.process.pid, c.start, c.finish))
            .collect();
        // Completions stay in input order
        assert_eq!(spans, vec![(1, 0, 7), (2, 8, 12), (3, 7, 8), (4, 12, 16)]);
    }

    #[test]
    fn equal_bursts_prefer_earlier_arrival() {
        let schedule = Sjf.schedule(&set(&[(9, 0, 5), (1, 3, 4), (2, 1, 4)]));
        assert_eq!(dispatch_order(&schedule), vec![9, 2, 1]);
    }

    #[test]
    fn full_ties_keep_input_order() {
        let schedule = Sjf.schedule(&set(&[(5, 0, 3), (6, 1, 2), (7, 1, 2)]));
        assert_eq!(dispatch_order(&schedule), vec![5, 6, 7]);
    }

    #[test]
    fn all_at_zero_sorted_by_burst() {
        let schedule = Sjf.schedule(&set(&[(1, 0, 3), (2, 0, 1), (3, 0, 2)]));
        assert_eq!(dispatch_order(&schedule), vec![2, 3, 1]);
        assert_eq!(schedule.makespan(), 6);
    }

    #[test]
    fn idle_fallback_takes_first_earliest_arrival() {
        let schedule = Sjf.schedule(&set(&[(1, 0, 2), (2, 10, 5), (3, 10, 1)]));
        assert_eq!(dispatch_order(&schedule), vec![1, 2, 3]);
        assert_eq!(schedule.completion(2).map(|c| (c.start, c.finish)), Some((10, 15)));
        assert_eq!(schedule.completion(3).map(|c| (c.start, c.finish)), Some((15, 16)));
    }

    #[test]
    fn empty_set_is_a_no_op() {
        assert_eq!(Sjf.schedule(&ProcessSet::default()), Schedule::default());
    }
}
