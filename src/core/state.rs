use rustc_hash::FxHashSet;
use serde::Serialize;
use tracing::{debug, warn};

use super::schedule::{Completion, Schedule, Slice};
use crate::SimError;

// Index into the task table of one simulation
pub type TaskId = usize;
pub type Pid = u64;
pub type Ticks = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Process {
    pub pid: Pid,
    pub arrival: Ticks,
    pub burst: Ticks,
}

impl Process {
    pub fn new(pid: Pid, arrival: Ticks, burst: Ticks) -> Self {
        Self {
            pid,
            arrival,
            burst,
        }
    }
}

/// A validated batch of processes, kept in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessSet {
    processes: Vec<Process>,
}

impl ProcessSet {
    pub fn new(processes: Vec<Process>) -> Result<Self, SimError> {
        if let Some(p) = processes.iter().find(|p| p.burst == 0) {
            return Err(SimError::invalid(format!(
                "process {} has a zero burst",
                p.pid
            )));
        }

        // The clock never passes the last arrival plus all bursts
        let last_arrival = processes.iter().map(|p| p.arrival).max().unwrap_or(0);
        let horizon = processes
            .iter()
            .try_fold(last_arrival, |t, p| t.checked_add(p.burst));
        if horizon.is_none() {
            return Err(SimError::invalid(
                "arrival times and bursts overflow the simulation clock",
            ));
        }

        let mut seen = FxHashSet::default();
        if let Some(dup) = processes.iter().find(|p| !seen.insert(p.pid)) {
            warn!(pid = dup.pid, "duplicate pid, report rows will be ambiguous");
        }

        Ok(Self { processes })
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Process> {
        self.processes.iter()
    }

    pub fn as_slice(&self) -> &[Process] {
        &self.processes
    }

    /// Stable: processes with equal arrival keep their input order.
    pub fn sorted_by_arrival(&self) -> Vec<Process> {
        let mut sorted = self.processes.clone();
        sorted.sort_by_key(|p| p.arrival);
        sorted
    }

    /// Task ids in arrival order, input order on ties.
    pub fn arrival_order(&self) -> Vec<TaskId> {
        let mut order: Vec<TaskId> = (0..self.processes.len()).collect();
        order.sort_by_key(|&i| self.processes[i].arrival);
        order
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Ready,
    Running,
    Finished,
}

#[derive(Debug, Clone)]
pub struct Task {
    pub process: Process,
    pub state: TaskState,
    pub remaining: Ticks,
    pub start: Option<Ticks>,
    pub finish: Option<Ticks>,
}

/// Clock, task table and emitted slices for one engine run.
#[derive(Debug)]
pub struct SimCtx {
    pub now: Ticks,
    pub tasks: Vec<Task>,
    slices: Vec<Slice>,
    finished: usize,
}

impl SimCtx {
    pub fn new(processes: Vec<Process>) -> Self {
        let tasks = processes
            .into_iter()
            .map(|process| Task {
                process,
                state: TaskState::Pending,
                remaining: process.burst,
                start: None,
                finish: None,
            })
            .collect();

        Self {
            now: 0,
            tasks,
            slices: Vec::new(),
            finished: 0,
        }
    }

    pub fn task(&self, id: TaskId) -> &Task {
        &self.tasks[id]
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn all_finished(&self) -> bool {
        self.finished == self.tasks.len()
    }

    /// Leave the CPU idle until `time`. Never moves the clock backwards.
    pub fn idle_until(&mut self, time: Ticks) {
        if self.now < time {
            debug!(from = self.now, to = time, "cpu idle");
            self.now = time;
        }
    }

    pub fn mark_ready(&mut self, id: TaskId) {
        let now = self.now;
        let task = &mut self.tasks[id];
        debug_assert_eq!(
            task.state,
            TaskState::Pending,
            "Task {id} admitted twice"
        );
        debug_assert!(
            task.process.arrival <= now,
            "Task {id} admitted before its arrival"
        );
        task.state = TaskState::Ready;
    }

    /// Dispatch `id` for at most `budget` ticks and return the ticks it ran.
    /// The task ends up Finished, or Running if it still owes CPU time.
    pub fn run(&mut self, id: TaskId, budget: Ticks) -> Ticks {
        let t0 = self.now;
        let task = &mut self.tasks[id];
        debug_assert_eq!(
            task.state,
            TaskState::Ready,
            "Task {id} must be ready before dispatch"
        );

        task.state = TaskState::Running;
        task.start.get_or_insert(t0);

        let ran = task.remaining.min(budget);
        task.remaining -= ran;
        let t1 = t0 + ran;
        self.slices.push(Slice {
            pid: task.process.pid,
            t0,
            t1,
        });
        debug!(pid = task.process.pid, t0, t1, remaining = task.remaining, "dispatch");

        if task.remaining == 0 {
            task.state = TaskState::Finished;
            task.finish = Some(t1);
            self.finished += 1;
        }

        self.now = t1;
        ran
    }

    pub fn preempt(&mut self, id: TaskId) {
        let task = &mut self.tasks[id];
        debug_assert_eq!(
            task.state,
            TaskState::Running,
            "Only the running task can be preempted"
        );
        debug_assert!(task.remaining > 0, "Task {id} has nothing left to run");
        task.state = TaskState::Ready;
    }

    pub fn into_schedule(self) -> Schedule {
        let completions = self
            .tasks
            .into_iter()
            .map(|task| Completion {
                process: task.process,
                start: task.start.expect("Finished task missing start time"),
                finish: task.finish.expect("Finished task missing finish time"),
            })
            .collect();

        Schedule {
            completions,
            slices: self.slices,
        }
    }
}
