use std::fmt;

use average::{Estimate, Mean};
use serde::Serialize;

use crate::core::{Completion, Pid, Schedule, Slice, Ticks};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Row {
    pub pid: Pid,
    pub arrival: Ticks,
    pub burst: Ticks,
    pub start: Ticks,
    pub finish: Ticks,
    pub turnaround: Ticks,
    pub waiting: Ticks,
    pub response: Ticks,
}

impl From<&Completion> for Row {
    fn from(c: &Completion) -> Self {
        Self {
            pid: c.process.pid,
            arrival: c.process.arrival,
            burst: c.process.burst,
            start: c.start,
            finish: c.finish,
            turnaround: c.turnaround(),
            waiting: c.waiting(),
            response: c.response(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Averages {
    pub turnaround: f64,
    pub waiting: f64,
    pub response: f64,
}

impl Averages {
    /// `None` for an empty batch.
    pub fn of(rows: &[Row]) -> Option<Self> {
        if rows.is_empty() {
            return None;
        }

        Some(Self {
            turnaround: avg(rows.iter().map(|r| r.turnaround as f64)),
            waiting: avg(rows.iter().map(|r| r.waiting as f64)),
            response: avg(rows.iter().map(|r| r.response as f64)),
        })
    }
}

fn avg(iter: impl Iterator<Item = f64>) -> f64 {
    iter.collect::<Mean>().estimate()
}

#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub algorithm: &'static str,
    pub rows: Vec<Row>,
    pub averages: Option<Averages>,
    pub timeline: Vec<Slice>,
}

impl SimReport {
    pub fn new(algorithm: &'static str, schedule: &Schedule) -> Self {
        let rows: Vec<Row> = schedule.completions.iter().map(Row::from).collect();
        let averages = Averages::of(&rows);
        Self {
            algorithm,
            rows,
            averages,
            timeline: schedule.slices.clone(),
        }
    }
}

impl fmt::Display for SimReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Schedule ({}, time units)", self.algorithm)?;
        writeln!(f, "PID Arr Burst Start Finish Turn Wait Resp")?;
        for r in &self.rows {
            writeln!(
                f,
                "{:3} {:4} {:5} {:5} {:6} {:5} {:5} {:5}",
                r.pid, r.arrival, r.burst, r.start, r.finish, r.turnaround, r.waiting, r.response
            )?;
        }

        match self.averages {
            Some(a) => writeln!(
                f,
                "\nAverages -> Turn: {:.2}   Wait: {:.2}   Resp: {:.2}",
                a.turnaround, a.waiting, a.response
            )?,
            None => writeln!(f, "\nAverages -> n/a (no processes)")?,
        }

        writeln!(f, "\nTimeline:")?;
        let segments: Vec<String> = self.timeline.iter().map(Slice::to_string).collect();
        writeln!(f, "{}", segments.join(" | "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Process;

    fn schedule() -> Schedule {
        Schedule {
            completions: vec![
                Completion {
                    process: Process::new(1, 0, 4),
                    start: 0,
                    finish: 6,
                },
                Completion {
                    process: Process::new(2, 1, 3),
                    start: 2,
                    finish: 7,
                },
            ],
            slices: vec![
                Slice { pid: 1, t0: 0, t1: 2 },
                Slice { pid: 2, t0: 2, t1: 4 },
                Slice { pid: 1, t0: 4, t1: 6 },
                Slice { pid: 2, t0: 6, t1: 7 },
            ],
        }
    }

    #[test]
    fn derives_per_process_metrics() {
        let report = SimReport::new("rr", &schedule());
        assert_eq!(
            report.rows[1],
            Row {
                pid: 2,
                arrival: 1,
                burst: 3,
                start: 2,
                finish: 7,
                turnaround: 6,
                waiting: 3,
                response: 1,
            }
        );
    }

    #[test]
    fn averages_are_arithmetic_means() {
        let report = SimReport::new("rr", &schedule());
        let a = report.averages.unwrap();
        assert!((a.turnaround - 6.0).abs() < 1e-9);
        assert!((a.waiting - 2.5).abs() < 1e-9);
        assert!((a.response - 0.5).abs() < 1e-9);
    }

    #[test]
    fn empty_schedule_has_no_averages() {
        let report = SimReport::new("fcfs", &Schedule::default());
        assert_eq!(report.averages, None);
        assert!(report.to_string().contains("n/a"));
    }

    #[test]
    fn renders_table_and_timeline() {
        let text = SimReport::new("rr", &schedule()).to_string();
        assert!(text.contains("PID Arr Burst Start Finish Turn Wait Resp"));
        assert!(text.contains("  2    1     3     2      7     6     3     1"));
        assert!(text.contains("Averages -> Turn: 6.00   Wait: 2.50   Resp: 0.50"));
        assert!(text.contains("[0-2] P1 | [2-4] P2 | [4-6] P1 | [6-7] P2"));
    }
}
