pub mod observer;
pub mod schedule;
pub mod state;

pub use observer::{Observer, Violation};
pub use schedule::{Completion, Schedule, Slice};
pub use state::{Pid, Process, ProcessSet, SimCtx, Task, TaskId, TaskState, Ticks};
