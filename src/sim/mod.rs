pub mod driver;
pub mod input;
pub mod report;
pub mod workload;

pub use driver::{Sim, simulate};
pub use input::parse_processes;
pub use report::{Averages, Row, SimReport};
pub use workload::WorkloadSpec;
