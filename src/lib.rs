pub mod core;
pub mod error;
pub mod scheduler;
pub mod sim;

pub use error::SimError;
pub use scheduler::{Algorithm, Scheduler};
pub use sim::{Sim, SimReport, simulate};
