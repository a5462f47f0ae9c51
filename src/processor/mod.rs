pub mod job;
pub mod worker;

pub use self::job::CalculationJob;
pub use self::worker::{JobOutcome, Worker, WorkerConfig};
