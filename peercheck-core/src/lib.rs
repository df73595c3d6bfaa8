pub mod check;
pub mod errors;
pub mod models;
pub mod repo;
pub mod run_plan;
pub mod scheduler;
pub mod settings;

pub use check::*;
pub use errors::*;
pub use models::*;
pub use repo::*;
pub use run_plan::*;
pub use scheduler::*;
pub use settings::*;
