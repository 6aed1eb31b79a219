pub mod events;
pub mod step;

pub use events::StepEvent;
pub use step::{Activity, HerdActivity, Simulation};
