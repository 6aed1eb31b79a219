pub mod calendar;
pub mod diagnostics;
pub mod error;
pub mod types;

pub use calendar::Calendar;
pub use diagnostics::{Diagnostic, Diagnostics};
pub use error::{MusterError, Result};
