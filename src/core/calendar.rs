//! Calendar for timestamping simulation events
//!
//! Timesteps are months. The calendar only feeds event reporting; no system
//! in the negotiation protocol branches on the date.

use serde::{Deserialize, Serialize};

const MONTHS_PER_YEAR: u64 = 12;

/// Tracks simulation time with month/year granularity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Calendar {
    step: u64,
    start_year: u32,
}

impl Calendar {
    pub fn new(start_year: u32) -> Self {
        Self {
            step: 0,
            start_year,
        }
    }

    pub fn advance(&mut self) {
        self.step += 1;
    }

    pub fn current_step(&self) -> u64 {
        self.step
    }

    /// Calendar month, 1-12
    pub fn current_month(&self) -> u32 {
        (self.step % MONTHS_PER_YEAR) as u32 + 1
    }

    pub fn current_year(&self) -> u32 {
        self.start_year + (self.step / MONTHS_PER_YEAR) as u32
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Self::new(2000)
    }
}
