#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod planner;
pub mod postpone;
pub mod progress;
pub mod time;

pub use time::Clock;
