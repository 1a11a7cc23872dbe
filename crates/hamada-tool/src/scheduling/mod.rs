//! Deadline arithmetic

pub mod dates;
pub mod deadline;

pub use dates::{parse_date, DateOrder};
pub use deadline::{DeadlineCalculator, DeadlineState, DeadlineStatus, Urgency, DEFAULT_BUFFER_DAYS};
