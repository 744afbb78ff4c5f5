//! Taskdeck commons
//!
//! Identifiers, domain models and the clock abstraction shared by every
//! Taskdeck crate. Nothing in here performs I/O.

pub mod clock;
pub mod models;

pub use clock::{Clock, ManualClock, SystemClock};
pub use models::{ParseStatusError, Task, TaskId, TaskStatus, User, UserId};
