//! Reminder scheduling core.
//!
//! Three pieces, composed by the daemon binary:
//! - [`ReminderWindow`]: pure window evaluation from the wall clock.
//! - [`CycleRunner`]: one select→dispatch→mark pass.
//! - [`ReminderScheduler`]: fixed-cadence trigger with a non-overlap
//!   guarantee (each tick awaits the previous cycle).

mod cycle;
mod trigger;
mod window;

pub use cycle::{CycleOutcome, CycleRunner};
pub use trigger::ReminderScheduler;
pub use window::ReminderWindow;
