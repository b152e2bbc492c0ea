//! # Events Module
//!
//! Progress reporting for long batch runs.
//!
//! The core never talks to a UI directly; it emits [`Event`]s through an
//! [`EventSender`] and any consumer (CLI progress bar, GUI, test harness)
//! drains the matching [`EventReceiver`]. Dropping the receiver silently
//! disables reporting.

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::{BatchEvent, Event, RunSummary, ScanEvent, UnitProgress};
