//! Domain models for the clinical records system.

mod history;
mod patient;
mod reference;
mod therapist;

pub use history::*;
pub use patient::*;
pub use reference::*;
pub use therapist::*;
