//! Session domain module.
//!
//! This module contains the conversation state models and the controller
//! that sequences each send/receive cycle.
//!
//! # Module Structure
//!
//! - `model`: Client-side session identity (`Session`)
//! - `message`: Transcript message types (`Sender`, `ChatMessage`)
//! - `rating`: Star-rating submission model (`Rating`)
//! - `controller`: The send/receive cycle driver (`SessionController`)

mod controller;
mod message;
mod model;
mod rating;

// Re-export public API
pub use controller::{ExchangeOutcome, SessionController, typing_delay};
pub use message::{ChatMessage, Sender};
pub use model::Session;
pub use rating::Rating;
