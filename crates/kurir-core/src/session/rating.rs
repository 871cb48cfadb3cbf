//! Star-rating submission model.

use serde::{Deserialize, Serialize};

/// A service rating submitted for the current session.
///
/// Constructed at submission time and handed to the transport; the client
/// keeps nothing once the backend has acknowledged it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    /// Star value, 1 through 5.
    pub value: u8,
    /// Optional free-form comment (empty for quick ratings).
    pub comment: String,
    /// Session the rating belongs to, when one is known.
    pub session_id: Option<String>,
}

impl Rating {
    /// Valid star values are 1 through 5 inclusive.
    pub fn in_range(value: u8) -> bool {
        (1..=5).contains(&value)
    }
}
