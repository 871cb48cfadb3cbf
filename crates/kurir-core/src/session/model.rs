//! Client-side session identity.

use serde::{Deserialize, Serialize};

/// Conversation identity as seen by the client.
///
/// A session starts without an id. The backend issues one with the first
/// successful exchange, and the client adopts whatever the backend returns
/// from then on; ids are never generated locally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque, server-issued conversation identifier.
    pub id: Option<String>,
}

impl Session {
    /// Adopts a server-issued identifier, keeping the current one when the
    /// reply carried none.
    pub fn adopt(&mut self, id: Option<String>) {
        if let Some(id) = id {
            self.id = Some(id);
        }
    }
}
