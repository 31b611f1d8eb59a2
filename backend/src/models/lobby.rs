//! Per-floor lobby holding unassigned requests

use crate::models::passenger::Request;
use serde::{Deserialize, Serialize};

/// Waiting area on one floor
///
/// A request sits in exactly one lobby (its origin floor) until the
/// dispatcher assigns it, at which point it is removed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lobby {
    pub floor: usize,
    pub pending_requests: Vec<Request>,
}

impl Lobby {
    pub fn new(floor: usize) -> Self {
        Self {
            floor,
            pending_requests: Vec::new(),
        }
    }

    pub fn push(&mut self, request: Request) {
        self.pending_requests.push(request);
    }

    /// Remove a request by id; returns whether it was present
    pub fn remove(&mut self, request_id: &str) -> bool {
        let before = self.pending_requests.len();
        self.pending_requests.retain(|r| r.id != request_id);
        self.pending_requests.len() != before
    }

    pub fn len(&self) -> usize {
        self.pending_requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending_requests.is_empty()
    }
}
