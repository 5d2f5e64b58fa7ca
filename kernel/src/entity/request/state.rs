use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// `Pending` is the only state a request can leave.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum RequestState {
    Pending,
    Approved { at: OffsetDateTime },
    Rejected { at: OffsetDateTime },
}

impl RequestState {
    pub fn name(&self) -> &'static str {
        match self {
            RequestState::Pending => PENDING,
            RequestState::Approved { .. } => APPROVED,
            RequestState::Rejected { .. } => REJECTED,
        }
    }

    /// The moment an admin acted on the request.
    pub fn decided_at(&self) -> Option<OffsetDateTime> {
        match self {
            RequestState::Pending => None,
            RequestState::Approved { at } | RequestState::Rejected { at } => Some(*at),
        }
    }

    /// Rebuilds the state from its stored `(status, approval_date)` pair.
    pub fn from_row(status: &str, decided_at: Option<OffsetDateTime>) -> Option<Self> {
        match (status, decided_at) {
            (PENDING, None) => Some(RequestState::Pending),
            (APPROVED, Some(at)) => Some(RequestState::Approved { at }),
            (REJECTED, Some(at)) => Some(RequestState::Rejected { at }),
            _ => None,
        }
    }
}

const PENDING: &str = "Pending";
const APPROVED: &str = "Approved";
const REJECTED: &str = "Rejected";
