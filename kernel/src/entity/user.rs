mod id;
mod role;

pub use self::{id::*, role::*};
use crate::entity::LibraryId;
use destructure::Destructure;
use serde::{Deserialize, Serialize};
use vodca::References;

/// The already authenticated caller of a core operation.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, Destructure, References)]
pub struct Actor {
    id: UserId,
    role: Role,
    lib_id: LibraryId,
}

impl Actor {
    pub fn new(id: UserId, role: Role, lib_id: LibraryId) -> Self {
        Self { id, role, lib_id }
    }

    pub fn is_reader(&self) -> bool {
        self.role == Role::Reader
    }
}
