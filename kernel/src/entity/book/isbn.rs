use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

/// Unique within a library, not across libraries.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct Isbn(String);

impl Isbn {
    pub fn new(isbn: impl Into<String>) -> Self {
        Self(isbn.into())
    }
}
