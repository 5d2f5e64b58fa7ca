use std::fmt::{Display, Formatter};
use std::str::FromStr;

use error_stack::Report;
use serde::{Deserialize, Serialize};

use crate::KernelError;

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Role {
    Owner,
    LibraryAdmin,
    Reader,
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Owner => write!(f, "Owner"),
            Role::LibraryAdmin => write!(f, "LibraryAdmin"),
            Role::Reader => write!(f, "Reader"),
        }
    }
}

impl FromStr for Role {
    type Err = Report<KernelError>;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Owner" => Ok(Role::Owner),
            "LibraryAdmin" => Ok(Role::LibraryAdmin),
            "Reader" => Ok(Role::Reader),
            _ => Err(Report::new(KernelError::Validation)
                .attach_printable(format!("unknown role: {s}"))),
        }
    }
}
