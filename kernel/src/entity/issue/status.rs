use std::fmt::{Display, Formatter};
use std::str::FromStr;

use error_stack::Report;
use serde::{Deserialize, Serialize};

use crate::KernelError;

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum IssueStatus {
    Issued,
    Returned,
}

impl Display for IssueStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueStatus::Issued => write!(f, "Issued"),
            IssueStatus::Returned => write!(f, "Returned"),
        }
    }
}

impl FromStr for IssueStatus {
    type Err = Report<KernelError>;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Issued" => Ok(IssueStatus::Issued),
            "Returned" => Ok(IssueStatus::Returned),
            _ => Err(Report::new(KernelError::Persistence)
                .attach_printable(format!("unknown issue status: {s}"))),
        }
    }
}
