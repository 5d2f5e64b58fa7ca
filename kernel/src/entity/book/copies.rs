use error_stack::Report;
use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

use crate::KernelError;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct TotalCopies(i32);

impl TotalCopies {
    pub fn new(amount: impl Into<i32>) -> Self {
        Self(amount.into())
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct AvailableCopies(i32);

impl AvailableCopies {
    pub fn new(amount: impl Into<i32>) -> Self {
        Self(amount.into())
    }

    pub fn is_exhausted(&self) -> bool {
        self.0 <= 0
    }
}

/// Number of copies added to or removed from the catalog in one operation.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct CopyCount(i32);

impl CopyCount {
    pub fn new(count: impl Into<i32>) -> error_stack::Result<Self, KernelError> {
        let count = count.into();
        if count <= 0 {
            return Err(Report::new(KernelError::Validation)
                .attach_printable(format!("copy count must be positive, got {count}")));
        }
        Ok(Self(count))
    }
}

#[cfg(test)]
mod test {
    use crate::entity::CopyCount;
    use crate::KernelError;

    #[test]
    fn copy_count_must_be_positive() {
        assert!(CopyCount::new(1).is_ok());
        for count in [0, -3] {
            let report = CopyCount::new(count).unwrap_err();
            assert_eq!(report.current_context(), &KernelError::Validation);
        }
    }
}
