use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

const DEFAULT_LIMIT: i32 = 30;
const MAX_LIMIT: i32 = 200;

/// Page size of a listing, clamped to `1..=200`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct SelectLimit(i32);

impl SelectLimit {
    pub fn new(value: impl Into<i32>) -> Self {
        SelectLimit(value.into().clamp(1, MAX_LIMIT))
    }
}

impl Default for SelectLimit {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT)
    }
}

#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize,
)]
pub struct SelectOffset(i32);

impl SelectOffset {
    pub fn new(value: impl Into<i32>) -> Self {
        SelectOffset(value.into().max(0))
    }
}

#[cfg(test)]
mod test {
    use crate::entity::{SelectLimit, SelectOffset};

    #[test]
    fn paging_values_are_clamped() {
        assert_eq!(SelectLimit::default().as_ref(), &30);
        assert_eq!(SelectLimit::new(0).as_ref(), &1);
        assert_eq!(SelectLimit::new(5000).as_ref(), &200);
        assert_eq!(SelectOffset::new(-4).as_ref(), &0);
    }
}
