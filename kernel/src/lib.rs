pub use crate::error::*;

mod config;
mod database;
mod entity;
mod error;
mod gate;
mod modify;
mod query;

#[cfg(feature = "prelude")]
pub mod prelude {
    pub mod entity {
        pub use crate::entity::*;
    }
}

#[cfg(feature = "interface")]
pub mod interface {
    pub mod config {
        pub use crate::config::*;
    }
    pub mod database {
        pub use crate::database::*;
    }
    pub mod gate {
        pub use crate::gate::*;
    }
    pub mod query {
        pub use crate::query::*;
    }
    pub mod update {
        pub use crate::modify::*;
    }
}
