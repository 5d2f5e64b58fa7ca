pub use self::{actor::*, book::*, issue::*, issue_request::*};

mod actor;
mod book;
mod issue;
mod issue_request;
