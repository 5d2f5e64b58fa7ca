pub use self::{book::*, issue::*, issue_request::*};

mod book;
mod issue;
mod issue_request;
