mod book;
mod issue;
mod request;

pub use self::{book::*, issue::*, request::*};
