pub use self::{book::*, issue::*, request::*};

mod book;
mod issue;
mod request;

#[cfg(test)]
mod test;
