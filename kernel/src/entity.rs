mod book;
mod common;
mod issue;
mod library;
mod policy;
mod request;
mod user;

pub use self::{book::*, common::*, issue::*, library::*, policy::*, request::*, user::*};
