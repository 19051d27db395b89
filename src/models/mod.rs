//! Data models for Bookshelf

pub mod book;
pub mod credential;

pub use book::{Book, BookPatch, CreateBook, NewBook, UpdateBook};
pub use credential::{Credential, Identity};
