//! Data models for the document vault

mod document;
mod folder;
mod member;
mod team;
mod user;

pub use document::*;
pub use folder::*;
pub use member::*;
pub use team::*;
pub use user::*;
