//! Feature modules

pub mod cache;
