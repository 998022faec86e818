//! Application services layer.

pub mod accounts;
pub mod blog;
pub mod catalog;
pub mod error;
pub mod repos;
