//! Domain model: records, slugs, validation rules.

pub mod entities;
pub mod error;
pub mod slug;
pub mod validation;
