//! Small shared helpers.

pub mod hash;
pub mod mime;
pub mod path;
pub mod plural;
