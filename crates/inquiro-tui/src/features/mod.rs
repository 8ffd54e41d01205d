//! Feature slices for the session controller (state/update/render per slice).

pub mod history;
pub mod input;
pub mod search;
pub mod transcript;
