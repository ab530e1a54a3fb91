//! Site content store for a small marketing site.
//!
//! The site document is read with defaults merged in, edited through a
//! draft, and written back to a local key-value store. Editing requires an
//! expiring editor session.

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
