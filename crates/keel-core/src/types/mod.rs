//! Type definitions for catalogs, platforms and projects

mod catalog;
mod coords;
mod metadata;
mod origin;
mod platform;
mod project;

pub use catalog::*;
pub use coords::*;
pub use metadata::*;
pub use origin::*;
pub use platform::*;
pub use project::*;
