//! CLI Commands

pub mod enums;
pub mod inspect;

pub use enums::EnumsCommand;
pub use inspect::{DocumentKind, InspectCommand};
