//! # Cube Shared
//!
//! The entity framework every Cube entity builds on.
//!
//! ## Components
//!
//! - `EntityBase` / `Entity` - identity, domain and timestamp
//! - `Jsonable` / `FromJson` - full and compact JSON shapes
//! - `WireEnum` - closed enums with total, fallback-valued parsing
//! - `keyed` - `enum -> value` maps keyed by symbolic wire name
//! - `Fields` - typed field readers reporting `MalformedDocument` errors

pub mod config;
pub mod entity;
pub mod error;
pub mod json;
pub mod jsonable;
pub mod keyed;
pub mod registry;

// Re-exports
pub use config::CodecConfig;
pub use entity::{generate_serial_number, now_millis, Entity, EntityBase};
pub use error::*;
pub use json::{Fields, JsonObject};
pub use jsonable::{shape_all, FromJson, Jsonable, Shape};
pub use registry::WireEnum;
