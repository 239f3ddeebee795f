//! In-memory content host
//!
//! A stand-in for the hosting CMS: template storage, item storage, item
//! security fields and a principal list, loaded from TOML fixtures.

pub mod fixture;
pub mod memory;

pub use fixture::{Fixture, ItemEntry};
pub use memory::MemoryHost;
