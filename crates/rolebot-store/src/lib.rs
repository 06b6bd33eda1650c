//! # rolebot-store
//!
//! Storage layer: the on-disk binding table and its record format.

pub mod mappers;
pub mod models;
pub mod stores;

pub use models::BindingRecord;
pub use stores::{JsonBindingStore, MemoryBindingStore};
