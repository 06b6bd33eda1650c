//! `BindingStore` implementations

mod json;
mod memory;

pub use json::JsonBindingStore;
pub use memory::MemoryBindingStore;
