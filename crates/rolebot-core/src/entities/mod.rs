//! Domain entities - core business objects

mod binding;
mod role;

pub use binding::Binding;
pub use role::Role;
