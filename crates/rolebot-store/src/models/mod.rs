//! On-disk record models

mod binding_record;

pub use binding_record::BindingRecord;
