//! Record <-> entity conversions

mod binding;
