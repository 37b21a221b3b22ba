//! Domain model structs and DTOs.
//!
//! Each submodule holds a `FromRow` + `Serialize` entity struct matching the
//! database row, plus the input DTOs its repository accepts.

pub mod customer;
pub mod user;
