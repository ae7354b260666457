//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` request DTO as received over HTTP
//! - A create DTO carrying server-resolved fields (owner ids, defaults)

pub mod event;
pub mod match_record;
pub mod mentor;
pub mod notification;
pub mod program;
pub mod registration;
