//! Customer profile types shared across crates.
//!
//! Holds the profile record, its categorical choice lists and the declared
//! domain of every field.

mod choices;
mod error;
pub mod field;
mod profile;

pub use choices::*;
pub use error::ProfileError;
pub use field::{FIELDS, FieldDomain, FieldSpec, field_spec};
pub use profile::{CustomerProfile, FieldValue};
