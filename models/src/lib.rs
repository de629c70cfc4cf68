// models/src/lib.rs

pub mod errors;
pub mod record;
pub mod schema;

pub use errors::{FieldError, ValidationError, ValidationResult};
pub use record::{
    Acquisition, BsiSource, ClinicalSetting, Gender, RawBool, RawRecord, Record, Species,
};
pub use schema::{FieldKind, FieldSpec, SCHEMA};
