// ABOUTME: Field schema module for formkit
// ABOUTME: Exposes the declarative field model and its read-side accessors

pub mod accessor;
pub mod field;

pub use accessor::FieldLookup;
pub use field::{Attribute, ClassList, Field, FieldOption, FieldSchema, Validator};
