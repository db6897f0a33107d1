pub mod contact;
pub mod job;
pub mod reference;

pub use contact::{ContactRequest, ContactResponse};
pub use job::{FieldRef, JobRecord, NumericField};
pub use reference::{Category, NamedRef, Skill, Specialty};
