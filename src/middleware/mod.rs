pub mod json;
pub mod teacher;
