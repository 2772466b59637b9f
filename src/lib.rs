pub mod error;
pub mod fetch;
pub mod grades;
pub mod output;
pub mod parser;
pub mod source;

pub use error::GradeError;
