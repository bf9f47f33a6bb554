pub mod ast;
pub mod convert;
pub mod error;
pub mod logging;
pub mod parser;
pub mod project;
pub mod render;
pub mod template;
pub mod validator;

pub use ast::{Document, Table, TableKey, Value};
pub use convert::{convert_document, Conversion, Converter};
pub use error::ViewError;
pub use parser::parse_entry_data;
pub use project::{Component, Project};
