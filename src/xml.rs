//! XML dialect: scanner, recursive parser and serializer

pub mod cursor;
pub mod entities;
pub mod parser;
pub mod scanner;
pub mod serializer;

pub use parser::Parser;
pub use serializer::serialize;
