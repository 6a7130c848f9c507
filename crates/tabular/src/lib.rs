#![forbid(unsafe_code)]

mod error;
mod quarters;
mod schema;
mod value;

pub use error::CodecError;
pub use quarters::quarter_block;
pub use schema::{Column, CsvImport, Schema};
pub use value::{parse_score, parse_yes_no, score_text, yes_no};
