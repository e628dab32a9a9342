//! Loading uploaded metadata tables.

mod parser;
mod table;

pub use parser::{Parser, ParserConfig};
pub use table::{FieldMap, MetadataTable, SourceMetadata};
