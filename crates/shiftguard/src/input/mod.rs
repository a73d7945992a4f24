//! Sheet loading and the grid abstraction the engine reads from.

mod parser;
mod source;

pub use parser::{Parser, ParserConfig};
pub use source::{CellValue, SourceMetadata, TableView};
