//! Document input and output: block extraction, the subset parser,
//! rendering, and reading documents from disk.

pub mod extract;
pub mod formatter;
pub mod fs;
pub mod parser;
pub mod reader;

pub use extract::{extract_frontmatter, split_document};
pub use formatter::{render_document, render_frontmatter};
pub use fs::resolve_files;
pub use parser::{parse_block, RawFields};
pub use reader::{DocumentReader, ReaderConfig};
