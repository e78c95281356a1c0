//! Spreadsheet template I/O and report documents

#[cfg(test)]
pub(crate) mod fixtures;
pub mod layout;
pub mod pdf;
pub mod reader;
pub mod writer;

pub use layout::{CellRefError, TemplateLayout, parse_cell, parse_column};
pub use pdf::render_pdf;
pub use reader::{Template, TemplateError, load_template};
pub use writer::fill_template;
