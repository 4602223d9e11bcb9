//! Paginated quotation and invoice generation.
//!
//! A [DocumentModel] is laid out section by section onto a [Canvas]: the item
//! table's column widths are resolved once, every row is wrapped and measured
//! before it is placed, and the page flow breaks pages, stamps footers and
//! repeats the table header wherever a row does not fit.
//!
//! ```no_run
//! use quote_pdf::{render_pdf, DocumentConfig, DocumentModel};
//!
//! let model = DocumentModel::from_json(r#"{
//!     "quotationId": "Q-1001",
//!     "customerName": "Acme Pty Ltd",
//!     "items": [{ "name": "Widget", "quantity": 3, "price": 10 }],
//!     "subtotal": 30, "totalAmount": 30
//! }"#)?;
//! let rendered = render_pdf(&model, &DocumentConfig::quotation())?;
//! std::fs::write(&rendered.file_name, &rendered.bytes)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod assemble;
pub use assemble::*;

mod canvas;
pub use canvas::*;

mod colour;
pub use colour::*;

mod config;
pub use config::*;

mod content;

mod document;
pub use document::*;

mod error;
pub use error::*;

mod font;
pub use font::*;

/// Display formatting of amounts, quantities and dates
pub mod format;

mod image;

mod info;
pub use info::*;

/// Column geometry, row measurement, text wrapping and page flow
pub mod layout;

mod model;
pub use model::*;

mod page;

pub mod pagesize;

mod rect;
pub use rect::*;

pub(crate) mod refs;

pub mod resolve;

mod units;
pub use units::*;

/// Re-export PDF-writer functionality
pub use pdf_writer;
