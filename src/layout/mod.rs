//! The layout engine: column geometry, row measurement and page flow.
//!
//! Layout is split into a measure/decide phase and a draw phase for every
//! block. Column widths are resolved once per document
//! ([ColumnLayout](crate::layout::ColumnLayout)); each row is wrapped and
//! measured ([measure_row](crate::layout::measure_row)) before the page flow
//! decides where it goes ([PageFlow](crate::layout::PageFlow)); only then is
//! anything sent to the [Canvas](crate::Canvas).
//!
//! # Example
//!
//! ```
//! use quote_pdf::layout::{Column, ColumnLayout, MonospaceMeasurer, RowMetrics, measure_row};
//! use quote_pdf::{Mm, Pt, TextAlign, TextStyle};
//!
//! let columns = ColumnLayout::resolve(
//!     Mm(100.0),
//!     &[
//!         Column::new("Item", TextAlign::Left, 0.7),
//!         Column::new("Qty", TextAlign::Right, 0.3),
//!     ],
//! )
//! .expect("valid columns");
//! assert_eq!(columns.total_width(), Mm(100.0));
//!
//! let measurer = MonospaceMeasurer::new(Mm(3.0), Mm(4.0));
//! let row = measure_row(
//!     &["A long description of the item".to_string(), "3".to_string()],
//!     &columns,
//!     &measurer,
//!     &TextStyle::new(Pt(9.0)),
//!     &RowMetrics::default(),
//! )
//! .expect("row can be measured");
//! assert!(row.cells[0].lines.len() > 1);
//! ```

mod columns;
mod flow;
mod margins;
mod rows;
mod text;

pub use columns::*;
pub use flow::*;
pub use margins::*;
pub use rows::*;
pub use text::*;
