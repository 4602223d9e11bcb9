use super::columns::ColumnLayout;
use super::text::TextMeasurer;
use crate::canvas::{Canvas, Frame, RectStyle, TextAlign, TextStyle};
use crate::colour::Colour;
use crate::error::GenerationError;
use crate::units::Mm;

/// Cell padding and minimum height shared by every row of a table
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RowMetrics {
    pub padding: Mm,
    pub min_height: Mm,
}

impl Default for RowMetrics {
    fn default() -> Self {
        RowMetrics {
            padding: Mm(1.8),
            min_height: Mm(8.0),
        }
    }
}

/// A cell's text wrapped to its column
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredCell {
    pub lines: Vec<String>,
}

/// A table row whose height is final. Built before anything is drawn so the
/// page-break decision and the cell borders both use the same height.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredRow {
    pub cells: Vec<MeasuredCell>,
    pub height: Mm,
    pub line_height: Mm,
}

/// Wrap every cell of a row to its column and derive the row height: the
/// tallest cell wins, floored at the configured minimum
pub fn measure_row<M: TextMeasurer + ?Sized>(
    cells: &[String],
    columns: &ColumnLayout,
    measurer: &M,
    style: &TextStyle,
    metrics: &RowMetrics,
) -> Result<MeasuredRow, GenerationError> {
    if cells.len() != columns.len() {
        return Err(GenerationError::Configuration(format!(
            "row has {} cells but the table has {} columns",
            cells.len(),
            columns.len()
        )));
    }

    let line_height = measurer.line_height(style);
    let mut height = metrics.min_height;
    let mut measured = Vec::with_capacity(cells.len());
    for (text, column) in cells.iter().zip(columns.columns()) {
        let usable = (column.width - metrics.padding * 2.0).max(Mm::ZERO);
        let lines = measurer.wrap(text, usable, style)?;
        height = height.max(line_height * lines.len() as f64 + metrics.padding * 2.0);
        measured.push(MeasuredCell { lines });
    }

    Ok(MeasuredRow {
        cells: measured,
        height,
        line_height,
    })
}

/// Draw a measured row with its top edge at `y`: background, cell borders,
/// then each cell's lines top-aligned and placed by the column's alignment
#[allow(clippy::too_many_arguments)]
pub fn draw_row<C: Canvas + ?Sized>(
    canvas: &mut C,
    row: &MeasuredRow,
    columns: &ColumnLayout,
    left: Mm,
    y: Mm,
    style: &TextStyle,
    metrics: &RowMetrics,
    fill: Option<Colour>,
    border: Colour,
) -> Result<(), GenerationError> {
    for (cell, column) in row.cells.iter().zip(columns.columns()) {
        let frame = Frame::new(left + column.x, y, column.width, row.height);
        let rect_style = match fill {
            Some(fill) => RectStyle::FillStroke {
                fill,
                stroke: border,
            },
            None => RectStyle::Stroke(border),
        };
        canvas.draw_rect(frame, rect_style)?;

        let x = match column.align {
            TextAlign::Left => frame.x + metrics.padding,
            TextAlign::Center => frame.x + frame.width / 2.0,
            TextAlign::Right => frame.right() - metrics.padding,
        };
        let cell_style = style.aligned(column.align);
        for (i, line) in cell.lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let line_y = y + metrics.padding + row.line_height * i as f64;
            canvas.draw_text(line, x, line_y, &cell_style)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawOp, RecordingCanvas};
    use crate::layout::columns::Column;
    use crate::layout::text::MonospaceMeasurer;
    use crate::units::Pt;

    fn table() -> ColumnLayout {
        ColumnLayout::resolve(
            Mm(100.0),
            &[
                Column::new("Item", TextAlign::Left, 0.2),
                Column::new("Description", TextAlign::Left, 0.6),
                Column::new("Qty", TextAlign::Right, 0.2),
            ],
        )
        .unwrap()
    }

    fn cells(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| s.to_string()).collect()
    }

    const METRICS: RowMetrics = RowMetrics {
        padding: Mm(2.0),
        min_height: Mm(8.0),
    };

    #[test]
    fn short_rows_use_minimum_height() {
        let measurer = MonospaceMeasurer::new(Mm(1.0), Mm(4.0));
        let row = measure_row(
            &cells(&["A", "short", "1"]),
            &table(),
            &measurer,
            &TextStyle::new(Pt(9.0)),
            &METRICS,
        )
        .unwrap();
        // one line: 4 + 2 * 2 = 8, equal to the floor
        assert_eq!(row.height, Mm(8.0));
    }

    #[test]
    fn tallest_cell_sets_the_height() {
        let measurer = MonospaceMeasurer::new(Mm(1.0), Mm(4.0));
        // description column is 60mm wide, 56mm usable
        let description = "x".repeat(150);
        let row = measure_row(
            &cells(&["A", &description, "1"]),
            &table(),
            &measurer,
            &TextStyle::new(Pt(9.0)),
            &METRICS,
        )
        .unwrap();
        assert_eq!(row.cells[1].lines.len(), 3);
        assert_eq!(row.height, Mm(4.0 * 3.0 + 4.0));

        for cell in &row.cells {
            let needed = measurer.line_height * cell.lines.len() as f64 + METRICS.padding * 2.0;
            assert!(row.height >= needed);
        }
        assert!(row.height >= METRICS.min_height);
    }

    #[test]
    fn height_does_not_depend_on_cell_order() {
        let measurer = MonospaceMeasurer::new(Mm(1.0), Mm(4.0));
        let even = ColumnLayout::resolve(
            Mm(90.0),
            &[
                Column::new("a", TextAlign::Left, 1.0 / 3.0),
                Column::new("b", TextAlign::Left, 1.0 / 3.0),
                Column::new("c", TextAlign::Left, 1.0 / 3.0),
            ],
        )
        .unwrap();
        let style = TextStyle::new(Pt(9.0));
        let long = lipsum::lipsum(30);
        let a = measure_row(&cells(&[&long, "b", "c"]), &even, &measurer, &style, &METRICS).unwrap();
        let b = measure_row(&cells(&["b", "c", &long]), &even, &measurer, &style, &METRICS).unwrap();
        assert_eq!(a.height, b.height);
    }

    #[test]
    fn rejects_mismatched_cell_count() {
        let measurer = MonospaceMeasurer::new(Mm(1.0), Mm(4.0));
        let err = measure_row(
            &cells(&["only one"]),
            &table(),
            &measurer,
            &TextStyle::new(Pt(9.0)),
            &METRICS,
        )
        .unwrap_err();
        assert!(matches!(err, GenerationError::Configuration(_)));
    }

    #[test]
    fn draws_borders_at_full_height_and_aligns_text() {
        let measurer = MonospaceMeasurer::new(Mm(1.0), Mm(4.0));
        let columns = table();
        let style = TextStyle::new(Pt(9.0));
        let description = "x".repeat(100);
        let row = measure_row(
            &cells(&["A", &description, "12"]),
            &columns,
            &measurer,
            &style,
            &METRICS,
        )
        .unwrap();

        let mut canvas = RecordingCanvas::new();
        draw_row(
            &mut canvas,
            &row,
            &columns,
            Mm(10.0),
            Mm(50.0),
            &style,
            &METRICS,
            None,
            crate::colour::colours::BLACK,
        )
        .unwrap();

        let ops = &canvas.pages[0];
        let rects: Vec<&Frame> = ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Rect { frame, .. } => Some(frame),
                _ => None,
            })
            .collect();
        assert_eq!(rects.len(), 3);
        assert!(rects.iter().all(|f| f.height == row.height && f.y == Mm(50.0)));

        let qty = ops
            .iter()
            .find_map(|op| match op {
                DrawOp::Text { text, x, style, .. } if text == "12" => Some((*x, style.align)),
                _ => None,
            })
            .unwrap();
        // right edge of the last column minus padding
        assert_eq!(qty, (Mm(108.0), TextAlign::Right));
    }
}
