use crate::canvas::TextAlign;
use crate::error::GenerationError;
use crate::units::Mm;

/// One table column as configured: a header, an alignment and the fraction of
/// the content width it nominally takes
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub header: String,
    pub align: TextAlign,
    pub proportion: f64,
}

impl Column {
    pub fn new<S: ToString>(header: S, align: TextAlign, proportion: f64) -> Column {
        Column {
            header: header.to_string(),
            align,
            proportion,
        }
    }
}

/// A column with its resolved geometry
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedColumn {
    pub header: String,
    pub align: TextAlign,
    /// Offset from the left edge of the content area
    pub x: Mm,
    pub width: Mm,
}

/// Absolute column geometry for one content width.
///
/// Every column except the last is rounded to hundredths of a millimetre; the
/// last column receives the exact remainder. Arithmetic is done in integer
/// hundredths, so the widths always add up to the content width no matter how
/// the individual proportions round.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLayout {
    columns: Vec<ResolvedColumn>,
    total_hundredths: i64,
}

fn to_hundredths(value: f64) -> i64 {
    (value * 100.0).round() as i64
}

fn from_hundredths(value: i64) -> Mm {
    Mm(value as f64 / 100.0)
}

impl ColumnLayout {
    pub fn resolve(content_width: Mm, columns: &[Column]) -> Result<ColumnLayout, GenerationError> {
        if !content_width.0.is_finite() || content_width <= Mm::ZERO {
            return Err(GenerationError::Configuration(format!(
                "content width must be positive, got {}mm",
                content_width
            )));
        }
        if columns.is_empty() {
            return Err(GenerationError::Configuration(
                "a table needs at least one column".into(),
            ));
        }
        if let Some(bad) = columns
            .iter()
            .find(|c| !(c.proportion.is_finite() && c.proportion > 0.0 && c.proportion <= 1.0))
        {
            return Err(GenerationError::Configuration(format!(
                "column '{}' has proportion {}, expected a fraction in (0, 1]",
                bad.header, bad.proportion
            )));
        }

        let total = to_hundredths(content_width.0);
        let last = columns.len() - 1;

        let mut widths: Vec<i64> = columns[..last]
            .iter()
            .map(|c| to_hundredths(content_width.0 * c.proportion))
            .collect();
        let accumulated: i64 = widths.iter().sum();
        if accumulated > total {
            log::warn!(
                "column proportions exceed the content width by {}mm; last column collapses to zero",
                from_hundredths(accumulated - total)
            );
        }
        widths.push((total - accumulated).max(0));

        let mut x = 0i64;
        let columns = columns
            .iter()
            .zip(widths)
            .map(|(column, width)| {
                let resolved = ResolvedColumn {
                    header: column.header.clone(),
                    align: column.align,
                    x: from_hundredths(x),
                    width: from_hundredths(width),
                };
                x += width;
                resolved
            })
            .collect();

        Ok(ColumnLayout {
            columns,
            total_hundredths: x,
        })
    }

    pub fn columns(&self) -> &[ResolvedColumn] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// The sum of all column widths
    pub fn total_width(&self) -> Mm {
        from_hundredths(self.total_hundredths)
    }

    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.header.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(proportions: &[f64]) -> Vec<Column> {
        proportions
            .iter()
            .enumerate()
            .map(|(i, &p)| Column::new(format!("c{i}"), TextAlign::Left, p))
            .collect()
    }

    #[test]
    fn quotation_columns_fill_content_width_exactly() {
        let proportions = [0.04, 0.20, 0.30, 0.10, 0.10, 0.04, 0.09, 0.13];
        let layout = ColumnLayout::resolve(Mm(184.4), &columns(&proportions)).unwrap();

        let widths: Vec<Mm> = layout.columns().iter().map(|c| c.width).collect();
        assert_eq!(
            &widths[..7],
            &[
                Mm(7.38),
                Mm(36.88),
                Mm(55.32),
                Mm(18.44),
                Mm(18.44),
                Mm(7.38),
                Mm(16.6)
            ]
        );
        // 184.4 - 160.44
        assert_eq!(widths[7], Mm(23.96));
        assert_eq!(layout.total_width(), Mm(184.4));
    }

    #[test]
    fn widths_sum_exactly_for_awkward_inputs() {
        let cases: [(f64, &[f64]); 4] = [
            (100.0, &[1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0]),
            (123.45, &[0.333, 0.333, 0.333]),
            (0.07, &[0.5, 0.5]),
            (297.0, &[0.1; 10]),
        ];
        for (width, proportions) in cases {
            let layout = ColumnLayout::resolve(Mm(width), &columns(proportions)).unwrap();
            let cents: i64 = layout
                .columns()
                .iter()
                .map(|c| to_hundredths(c.width.0))
                .sum();
            assert_eq!(cents, to_hundredths(width));
            assert_eq!(layout.total_width(), Mm(width));
        }
    }

    #[test]
    fn offsets_are_running_sums() {
        let layout = ColumnLayout::resolve(Mm(100.0), &columns(&[0.25, 0.25, 0.5])).unwrap();
        let offsets: Vec<Mm> = layout.columns().iter().map(|c| c.x).collect();
        assert_eq!(offsets, vec![Mm(0.0), Mm(25.0), Mm(50.0)]);
    }

    #[test]
    fn oversubscribed_proportions_collapse_last_column() {
        let layout = ColumnLayout::resolve(Mm(100.0), &columns(&[0.7, 0.7, 0.1])).unwrap();
        assert_eq!(layout.columns()[2].width, Mm(0.0));
    }

    #[test]
    fn rejects_unusable_configuration() {
        let err = ColumnLayout::resolve(Mm(0.0), &columns(&[1.0])).unwrap_err();
        assert!(matches!(err, GenerationError::Configuration(_)));

        let err = ColumnLayout::resolve(Mm(-5.0), &columns(&[1.0])).unwrap_err();
        assert!(matches!(err, GenerationError::Configuration(_)));

        let err = ColumnLayout::resolve(Mm(100.0), &[]).unwrap_err();
        assert!(matches!(err, GenerationError::Configuration(_)));

        let err = ColumnLayout::resolve(Mm(100.0), &columns(&[0.5, 0.0])).unwrap_err();
        assert!(matches!(err, GenerationError::Configuration(_)));
    }
}
