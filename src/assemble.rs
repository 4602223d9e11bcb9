//! Assembles a whole quotation or invoice onto a canvas.
//!
//! Sections are laid out in the order the [DocumentConfig] lists them, which
//! must follow the stages of [Phase]: body, item table, totals, signature,
//! notes. Every block is measured first, then handed to the [PageFlow] to find
//! its place, then drawn. Any failure aborts the whole document and comes back
//! wrapped with the name of the section being laid out.

use crate::canvas::{Canvas, Frame, RectStyle, TextAlign, TextStyle};
use crate::colour::colours;
use crate::config::{DocumentConfig, DocumentKind, ItemField, Phase, SectionKind, Typography};
use crate::error::GenerationError;
use crate::format;
use crate::document::PdfDocument;
use crate::info::Info;
use crate::layout::{
    draw_row, measure_row, BlockKind, ColumnLayout, MeasuredRow, PageChrome, PageFlow,
    PageGeometry, StandardFontMeasurer, TextMeasurer,
};
use crate::model::{non_blank, DiscountType, DocumentModel, Record};
use crate::resolve::{self, LineAmounts};
use crate::units::Mm;
use chrono::{DateTime, Local};

const BANNER_HEIGHT: Mm = Mm(22.0);
const SECTION_GAP: Mm = Mm(5.0);
const COLUMN_GAP: Mm = Mm(8.0);
const BOX_PADDING: Mm = Mm(3.0);
const TOTALS_LINE_HEIGHT: Mm = Mm(7.0);
const TOTALS_WIDTH_SHARE: f64 = 0.45;
const SIGNATURE_HEIGHT: Mm = Mm(32.0);
const SIGNATURE_WIDTH: Mm = Mm(60.0);

/// What a finished generation produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub pages: usize,
    /// Item-table rows drawn
    pub rows: usize,
    pub file_name: String,
}

/// The file name a document is saved under: its identifier, or the document
/// kind when it has none, with path separators replaced
pub fn output_file_name(model: &DocumentModel, kind: DocumentKind) -> String {
    let stem: String = non_blank(&model.quotation_id)
        .unwrap_or(kind.default_file_stem())
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '-' } else { c })
        .collect();
    format!("{stem}.pdf")
}

/// Lay out a document onto `canvas`, measuring text with `measurer`.
///
/// On success the canvas holds the complete document. On failure the canvas
/// contents must be discarded: nothing is rolled back.
pub fn generate<C, M>(
    model: &DocumentModel,
    config: &DocumentConfig,
    canvas: &mut C,
    measurer: &M,
) -> Result<GenerationReport, GenerationError>
where
    C: Canvas + ?Sized,
    M: TextMeasurer + ?Sized,
{
    config.validate()?;
    let items = model
        .items
        .as_deref()
        .ok_or_else(|| GenerationError::Data("the document has no line item list".into()))?;

    let geometry = config.geometry();
    let columns = ColumnLayout::resolve(geometry.content_width(), &config.table_columns())?;
    let typography = config.scaled_typography();
    let generated_at = config.generated_at.unwrap_or_else(Local::now);

    let header_style = typography.table_style().bold();
    let header = measure_row(&columns.headers(), &columns, measurer, &header_style, &config.row)
        .map_err(|e| e.in_section(SectionKind::ItemTable))?;

    let chrome = Chrome {
        config,
        geometry,
        columns: &columns,
        header,
        typography,
    };
    let mut assembler = Assembler {
        model,
        config,
        measurer,
        columns: &columns,
        geometry,
        typography,
        items,
        generated_at,
        phase: Phase::Body,
        rows: 0,
    };
    let mut flow = PageFlow::new(geometry, generated_at);

    for &section in &config.sections {
        assembler.enter(section.phase())?;
        assembler
            .layout(section, canvas, &chrome, &mut flow)
            .map_err(|e| e.in_section(section))?;
    }
    assembler.enter(Phase::Done)?;
    // the closing footer belongs to whichever section filled the last page
    let pages = flow
        .finish(canvas, &chrome)
        .map_err(|e| match config.sections.last() {
            Some(&section) => e.in_section(section),
            None => e,
        })?;

    let file_name = output_file_name(model, config.kind);
    log::info!(
        "laid out {} on {} page(s) with {} item row(s)",
        file_name,
        pages,
        assembler.rows
    );
    Ok(GenerationReport {
        pages,
        rows: assembler.rows,
        file_name,
    })
}

/// A finished PDF, ready to be saved under `file_name`
#[derive(Debug, Clone)]
pub struct RenderedPdf {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub pages: usize,
}

/// Lay out a document with the standard fonts and render it to PDF bytes.
/// Nothing is produced unless every section laid out successfully.
pub fn render_pdf(
    model: &DocumentModel,
    config: &DocumentConfig,
) -> Result<RenderedPdf, GenerationError> {
    let measurer = StandardFontMeasurer::default();
    let mut document = PdfDocument::new(config.page_size)
        .with_line_height_factor(measurer.line_height_factor);
    let report = generate(model, config, &mut document, &measurer)?;
    document.set_info(Info::for_document(model, config));
    let bytes = document.to_bytes()?;
    log::debug!("rendered {} ({} bytes)", report.file_name, bytes.len());
    Ok(RenderedPdf {
        file_name: report.file_name,
        bytes,
        pages: report.pages,
    })
}

/// Footers and the repeated table header
struct Chrome<'a> {
    config: &'a DocumentConfig,
    geometry: PageGeometry,
    columns: &'a ColumnLayout,
    header: MeasuredRow,
    typography: Typography,
}

impl<C: Canvas + ?Sized> PageChrome<C> for Chrome<'_> {
    fn draw_footer(
        &self,
        canvas: &mut C,
        page_number: usize,
        generated_at: &DateTime<Local>,
    ) -> Result<(), GenerationError> {
        let left = self.geometry.margins.left;
        let right = left + self.geometry.content_width();
        let rule_y = self.geometry.footer_top() + Mm(2.0);
        canvas.draw_line((left, rule_y), (right, rule_y), colours::RULE_GREY, Mm(0.2))?;

        let style = self.typography.small_style().coloured(colours::MID_GREY);
        let text_y = rule_y + Mm(2.0);
        let labels = &self.config.labels;
        canvas.draw_text(
            &format!("{} {}", labels.generated, format::timestamp(generated_at)),
            left,
            text_y,
            &style,
        )?;
        if !self.config.company.name.is_empty() {
            canvas.draw_text(
                &self.config.company.name,
                left + self.geometry.content_width() / 2.0,
                text_y,
                &style.aligned(TextAlign::Center),
            )?;
        }
        canvas.draw_text(
            &format!("{} {}", labels.page, page_number),
            right,
            text_y,
            &style.aligned(TextAlign::Right),
        )
    }

    fn draw_table_header(&self, canvas: &mut C, y: Mm) -> Result<Mm, GenerationError> {
        let style = self
            .typography
            .table_style()
            .bold()
            .coloured(colours::WHITE);
        draw_row(
            canvas,
            &self.header,
            self.columns,
            self.geometry.margins.left,
            y,
            &style,
            &self.config.row,
            Some(colours::BRAND),
            colours::BRAND,
        )?;
        Ok(self.header.height)
    }
}

/// Lines of wrapped text set in one style
struct Paragraph {
    lines: Vec<String>,
    style: TextStyle,
    line_height: Mm,
}

impl Paragraph {
    fn height(&self) -> Mm {
        self.line_height * self.lines.len() as f64
    }

    fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C, x: Mm, y: Mm) -> Result<Mm, GenerationError> {
        for (i, line) in self.lines.iter().enumerate() {
            if !line.is_empty() {
                canvas.draw_text(line, x, y + self.line_height * i as f64, &self.style)?;
            }
        }
        Ok(self.height())
    }
}

fn draw_stack<C: Canvas + ?Sized>(
    canvas: &mut C,
    paragraphs: &[Paragraph],
    x: Mm,
    y: Mm,
) -> Result<Mm, GenerationError> {
    let mut offset = Mm::ZERO;
    for paragraph in paragraphs {
        offset += paragraph.draw(canvas, x, y + offset)?;
    }
    Ok(offset)
}

fn stack_height(paragraphs: &[Paragraph]) -> Mm {
    paragraphs.iter().map(Paragraph::height).sum()
}

struct Assembler<'a, M: ?Sized> {
    model: &'a DocumentModel,
    config: &'a DocumentConfig,
    measurer: &'a M,
    columns: &'a ColumnLayout,
    geometry: PageGeometry,
    typography: Typography,
    items: &'a [Record],
    generated_at: DateTime<Local>,
    phase: Phase,
    rows: usize,
}

impl<M: TextMeasurer + ?Sized> Assembler<'_, M> {
    fn enter(&mut self, phase: Phase) -> Result<(), GenerationError> {
        if phase < self.phase {
            return Err(GenerationError::Configuration(format!(
                "cannot return to the {phase:?} stage from the {:?} stage",
                self.phase
            )));
        }
        if phase != self.phase {
            log::debug!("{:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
        Ok(())
    }

    fn layout<C: Canvas + ?Sized>(
        &mut self,
        section: SectionKind,
        canvas: &mut C,
        chrome: &Chrome<'_>,
        flow: &mut PageFlow,
    ) -> Result<(), GenerationError> {
        let config: &DocumentConfig = self.config;
        let (labels, model) = (&config.labels, self.model);
        match section {
            SectionKind::Header => self.header(canvas, chrome, flow),
            SectionKind::Addresses => self.addresses(canvas, chrome, flow),
            SectionKind::Reference => self.reference(canvas, chrome, flow),
            SectionKind::ItemTable => self.item_table(canvas, chrome, flow),
            SectionKind::Eta => self.eta(canvas, chrome, flow),
            SectionKind::Totals => self.totals(canvas, chrome, flow),
            SectionKind::Signature => self.signature(canvas, chrome, flow),
            SectionKind::Notes => {
                self.text_section(canvas, chrome, flow, &labels.notes, &model.notes)
            }
            SectionKind::Terms => {
                self.text_section(canvas, chrome, flow, &labels.terms, &model.terms)
            }
            SectionKind::BankDetails => {
                let details = &model.bank_details;
                self.text_section(canvas, chrome, flow, &labels.bank_details, details)
            }
        }
    }

    fn left(&self) -> Mm {
        self.geometry.margins.left
    }

    fn content_width(&self) -> Mm {
        self.geometry.content_width()
    }

    fn paragraph(&self, text: &str, width: Mm, style: TextStyle) -> Result<Paragraph, GenerationError> {
        Ok(Paragraph {
            lines: self.measurer.wrap(text, width, &style)?,
            line_height: self.measurer.line_height(&style),
            style,
        })
    }

    fn header<C: Canvas + ?Sized>(
        &mut self,
        canvas: &mut C,
        chrome: &Chrome<'_>,
        flow: &mut PageFlow,
    ) -> Result<(), GenerationError> {
        let labels = &self.config.labels;
        let y = flow.ensure_space(canvas, chrome, BlockKind::Section, BANNER_HEIGHT)?;
        let banner = Frame::new(self.left(), y, self.content_width(), BANNER_HEIGHT);
        canvas.draw_rect(banner, RectStyle::Fill(colours::BRAND))?;

        let mut title_x = banner.x + BOX_PADDING;
        if let Some(logo) = &self.config.logo {
            let side = BANNER_HEIGHT - BOX_PADDING * 2.0;
            let frame = Frame::new(title_x, y + BOX_PADDING, side * 2.0, side);
            canvas.draw_image(logo, frame)?;
            title_x += frame.width + BOX_PADDING;
        }

        let title_style = self.typography.title_style().coloured(colours::WHITE);
        let title_height = self.measurer.line_height(&title_style);
        let title_y = y + (BANNER_HEIGHT - title_height) / 2.0;
        canvas.draw_text(&labels.title, title_x, title_y, &title_style)?;

        let info_style = self
            .typography
            .body_style()
            .bold()
            .coloured(colours::WHITE)
            .aligned(TextAlign::Right);
        let info_height = self.measurer.line_height(&info_style);
        let date = non_blank(&self.model.date)
            .map(str::to_string)
            .unwrap_or_else(|| format::date(&self.generated_at));
        let lines = [
            format!(
                "{} {}",
                labels.number,
                non_blank(&self.model.quotation_id).unwrap_or("-")
            ),
            format!("{}: {}", labels.date, date),
        ];
        let right = banner.right() - BOX_PADDING;
        let mut info_y = y + (BANNER_HEIGHT - info_height * lines.len() as f64) / 2.0;
        for line in &lines {
            canvas.draw_text(line, right, info_y, &info_style)?;
            info_y += info_height;
        }

        flow.advance(BANNER_HEIGHT);
        flow.skip(SECTION_GAP);
        Ok(())
    }

    fn addresses<C: Canvas + ?Sized>(
        &mut self,
        canvas: &mut C,
        chrome: &Chrome<'_>,
        flow: &mut PageFlow,
    ) -> Result<(), GenerationError> {
        let half = ((self.content_width() - COLUMN_GAP) / 2.0).max(Mm::ZERO);
        let heading = self.typography.heading_style();
        let body = self.typography.body_style();

        let company = &self.config.company;
        let mut left = Vec::new();
        for (text, style) in [
            (company.name.as_str(), heading),
            (company.address.as_str(), body),
            (company.email.as_str(), body),
            (company.phone.as_str(), body),
        ] {
            if !text.trim().is_empty() {
                left.push(self.paragraph(text, half, style)?);
            }
        }

        let mut right = vec![self.paragraph(&self.config.labels.customer, half, heading)?];
        for (field, style) in [
            (&self.model.customer_name, body.bold()),
            (&self.model.customer_address, body),
            (&self.model.customer_email, body),
        ] {
            if let Some(text) = non_blank(field) {
                right.push(self.paragraph(text, half, style)?);
            }
        }

        let height = stack_height(&left).max(stack_height(&right));
        let block = height + SECTION_GAP;
        let y = flow.ensure_space(canvas, chrome, BlockKind::Section, block)?;
        draw_stack(canvas, &left, self.left(), y)?;
        draw_stack(canvas, &right, self.left() + half + COLUMN_GAP, y)?;

        let rule_y = y + height + SECTION_GAP / 2.0;
        let end = self.left() + self.content_width();
        canvas.draw_line((self.left(), rule_y), (end, rule_y), colours::RULE_GREY, Mm(0.3))?;

        flow.advance(block);
        flow.skip(SECTION_GAP / 2.0);
        Ok(())
    }

    fn reference<C: Canvas + ?Sized>(
        &mut self,
        canvas: &mut C,
        chrome: &Chrome<'_>,
        flow: &mut PageFlow,
    ) -> Result<(), GenerationError> {
        let labels = &self.config.labels;
        let style = self.typography.body_style();
        let mut paragraphs = Vec::new();
        for (label, field) in [
            (&labels.reference, &self.model.reference),
            (&labels.attention, &self.model.attention),
            (&labels.valid_until, &self.model.valid_until),
        ] {
            if let Some(value) = non_blank(field) {
                let text = format!("{label}: {value}");
                paragraphs.push(self.paragraph(&text, self.content_width(), style)?);
            }
        }
        if paragraphs.is_empty() {
            return Ok(());
        }

        let height = stack_height(&paragraphs);
        let y = flow.ensure_space(canvas, chrome, BlockKind::Section, height)?;
        draw_stack(canvas, &paragraphs, self.left(), y)?;
        flow.advance(height);
        flow.skip(SECTION_GAP);
        Ok(())
    }

    fn cells(&self, index: usize, item: &Record) -> Vec<String> {
        let amounts = LineAmounts::resolve(item);
        let symbol = &self.config.currency_symbol;
        self.config
            .columns
            .iter()
            .map(|column| match column.field {
                ItemField::Index => (index + 1).to_string(),
                ItemField::Name => item.text(&["name", "itemName", "productName"]),
                ItemField::Description => item.text(&["description"]),
                ItemField::PartNumber => item.text(&["partNumber", "partNo"]),
                ItemField::Manufacturer => item.text(&["manufacturer", "brand"]),
                ItemField::Quantity => format::quantity(amounts.quantity),
                ItemField::UnitPrice => format::money(amounts.unit_price, symbol),
                ItemField::Total => format::money(amounts.total, symbol),
            })
            .collect()
    }

    fn measure_item(&self, index: usize, item: &Record) -> Result<MeasuredRow, GenerationError> {
        measure_row(
            &self.cells(index, item),
            self.columns,
            self.measurer,
            &self.typography.table_style(),
            &self.config.row,
        )
    }

    fn item_table<C: Canvas + ?Sized>(
        &mut self,
        canvas: &mut C,
        chrome: &Chrome<'_>,
        flow: &mut PageFlow,
    ) -> Result<(), GenerationError> {
        let items = self.items;
        let mut rows = items
            .iter()
            .enumerate()
            .map(|(i, item)| self.measure_item(i, item));
        let Some(first) = rows.next().transpose()? else {
            log::warn!("document has an empty item list; skipping the item table");
            return Ok(());
        };

        // keep the header with the first row
        let y = flow.ensure_space(
            canvas,
            chrome,
            BlockKind::Section,
            chrome.header.height + first.height,
        )?;
        let header = PageChrome::<C>::draw_table_header(chrome, canvas, y)?;
        flow.skip(header);

        let style = self.typography.table_style();
        let mut drawn = 0;
        for row in std::iter::once(Ok(first)).chain(rows) {
            let row = row?;
            let y = flow.ensure_space(canvas, chrome, BlockKind::TableRow, row.height)?;
            let fill = (drawn % 2 == 1).then_some(colours::ZEBRA);
            draw_row(
                canvas,
                &row,
                self.columns,
                self.left(),
                y,
                &style,
                &self.config.row,
                fill,
                colours::RULE_GREY,
            )?;
            flow.advance(row.height);
            drawn += 1;
        }

        self.rows += drawn;
        flow.skip(SECTION_GAP);
        Ok(())
    }

    fn eta<C: Canvas + ?Sized>(
        &mut self,
        canvas: &mut C,
        chrome: &Chrome<'_>,
        flow: &mut PageFlow,
    ) -> Result<(), GenerationError> {
        let Some(eta) = non_blank(&self.model.eta) else {
            return Ok(());
        };

        let inner = (self.content_width() - BOX_PADDING * 2.0).max(Mm::ZERO);
        let text = format!("{}: {}", self.config.labels.eta, eta);
        let paragraph = self.paragraph(&text, inner, self.typography.body_style().bold())?;
        let height = paragraph.height() + BOX_PADDING * 2.0;

        let y = flow.ensure_space(canvas, chrome, BlockKind::Section, height)?;
        let frame = Frame::new(self.left(), y, self.content_width(), height);
        canvas.draw_rect(frame, RectStyle::Stroke(colours::RULE_GREY))?;
        paragraph.draw(canvas, frame.x + BOX_PADDING, y + BOX_PADDING)?;

        flow.advance(height);
        flow.skip(SECTION_GAP);
        Ok(())
    }

    /// The label/value pairs of the totals box; the last one is the grand total
    fn totals_lines(&self) -> Vec<(String, String)> {
        let labels = &self.config.labels;
        let symbol = &self.config.currency_symbol;
        let amounts = self.model.amounts();

        let discount_label = match self.model.discount_type {
            DiscountType::Percentage => format!(
                "{} ({})",
                labels.discount,
                format::percentage(resolve::DISCOUNT.resolve(&amounts))
            ),
            DiscountType::Amount => labels.discount.clone(),
        };
        let tax_rate = resolve::TAX_RATE.resolve(&amounts);
        let tax_label = if tax_rate != 0.0 {
            format!("{} ({})", labels.tax, format::percentage(tax_rate))
        } else {
            labels.tax.clone()
        };
        let total_quantity: f64 = self
            .items
            .iter()
            .map(|item| resolve::QUANTITY.resolve(item))
            .sum();

        vec![
            (
                labels.subtotal.clone(),
                format::money(resolve::SUBTOTAL.resolve(&amounts), symbol),
            ),
            (
                discount_label,
                format::deduction(resolve::DISCOUNT_AMOUNT.resolve(&amounts), symbol),
            ),
            (tax_label, format::money(resolve::TAX.resolve(&amounts), symbol)),
            (labels.total_quantity.clone(), format::quantity(total_quantity)),
            (
                labels.grand_total.clone(),
                format::money(resolve::GRAND_TOTAL.resolve(&amounts), symbol),
            ),
        ]
    }

    fn totals<C: Canvas + ?Sized>(
        &mut self,
        canvas: &mut C,
        chrome: &Chrome<'_>,
        flow: &mut PageFlow,
    ) -> Result<(), GenerationError> {
        let lines = self.totals_lines();
        let height = TOTALS_LINE_HEIGHT * lines.len() as f64;
        let y = flow.ensure_space(canvas, chrome, BlockKind::Section, height)?;

        let width = (self.content_width() * TOTALS_WIDTH_SHARE).round2();
        let x = self.left() + self.content_width() - width;
        let last = lines.len() - 1;
        for (i, (label, value)) in lines.iter().enumerate() {
            let grand = i == last;
            let frame = Frame::new(x, y + TOTALS_LINE_HEIGHT * i as f64, width, TOTALS_LINE_HEIGHT);
            let rect = if grand {
                RectStyle::FillStroke {
                    fill: colours::HIGHLIGHT,
                    stroke: colours::RULE_GREY,
                }
            } else {
                RectStyle::Stroke(colours::RULE_GREY)
            };
            canvas.draw_rect(frame, rect)?;

            let style = if grand {
                self.typography.body_style().bold()
            } else {
                self.typography.body_style()
            };
            let text_y = frame.y + (TOTALS_LINE_HEIGHT - self.measurer.line_height(&style)) / 2.0;
            canvas.draw_text(label, frame.x + BOX_PADDING, text_y, &style)?;
            canvas.draw_text(
                value,
                frame.right() - BOX_PADDING,
                text_y,
                &style.aligned(TextAlign::Right),
            )?;
        }

        flow.advance(height);
        flow.skip(SECTION_GAP);
        Ok(())
    }

    fn signature<C: Canvas + ?Sized>(
        &mut self,
        canvas: &mut C,
        chrome: &Chrome<'_>,
        flow: &mut PageFlow,
    ) -> Result<(), GenerationError> {
        let y = flow.ensure_space(canvas, chrome, BlockKind::Section, SIGNATURE_HEIGHT)?;
        let x = self.left();
        let width = SIGNATURE_WIDTH.min(self.content_width());

        if let Some(image) = &self.config.signature_image {
            canvas.draw_image(image, Frame::new(x, y, width * 0.8, Mm(18.0)))?;
        }
        let line_y = y + Mm(20.0);
        canvas.draw_line((x, line_y), (x + width, line_y), colours::BLACK, Mm(0.3))?;

        let small = self.typography.small_style();
        canvas.draw_text(&self.config.labels.signature, x, line_y + Mm(1.5), &small)?;
        if !self.config.company.name.is_empty() {
            let name_y = line_y + Mm(1.5) + self.measurer.line_height(&small);
            canvas.draw_text(&self.config.company.name, x, name_y, &small.bold())?;
        }

        flow.advance(SIGNATURE_HEIGHT);
        flow.skip(SECTION_GAP);
        Ok(())
    }

    /// A heading and a paragraph, kept together on one page when they fit on
    /// one; otherwise split between lines
    fn text_section<C: Canvas + ?Sized>(
        &mut self,
        canvas: &mut C,
        chrome: &Chrome<'_>,
        flow: &mut PageFlow,
        label: &str,
        text: &Option<String>,
    ) -> Result<(), GenerationError> {
        let Some(text) = non_blank(text) else {
            return Ok(());
        };

        let width = self.content_width();
        let heading = self.paragraph(label, width, self.typography.heading_style())?;
        let body_style = self.typography.body_style();
        let body_height = self.measurer.measure_paragraph_height(text, width, &body_style)?;
        let height = heading.height() + body_height;
        let body = self.paragraph(text, width, body_style)?;

        if height <= self.geometry.usable_height() {
            let y = flow.ensure_space(canvas, chrome, BlockKind::Section, height)?;
            let heading_height = heading.draw(canvas, self.left(), y)?;
            body.draw(canvas, self.left(), y + heading_height)?;
            flow.advance(height);
        } else {
            log::debug!("{label} is taller than a page; splitting between lines");
            let first_line = heading.height() + body.line_height;
            let y = flow.ensure_space(canvas, chrome, BlockKind::Section, first_line)?;
            let heading_height = heading.draw(canvas, self.left(), y)?;
            flow.advance(heading_height);
            for line in &body.lines {
                let y = flow.ensure_space(canvas, chrome, BlockKind::Section, body.line_height)?;
                if !line.is_empty() {
                    canvas.draw_text(line, self.left(), y, &body.style)?;
                }
                flow.advance(body.line_height);
            }
        }

        flow.skip(SECTION_GAP);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{ImageRef, RecordingCanvas};
    use crate::colour::Colour;
    use crate::layout::MonospaceMeasurer;

    /// Records everything but refuses to draw page numbers
    struct NoPageNumbers(RecordingCanvas);

    impl Canvas for NoPageNumbers {
        fn new_page(&mut self) -> Result<(), GenerationError> {
            self.0.new_page()
        }

        fn current_page_number(&self) -> usize {
            self.0.current_page_number()
        }

        fn draw_rect(&mut self, frame: Frame, style: RectStyle) -> Result<(), GenerationError> {
            self.0.draw_rect(frame, style)
        }

        fn draw_line(
            &mut self,
            from: (Mm, Mm),
            to: (Mm, Mm),
            colour: Colour,
            width: Mm,
        ) -> Result<(), GenerationError> {
            self.0.draw_line(from, to, colour, width)
        }

        fn draw_text(
            &mut self,
            text: &str,
            x: Mm,
            y: Mm,
            style: &TextStyle,
        ) -> Result<(), GenerationError> {
            if text.starts_with("Page ") {
                return Err(GenerationError::Measurement("no glyphs for digits".into()));
            }
            self.0.draw_text(text, x, y, style)
        }

        fn draw_image(&mut self, image: &ImageRef, frame: Frame) -> Result<(), GenerationError> {
            self.0.draw_image(image, frame)
        }
    }

    #[test]
    fn closing_footer_failures_name_the_last_section() {
        let model = DocumentModel {
            items: Some(vec![Record::new().with("name", "Bolt").with("quantity", 1)]),
            ..Default::default()
        };
        let config = DocumentConfig::quotation();
        let mut canvas = NoPageNumbers(RecordingCanvas::new());
        let measurer = MonospaceMeasurer::new(Mm(2.0), Mm(4.0));
        let err = generate(&model, &config, &mut canvas, &measurer).unwrap_err();

        assert_eq!(canvas.0.pages.len(), 1);
        assert_eq!(err.section(), Some(SectionKind::Terms));
        assert!(matches!(err.root(), GenerationError::Measurement(_)));
    }

    #[test]
    fn file_name_uses_identifier_or_kind() {
        let mut model = DocumentModel {
            quotation_id: Some("Q-2026/014".into()),
            ..Default::default()
        };
        assert_eq!(
            output_file_name(&model, DocumentKind::Quotation),
            "Q-2026-014.pdf"
        );

        model.quotation_id = Some("   ".into());
        assert_eq!(output_file_name(&model, DocumentKind::Invoice), "invoice.pdf");

        model.quotation_id = None;
        assert_eq!(
            output_file_name(&model, DocumentKind::Quotation),
            "quotation.pdf"
        );
    }
}
