//! Document configuration: which kind of document is produced, its labels,
//! section order, page format, typography and table columns.
//!
//! Quotations and invoices share one assembler; everything that differs
//! between them lives here.

use crate::canvas::{ImageRef, TextAlign, TextStyle};
use crate::error::GenerationError;
use crate::layout::{Column, Margins, PageGeometry, RowMetrics};
use crate::pagesize::{self, PageSize};
use crate::units::{Mm, Pt};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    #[default]
    Quotation,
    Invoice,
}

impl DocumentKind {
    /// File stem used when the document has no identifier
    pub fn default_file_stem(&self) -> &'static str {
        match self {
            DocumentKind::Quotation => "quotation",
            DocumentKind::Invoice => "invoice",
        }
    }
}

impl std::str::FromStr for DocumentKind {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "quotation" | "quote" => Ok(DocumentKind::Quotation),
            "invoice" => Ok(DocumentKind::Invoice),
            other => Err(GenerationError::Configuration(format!(
                "unknown document kind '{other}'"
            ))),
        }
    }
}

/// The stages a document is laid out in. Stages only ever move forward.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    Body,
    Table,
    Totals,
    Signature,
    Notes,
    Done,
}

/// The blocks a document is made of
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SectionKind {
    /// Title banner with the document number and date
    Header,
    /// Company and customer blocks side by side, then a separator
    Addresses,
    /// Reference, attention and validity lines
    Reference,
    ItemTable,
    Eta,
    Totals,
    Signature,
    Notes,
    Terms,
    BankDetails,
}

impl SectionKind {
    pub fn phase(&self) -> Phase {
        match self {
            SectionKind::Header | SectionKind::Addresses | SectionKind::Reference => Phase::Body,
            SectionKind::ItemTable => Phase::Table,
            SectionKind::Eta | SectionKind::Totals => Phase::Totals,
            SectionKind::Signature => Phase::Signature,
            SectionKind::Notes | SectionKind::Terms | SectionKind::BankDetails => Phase::Notes,
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SectionKind::Header => "header",
            SectionKind::Addresses => "addresses",
            SectionKind::Reference => "reference",
            SectionKind::ItemTable => "item table",
            SectionKind::Eta => "ETA",
            SectionKind::Totals => "totals",
            SectionKind::Signature => "signature",
            SectionKind::Notes => "notes",
            SectionKind::Terms => "terms",
            SectionKind::BankDetails => "bank details",
        };
        f.write_str(name)
    }
}

/// Every piece of fixed text printed on a document
#[derive(Debug, Clone, PartialEq)]
pub struct Labels {
    pub title: String,
    pub number: String,
    pub date: String,
    pub valid_until: String,
    pub customer: String,
    pub reference: String,
    pub attention: String,
    pub eta: String,
    pub subtotal: String,
    pub discount: String,
    pub tax: String,
    pub total_quantity: String,
    pub grand_total: String,
    pub signature: String,
    pub notes: String,
    pub terms: String,
    pub bank_details: String,
    pub page: String,
    pub generated: String,
}

impl Labels {
    pub fn for_kind(kind: DocumentKind) -> Labels {
        let (title, number, valid_until, customer) = match kind {
            DocumentKind::Quotation => ("QUOTATION", "Quotation No.", "Valid Until", "Quotation For"),
            DocumentKind::Invoice => ("INVOICE", "Invoice No.", "Due Date", "Bill To"),
        };
        Labels {
            title: title.into(),
            number: number.into(),
            date: "Date".into(),
            valid_until: valid_until.into(),
            customer: customer.into(),
            reference: "Reference".into(),
            attention: "Attention".into(),
            eta: "Estimated Delivery".into(),
            subtotal: "Subtotal".into(),
            discount: "Discount".into(),
            tax: "Tax".into(),
            total_quantity: "Total Quantity".into(),
            grand_total: "Grand Total".into(),
            signature: "Authorised Signature".into(),
            notes: "Notes".into(),
            terms: "Terms & Conditions".into(),
            bank_details: "Bank Details".into(),
            page: "Page".into(),
            generated: "Generated".into(),
        }
    }
}

/// Font sizes used across the document
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Typography {
    pub title: Pt,
    pub heading: Pt,
    pub body: Pt,
    pub table: Pt,
    pub small: Pt,
}

impl Default for Typography {
    fn default() -> Self {
        Typography {
            title: Pt(20.0),
            heading: Pt(10.0),
            body: Pt(9.0),
            table: Pt(8.0),
            small: Pt(7.0),
        }
    }
}

impl Typography {
    /// Every size multiplied by `factor`
    pub fn scaled(&self, factor: f32) -> Typography {
        Typography {
            title: self.title * factor,
            heading: self.heading * factor,
            body: self.body * factor,
            table: self.table * factor,
            small: self.small * factor,
        }
    }

    pub fn title_style(&self) -> TextStyle {
        TextStyle::new(self.title).bold()
    }

    pub fn heading_style(&self) -> TextStyle {
        TextStyle::new(self.heading).bold()
    }

    pub fn body_style(&self) -> TextStyle {
        TextStyle::new(self.body)
    }

    pub fn table_style(&self) -> TextStyle {
        TextStyle::new(self.table)
    }

    pub fn small_style(&self) -> TextStyle {
        TextStyle::new(self.small)
    }
}

/// The issuing company, printed in the address block and footer
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyProfile {
    pub name: String,
    pub address: String,
    pub email: String,
    pub phone: String,
}

/// What an item-table column shows
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ItemField {
    /// 1-based line number
    Index,
    Name,
    Description,
    PartNumber,
    Manufacturer,
    Quantity,
    UnitPrice,
    Total,
}

/// An item-table column together with the item field it shows
#[derive(Debug, Clone, PartialEq)]
pub struct TableColumn {
    pub field: ItemField,
    pub column: Column,
}

impl TableColumn {
    pub fn new<S: ToString>(field: ItemField, header: S, align: TextAlign, proportion: f64) -> Self {
        TableColumn {
            field,
            column: Column::new(header, align, proportion),
        }
    }
}

/// Everything about a document that is not data
#[derive(Debug, Clone)]
pub struct DocumentConfig {
    pub kind: DocumentKind,
    pub labels: Labels,
    pub sections: Vec<SectionKind>,
    pub page_size: PageSize,
    pub margins: Margins,
    pub footer_height: Mm,
    /// Multiplies every font size
    pub font_scale: f32,
    pub typography: Typography,
    pub columns: Vec<TableColumn>,
    pub row: RowMetrics,
    pub company: CompanyProfile,
    pub logo: Option<ImageRef>,
    pub signature_image: Option<ImageRef>,
    pub currency_symbol: String,
    /// Timestamp stamped into footers; the current time when unset
    pub generated_at: Option<DateTime<Local>>,
}

/// The eight item-table columns, proportions summing to 1
pub fn default_columns() -> Vec<TableColumn> {
    use ItemField::*;
    vec![
        TableColumn::new(Index, "#", TextAlign::Center, 0.04),
        TableColumn::new(Name, "Item", TextAlign::Left, 0.20),
        TableColumn::new(Description, "Description", TextAlign::Left, 0.30),
        TableColumn::new(PartNumber, "Part No.", TextAlign::Left, 0.10),
        TableColumn::new(Manufacturer, "Manufacturer", TextAlign::Left, 0.10),
        TableColumn::new(Quantity, "Qty", TextAlign::Center, 0.04),
        TableColumn::new(UnitPrice, "Unit Price", TextAlign::Right, 0.09),
        TableColumn::new(Total, "Total", TextAlign::Right, 0.13),
    ]
}

impl DocumentConfig {
    pub fn for_kind(kind: DocumentKind) -> DocumentConfig {
        let sections = match kind {
            DocumentKind::Quotation => vec![
                SectionKind::Header,
                SectionKind::Addresses,
                SectionKind::Reference,
                SectionKind::ItemTable,
                SectionKind::Eta,
                SectionKind::Totals,
                SectionKind::Signature,
                SectionKind::Notes,
                SectionKind::Terms,
            ],
            DocumentKind::Invoice => vec![
                SectionKind::Header,
                SectionKind::Addresses,
                SectionKind::Reference,
                SectionKind::ItemTable,
                SectionKind::Totals,
                SectionKind::Signature,
                SectionKind::Notes,
                SectionKind::Terms,
                SectionKind::BankDetails,
            ],
        };

        DocumentConfig {
            kind,
            labels: Labels::for_kind(kind),
            sections,
            page_size: pagesize::A4,
            margins: Margins::all(Mm(12.8)),
            footer_height: Mm(12.0),
            font_scale: 1.0,
            typography: Typography::default(),
            columns: default_columns(),
            row: RowMetrics::default(),
            company: CompanyProfile::default(),
            logo: None,
            signature_image: None,
            currency_symbol: "$".into(),
            generated_at: None,
        }
    }

    pub fn quotation() -> DocumentConfig {
        DocumentConfig::for_kind(DocumentKind::Quotation)
    }

    pub fn invoice() -> DocumentConfig {
        DocumentConfig::for_kind(DocumentKind::Invoice)
    }

    pub fn with_company(mut self, company: CompanyProfile) -> Self {
        self.company = company;
        self
    }

    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    pub fn with_footer_height(mut self, footer_height: Mm) -> Self {
        self.footer_height = footer_height;
        self
    }

    pub fn with_font_scale(mut self, font_scale: f32) -> Self {
        self.font_scale = font_scale;
        self
    }

    pub fn with_columns(mut self, columns: Vec<TableColumn>) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_row_metrics(mut self, row: RowMetrics) -> Self {
        self.row = row;
        self
    }

    pub fn with_sections(mut self, sections: Vec<SectionKind>) -> Self {
        self.sections = sections;
        self
    }

    pub fn with_logo(mut self, logo: ImageRef) -> Self {
        self.logo = Some(logo);
        self
    }

    pub fn with_signature_image(mut self, image: ImageRef) -> Self {
        self.signature_image = Some(image);
        self
    }

    pub fn with_currency_symbol<S: ToString>(mut self, symbol: S) -> Self {
        self.currency_symbol = symbol.to_string();
        self
    }

    pub fn with_generated_at(mut self, at: DateTime<Local>) -> Self {
        self.generated_at = Some(at);
        self
    }

    pub fn geometry(&self) -> PageGeometry {
        PageGeometry::new(self.page_size, self.margins, self.footer_height)
    }

    /// The plain column definitions handed to the column model
    pub fn table_columns(&self) -> Vec<Column> {
        self.columns.iter().map(|c| c.column.clone()).collect()
    }

    /// Font sizes with the font scale applied
    pub fn scaled_typography(&self) -> Typography {
        self.typography.scaled(self.font_scale)
    }

    /// Check the configuration can be laid out at all
    pub fn validate(&self) -> Result<(), GenerationError> {
        self.geometry().validate()?;

        if !(self.font_scale.is_finite() && self.font_scale > 0.0) {
            return Err(GenerationError::Configuration(format!(
                "font scale must be positive, got {}",
                self.font_scale
            )));
        }
        if self.columns.is_empty() {
            return Err(GenerationError::Configuration(
                "the item table needs at least one column".into(),
            ));
        }

        let mut seen = HashSet::new();
        let mut phase = Phase::Body;
        for section in &self.sections {
            if !seen.insert(*section) {
                return Err(GenerationError::Configuration(format!(
                    "the {section} section is listed twice"
                )));
            }
            if section.phase() < phase {
                return Err(GenerationError::Configuration(format!(
                    "the {section} section cannot come after the {phase:?} stage"
                )));
            }
            phase = section.phase();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_configs_are_valid() {
        assert!(DocumentConfig::quotation().validate().is_ok());
        assert!(DocumentConfig::invoice().validate().is_ok());
    }

    #[test]
    fn default_columns_span_the_content_width() {
        let total: f64 = default_columns().iter().map(|c| c.column.proportion).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert_eq!(DocumentConfig::quotation().geometry().content_width(), Mm(184.4));
    }

    #[test]
    fn labels_follow_document_kind() {
        assert_eq!(DocumentConfig::quotation().labels.title, "QUOTATION");
        assert_eq!(DocumentConfig::invoice().labels.number, "Invoice No.");
        assert_eq!("Invoice".parse::<DocumentKind>().unwrap(), DocumentKind::Invoice);
        assert!("receipt".parse::<DocumentKind>().is_err());
    }

    #[test]
    fn sections_may_not_go_backwards() {
        let config = DocumentConfig::quotation().with_sections(vec![
            SectionKind::Header,
            SectionKind::Totals,
            SectionKind::ItemTable,
        ]);
        assert!(matches!(
            config.validate(),
            Err(GenerationError::Configuration(_))
        ));
    }

    #[test]
    fn sections_within_a_stage_may_be_reordered() {
        let config = DocumentConfig::quotation().with_sections(vec![
            SectionKind::ItemTable,
            SectionKind::Terms,
            SectionKind::Notes,
        ]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn duplicate_sections_are_rejected() {
        let config = DocumentConfig::quotation()
            .with_sections(vec![SectionKind::ItemTable, SectionKind::ItemTable]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn font_scale_applies_to_every_size() {
        let scaled = Typography::default().scaled(2.0);
        assert_eq!(scaled.body, Pt(18.0));
        assert_eq!(scaled.title, Pt(40.0));
    }
}
