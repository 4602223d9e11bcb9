//! End-to-end layout tests: a document model goes in, the recorded drawing
//! commands (or finished PDF bytes) come out.

use chrono::{Local, TimeZone};
use quote_pdf::layout::{MonospaceMeasurer, TextMeasurer};
use quote_pdf::pagesize::{self, PageOrientation};
use quote_pdf::{
    generate, render_pdf, CompanyProfile, DocumentConfig, DocumentModel, DrawOp, GenerationError,
    ImageRef, Mm, Record, RecordingCanvas, SectionKind, TextStyle,
};
use serde_json::json;

// ─── Helpers ────────────────────────────────────────────────────

fn config() -> DocumentConfig {
    DocumentConfig::quotation()
        .with_company(CompanyProfile {
            name: "Widgets Ltd".into(),
            address: "1 Factory Lane".into(),
            ..Default::default()
        })
        .with_generated_at(Local.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap())
}

fn measurer() -> MonospaceMeasurer {
    MonospaceMeasurer::new(Mm(2.0), Mm(4.0))
}

fn item(i: usize) -> Record {
    Record::new()
        .with("name", format!("Item {i}"))
        .with("description", "first line\nsecond line\nthird line")
        .with("quantity", 3)
        .with("price", 10)
}

fn model_with_items(count: usize) -> DocumentModel {
    DocumentModel {
        quotation_id: Some("Q-1001".into()),
        customer_name: Some("Acme Pty Ltd".into()),
        items: Some((1..=count).map(item).collect()),
        subtotal: json!(30 * count),
        total_amount: json!(30 * count),
        ..Default::default()
    }
}

fn all_texts(canvas: &RecordingCanvas) -> Vec<&str> {
    (0..canvas.pages.len())
        .flat_map(|i| canvas.texts_on_page(i))
        .collect()
}

// ─── Pagination ─────────────────────────────────────────────────

#[test]
fn long_tables_repeat_the_header_on_every_page() {
    let config = config();
    let mut canvas = RecordingCanvas::new();
    let report = generate(&model_with_items(50), &config, &mut canvas, &measurer()).unwrap();

    assert_eq!(report.rows, 50);
    assert_eq!(report.pages, canvas.pages.len());
    assert!(report.pages > 2, "50 tall rows should span several pages");
    assert_eq!(report.file_name, "Q-1001.pdf");

    let mut table_pages = 0;
    for page in 0..canvas.pages.len() {
        let texts = canvas.texts_on_page(page);
        let first_row = texts.iter().position(|t| t.starts_with("Item "));
        let header = texts.iter().position(|t| *t == "Description");
        let Some(first_row) = first_row else {
            assert_eq!(header, None, "page {} has a header but no rows", page + 1);
            continue;
        };
        table_pages += 1;
        assert!(
            matches!(header, Some(h) if h < first_row),
            "page {} has rows without a header above them",
            page + 1
        );
    }
    assert!(table_pages > 1);

    // every row drawn exactly once
    let texts = all_texts(&canvas);
    for i in 1..=50 {
        let name = format!("Item {i}");
        assert_eq!(texts.iter().filter(|t| **t == name).count(), 1, "{name}");
    }
}

#[test]
fn every_page_gets_exactly_one_footer() {
    let mut canvas = RecordingCanvas::new();
    let report = generate(&model_with_items(50), &config(), &mut canvas, &measurer()).unwrap();

    for page in 0..report.pages {
        let footers: Vec<_> = canvas
            .texts_on_page(page)
            .into_iter()
            .filter(|t| t.starts_with("Page "))
            .collect();
        assert_eq!(footers, vec![format!("Page {}", page + 1)]);
    }
}

#[test]
fn the_closing_footer_comes_after_notes_and_terms() {
    let mut model = model_with_items(50);
    model.notes = Some("Installation is booked separately.".into());
    model.terms = Some("Payment within 30 days.".into());
    let mut canvas = RecordingCanvas::new();
    let report = generate(&model, &config(), &mut canvas, &measurer()).unwrap();
    assert!(report.pages > 2);

    // the footer is the last thing drawn on every page
    for page in 0..report.pages {
        let texts = canvas.texts_on_page(page);
        assert_eq!(texts.last().copied(), Some(format!("Page {}", page + 1).as_str()));
        assert_eq!(texts.iter().filter(|t| t.starts_with("Page ")).count(), 1);
    }

    let last = canvas.texts_on_page(report.pages - 1);
    let footer = last.iter().position(|t| t.starts_with("Page ")).unwrap();
    let terms = last
        .iter()
        .position(|t| *t == "Payment within 30 days.")
        .expect("terms end up on the last page");
    assert!(terms < footer);
    if let Some(notes) = last.iter().position(|t| *t == "Installation is booked separately.") {
        assert!(notes < terms);
    }
}

#[test]
fn pages_follow_the_configured_paper_size() {
    let letter = pagesize::by_name("Letter").unwrap().landscape();
    let landscape_config = config().with_page_size(letter);
    assert!(
        landscape_config.geometry().content_width()
            > DocumentConfig::quotation().geometry().content_width()
    );

    let mut landscape = RecordingCanvas::new();
    let wide = generate(&model_with_items(50), &landscape_config, &mut landscape, &measurer())
        .unwrap();
    let mut portrait = RecordingCanvas::new();
    let tall = generate(&model_with_items(50), &config(), &mut portrait, &measurer()).unwrap();
    assert!(wide.pages > tall.pages);
}

#[test]
fn nothing_is_drawn_below_the_content_area() {
    let config = config();
    let bottom = config.geometry().content_bottom();
    let mut canvas = RecordingCanvas::new();
    generate(&model_with_items(50), &config, &mut canvas, &measurer()).unwrap();

    for (page, ops) in canvas.pages.iter().enumerate() {
        for op in ops {
            if let DrawOp::Rect { frame, .. } = op {
                assert!(
                    frame.bottom().0 <= bottom.0 + 1e-6,
                    "rect on page {} ends at {} below {}",
                    page + 1,
                    frame.bottom(),
                    bottom
                );
            }
        }
    }
}

#[test]
fn short_documents_fit_on_one_page() {
    let mut canvas = RecordingCanvas::new();
    let report = generate(&model_with_items(2), &config(), &mut canvas, &measurer()).unwrap();
    assert_eq!(report.pages, 1);
    assert_eq!(canvas.pages.len(), 1);
}

// ─── Amounts ────────────────────────────────────────────────────

#[test]
fn derives_missing_line_totals() {
    let mut canvas = RecordingCanvas::new();
    generate(&model_with_items(1), &config(), &mut canvas, &measurer()).unwrap();
    let texts = all_texts(&canvas);
    assert!(texts.contains(&"$10.00"));
    // line total, subtotal and grand total
    assert_eq!(texts.iter().filter(|t| **t == "$30.00").count(), 3);
}

#[test]
fn percentage_discounts_show_rate_and_amount() {
    let model = DocumentModel {
        items: Some(vec![item(1)]),
        subtotal: json!(100),
        discount: json!(10),
        discount_amount: json!("10"),
        discount_type: quote_pdf::DiscountType::Percentage,
        total_amount: json!(90),
        ..Default::default()
    };
    let mut canvas = RecordingCanvas::new();
    generate(&model, &config(), &mut canvas, &measurer()).unwrap();

    let texts = all_texts(&canvas);
    assert!(texts.contains(&"Discount (10%)"));
    assert!(texts.contains(&"-$10.00"));
    assert!(texts.contains(&"$90.00"));
}

#[test]
fn percentage_discount_falls_back_to_the_discount_field() {
    let model = DocumentModel {
        items: Some(vec![item(1)]),
        subtotal: json!(100),
        discount: json!(10),
        discount_type: quote_pdf::DiscountType::Percentage,
        total_amount: json!(90),
        ..Default::default()
    };
    let mut canvas = RecordingCanvas::new();
    generate(&model, &config(), &mut canvas, &measurer()).unwrap();

    let texts = all_texts(&canvas);
    assert!(texts.contains(&"Discount (10%)"));
    assert!(texts.contains(&"-$10.00"));
}

#[test]
fn unusable_amounts_fall_back_to_zero() {
    let model = DocumentModel {
        items: Some(vec![Record::new().with("name", "Loose").with("quantity", "abc")]),
        tax: json!(null),
        ..Default::default()
    };
    let mut canvas = RecordingCanvas::new();
    generate(&model, &config(), &mut canvas, &measurer()).unwrap();
    let texts = all_texts(&canvas);
    assert!(texts.contains(&"$0.00"));
    assert!(!texts.iter().any(|t| t.contains("NaN")));
}

// ─── Sections ───────────────────────────────────────────────────

#[test]
fn empty_item_lists_skip_the_table() {
    let model = DocumentModel {
        items: Some(Vec::new()),
        ..Default::default()
    };
    let mut canvas = RecordingCanvas::new();
    let report = generate(&model, &config(), &mut canvas, &measurer()).unwrap();
    assert_eq!(report.rows, 0);
    assert!(!all_texts(&canvas).contains(&"Description"));
    assert_eq!(report.file_name, "quotation.pdf");
}

#[test]
fn blank_optional_sections_are_skipped() {
    let mut model = model_with_items(1);
    model.notes = Some("  ".into());
    model.terms = Some("Payment within 30 days.".into());
    let mut canvas = RecordingCanvas::new();
    generate(&model, &config(), &mut canvas, &measurer()).unwrap();

    let texts = all_texts(&canvas);
    assert!(!texts.contains(&"Notes"));
    assert!(texts.contains(&"Terms & Conditions"));
}

#[test]
fn very_long_notes_continue_on_the_next_page() {
    let mut model = model_with_items(1);
    model.notes = Some(lipsum::lipsum_words(3000));
    let mut canvas = RecordingCanvas::new();
    let report = generate(&model, &config(), &mut canvas, &measurer()).unwrap();
    assert!(report.pages >= 3);
    assert_eq!(canvas.pages.len(), report.pages);
}

// ─── Failures ───────────────────────────────────────────────────

#[test]
fn missing_item_list_is_a_data_error() {
    let model = DocumentModel::default();
    let mut canvas = RecordingCanvas::new();
    let err = generate(&model, &config(), &mut canvas, &measurer()).unwrap_err();
    assert!(matches!(err, GenerationError::Data(_)));
}

/// Fails to wrap any text containing a marker word
struct FailingMeasurer;

impl TextMeasurer for FailingMeasurer {
    fn wrap(
        &self,
        text: &str,
        max_width: Mm,
        style: &TextStyle,
    ) -> Result<Vec<String>, GenerationError> {
        if text.contains("unmeasurable") {
            return Err(GenerationError::Measurement("glyph table missing".into()));
        }
        measurer().wrap(text, max_width, style)
    }

    fn line_height(&self, style: &TextStyle) -> Mm {
        measurer().line_height(style)
    }
}

#[test]
fn measurement_failures_name_their_section() {
    let mut model = model_with_items(3);
    model.notes = Some("an unmeasurable note".into());
    let mut canvas = RecordingCanvas::new();
    let err = generate(&model, &config(), &mut canvas, &FailingMeasurer).unwrap_err();

    assert_eq!(err.section(), Some(SectionKind::Notes));
    assert!(matches!(err.root(), GenerationError::Measurement(_)));
    assert!(err.to_string().contains("notes section"));
}

#[test]
fn sections_cannot_go_back_a_stage() {
    let config = config().with_sections(vec![SectionKind::Totals, SectionKind::ItemTable]);
    let mut canvas = RecordingCanvas::new();
    let err = generate(&model_with_items(1), &config, &mut canvas, &measurer()).unwrap_err();
    assert!(matches!(err, GenerationError::Configuration(_)));
}

// ─── PDF output ─────────────────────────────────────────────────

#[test]
fn renders_a_pdf_named_after_the_document() {
    let rendered = render_pdf(&model_with_items(40), &config()).unwrap();
    assert_eq!(rendered.file_name, "Q-1001.pdf");
    assert!(rendered.bytes.starts_with(b"%PDF"));
    assert!(rendered.pages > 1);
}

#[test]
fn broken_signature_images_fail_the_signature_section() {
    let config = config().with_signature_image(ImageRef::new("signature", b"not a png".to_vec()));
    let err = render_pdf(&model_with_items(1), &config).unwrap_err();
    assert_eq!(err.section(), Some(SectionKind::Signature));
    assert!(matches!(err.root(), GenerationError::Image(_)));
}

#[test]
fn parses_models_from_json() {
    let model = DocumentModel::from_json(
        r#"{
            "invoiceId": "INV-7",
            "items": [{ "name": "Bolt", "qty": "4", "unitPrice": "2.5" }],
            "subtotal": "10",
            "totalAmount": 10
        }"#,
    )
    .unwrap();
    let config = DocumentConfig::invoice()
        .with_generated_at(Local.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap());
    let mut canvas = RecordingCanvas::new();
    let report = generate(&model, &config, &mut canvas, &measurer()).unwrap();

    assert_eq!(report.file_name, "INV-7.pdf");
    let texts = all_texts(&canvas);
    assert!(texts.contains(&"INVOICE"));
    assert!(texts.contains(&"$2.50"));
    assert!(texts.iter().filter(|t| **t == "$10.00").count() >= 2);
}
