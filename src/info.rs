use crate::config::DocumentConfig;
use crate::model::{non_blank, DocumentModel};
use crate::refs::{ObjectReferences, RefType};
use chrono::{DateTime, Datelike, Local, Offset, Timelike};
use pdf_writer::{Date as PDate, Pdf, TextStr};

/// General document metadata such as title, author, etc
#[derive(Default, Debug, Clone)]
pub struct Info {
    /// The title of the document.
    pub title: Option<String>,
    /// The author(s) of the document. No prescribed format.
    pub author: Option<String>,
    /// The subject of the document.
    pub subject: Option<String>,
    /// Keywords for the document, comma separated
    pub keywords: Option<String>,
    /// When the document was created; the time of writing when unset
    pub created: Option<DateTime<Local>>,
}

impl Info {
    /// Create a new info block, with all metadata set to [None]
    pub fn new() -> Info {
        Info::default()
    }

    /// Metadata describing a generated quotation or invoice
    pub fn for_document(model: &DocumentModel, config: &DocumentConfig) -> Info {
        let mut info = Info::new();
        match non_blank(&model.quotation_id) {
            Some(id) => info.title(format!("{} {}", config.labels.title, id)),
            None => info.title(&config.labels.title),
        };
        if !config.company.name.is_empty() {
            info.author(&config.company.name);
        }
        if let Some(customer) = non_blank(&model.customer_name) {
            info.subject(customer);
        }
        info.keywords(config.kind.default_file_stem());
        info.created = config.generated_at;
        info
    }

    /// Set the title of the info block, modifying `self`
    pub fn title<S: ToString>(&mut self, title: S) -> &mut Self {
        self.title = Some(title.to_string());
        self
    }

    /// Set the author of the info block, modifying `self`
    pub fn author<S: ToString>(&mut self, author: S) -> &mut Self {
        self.author = Some(author.to_string());
        self
    }

    pub fn subject<S: ToString>(&mut self, subject: S) -> &mut Self {
        self.subject = Some(subject.to_string());
        self
    }

    pub fn keywords<S: ToString>(&mut self, keywords: S) -> &mut Self {
        self.keywords = Some(keywords.to_string());
        self
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, writer: &mut Pdf) {
        let id = refs.gen(RefType::Info);
        let mut info = writer.document_info(id);

        if let Some(title) = &self.title {
            info.title(TextStr(title.as_str()));
        }
        if let Some(author) = &self.author {
            info.author(TextStr(author.as_str()));
        }
        if let Some(subject) = &self.subject {
            info.subject(TextStr(subject.as_str()));
        }
        if let Some(keywords) = &self.keywords {
            info.keywords(TextStr(keywords.as_str()));
        }
        info.creator(TextStr(concat!(
            env!("CARGO_PKG_NAME"),
            " v",
            env!("CARGO_PKG_VERSION")
        )));
        info.creation_date(pdf_date(&self.created.unwrap_or_else(Local::now)));
    }
}

fn pdf_date(at: &DateTime<Local>) -> PDate {
    let offset = at.offset().fix().local_minus_utc();
    let offset_hours = offset / (60 * 60);
    let offset_minutes = ((offset - offset_hours * 60 * 60) / 60).abs();
    PDate::new(at.year() as u16)
        .month(at.month() as u8)
        .day(at.day() as u8)
        .hour(at.hour() as u8)
        .minute(at.minute() as u8)
        .second(at.second() as u8)
        .utc_offset_hour(offset_hours as i8)
        .utc_offset_minute(offset_minutes as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompanyProfile;

    #[test]
    fn describes_the_document() {
        let model = DocumentModel {
            quotation_id: Some("Q-7".into()),
            customer_name: Some("Acme".into()),
            ..Default::default()
        };
        let config = DocumentConfig::invoice().with_company(CompanyProfile {
            name: "Widgets Ltd".into(),
            ..Default::default()
        });
        let info = Info::for_document(&model, &config);
        assert_eq!(info.title.as_deref(), Some("INVOICE Q-7"));
        assert_eq!(info.author.as_deref(), Some("Widgets Ltd"));
        assert_eq!(info.subject.as_deref(), Some("Acme"));
    }
}
