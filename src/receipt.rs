use std::io::BufWriter;
use std::path::PathBuf;

use printpdf::*;
use tracing::info;

use crate::error::{AppError, Result};
use crate::fmt::money;
use crate::models::Collection;
use crate::settings::Settings;

// A4 dimensions (mm)
const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN_TOP: f32 = 20.0;
const MARGIN_LEFT: f32 = 15.0;
const MARGIN_RIGHT: f32 = 15.0;
const TITLE_SIZE: f32 = 16.0;
const FONT_SIZE: f32 = 12.0;
const LINE_H: f32 = 8.0;

struct PdfWriter {
    doc: PdfDocumentReference,
    font: IndirectFontRef,
    font_bold: IndirectFontRef,
    page: PdfPageIndex,
    layer: PdfLayerIndex,
    y: f32,
}

impl PdfWriter {
    fn new(title: &str) -> Result<Self> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| AppError::Pdf(format!("{e:?}")))?;
        let font_bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| AppError::Pdf(format!("{e:?}")))?;
        Ok(Self {
            doc,
            font,
            font_bold,
            page,
            layer,
            y: MARGIN_TOP,
        })
    }

    fn pdf_y(&self) -> f32 {
        PAGE_H - self.y
    }

    fn text(&self, s: &str, x: f32, size: f32, bold: bool) {
        let font = if bold { &self.font_bold } else { &self.font };
        let layer = self.doc.get_page(self.page).get_layer(self.layer);
        layer.use_text(s, size, Mm(x), Mm(self.pdf_y()), font);
    }

    fn hline(&self) {
        let layer = self.doc.get_page(self.page).get_layer(self.layer);
        layer.set_outline_thickness(0.5);
        layer.add_line(Line {
            points: vec![
                (Point::new(Mm(MARGIN_LEFT), Mm(self.pdf_y())), false),
                (Point::new(Mm(PAGE_W - MARGIN_RIGHT), Mm(self.pdf_y())), false),
            ],
            is_closed: false,
        });
    }

    fn to_bytes(self) -> Result<Vec<u8>> {
        let mut buf = BufWriter::new(Vec::new());
        self.doc
            .save(&mut buf)
            .map_err(|e| AppError::Pdf(format!("{e:?}")))?;
        buf.into_inner().map_err(|e| AppError::Pdf(e.to_string()))
    }
}

/// Where receipts go and how they are labelled.
#[derive(Debug, Clone)]
pub struct Receipts {
    pub dir: PathBuf,
    pub title: String,
    pub currency_symbol: String,
}

impl Receipts {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            dir: settings.receipts_path(),
            title: settings.title.clone(),
            currency_symbol: settings.currency_symbol.clone(),
        }
    }

    /// `receipt_<collection id>_<apartment id>.pdf`
    pub fn file_name(collection: &Collection) -> String {
        let apartment: String = collection
            .apartment_id
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect();
        format!("receipt_{}_{apartment}.pdf", collection.id)
    }

    pub fn path_for(&self, collection: &Collection) -> PathBuf {
        self.dir.join(Self::file_name(collection))
    }

    /// Body lines of the receipt, in print order, below the title.
    pub fn lines(&self, collection: &Collection) -> Vec<String> {
        vec![
            format!("Receipt #: {}", collection.id),
            format!("Date: {}", collection.receipt_date()),
            format!("Apartment: {}", collection.apartment_id),
            format!("Month: {}", collection.month),
            format!("Type: {}", collection.collection_type),
            format!("Amount: {}", money(collection.price, &self.currency_symbol)),
        ]
    }

    pub fn render(&self, collection: &Collection) -> Result<Vec<u8>> {
        let mut pdf = PdfWriter::new(&format!("Receipt {}", collection.id))?;
        pdf.text(&self.title, MARGIN_LEFT, TITLE_SIZE, true);
        pdf.y += 5.0;
        pdf.hline();
        pdf.y += 10.0;
        for line in self.lines(collection) {
            pdf.text(&line, MARGIN_LEFT, FONT_SIZE, false);
            pdf.y += LINE_H;
        }
        pdf.to_bytes()
    }

    /// Render and write the receipt, creating the output directory if needed.
    pub fn write(&self, collection: &Collection) -> Result<PathBuf> {
        let bytes = self.render(collection)?;
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(collection);
        std::fs::write(&path, bytes)?;
        info!(path = %path.display(), collection = collection.id, "receipt written");
        Ok(path)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::Path;

    use lopdf::content::Content;
    use lopdf::{Document, Object};

    /// Text shown by every `Tj`/`TJ` operator on every page, one string per operator.
    pub fn pdf_text(path: &Path) -> Vec<String> {
        let doc = Document::load(path).unwrap();
        let mut shown = Vec::new();
        for page_id in doc.get_pages().into_values() {
            let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
            for op in content.operations {
                let mut text = String::new();
                for operand in &op.operands {
                    match (op.operator.as_str(), operand) {
                        ("Tj", Object::String(bytes, _)) => text.push_str(&String::from_utf8_lossy(bytes)),
                        ("TJ", Object::Array(parts)) => {
                            for part in parts {
                                if let Object::String(bytes, _) = part {
                                    text.push_str(&String::from_utf8_lossy(bytes));
                                }
                            }
                        }
                        _ => {}
                    }
                }
                if !text.is_empty() {
                    shown.push(text);
                }
            }
        }
        shown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CollectionType, Month};

    fn collection() -> Collection {
        Collection {
            id: 7,
            apartment_id: "A1".to_string(),
            month: Month::January,
            collection_type: CollectionType::Maintenance,
            price: 4000.0,
            date: "2025-01-15 10:04:55".to_string(),
        }
    }

    fn receipts(dir: PathBuf) -> Receipts {
        Receipts {
            dir,
            title: "Apartment Management System".to_string(),
            currency_symbol: "Rs.".to_string(),
        }
    }

    #[test]
    fn test_lines_in_fixed_order() {
        let r = receipts(PathBuf::from("/unused"));
        let date = format!("Date: {}", collection().receipt_date());
        assert_eq!(
            r.lines(&collection()),
            vec![
                "Receipt #: 7",
                date.as_str(),
                "Apartment: A1",
                "Month: January",
                "Type: Maintenance",
                "Amount: Rs.4000.00",
            ]
        );
    }

    #[test]
    fn test_render_produces_pdf() {
        let r = receipts(PathBuf::from("/unused"));
        let bytes = r.render(&collection()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_write_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let r = receipts(dir.path().join("pdf").join("2025"));
        let path = r.write(&collection()).unwrap();
        assert_eq!(path.file_name().unwrap(), "receipt_7_A1.pdf");
        assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
    }

    #[test]
    fn test_written_file_holds_title_and_lines() {
        let dir = tempfile::tempdir().unwrap();
        let r = receipts(dir.path().to_path_buf());
        let path = r.write(&collection()).unwrap();
        let mut expected = vec![r.title.clone()];
        expected.extend(r.lines(&collection()));
        assert_eq!(test_support::pdf_text(&path), expected);
    }

    #[test]
    fn test_write_fails_when_directory_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("pdf");
        std::fs::write(&blocker, "not a directory").unwrap();
        let err = receipts(blocker).write(&collection()).unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }

    #[test]
    fn test_file_name_escapes_separators() {
        let mut c = collection();
        c.apartment_id = "B/12".to_string();
        assert_eq!(Receipts::file_name(&c), "receipt_7_B_12.pdf");
    }
}
