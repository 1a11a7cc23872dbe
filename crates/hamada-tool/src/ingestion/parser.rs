//! Text extraction for uploaded tender documents

use calamine::Reader;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::types::{extension_of, FileType};

/// How long pdf-extract may run before the lopdf fallback takes over
const PDF_EXTRACT_TIMEOUT: Duration = Duration::from_secs(60);

/// Multi-format document text extractor
pub struct FileParser;

impl FileParser {
    /// Extract plain text from a document, choosing the reader by extension
    pub fn parse(filename: &str, data: &[u8]) -> Result<String> {
        let extension = extension_of(filename).to_lowercase();

        let text = match FileType::from_extension(&extension) {
            FileType::Pdf => Self::parse_pdf(filename, data)?,
            FileType::Docx => Self::parse_docx(filename, data)?,
            FileType::Xlsx => Self::parse_xlsx(filename, data)?,
            FileType::Txt => String::from_utf8_lossy(data).into_owned(),
            FileType::Unknown => return Err(Error::UnsupportedFileType(extension)),
        };

        tracing::info!("Extracted {} characters from {}", text.len(), filename);
        Ok(text)
    }

    fn parse_pdf(filename: &str, data: &[u8]) -> Result<String> {
        let raw = Self::extract_pdf_with_timeout(filename, data)?;

        let text = raw
            .replace('\0', "")
            .replace('\u{00A0}', " ")
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        if text.is_empty() {
            return Err(Error::file_parse(
                filename,
                "No text could be extracted; scanned PDFs are not supported",
            ));
        }
        Ok(text)
    }

    /// pdf-extract can hang on unusual fonts, so it runs on its own thread
    fn extract_pdf_with_timeout(filename: &str, data: &[u8]) -> Result<String> {
        let owned = data.to_vec();
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let _ = tx.send(pdf_extract::extract_text_from_mem(&owned));
        });

        match rx.recv_timeout(PDF_EXTRACT_TIMEOUT) {
            Ok(Ok(text)) if !text.trim().is_empty() => Ok(text),
            Ok(Ok(_)) => {
                tracing::warn!("pdf-extract returned no text for {}, trying lopdf", filename);
                Self::extract_pdf_text_fallback(filename, data)
            }
            Ok(Err(e)) => {
                tracing::warn!("pdf-extract failed for {}: {}, trying lopdf", filename, e);
                Self::extract_pdf_text_fallback(filename, data)
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                tracing::error!("pdf-extract timed out after {:?} on {}", PDF_EXTRACT_TIMEOUT, filename);
                Self::extract_pdf_text_fallback(filename, data)
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                tracing::error!("pdf-extract thread panicked on {}", filename);
                Self::extract_pdf_text_fallback(filename, data)
            }
        }
    }

    /// Read `Tj`/`TJ` strings straight out of each page's content stream
    fn extract_pdf_text_fallback(filename: &str, data: &[u8]) -> Result<String> {
        let doc = lopdf::Document::load_mem(data)
            .map_err(|e| Error::file_parse(filename, format!("Failed to load PDF: {}", e)))?;

        let mut text = String::new();
        for (page_num, page_id) in doc.get_pages() {
            match doc.get_page_content(page_id) {
                Ok(content) => {
                    let page_text = text_from_content_stream(&content);
                    if !page_text.is_empty() {
                        text.push_str(&page_text);
                        text.push('\n');
                    }
                }
                Err(e) => tracing::debug!("No content for page {}: {}", page_num, e),
            }
        }

        Ok(text)
    }

    /// Paragraph text, then table cells: a space after each cell and a
    /// newline after each row
    fn parse_docx(filename: &str, data: &[u8]) -> Result<String> {
        use docx_rs::{DocumentChild, TableChild, TableRowChild};

        let doc = docx_rs::read_docx(data).map_err(|e| Error::file_parse(filename, e.to_string()))?;

        let mut paragraphs = String::new();
        let mut tables = String::new();

        for child in &doc.document.children {
            match child {
                DocumentChild::Paragraph(p) => {
                    paragraphs.push_str(&paragraph_text(p));
                    paragraphs.push('\n');
                }
                DocumentChild::Table(table) => {
                    for row_child in &table.rows {
                        let TableChild::TableRow(row) = row_child;
                        for cell_child in &row.cells {
                            let TableRowChild::TableCell(cell) = cell_child;
                            tables.push_str(&cell_contents(&cell.children));
                            tables.push(' ');
                        }
                        tables.push('\n');
                    }
                }
                _ => {}
            }
        }

        paragraphs.push_str(&tables);
        Ok(paragraphs)
    }

    /// Every sheet as `Sheet: <name>` followed by ` | ` separated rows
    fn parse_xlsx(filename: &str, data: &[u8]) -> Result<String> {
        let cursor = std::io::Cursor::new(data);
        let mut workbook = calamine::open_workbook_auto_from_rs(cursor)
            .map_err(|e| Error::file_parse(filename, e.to_string()))?;

        let mut content = String::new();
        for sheet_name in workbook.sheet_names().to_vec() {
            let range = match workbook.worksheet_range(&sheet_name) {
                Ok(range) => range,
                Err(e) => {
                    tracing::warn!("Skipping sheet '{}' in {}: {}", sheet_name, filename, e);
                    continue;
                }
            };

            content.push_str(&format!("Sheet: {}\n", sheet_name));
            for row in range.rows() {
                let cells: Vec<String> = row.iter().map(cell_text).collect();
                if cells.iter().any(|c| !c.is_empty()) {
                    content.push_str(&cells.join(" | "));
                    content.push('\n');
                }
            }
            content.push('\n');
        }

        Ok(content)
    }
}

fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
    use docx_rs::{ParagraphChild, RunChild};

    let mut text = String::new();
    for child in &paragraph.children {
        if let ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                match run_child {
                    RunChild::Text(t) => text.push_str(&t.text),
                    RunChild::Tab(_) => text.push('\t'),
                    _ => {}
                }
            }
        }
    }
    text
}

fn cell_contents(children: &[docx_rs::TableCellContent]) -> String {
    children
        .iter()
        .filter_map(|c| match c {
            docx_rs::TableCellContent::Paragraph(p) => Some(paragraph_text(p)),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn cell_text(cell: &calamine::Data) -> String {
    match cell {
        calamine::Data::Empty => String::new(),
        calamine::Data::String(s) => s.clone(),
        calamine::Data::Float(f) => f.to_string(),
        calamine::Data::Int(i) => i.to_string(),
        calamine::Data::Bool(b) => b.to_string(),
        calamine::Data::DateTime(dt) => dt.to_string(),
        calamine::Data::DateTimeIso(s) | calamine::Data::DurationIso(s) => s.clone(),
        _ => String::new(),
    }
}

/// Text inside `BT`/`ET` blocks shown with `Tj` or `TJ`
fn text_from_content_stream(content: &[u8]) -> String {
    let stream = String::from_utf8_lossy(content);
    let mut text = String::new();
    let mut in_text_block = false;

    for line in stream.lines().map(str::trim) {
        match line {
            "BT" => in_text_block = true,
            "ET" => {
                in_text_block = false;
                if !text.is_empty() && !text.ends_with('\n') {
                    text.push('\n');
                }
            }
            _ if in_text_block && (line.ends_with("Tj") || line.ends_with("TJ")) => {
                if let (Some(start), Some(end)) = (line.find('('), line.rfind(')')) {
                    if start < end {
                        text.push_str(
                            &line[start + 1..end]
                                .replace("\\(", "(")
                                .replace("\\)", ")")
                                .replace("\\\\", "\\"),
                        );
                    }
                }
            }
            _ => {}
        }
    }

    text
}
