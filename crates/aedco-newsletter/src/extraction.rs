//! Split model output into edition HTML documents

use chrono::DateTime;
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::sectors::{Edition, Sector};
use crate::types::EditionHtml;

static HTML_DOCUMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<!DOCTYPE html[^>]*>.*?</html>").expect("Should compile: HTML_DOCUMENT")
});

/// Editions recovered from a completion
#[derive(Debug, Clone)]
pub struct ExtractedEditions {
    /// In [`Edition::ALL`] order
    pub editions: Vec<EditionHtml>,
    /// Whether the static template was used instead of model output
    pub used_fallback: bool,
}

/// Find the Principals and Egyptian Clients documents in `content`.
///
/// Fewer than two documents means the output is unusable and both editions
/// get the fallback page. Documents after the second are ignored.
pub fn extract_html_documents(
    content: &str,
    sector: Sector,
    display: DateTime<Tz>,
) -> ExtractedEditions {
    let blocks: Vec<&str> = HTML_DOCUMENT.find_iter(content).map(|m| m.as_str()).collect();

    if blocks.len() >= 2 {
        if blocks.len() > 2 {
            tracing::debug!("Ignoring {} extra HTML documents", blocks.len() - 2);
        }
        let editions = Edition::ALL
            .into_iter()
            .zip(blocks)
            .map(|(edition, html)| EditionHtml {
                edition,
                html: html.to_string(),
            })
            .collect();
        return ExtractedEditions {
            editions,
            used_fallback: false,
        };
    }

    tracing::warn!(
        "Expected 2 HTML documents for {}, found {}; using fallback template",
        sector.name(),
        blocks.len()
    );
    ExtractedEditions {
        editions: Edition::ALL
            .into_iter()
            .map(|edition| EditionHtml {
                edition,
                html: fallback_html(edition, sector, display),
            })
            .collect(),
        used_fallback: true,
    }
}

/// Placeholder page shown when generation did not produce usable HTML
pub fn fallback_html(edition: Edition, sector: Sector, display: DateTime<Tz>) -> String {
    let sector_name = sector.name();
    let date = display.format("%d %B %Y");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{edition} - {sector_name} Newsletter</title>
    <style>
        body {{ font-family: -apple-system, 'Segoe UI', Roboto, Arial, sans-serif; margin: 0; padding: 20px; background: #f8f9fa; }}
        .container {{ max-width: 700px; margin: 0 auto; background: #fff; border-radius: 12px; overflow: hidden; }}
        .header, .footer {{ background: linear-gradient(135deg, #0B3D91 0%, #1F2937 100%); color: #fff; padding: 24px; text-align: center; }}
        .content {{ padding: 30px; }}
        .section h2 {{ color: #0B3D91; border-bottom: 2px solid #e5e7eb; padding-bottom: 10px; }}
        .notice {{ border-left: 4px solid #0B3D91; background: #eff6ff; padding: 20px; border-radius: 12px; }}
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>{edition} Edition</h1>
            <div class="date">{sector_name} Newsletter - {date}</div>
        </div>
        <div class="content">
            <div class="section">
                <h2>Market Snapshot</h2>
                <p>Market figures are not available for this issue.</p>
            </div>
            <div class="section">
                <h2>News &amp; Updates</h2>
                <div class="notice">
                    <p>The {sector_name} newsletter could not be generated automatically. Please regenerate this issue.</p>
                </div>
            </div>
        </div>
        <div class="footer">
            <p>{edition} - {sector_name} Newsletter | {date}</p>
            <p style="font-size: 12px; opacity: 0.8;">Confidential - For internal use only</p>
        </div>
    </div>
</body>
</html>"#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Africa::Cairo;

    fn display() -> DateTime<Tz> {
        Cairo.with_ymd_and_hms(2025, 1, 13, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_two_documents_map_to_editions() {
        let content = "Here you go:\n<!doctype HTML>\n<html><body>P</body></HTML>\n\
                       and\n<!DOCTYPE html><html lang=\"ar\"><body>E</body></html>\ntrailing";

        let extracted = extract_html_documents(content, Sector::OilGas, display());
        assert!(!extracted.used_fallback);
        assert_eq!(extracted.editions[0].edition, Edition::Principals);
        assert_eq!(extracted.editions[0].html, "<!doctype HTML>\n<html><body>P</body></HTML>");
        assert_eq!(extracted.editions[1].edition, Edition::EgyptianClients);
        assert!(extracted.editions[1].html.ends_with("<body>E</body></html>"));
    }

    #[test]
    fn test_single_document_falls_back() {
        let content = "<!DOCTYPE html><html><body>only one</body></html>";
        let extracted = extract_html_documents(content, Sector::Transportation, display());

        assert!(extracted.used_fallback);
        assert_eq!(extracted.editions.len(), 2);
        let principals = &extracted.editions[0].html;
        assert!(principals.contains("<title>Principals - Transportation Newsletter</title>"));
        assert!(principals.contains("<h1>Principals Edition</h1>"));
        assert!(principals.contains("Transportation Newsletter - 13 January 2025"));
        assert!(extracted.editions[1].html.contains("<h1>Egyptian Clients Edition</h1>"));
    }
}
