//! Pattern-based field extraction from tender text

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::scheduling::{parse_date, DateOrder};
use crate::types::TenderExtraction;

/// Material categories in reporting order, with the phrases that indicate them
pub const MATERIAL_KEYWORDS: &[(&str, &[&str])] = &[
    ("piping", &["pipe", "piping", "pipeline", "tube", "tubing"]),
    (
        "valves",
        &["valve", "valves", "ball valve", "gate valve", "check valve", "control valve"],
    ),
    ("flanges", &["flange", "flanges", "weld neck", "slip on", "blind flange"]),
    ("fittings", &["fitting", "fittings", "elbow", "tee", "reducer", "coupling"]),
    ("bolts", &["bolt", "bolts", "stud", "fastener", "fasteners", "screw"]),
    ("gaskets", &["gasket", "gaskets", "sealing", "seal", "o-ring"]),
    (
        "finned tubes",
        &["finned tube", "finned tubes", "fin tube", "heat exchanger tube"],
    ),
];

const SPECIFICATION_KEYWORDS: &[&str] = &[
    "specification",
    "spec",
    "requirement",
    "standard",
    "grade",
    "material",
    "size",
    "pressure",
    "temperature",
    "api",
    "astm",
    "asme",
    "din",
    "en",
    "iso",
    "class",
    "rating",
];

const NUMERIC_DATE: &str = r"\d{1,2}[/.-]\d{1,2}[/.-]\d{2,4}";

static DEADLINE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    let d = NUMERIC_DATE;
    [
        format!(r"deadline\s*:?\s*({d})"),
        format!(r"due\s*(?:by|on)?\s*:?\s*({d})"),
        format!(r"submit\s*(?:by|before)?\s*:?\s*({d})"),
        format!(r"no\s*later\s*than\s*:?\s*({d})"),
        format!(r"closing\s*date\s*:?\s*({d})"),
        format!(r"({d})\s*(?:is\s*the\s*)?deadline"),
        r"(\w+\s+\d{1,2},?\s+\d{4})".to_string(),
        r"(\d{1,2}\s+\w+\s+\d{4})".to_string(),
    ]
    .iter()
    .map(|p| Regex::new(&format!("(?i){}", p)).expect("Should compile: DEADLINE_PATTERNS"))
    .collect()
});

static TECHNICAL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r#"\d+["']\s*(?:diameter|dia|pipe|tube)"#,
        r"(?:grade|class|schedule|rating)\s*[a-z0-9]+",
        r"(?:api|ansi|astm|asme|iso)\s*[0-9a-z-]+",
        r#"\d+\s*(?:mm|cm|in|inch|"|')"#,
        r"(?:carbon|stainless|alloy)\s*steel",
        r"(?:ball|gate|check|globe)\s*valve",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Should compile: TECHNICAL_PATTERNS"))
    .collect()
});

static PROJECT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"project\s*:?\s*([^\n]+)",
        r"project\s+name\s*:?\s*([^\n]+)",
        r"(?:title|name)\s*:?\s*([^\n]+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Should compile: PROJECT_PATTERNS"))
    .collect()
});

static REFERENCE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(?:tender|reference|ref)\s*(?:number|no|#)?\s*:?\s*([A-Z0-9-]+)",
        r"(?i)(?:rfq|rfp|tender)\s*:?\s*([A-Z0-9-]+)",
        r"(?i)ref\s*:?\s*([A-Z0-9-]+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Should compile: REFERENCE_PATTERNS"))
    .collect()
});

/// Regex-driven tender field extractor
pub struct TenderExtractor;

impl TenderExtractor {
    /// Extract every field from document text
    pub fn analyze(text: &str) -> TenderExtraction {
        let lower = text.to_lowercase();

        let extraction = TenderExtraction {
            text: text.to_string(),
            materials: Self::extract_materials(&lower),
            deadline: Self::extract_deadline(text),
            specifications: Self::extract_specifications(text),
            project_name: Self::extract_project_name(&lower),
            tender_reference: Self::extract_tender_reference(text),
            supplier_deadline: None,
        };

        tracing::debug!(
            "Extracted {} materials, {} specifications, deadline {:?}",
            extraction.materials.len(),
            extraction.specifications.len(),
            extraction.deadline
        );

        extraction
    }

    /// Material categories whose keywords occur in the lowercased text
    pub fn extract_materials(lower: &str) -> Vec<String> {
        MATERIAL_KEYWORDS
            .iter()
            .filter(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(category, _)| category.to_string())
            .collect()
    }

    /// First parseable date following a deadline phrase, or any written-out date
    pub fn extract_deadline(text: &str) -> Option<NaiveDate> {
        DEADLINE_PATTERNS.iter().find_map(|pattern| {
            pattern
                .captures_iter(text)
                .find_map(|caps| parse_date(caps.get(1)?.as_str(), DateOrder::MonthFirst))
        })
    }

    /// Lines that mention a specification term or look like a technical spec
    pub fn extract_specifications(text: &str) -> Vec<String> {
        let mut specifications: Vec<String> = Vec::new();

        for line in text.lines() {
            let trimmed = line.trim();
            let lower = trimmed.to_lowercase();
            if lower.is_empty() || !is_specification(&lower) {
                continue;
            }
            if trimmed.chars().count() > 5 && !specifications.iter().any(|s| s == trimmed) {
                specifications.push(trimmed.to_string());
            }
        }

        specifications
    }

    /// Project name from a `Project:` style line, title-cased
    pub fn extract_project_name(lower: &str) -> String {
        for pattern in PROJECT_PATTERNS.iter() {
            if let Some(caps) = pattern.captures(lower) {
                let name = caps[1].trim();
                let len = name.chars().count();
                if len > 3 && len < 100 {
                    return title_case(name);
                }
            }
        }
        String::new()
    }

    /// Tender or RFQ reference, upper-cased
    pub fn extract_tender_reference(text: &str) -> String {
        for pattern in REFERENCE_PATTERNS.iter() {
            if let Some(caps) = pattern.captures(text) {
                let reference = caps[1].trim();
                if reference.len() > 2 {
                    return reference.to_uppercase();
                }
            }
        }
        String::new()
    }
}

/// Keywords match anywhere in the line, so `en` also hits `general`
fn is_specification(lower: &str) -> bool {
    SPECIFICATION_KEYWORDS.iter().any(|k| lower.contains(k))
        || TECHNICAL_PATTERNS.iter().any(|re| re.is_match(lower))
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest
fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_word = false;
    for c in input.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const TENDER: &str = "\
Project: west delta gas compression upgrade
Tender No: WDG-2025-014
Submission deadline: 03/15/2025

Scope of supply
- 6\" seamless pipe, schedule 40
- Ball valves class 300 to API 6D
- Spiral wound gaskets
Delivery to site";

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_analyze_full_tender() {
        let result = TenderExtractor::analyze(TENDER);

        assert_eq!(result.materials, vec!["piping", "valves", "gaskets"]);
        assert_eq!(result.deadline, Some(ymd(2025, 3, 15)));
        assert_eq!(result.project_name, "West Delta Gas Compression Upgrade");
        assert_eq!(result.tender_reference, "WDG-2025-014");
        assert!(result
            .specifications
            .contains(&"- 6\" seamless pipe, schedule 40".to_string()));
        assert!(result
            .specifications
            .contains(&"- Ball valves class 300 to API 6D".to_string()));
        assert!(!result.specifications.contains(&"Delivery to site".to_string()));
        assert!(result.supplier_deadline.is_none());
    }

    #[test]
    fn test_materials_keep_category_order() {
        let found = TenderExtractor::extract_materials("gaskets, weld neck flanges and pipeline spools");
        assert_eq!(found, vec!["piping", "flanges", "gaskets"]);
        assert!(TenderExtractor::extract_materials("civil works only").is_empty());
    }

    #[test]
    fn test_deadline_numeric_is_month_first() {
        assert_eq!(
            TenderExtractor::extract_deadline("Deadline: 04/05/2025"),
            Some(ymd(2025, 4, 5))
        );
        assert_eq!(
            TenderExtractor::extract_deadline("closing date 25.12.2024"),
            Some(ymd(2024, 12, 25))
        );
    }

    #[test]
    fn test_deadline_written_out() {
        assert_eq!(
            TenderExtractor::extract_deadline("Bids are due by December 15, 2024 at noon"),
            Some(ymd(2024, 12, 15))
        );
        assert_eq!(
            TenderExtractor::extract_deadline("Offers received until 15 January 2025"),
            Some(ymd(2025, 1, 15))
        );
        assert_eq!(TenderExtractor::extract_deadline("no dates at all"), None);
    }

    #[test]
    fn test_deadline_skips_unparseable_matches() {
        assert_eq!(
            TenderExtractor::extract_deadline("Deadline: 45/45/2025, revised deadline: 01/20/2025"),
            Some(ymd(2025, 1, 20))
        );
    }

    #[test]
    fn test_specification_keywords_match_inside_words() {
        let specs = TenderExtractor::extract_specifications(
            "Compliant with EN 10204 3.1\nAttention: general notes\nFlanges to ISO 7005\nDelivery to site",
        );
        assert_eq!(
            specs,
            vec![
                "Compliant with EN 10204 3.1",
                "Attention: general notes",
                "Flanges to ISO 7005"
            ]
        );
    }

    #[test]
    fn test_specifications_deduplicate_and_drop_short_lines() {
        let specs = TenderExtractor::extract_specifications("Grade B\nGrade B\nsize\n  Grade B  ");
        assert_eq!(specs, vec!["Grade B"]);
    }

    #[test]
    fn test_reference_variants() {
        assert_eq!(TenderExtractor::extract_tender_reference("Reference: abc-77"), "ABC-77");
        assert_eq!(TenderExtractor::extract_tender_reference("RFQ 2291"), "2291");
        assert_eq!(TenderExtractor::extract_tender_reference("nothing here"), "");
    }

    #[test]
    fn test_project_name_length_bounds() {
        assert_eq!(TenderExtractor::extract_project_name("project: abc"), "");
        assert_eq!(
            TenderExtractor::extract_project_name("title: suez refinery revamp"),
            "Suez Refinery Revamp"
        );
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("phase-2 o'neil works"), "Phase-2 O'Neil Works");
    }
}
