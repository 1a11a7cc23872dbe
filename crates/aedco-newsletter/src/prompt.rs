//! Prompt assembly for newsletter generation
//!
//! A request is built from the sector prompt file on disk, a generation
//! context block, recent past issues for deduplication and a fixed output
//! requirement asking for two standalone HTML documents.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;

use crate::config::BrandConfig;
use crate::error::{Error, Result};
use crate::schedule::{Mode, ScheduleDates};
use crate::sectors::Sector;

/// System message sent with every generation request
pub const SYSTEM_MESSAGE: &str = "You write weekly industry newsletters for AEDCO. \
Reply with finished HTML documents only, with no commentary before, between or after them.";

/// Prepended to every sector prompt
const HTML_ONLY_HEADER: &str = "\
RESPONSE FORMAT: standalone HTML pages
Email packaging instructions below do not apply and must be skipped.
Produce browser-ready HTML for each edition and nothing else.

";

/// Appended after the context and past issues
const OUTPUT_REQUIREMENTS: &str = "\
--- OUTPUT ---
Return two complete HTML documents, each starting with <!DOCTYPE html> and ending with </html>.
Write the Principals edition first and the Egyptian Clients edition second.
Only report news published before the research cutoff, and do not repeat stories from the past issues above.
";

/// Email packaging directives left over from the EML delivery format
static EML_DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?im)^[ \t*#>-]*(?:EML\b.*|MIME\b.*|multipart/related.*|Content-(?:Type|ID|Disposition|Transfer-Encoding)\s*:.*|Message-ID\s*:.*|Subject\s*:.*|Date\s*:.*|.*\bboundary\s*=.*)(?:\r?\n|$)",
    )
    .expect("Should compile: EML_DIRECTIVE")
});

/// Read the sector prompt and force HTML-only output
pub fn load_sector_prompt(prompts_dir: &Path, sector: Sector) -> Result<String> {
    let path = prompts_dir.join(sector.prompt_file_name());
    if !path.is_file() {
        return Err(Error::not_found(format!(
            "Prompt file not found: {}",
            path.display()
        )));
    }

    let original = fs::read_to_string(&path)?;
    let sanitized = sanitize_prompt(&original);
    tracing::debug!(
        "Loaded prompt {} ({} -> {} bytes)",
        path.display(),
        original.len(),
        sanitized.len()
    );

    Ok(format!("{}{}", HTML_ONLY_HEADER, sanitized))
}

/// Drop email header and MIME directive lines
pub fn sanitize_prompt(prompt: &str) -> String {
    EML_DIRECTIVE.replace_all(prompt, "").into_owned()
}

/// Facts about the run that the model needs to know
#[derive(Debug, Clone)]
pub struct GenerationContext<'a> {
    pub sector: Sector,
    pub mode: Mode,
    pub dates: ScheduleDates,
    pub brand: &'a BrandConfig,
}

impl GenerationContext<'_> {
    pub fn render(&self) -> String {
        let tz = self.dates.display.timezone();
        let lines = [
            "--- GENERATION CONTEXT ---".to_string(),
            format!("- Sector: {}", self.sector.name()),
            format!("- Mode: {}", self.mode.title()),
            format!(
                "- Display Date: {} {}",
                self.dates.display.format("%d %b %Y %H:%M"),
                tz.name()
            ),
            format!(
                "- Research Cutoff: {} {}",
                self.dates.cutoff.format("%d %b %Y %H:%M"),
                tz.name()
            ),
            format!("- Timezone: {}", tz.name()),
            format!("- Brand: {} ({})", self.brand.name, self.brand.full_name),
            format!("- Logo: {}", self.brand.logo),
            format!("- Sections: {}", self.sector.sections().join("; ")),
        ];
        lines.join("\n")
    }
}

/// Full user message for one generation request
pub fn assemble(sector_prompt: &str, context: &GenerationContext<'_>, past_issues: &str) -> String {
    let mut prompt = String::with_capacity(sector_prompt.len() + past_issues.len() + 1024);
    prompt.push_str(sector_prompt);
    prompt.push_str("\n\n");
    prompt.push_str(&context.render());
    prompt.push('\n');
    prompt.push_str(past_issues);
    prompt.push_str("\n\n");
    prompt.push_str(OUTPUT_REQUIREMENTS);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::calculate_dates;
    use chrono::TimeZone;
    use chrono_tz::Africa::Cairo;
    use tempfile::TempDir;

    #[test]
    fn test_sanitize_removes_directive_lines_only() {
        let prompt = "Write about upstream news.\n\
                      *** EML packaging rules\n\
                      MIME-Version: 1.0\n\
                      Content-Type: multipart/related; boundary=\"xyz\"\n\
                      Subject: Weekly brief\n\
                      Keep the date format consistent.\n\
                      Message-ID: <abc@aedco>\n";

        let sanitized = sanitize_prompt(prompt);
        assert_eq!(
            sanitized,
            "Write about upstream news.\nKeep the date format consistent.\n"
        );
    }

    #[test]
    fn test_load_sector_prompt() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            load_sector_prompt(dir.path(), Sector::OilGas),
            Err(Error::NotFound(_))
        ));

        fs::write(dir.path().join("OilGas.txt"), "Cover refining.\nDate: today\n").unwrap();
        let prompt = load_sector_prompt(dir.path(), Sector::OilGas).unwrap();
        assert!(prompt.starts_with("RESPONSE FORMAT: standalone HTML pages"));
        assert!(prompt.ends_with("Cover refining.\n"));
    }

    #[test]
    fn test_assemble_includes_context_and_past_issues() {
        let brand = BrandConfig::default();
        let now = Cairo.with_ymd_and_hms(2025, 1, 8, 14, 0, 0).unwrap();
        let context = GenerationContext {
            sector: Sector::Electricity,
            mode: Mode::Production,
            dates: calculate_dates(now, Mode::Production),
            brand: &brand,
        };

        let prompt = assemble("PROMPT", &context, "\n--- PAST_ISSUES_START ---\nold");
        assert!(prompt.starts_with("PROMPT\n\n--- GENERATION CONTEXT ---"));
        assert!(prompt.contains("- Display Date: 13 Jan 2025 09:00 Africa/Cairo"));
        assert!(prompt.contains("- Research Cutoff: 13 Jan 2025 08:00 Africa/Cairo"));
        assert!(prompt.contains("- Mode: Production"));
        assert!(prompt.contains("- Brand: AEDCO (Arab Engineering & Distribution Company)"));
        assert!(prompt.contains("PAST_ISSUES_START ---\nold"));
        assert!(prompt.trim_end().ends_with("do not repeat stories from the past issues above."));
    }
}
