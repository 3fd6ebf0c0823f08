use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::template::{Template, TemplateMatch};

/// Searches `output` for `fixture`, failing when no region matches.
pub fn verify(fixture: &str, output: &str) -> Result<TemplateMatch> {
    let template = Template::new(fixture)?;
    verify_template(&template, output)
}

/// An empty fixture compiles to a pattern matching anywhere, so it is
/// rejected rather than reported as a match.
pub fn verify_template(template: &Template, output: &str) -> Result<TemplateMatch> {
    if template.fixture().trim().is_empty() {
        bail!("Fixture is empty; nothing to verify");
    }

    match template.search(output)? {
        Some(found) => {
            tracing::debug!(start = found.start(), end = found.end(), "fixture matched");
            Ok(found)
        }
        None => bail!(
            "Fixture not found in output\n--- fixture ---\n{}\n--- pattern ---\n{}",
            template.fixture(),
            template.pattern()
        ),
    }
}

/// Reads a fixture file with surrounding whitespace trimmed, so indentation
/// around the expected block does not have to appear in the output.
pub fn load_fixture(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read fixture: {}", path.display()))?;
    trim_fixture(&content, &path.display())
}

/// Trims `content`, failing when nothing but whitespace is left.
pub fn trim_fixture(content: &str, source: &dyn fmt::Display) -> Result<String> {
    let fixture = content.trim();
    if fixture.is_empty() {
        bail!("Fixture {source} is empty");
    }
    Ok(fixture.to_string())
}
