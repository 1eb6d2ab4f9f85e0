// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plain-text extraction from uploaded template files.

use planwright_core::PlanError;

/// Supported template formats, keyed by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateFormat {
    Text,
    Markdown,
    Pdf,
}

impl TemplateFormat {
    /// Detects the format from a file name's extension (case-insensitive).
    pub fn from_filename(filename: &str) -> Result<Self, PlanError> {
        let ext = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "txt" => Ok(Self::Text),
            "md" | "markdown" => Ok(Self::Markdown),
            "pdf" => Ok(Self::Pdf),
            "" => Err(PlanError::InvalidInput(format!(
                "`{filename}` has no file extension (expected .txt, .md, or .pdf)"
            ))),
            other => Err(PlanError::InvalidInput(format!(
                "unsupported template format `.{other}` (expected .txt, .md, or .pdf)"
            ))),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Markdown => "md",
            Self::Pdf => "pdf",
        }
    }
}

/// Extracts plain text. PDF parsing is CPU-bound; call from a blocking task.
pub fn extract_text(format: TemplateFormat, bytes: &[u8]) -> Result<String, PlanError> {
    let raw = match format {
        TemplateFormat::Text | TemplateFormat::Markdown => {
            let text = std::str::from_utf8(bytes).map_err(|e| {
                PlanError::InvalidInput(format!("template is not valid UTF-8: {e}"))
            })?;
            text.trim_start_matches('\u{feff}').to_string()
        }
        TemplateFormat::Pdf => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| PlanError::InvalidInput(format!("failed to read PDF: {e}")))?,
    };

    let text = match format {
        TemplateFormat::Pdf => squeeze_blank_lines(&raw),
        _ => raw.replace("\r\n", "\n").trim().to_string(),
    };

    if text.is_empty() {
        return Err(PlanError::InvalidInput(
            "template contains no extractable text".into(),
        ));
    }
    Ok(text)
}

/// PDF extraction leaves runs of blank lines between text blocks.
fn squeeze_blank_lines(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    for line in text.lines().map(str::trim_end) {
        if line.trim().is_empty() && out.last().is_none_or(|l| l.is_empty()) {
            continue;
        }
        out.push(if line.trim().is_empty() { "" } else { line });
    }
    out.join("\n").trim().to_string()
}
