//! Line-oriented view over text extracted from a PDF.

/// Immutable document text, split into lines.
///
/// Lines keep their surrounding whitespace: the revenue locator compares
/// character offsets between a header line and an amount line.
#[derive(Debug, Clone, Default)]
pub struct Document {
    text: String,
    lines: Vec<String>,
}

impl Document {
    /// Build a document from raw extracted text.
    pub fn from_text(text: &str) -> Self {
        let text = text.replace('\u{00a0}', " ");
        let lines = text
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
            .collect();
        Self { text, lines }
    }

    /// Full normalized text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// All lines, untrimmed.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Line at `index`, if any.
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// Trimmed, non-empty lines.
    pub fn content_lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|l| l.trim()).filter(|l| !l.is_empty())
    }

    /// True when the document carries no visible characters at all.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Number of non-whitespace characters.
    pub fn visible_len(&self) -> usize {
        self.text.chars().filter(|c| !c.is_whitespace()).count()
    }
}

/// Convert a byte offset within `line` into a character offset.
pub fn char_offset(line: &str, byte_offset: usize) -> usize {
    line.get(..byte_offset)
        .map(|prefix| prefix.chars().count())
        .unwrap_or_else(|| line.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_lines_keep_indentation() {
        let doc = Document::from_text("  CONTO ECONOMICO\r\n\n   1) Ricavi\u{00a0}100");
        assert_eq!(doc.lines().len(), 3);
        assert_eq!(doc.line(0), Some("  CONTO ECONOMICO"));
        assert_eq!(doc.line(2), Some("   1) Ricavi 100"));
        assert_eq!(
            doc.content_lines().collect::<Vec<_>>(),
            vec!["CONTO ECONOMICO", "1) Ricavi 100"]
        );
    }

    #[test]
    fn test_blank_document() {
        assert!(Document::from_text(" \n\t\n\u{00a0} ").is_blank());
        assert!(!Document::from_text("x").is_blank());
    }

    #[test]
    fn test_char_offset_with_accents() {
        let line = "SOCIETÀ 31-12-2024";
        let byte = line.find("31").unwrap();
        assert_eq!(char_offset(line, byte), 8);
    }
}
