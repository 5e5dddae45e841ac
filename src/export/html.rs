//! Export markup
//!
//! Both essay texts are user input and are escaped before they reach markup.

use crate::db::Essay;

const STYLE: &str = "body { font-family: sans-serif; } p { margin: 0 0 0.6em 0; }";

/// Build the printable page for an essay: the corrected text first, then
/// the original below a separator.
pub fn essay_html(essay: &Essay) -> String {
    format!(
        concat!(
            "<!DOCTYPE html>\n",
            "<html><head><meta charset=\"utf-8\"><title>Corrected Essay</title>",
            "<style>{style}</style></head>\n",
            "<body><h2>Corrected Essay</h2>\n{corrected}<hr>\n",
            "<p><strong>Original Text:</strong></p>\n{original}</body></html>\n"
        ),
        style = STYLE,
        corrected = paragraphs(&essay.corrected_text),
        original = paragraphs(&essay.original_text),
    )
}

/// One escaped `<p>` per non-blank line
fn paragraphs(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| format!("<p>{}</p>\n", html_escape::encode_text(line)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn essay(original: &str, corrected: &str) -> Essay {
        Essay {
            id: 7,
            original_text: original.to_string(),
            corrected_text: corrected.to_string(),
            timestamp: "2026-10-17T12:00:00.000000Z".to_string(),
            word_count: 0,
            paragraph_count: 0,
            backspace_count: 0,
        }
    }

    #[test]
    fn test_layout_puts_corrected_before_original() {
        let html = essay_html(&essay("Me and him goes.", "He and I go."));
        let heading = html.find("<h2>Corrected Essay</h2>").unwrap();
        let corrected = html.find("He and I go.").unwrap();
        let separator = html.find("<hr>").unwrap();
        let original = html.find("Me and him goes.").unwrap();
        assert!(heading < corrected && corrected < separator && separator < original);
    }

    #[test]
    fn test_both_fields_are_escaped() {
        let html = essay_html(&essay(
            "<script>alert('x')</script>",
            "Fish & \"chips\" </p><p>",
        ));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("Fish &amp; \"chips\" &lt;/p&gt;&lt;p&gt;"));
    }

    #[test]
    fn test_lines_become_paragraphs() {
        assert_eq!(paragraphs("first\n\n  second  \n"), "<p>first</p>\n<p>second</p>\n");
    }
}
