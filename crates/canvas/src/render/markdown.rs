//! Markdown text shared by Telegram, Signal and iMessage.

use {super::section_body, crate::types::Canvas};

const MARKDOWN_SPECIAL: &[char] = &['*', '_', '[', ']', '(', ')', '.', '!'];

/// Backslash-escape markdown-significant characters so user text cannot
/// open emphasis, links or be rejected by the parser.
pub fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if MARKDOWN_SPECIAL.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

pub fn render_markdown(canvas: &Canvas) -> String {
    let mut text = format!("*{}*\n", escape_markdown(&canvas.title));
    if let Some(description) = canvas.description.as_deref().filter(|d| !d.is_empty()) {
        text.push_str(&escape_markdown(description));
        text.push_str("\n\n");
    }
    for section in &canvas.sections {
        text.push_str(&format!("*{}*\n", escape_markdown(&section.title)));
        text.push_str(&section_body(section, escape_markdown));
        text.push_str("\n\n");
    }
    text
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::types::{CanvasAction, CanvasSection},
        rstest::rstest,
    };

    #[rstest]
    #[case("plain", "plain")]
    #[case("*bold*", "\\*bold\\*")]
    #[case("snake_case", "snake\\_case")]
    #[case("[link](url)", "\\[link\\]\\(url\\)")]
    #[case("v1.2!", "v1\\.2\\!")]
    #[case("a-b#c", "a-b#c")]
    fn escapes_markdown_characters(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(escape_markdown(input), expected);
    }

    #[test]
    fn renders_title_description_and_sections() {
        let canvas = Canvas::new("Daily Briefing")
            .with_description("Your summary")
            .add_section(CanvasSection::new("Updates", "• New task assigned"))
            .add_section(CanvasSection::new("Loops", "• Call Bob"));
        assert_eq!(
            render_markdown(&canvas),
            "*Daily Briefing*\nYour summary\n\n*Updates*\n• New task assigned\n\n*Loops*\n• Call Bob\n\n"
        );
    }

    #[test]
    fn user_text_is_escaped_inside_bold_markers() {
        let canvas = Canvas::new("Q3 review!").add_section(CanvasSection::new("a_b", "done."));
        assert_eq!(
            render_markdown(&canvas),
            "*Q3 review\\!*\n*a\\_b*\ndone\\.\n\n"
        );
    }

    #[test]
    fn empty_content_placeholder_is_literal() {
        let text = render_markdown(&Canvas::new("t").add_section(CanvasSection::new("Quiet", "")));
        assert!(text.contains("*Quiet*\n(empty)\n"), "{text}");
    }

    #[test]
    fn actions_are_not_rendered() {
        let canvas = Canvas::new("t").add_section(
            CanvasSection::new("s", "c").with_action(CanvasAction::link("Open", "https://x.test")),
        );
        assert!(!render_markdown(&canvas).contains("Open"));
    }
}
