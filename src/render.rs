//! Terminal output of highlighted text using crossterm

use std::io::Write;

use crossterm::{
    queue,
    style::{self, Attribute, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
};
use unicode_width::UnicodeWidthStr;

use crate::error::Result;
use crate::syntax::{Color, HighlightedSpan, Style, Theme};

/// Map a palette color onto crossterm's
fn to_crossterm(color: Color) -> style::Color {
    match color {
        Color::Default => style::Color::Reset,
        Color::Black => style::Color::Black,
        Color::Red => style::Color::DarkRed,
        Color::Green => style::Color::DarkGreen,
        Color::Yellow => style::Color::DarkYellow,
        Color::Blue => style::Color::DarkBlue,
        Color::Magenta => style::Color::DarkMagenta,
        Color::Cyan => style::Color::DarkCyan,
        Color::White => style::Color::Grey,
        Color::BrightBlack => style::Color::DarkGrey,
        Color::BrightRed => style::Color::Red,
        Color::BrightGreen => style::Color::Green,
        Color::BrightYellow => style::Color::Yellow,
        Color::BrightBlue => style::Color::Blue,
        Color::BrightMagenta => style::Color::Magenta,
        Color::BrightCyan => style::Color::Cyan,
        Color::BrightWhite => style::Color::White,
    }
}

/// Writes highlighted lines to a terminal or any other writer
pub struct Renderer<W: Write> {
    out: W,
    theme: Theme,
    /// Emit escape sequences; plain text when false
    color: bool,
}

impl<W: Write> Renderer<W> {
    /// Create a renderer
    pub fn new(out: W, theme: Theme, color: bool) -> Self {
        Self { out, theme, color }
    }

    /// Write one line followed by a newline
    ///
    /// Spans must be ordered and non-overlapping, as produced by the
    /// highlight engines.
    pub fn write_line(&mut self, text: &str, spans: &[HighlightedSpan]) -> Result<()> {
        if !self.color {
            queue!(self.out, Print(text), Print('\n'))?;
            return Ok(());
        }

        let mut pos = 0;
        for span in spans {
            let (start, end) = (span.start.min(text.len()), span.end.min(text.len()));
            if start < pos || start >= end {
                continue;
            }
            queue!(self.out, Print(&text[pos..start]))?;
            self.write_styled(&text[start..end], self.theme.style(span.category))?;
            pos = end;
        }
        queue!(self.out, Print(&text[pos..]), Print('\n'))?;
        Ok(())
    }

    fn write_styled(&mut self, text: &str, style: Style) -> Result<()> {
        if style.is_default() {
            queue!(self.out, Print(text))?;
            return Ok(());
        }

        if style.fg != Color::Default {
            queue!(self.out, SetForegroundColor(to_crossterm(style.fg)))?;
        }
        if style.bg != Color::Default {
            queue!(self.out, SetBackgroundColor(to_crossterm(style.bg)))?;
        }
        if style.bold {
            queue!(self.out, SetAttribute(Attribute::Bold))?;
        }
        if style.italic {
            queue!(self.out, SetAttribute(Attribute::Italic))?;
        }
        if style.underline {
            queue!(self.out, SetAttribute(Attribute::Underlined))?;
        }
        if style.reverse {
            queue!(self.out, SetAttribute(Attribute::Reverse))?;
        }
        queue!(self.out, Print(text), SetAttribute(Attribute::Reset), ResetColor)?;
        Ok(())
    }

    /// Flush output buffer
    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    /// Consume the renderer and return the writer
    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Describe each span of a line as `line:start-end Category text`
///
/// Lines and columns are 1-based; columns are display columns, so wide
/// characters count double.
pub fn span_report(line_idx: usize, text: &str, spans: &[HighlightedSpan]) -> Vec<String> {
    spans
        .iter()
        .filter_map(|span| {
            let before = text.get(..span.start)?;
            let content = text.get(span.start..span.end)?;
            let col = before.width() + 1;
            let end_col = col + content.width().max(1) - 1;
            Some(format!(
                "{}:{}-{} {} {}",
                line_idx + 1,
                col,
                end_col,
                span.category.name(),
                content
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Category;

    fn render(text: &str, spans: &[HighlightedSpan], color: bool) -> String {
        let mut renderer = Renderer::new(Vec::new(), Theme::new(), color);
        renderer.write_line(text, spans).unwrap();
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn test_plain_output() {
        let spans = [HighlightedSpan::new(0, 3, Category::Keyword)];
        assert_eq!(render("var x", &spans, false), "var x\n");
    }

    #[test]
    fn test_colored_output_keeps_text() {
        let spans = [
            HighlightedSpan::new(0, 3, Category::Keyword),
            HighlightedSpan::new(4, 5, Category::Variable),
        ];
        let output = render("var x;", &spans, true);

        assert!(output.contains("\x1b["));
        assert!(output.contains("var"));
        assert!(output.ends_with(";\n"));

        let stripped = strip_escapes(&output);
        assert_eq!(stripped, "var x;\n");
    }

    #[test]
    fn test_out_of_range_spans_ignored() {
        let spans = [HighlightedSpan::new(2, 40, Category::Comment)];
        let output = render("a // b", &spans, true);
        assert_eq!(strip_escapes(&output), "a // b\n");
    }

    #[test]
    fn test_span_report_columns() {
        let text = "var 名前 = 1;";
        let start = text.find('名').unwrap();
        let spans = [
            HighlightedSpan::new(0, 3, Category::Keyword),
            HighlightedSpan::new(start, start + "名前".len(), Category::Variable),
        ];

        let report = span_report(4, text, &spans);
        assert_eq!(report, vec!["5:1-3 Keyword var", "5:5-8 Variable 名前"]);
    }

    fn strip_escapes(s: &str) -> String {
        let mut out = String::new();
        let mut chars = s.chars();
        while let Some(c) = chars.next() {
            if c == '\x1b' {
                // CSI sequences end with a letter
                for c in chars.by_ref() {
                    if c.is_ascii_alphabetic() {
                        break;
                    }
                }
            } else {
                out.push(c);
            }
        }
        out
    }
}
