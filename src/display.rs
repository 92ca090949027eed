//! Terminal presentation
//!
//! Every status line of the demo goes through [`Presenter`], which renders it
//! either with colors and glyphs ([`OutputStyle::Decorated`]) or as the same
//! text without ANSI styling ([`OutputStyle::Plain`]).

use std::io::{self, Stdout, Write};

use console::Style;
use serde::Deserialize;

const RULE_WIDTH: usize = 60;

/// Output styling
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    #[default]
    Decorated,
    Plain,
}

/// Color applied to a line in decorated mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Cyan,
    Magenta,
    Yellow,
    Green,
    Red,
    Blue,
    White,
}

impl Tone {
    fn style(self) -> Style {
        let style = Style::new();
        match self {
            Tone::Cyan => style.cyan(),
            Tone::Magenta => style.magenta(),
            Tone::Yellow => style.yellow(),
            Tone::Green => style.green(),
            Tone::Red => style.red(),
            Tone::Blue => style.blue(),
            Tone::White => style.white(),
        }
    }
}

/// Writes banners, steps and status lines
pub struct Presenter<W: Write> {
    out: W,
    style: OutputStyle,
}

impl Presenter<Stdout> {
    /// Presenter writing to standard output
    pub fn stdout(style: OutputStyle) -> Self {
        Self::new(io::stdout(), style)
    }
}

impl<W: Write> Presenter<W> {
    pub fn new(out: W, style: OutputStyle) -> Self {
        Self { out, style }
    }

    pub fn set_style(&mut self, style: OutputStyle) {
        self.style = style;
    }

    /// Consume the presenter and return its writer
    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&mut self, tone: Tone, text: &str) -> io::Result<()> {
        match self.style {
            OutputStyle::Decorated => writeln!(self.out, "{}", tone.style().apply_to(text)),
            OutputStyle::Plain => writeln!(self.out, "{}", text),
        }
    }

    /// Blank line, a 60 column rule, the centered title and another rule
    pub fn section_header(&mut self, title: &str, tone: Tone) -> io::Result<()> {
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(self.out)?;
        self.paint(tone, &rule)?;
        self.paint(tone, &format!("{:^width$}", title, width = RULE_WIDTH))?;
        self.paint(tone, &rule)
    }

    pub fn step(&mut self, number: u32, description: &str) -> io::Result<()> {
        writeln!(self.out)?;
        self.paint(Tone::Green, &format!("Step {}: {}", number, description))
    }

    pub fn success(&mut self, message: &str) -> io::Result<()> {
        self.paint(Tone::Green, &format!("✓ {}", message))
    }

    pub fn error(&mut self, message: &str) -> io::Result<()> {
        self.paint(Tone::Red, &format!("✗ {}", message))
    }

    pub fn info(&mut self, message: &str) -> io::Result<()> {
        self.paint(Tone::Blue, &format!("ℹ {}", message))
    }

    pub fn line(&mut self, text: &str, tone: Tone) -> io::Result<()> {
        self.paint(tone, text)
    }

    pub fn blank(&mut self) -> io::Result<()> {
        writeln!(self.out)
    }

    /// The agent's answer, verbatim
    pub fn answer(&mut self, text: &str) -> io::Result<()> {
        self.paint(Tone::White, text)?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut Presenter<Vec<u8>>) -> io::Result<()>) -> String {
        let mut presenter = Presenter::new(Vec::new(), OutputStyle::Plain);
        f(&mut presenter).unwrap();
        String::from_utf8(presenter.into_inner()).unwrap()
    }

    #[test]
    fn test_section_header_is_centered() {
        let out = render(|p| p.section_header("AGENT RESPONSE", Tone::Yellow));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "=".repeat(60));
        assert_eq!(lines[2].len(), 60);
        assert_eq!(lines[2].trim(), "AGENT RESPONSE");
        assert_eq!(lines[3], "=".repeat(60));
    }

    #[test]
    fn test_status_glyphs() {
        let out = render(|p| {
            p.step(2, "Initializing client")?;
            p.success("ready")?;
            p.error("failed")?;
            p.info("note")
        });
        assert!(out.contains("Step 2: Initializing client\n"));
        assert!(out.contains("✓ ready\n"));
        assert!(out.contains("✗ failed\n"));
        assert!(out.contains("ℹ note\n"));
    }

    #[test]
    fn test_plain_output_has_no_escape_codes() {
        let out = render(|p| {
            p.section_header("AWS BEDROCK AGENT DEMO", Tone::Magenta)?;
            p.answer("Hello, world!")
        });
        assert!(!out.contains('\u{1b}'));
        assert!(out.ends_with("Hello, world!\n"));
    }

    #[test]
    fn test_output_style_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            style: OutputStyle,
        }
        let plain: Wrapper = config::Config::builder()
            .set_override("style", "plain")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(plain.style, OutputStyle::Plain);
    }
}
