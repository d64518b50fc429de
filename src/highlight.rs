use inksac::prelude::*;

/// Colors for the terminal front-end. Falls back to plain text when the
/// terminal has no color support or color is switched off.
#[derive(Debug, Clone)]
pub struct SyntaxHighlighter {
    color_support: ColorSupport,
    builtins: Vec<String>,
}

impl SyntaxHighlighter {
    pub fn new(enabled: bool, builtins: Vec<String>) -> Self {
        let support = if enabled {
            check_color_support().unwrap_or(ColorSupport::NoColor)
        } else {
            ColorSupport::NoColor
        };
        Self {
            color_support: support,
            builtins,
        }
    }

    fn plain(&self) -> bool {
        matches!(self.color_support, ColorSupport::NoColor)
    }

    /// Colors the command word; built-ins in green, anything else in cyan.
    /// Spacing is left exactly as typed.
    pub fn highlight_command(&self, input: &str) -> String {
        if self.plain() {
            return input.to_string();
        }

        let trimmed = input.trim_start();
        let Some(word) = trimmed.split_whitespace().next() else {
            return input.to_string();
        };
        let lead = &input[..input.len() - trimmed.len()];
        let rest = &trimmed[word.len()..];

        let color = if self.builtins.iter().any(|b| b.eq_ignore_ascii_case(word)) {
            Color::Green
        } else {
            Color::Cyan
        };
        let command_style = Style::builder().foreground(color).bold().build();

        format!("{}{}{}", lead, word.style(command_style), rest)
    }

    /// Attached prompts are yellow so forwarding is hard to miss.
    pub fn highlight_prompt(&self, prompt: &str, attached: bool) -> String {
        if self.plain() {
            return prompt.to_string();
        }

        let style = if attached {
            Style::builder().foreground(Color::Yellow).bold().build()
        } else {
            Style::builder().foreground(Color::Blue).bold().build()
        };
        prompt.style(style).to_string()
    }

    pub fn highlight_error(&self, error: &str) -> String {
        if self.plain() {
            return error.to_string();
        }

        let error_style = Style::builder()
            .foreground(Color::Red)
            .bold()
            .build();

        error.style(error_style).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> SyntaxHighlighter {
        SyntaxHighlighter::new(false, vec!["cd".to_string()])
    }

    #[test]
    fn test_disabled_color_is_passthrough() {
        let highlighter = plain();
        assert_eq!(highlighter.highlight_command("  cd   sub dir"), "  cd   sub dir");
        assert_eq!(highlighter.highlight_prompt("/tmp> ", false), "/tmp> ");
        assert_eq!(highlighter.highlight_prompt("[APP]> ", true), "[APP]> ");
        assert_eq!(highlighter.highlight_error("boom"), "boom");
    }

    #[test]
    fn test_command_keeps_visible_text() {
        let highlighter = SyntaxHighlighter::new(true, vec!["cd".to_string()]);
        let colored = highlighter.highlight_command(" cd  ..");
        assert!(colored.starts_with(' '));
        assert!(colored.contains("cd"));
        assert!(colored.ends_with("  .."));
    }
}
