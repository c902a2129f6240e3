use colored::*;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::{as_24_bit_terminal_escaped, LinesWithEndings};

const THEME: &str = "Solarized (dark)";
const FENCE: &str = "```";

/// Renders a complete markdown reply for the terminal, highlighting fenced
/// code blocks and framing them with a labelled border.
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }

    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let Some(theme) = self.theme_set.themes.get(THEME) else {
            return code.to_string();
        };

        let syntax = lang
            .and_then(|lang| {
                self.syntax_set
                    .find_syntax_by_token(lang)
                    .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            })
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let mut highlighter = HighlightLines::new(syntax, theme);
        let mut output = String::new();

        for line in LinesWithEndings::from(code) {
            match highlighter.highlight_line(line, &self.syntax_set) {
                Ok(ranges) => {
                    let ranges: Vec<(Style, &str)> = ranges;
                    output.push_str(&as_24_bit_terminal_escaped(&ranges[..], false));
                }
                Err(_) => output.push_str(line),
            }
        }

        // Reset terminal colors after the block
        output.push_str("\x1b[0m");
        output
    }

    fn block_header(lang: Option<&str>) -> String {
        format!(
            "{}[{}]{}\n",
            "┌─".dimmed(),
            lang.unwrap_or("code").cyan(),
            "─────────────────────────────────────────────────".dimmed()
        )
    }

    fn block_footer() -> String {
        format!(
            "{}\n",
            "└──────────────────────────────────────────────────────────".dimmed()
        )
    }

    pub fn render(&self, text: &str) -> String {
        let mut output = String::new();
        let mut code: Option<(Option<String>, String)> = None;

        for line in LinesWithEndings::from(text) {
            let trimmed = line.trim_start();
            match code.take() {
                None if trimmed.starts_with(FENCE) => {
                    let lang = trimmed[FENCE.len()..].trim();
                    let lang = (!lang.is_empty()).then(|| lang.to_string());
                    output.push_str(&Self::block_header(lang.as_deref()));
                    code = Some((lang, String::new()));
                }
                None => output.push_str(line),
                Some((lang, body)) if trimmed.trim_end() == FENCE => {
                    output.push_str(&self.highlight_code(&body, lang.as_deref()));
                    output.push_str(&Self::block_footer());
                }
                Some((lang, mut body)) => {
                    body.push_str(line);
                    code = Some((lang, body));
                }
            }
        }

        // Unterminated block at the end of the reply
        if let Some((lang, mut body)) = code {
            if !body.ends_with('\n') {
                body.push('\n');
            }
            output.push_str(&self.highlight_code(&body, lang.as_deref()));
            output.push_str(&Self::block_footer());
        }

        output
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}
