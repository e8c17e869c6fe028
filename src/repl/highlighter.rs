use lazy_static::lazy_static;
use owo_colors::OwoColorize;
use regex::Regex;
use rustyline::highlight::{Highlighter, MatchingBracketHighlighter};
use rustyline_derive::{Completer, Helper, Hinter, Validator};
use std::borrow::Cow::{self, Borrowed, Owned};

lazy_static! {
    // Checked in order at each position, so strings win over comments
    // and keywords win over plain symbols.
    static ref STRING_RE: Regex = Regex::new(r#""[^"]*""#).unwrap();
    static ref COMMENT_RE: Regex = Regex::new(r";.*").unwrap();
    static ref NUMBER_RE: Regex = Regex::new(r"-?\b\d+(\.\d*)?([eE][+-]?\d+)?\b").unwrap();
    static ref KEYWORD_RE: Regex = Regex::new(r"\b(quote|if|def|fn|macro|defun|defmacro)\b").unwrap();
    static ref BOOLEAN_RE: Regex = Regex::new(r"\b(true|false)\b").unwrap();
    static ref PARENS_RE: Regex = Regex::new(r"[()]").unwrap();
}

fn paint_string(token: &str) -> String {
    token.green().to_string()
}

fn paint_comment(token: &str) -> String {
    token.bright_black().to_string()
}

fn paint_number(token: &str) -> String {
    token.magenta().to_string()
}

fn paint_keyword(token: &str) -> String {
    token.cyan().bold().to_string()
}

fn paint_boolean(token: &str) -> String {
    token.yellow().to_string()
}

fn paint_paren(token: &str) -> String {
    token.blue().to_string()
}

#[derive(Default)]
pub struct LispHighlighter {
    matching_bracket_highlighter: MatchingBracketHighlighter,
}

impl Highlighter for LispHighlighter {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.is_empty() {
            return Borrowed(line);
        }

        let palette: [(&Regex, fn(&str) -> String); 6] = [
            (&STRING_RE, paint_string),
            (&COMMENT_RE, paint_comment),
            (&NUMBER_RE, paint_number),
            (&KEYWORD_RE, paint_keyword),
            (&BOOLEAN_RE, paint_boolean),
            (&PARENS_RE, paint_paren),
        ];

        let mut styled = String::with_capacity(line.len());
        let mut current_pos = 0;

        while current_pos < line.len() {
            let mut found_match = false;
            for (regex, paint) in &palette {
                if let Some(mat) = regex.find_at(line, current_pos) {
                    if mat.start() == current_pos {
                        styled.push_str(&paint(mat.as_str()));
                        current_pos = mat.end();
                        found_match = true;
                        break;
                    }
                }
            }

            if !found_match {
                // Plain text, usually a symbol. Advance one character.
                let step = line[current_pos..]
                    .chars()
                    .next()
                    .map_or(line.len() - current_pos, char::len_utf8);
                styled.push_str(&line[current_pos..current_pos + step]);
                current_pos += step;
            }
        }

        Owned(styled)
    }

    fn highlight_char(&self, line: &str, pos: usize, forced: bool) -> bool {
        self.matching_bracket_highlighter
            .highlight_char(line, pos, forced)
    }
}

#[derive(Completer, Helper, Hinter, Validator)]
pub struct ReplHelper {
    highlighter: LispHighlighter,
}

impl ReplHelper {
    pub fn new() -> Self {
        Self {
            highlighter: LispHighlighter::default(),
        }
    }
}

impl Default for ReplHelper {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter for ReplHelper {
    fn highlight<'l>(&self, line: &'l str, pos: usize) -> Cow<'l, str> {
        self.highlighter.highlight(line, pos)
    }

    fn highlight_char(&self, line: &str, pos: usize, forced: bool) -> bool {
        self.highlighter.highlight_char(line, pos, forced)
    }
}
