use std::collections::HashMap;

use anyhow::{Context, Result};
use fancy_regex::Regex;

/// A single lexical unit of a fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// `{name}`, holding the enclosed name.
    Placeholder(&'a str),
    /// `{{`
    OpenBrace,
    /// `}}`
    CloseBrace,
    /// Text matched verbatim. A lone brace that starts neither a placeholder
    /// nor an escape is emitted as a one-character literal.
    Literal(&'a str),
    Whitespace(&'a str),
}

/// Left-to-right, non-overlapping scan of a fixture.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    input: &'a str,
    pos: usize,
}

pub fn tokenize(fixture: &str) -> Tokens<'_> {
    Tokens {
        input: fixture,
        pos: 0,
    }
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_literal(c: char) -> bool {
    !c.is_whitespace() && c != '{' && c != '}'
}

/// Byte length of the longest prefix of `s` whose chars all satisfy `pred`.
fn run_len(s: &str, pred: impl Fn(char) -> bool) -> usize {
    s.find(|c| !pred(c)).unwrap_or(s.len())
}

/// `rest` starts with `{`.
fn placeholder_name(rest: &str) -> Option<&str> {
    let body = &rest[1..];
    let len = run_len(body, is_word);
    if len == 0 || !body[len..].starts_with('}') {
        return None;
    }
    Some(&body[..len])
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let rest = &self.input[self.pos..];
        let first = rest.chars().next()?;

        let (token, len) = match first {
            '{' => {
                if let Some(name) = placeholder_name(rest) {
                    (Token::Placeholder(name), name.len() + 2)
                } else if rest.starts_with("{{") {
                    (Token::OpenBrace, 2)
                } else {
                    (Token::Literal(&rest[..1]), 1)
                }
            }
            '}' => {
                if rest.starts_with("}}") {
                    (Token::CloseBrace, 2)
                } else {
                    (Token::Literal(&rest[..1]), 1)
                }
            }
            c if c.is_whitespace() => {
                let len = run_len(rest, char::is_whitespace);
                (Token::Whitespace(&rest[..len]), len)
            }
            _ => {
                let len = run_len(rest, is_literal);
                (Token::Literal(&rest[..len]), len)
            }
        };

        self.pos += len;
        Some(token)
    }
}

/// Names the regex engine accepts as a group label.
fn is_group_label(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn push_group(pattern: &mut String, name: &str) {
    if is_group_label(name) {
        pattern.push_str(&format!("(?P<{name}>.*?)"));
    } else {
        pattern.push_str("(.*?)");
    }
}

fn push_backreference(pattern: &mut String, name: &str, group: usize) {
    if is_group_label(name) {
        pattern.push_str(&format!(r"\k<{name}>"));
    } else {
        // Wrapped so a following digit can't extend the group number.
        pattern.push_str(&format!(r"(?:\{group})"));
    }
}

/// Compiles a fixture into a regular expression in `fancy-regex` syntax.
///
/// Whitespace runs become `\s+`, literals are escaped, `{{`/`}}` become
/// literal braces. The first `{name}` opens a lazy capturing group and every
/// later `{name}` is a backreference to it, so all occurrences must bind the
/// same text. The result is unanchored and compilation never fails.
pub fn compile(fixture: &str) -> String {
    compile_with_names(fixture).0
}

fn compile_with_names(fixture: &str) -> (String, Vec<String>) {
    let mut pattern = String::with_capacity(fixture.len() * 2);
    let mut groups: HashMap<&str, usize> = HashMap::new();
    let mut names = Vec::new();

    for token in tokenize(fixture) {
        match token {
            Token::Literal(text) => pattern.push_str(&fancy_regex::escape(text)),
            Token::Whitespace(_) => pattern.push_str(r"\s+"),
            Token::OpenBrace => pattern.push_str(r"\{"),
            Token::CloseBrace => pattern.push_str(r"\}"),
            Token::Placeholder(name) => match groups.get(name) {
                Some(&group) => push_backreference(&mut pattern, name, group),
                None => {
                    groups.insert(name, groups.len() + 1);
                    names.push(name.to_owned());
                    push_group(&mut pattern, name);
                }
            },
        }
    }

    (pattern, names)
}

/// A compiled fixture, ready to search plan output.
#[derive(Debug)]
pub struct Template {
    fixture: String,
    pattern: String,
    placeholders: Vec<String>,
    regex: Regex,
}

/// The first region of a text matching a [`Template`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateMatch {
    start: usize,
    end: usize,
    text: String,
    bindings: Vec<(String, String)>,
}

impl TemplateMatch {
    /// Byte offset of the match in the searched text.
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text bound to `name`, if the template has such a placeholder.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.bindings
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value.as_str())
    }

    /// Bindings in order of first appearance in the fixture.
    pub fn bindings(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl Template {
    pub fn new(fixture: &str) -> Result<Self> {
        let (pattern, placeholders) = compile_with_names(fixture);
        tracing::debug!(%pattern, ?placeholders, "compiled fixture");
        let regex = Regex::new(&pattern)
            .with_context(|| format!("Failed to build regex from pattern: {pattern}"))?;

        Ok(Self {
            fixture: fixture.to_owned(),
            pattern,
            placeholders,
            regex,
        })
    }

    pub fn fixture(&self) -> &str {
        &self.fixture
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Distinct placeholder names in order of first appearance.
    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    pub fn search(&self, text: &str) -> Result<Option<TemplateMatch>> {
        let Some(captures) = self
            .regex
            .captures(text)
            .context("Regex engine failed while searching")?
        else {
            return Ok(None);
        };

        let Some(whole) = captures.get(0) else {
            return Ok(None);
        };

        // Placeholder groups are the only capturing groups, numbered in
        // first-appearance order.
        let bindings = self
            .placeholders
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let value = captures.get(i + 1).map_or("", |m| m.as_str());
                (name.clone(), value.to_owned())
            })
            .collect();

        Ok(Some(TemplateMatch {
            start: whole.start(),
            end: whole.end(),
            text: whole.as_str().to_owned(),
            bindings,
        }))
    }

    pub fn is_match(&self, text: &str) -> Result<bool> {
        self.regex
            .is_match(text)
            .context("Regex engine failed while searching")
    }
}
