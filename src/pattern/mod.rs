// src/pattern/mod.rs

//! Path patterns with numbered captures.
//!
//! A pattern is plain path text in which `$N` (N >= 1) captures one path
//! segment fragment and `*` matches one without recording it:
//!
//! ```text
//! src/$1/$1_test.c     # both $1 must capture the same text
//! build/$2/*.o         # $2 is recorded, * is not
//! ```
//!
//! Every pattern is compiled twice:
//! - a glob form (captures become `*`) used to enumerate candidates on disk,
//! - an anchored regex that captures `$N` and is the final judge of a match.
//!
//! The regex cannot express "all `$1` agree", so [`Pattern::matches`] checks
//! that on top of the regex result.

pub mod enumerate;
pub mod path_utils;

use std::collections::BTreeMap;
use std::fmt;

use globset::{GlobBuilder, GlobMatcher};
use regex::Regex;

use crate::errors::{PoulError, Result};

pub use path_utils::{clean, clean_path};

/// Characters a single capture or wildcard may span.
const SEGMENT_CLASS: &str = r"[A-Za-z0-9\-_.]+";

/// Captured values keyed by variable number.
pub type Args = BTreeMap<u32, String>;

/// A concrete path that matched a [`Pattern`], plus what it captured.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Entry {
    /// The matched path, cleaned.
    pub name: String,
    pub args: Args,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Capture(u32),
    Wildcard,
}

/// A compiled, immutable path pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    text: String,
    tokens: Vec<Token>,
    glob: String,
    glob_matcher: GlobMatcher,
    regex: Regex,
    /// Variable number for each capture group, in group order.
    slots: Vec<u32>,
}

impl Pattern {
    /// Compile `text` into a pattern.
    ///
    /// Fails only if the translated regex or glob is rejected.
    pub fn new(text: &str) -> Result<Self> {
        let text = clean(text);
        let tokens = tokenize(&text);

        let glob = to_glob(&tokens);
        // `escape` brackets metacharacters, so `\` is never an escape here.
        let glob_matcher = GlobBuilder::new(&glob)
            .literal_separator(true)
            .backslash_escape(false)
            .build()
            .map_err(|source| PoulError::InvalidGlob {
                pattern: text.clone(),
                source,
            })?
            .compile_matcher();

        let (expr, slots) = to_regex(&tokens);
        let regex = Regex::new(&expr).map_err(|source| PoulError::InvalidPattern {
            pattern: text.clone(),
            source,
        })?;

        Ok(Self {
            text,
            tokens,
            glob,
            glob_matcher,
            regex,
            slots,
        })
    }

    /// The cleaned pattern text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The filesystem glob used for enumeration.
    pub fn glob(&self) -> &str {
        &self.glob
    }

    /// True if the pattern has no captures or wildcards.
    pub fn is_literal(&self) -> bool {
        self.tokens.iter().all(|t| matches!(t, Token::Literal(_)))
    }

    /// Match a concrete path.
    ///
    /// The path is cleaned first. Returns `None` when the regex rejects the
    /// path or when two occurrences of the same `$N` captured different
    /// text.
    pub fn matches(&self, path: &str) -> Option<Entry> {
        let name = clean(path);
        let caps = self.regex.captures(&name)?;

        let mut args = Args::new();
        for (group, &index) in self.slots.iter().enumerate() {
            let value = caps.get(group + 1)?.as_str();
            match args.get(&index) {
                Some(bound) if bound != value => return None,
                Some(_) => {}
                None => {
                    args.insert(index, value.to_string());
                }
            }
        }

        Some(Entry { name, args })
    }

    /// Replace every `$N` in this pattern with the value captured for `N`.
    pub fn substitute(&self, args: &Args) -> Result<String> {
        render(&self.tokens, &self.text, args)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Replace every `$N` in `template` with `args[N]`.
///
/// A `$N` with no captured value is an error rather than being left in
/// place, so a broken rule never hands a half-substituted path to a shell.
pub fn substitute(template: &str, args: &Args) -> Result<String> {
    render(&tokenize(template), template, args)
}

/// Substitute `args` into each template in turn.
pub fn substitute_all<'a, I>(templates: I, args: &Args) -> Result<Vec<String>>
where
    I: IntoIterator<Item = &'a Pattern>,
{
    templates.into_iter().map(|p| p.substitute(args)).collect()
}

fn render(tokens: &[Token], template: &str, args: &Args) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    for token in tokens {
        match token {
            Token::Literal(text) => out.push_str(text),
            Token::Wildcard => out.push('*'),
            Token::Capture(index) => match args.get(index) {
                Some(value) => out.push_str(value),
                None => {
                    return Err(PoulError::MissingCapture {
                        template: template.to_string(),
                        index: *index,
                    });
                }
            },
        }
    }
    Ok(out)
}

/// Split pattern text into literals, `$N` captures and `*` wildcards.
///
/// `$` not followed by a number >= 1 stays literal.
fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut chars = text.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '*' => {
                flush_literal(&mut literal, &mut tokens);
                tokens.push(Token::Wildcard);
            }
            '$' => {
                let digits: String = text[pos + 1..]
                    .chars()
                    .take_while(char::is_ascii_digit)
                    .collect();
                match digits.parse::<u32>() {
                    Ok(index) if index >= 1 && !digits.starts_with('0') => {
                        flush_literal(&mut literal, &mut tokens);
                        tokens.push(Token::Capture(index));
                        for _ in 0..digits.len() {
                            chars.next();
                        }
                    }
                    _ => literal.push('$'),
                }
            }
            other => literal.push(other),
        }
    }
    flush_literal(&mut literal, &mut tokens);
    tokens
}

fn flush_literal(literal: &mut String, tokens: &mut Vec<Token>) {
    if !literal.is_empty() {
        tokens.push(Token::Literal(std::mem::take(literal)));
    }
}

fn to_glob(tokens: &[Token]) -> String {
    let mut glob = String::new();
    let mut in_wildcard = false;
    for token in tokens {
        match token {
            Token::Literal(text) => {
                glob.push_str(&globset::escape(text));
                in_wildcard = false;
            }
            // Adjacent captures/wildcards collapse into one `*`; `**` means
            // something else to globset.
            Token::Capture(_) | Token::Wildcard => {
                if !in_wildcard {
                    glob.push('*');
                }
                in_wildcard = true;
            }
        }
    }
    glob
}

fn to_regex(tokens: &[Token]) -> (String, Vec<u32>) {
    let mut expr = String::from("^");
    let mut slots = Vec::new();
    for token in tokens {
        match token {
            Token::Literal(text) => expr.push_str(&regex::escape(text)),
            Token::Capture(index) => {
                expr.push('(');
                expr.push_str(SEGMENT_CLASS);
                expr.push(')');
                slots.push(*index);
            }
            Token::Wildcard => expr.push_str(SEGMENT_CLASS),
        }
    }
    expr.push('$');
    (expr, slots)
}
