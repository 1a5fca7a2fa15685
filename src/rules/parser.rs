// src/rules/parser.rs

//! Rule-file parser.
//!
//! A rule file is a sequence of blocks:
//!
//! ```text
//! # comment
//! <header> {
//!     <body line>
//! }
//! ```
//!
//! Headers containing `->` declare a [`Step`]; anything else must be a
//! template declaration `name [(pre, ... / post, ...)]`. Lines are trimmed,
//! and blank lines and `#` comments are skipped everywhere. Line numbers in
//! errors are 1-based and count skipped lines.

use std::collections::BTreeMap;

use tracing::debug;

use crate::errors::{PoulError, Result};
use crate::pattern::Pattern;
use crate::rules::model::{Program, Step, Template};

const ARROW: &str = "->";

enum State {
    Outside,
    Inside {
        header: String,
        opened_at: usize,
        body: String,
    },
}

/// Parse rule-file text into a [`Program`].
pub fn parse(text: &str) -> Result<Program> {
    let mut steps = Vec::new();
    let mut templates = BTreeMap::new();
    let mut state = State::Outside;

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        state = match state {
            State::Outside => match line.strip_suffix('{') {
                Some(header) => State::Inside {
                    header: header.trim().to_string(),
                    opened_at: line_no,
                    body: String::new(),
                },
                None => return Err(PoulError::syntax(line_no, "expected block declaration")),
            },
            State::Inside {
                header,
                opened_at,
                body,
            } if line == "}" => {
                add_block(&header, opened_at, body, &mut steps, &mut templates)?;
                State::Outside
            }
            State::Inside {
                header,
                opened_at,
                mut body,
            } => {
                body.push_str(line);
                body.push('\n');
                State::Inside {
                    header,
                    opened_at,
                    body,
                }
            }
        };
    }

    if let State::Inside { opened_at, .. } = state {
        return Err(PoulError::UnterminatedBlock { opened_at });
    }

    debug!(
        steps = steps.len(),
        templates = templates.len(),
        "parsed rule file"
    );
    Ok(Program::new(steps, templates))
}

fn add_block(
    header: &str,
    line: usize,
    body: String,
    steps: &mut Vec<Step>,
    templates: &mut BTreeMap<String, Template>,
) -> Result<()> {
    if header.contains(ARROW) {
        steps.push(parse_step(header, line, body)?);
        return Ok(());
    }

    let Some((name, hooks)) = split_template_header(header) else {
        return Err(PoulError::syntax(line, "unknown block start"));
    };

    let (prehooks, posthooks) = match hooks {
        Some(inner) => parse_hooks(inner, line)?,
        None => (Vec::new(), Vec::new()),
    };

    if templates.contains_key(name) {
        return Err(PoulError::syntax(
            line,
            format!("duplicate template '{name}'"),
        ));
    }

    let destinations = body
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();

    templates.insert(
        name.to_string(),
        Template {
            name: name.to_string(),
            prehooks,
            posthooks,
            destinations,
        },
    );
    Ok(())
}

/// `name` or `name (hooks)`; returns the name and the text inside the
/// parentheses.
fn split_template_header(header: &str) -> Option<(&str, Option<&str>)> {
    let name_end = header
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
        .unwrap_or(header.len());
    if name_end == 0 {
        return None;
    }

    let (name, rest) = header.split_at(name_end);
    let rest = rest.trim();
    if rest.is_empty() {
        return Some((name, None));
    }

    let inner = rest.strip_prefix('(')?.strip_suffix(')')?;
    // `()` is not a hook clause.
    if inner.trim().is_empty() || inner.contains(['(', ')']) {
        return None;
    }
    Some((name, Some(inner)))
}

/// `pre1, pre2 / post1, post2`; either side may be empty.
fn parse_hooks(inner: &str, line: usize) -> Result<(Vec<String>, Vec<String>)> {
    let mut sides = inner.split('/');
    let pre = split_list(sides.next().unwrap_or_default());
    let post = split_list(sides.next().unwrap_or_default());
    if sides.next().is_some() {
        return Err(PoulError::syntax(
            line,
            "expected at most one '/' in hook list",
        ));
    }
    Ok((pre, post))
}

fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_step(header: &str, line: usize, body: String) -> Result<Step> {
    let Some((left, right)) = header.split_once(ARROW) else {
        return Err(PoulError::syntax(line, "expected '->' in step header"));
    };
    if right.contains(ARROW) {
        return Err(PoulError::syntax(line, "expected a single '->' in step header"));
    }

    let mut sources = Vec::new();
    let mut dependencies: Vec<Pattern> = Vec::new();

    for item in split_top_level(left, line)? {
        let (source, deps) = match item.split_once('(') {
            Some((source, rest)) => {
                let Some(inner) = rest.trim_end().strip_suffix(')') else {
                    return Err(PoulError::syntax(
                        line,
                        format!("expected ')' after dependencies of '{}'", source.trim()),
                    ));
                };
                (source.trim(), split_list(inner))
            }
            None => (item, Vec::new()),
        };

        if source.is_empty() {
            return Err(PoulError::syntax(line, "expected source pattern"));
        }
        sources.push(compile(source, line)?);

        for dep in deps {
            let pattern = compile(&dep, line)?;
            if !dependencies.iter().any(|d| d.as_str() == pattern.as_str()) {
                dependencies.push(pattern);
            }
        }
    }

    let destinations = right
        .split(',')
        .map(str::trim)
        .map(|d| {
            if d.is_empty() || d.contains(['(', ')']) {
                Err(PoulError::syntax(line, "expected destination pattern"))
            } else {
                compile(d, line)
            }
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Step {
        sources,
        destinations,
        dependencies,
        body,
        line,
    })
}

/// Split on commas that are not inside parentheses.
fn split_top_level(text: &str, line: usize) -> Result<Vec<&str>> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (pos, c) in text.char_indices() {
        match c {
            '(' if depth == 0 => depth = 1,
            '(' => return Err(PoulError::syntax(line, "nested '(' in step header")),
            ')' if depth == 0 => return Err(PoulError::syntax(line, "unbalanced ')' in step header")),
            ')' => depth = 0,
            ',' if depth == 0 => {
                items.push(text[start..pos].trim());
                start = pos + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(PoulError::syntax(line, "unbalanced '(' in step header"));
    }
    items.push(text[start..].trim());
    Ok(items)
}

fn compile(text: &str, line: usize) -> Result<Pattern> {
    Pattern::new(text).map_err(|err| PoulError::syntax(line, err.to_string()))
}
