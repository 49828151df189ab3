//! Pattern compiler: turns match-pattern strings into executable matchers.
//!
//! Four pattern shapes are recognized, checked in this order:
//! 1. Raw expressions (starting with `execution` or `within`) are kept
//!    verbatim and evaluated by the built-in expression engine.
//! 2. Package patterns (ending in `.*`) match every method of every type in
//!    the package and all subpackages.
//! 3. Method patterns (at least two dots, lowercase-leading final segment)
//!    match one named method on one named type.
//! 4. Everything else is a class pattern matching every method of one type.
//!
//! The heuristic intentionally never treats an uppercase-leading final
//! segment as a method name; configuration authors who need that use a raw
//! expression instead.

use std::fmt;

use calltrace_core::CallRef;

/// Markers that identify a raw matcher expression.
const EXPRESSION_MARKERS: [&str; 2] = ["execution", "within"];

/// Compiled, evaluable form of a match pattern.
///
/// Produced once by [`compile`]; matching is a tag dispatch plus string
/// comparison, with no re-parsing on the hot path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    /// Raw expression, evaluated by the expression engine.
    Expression(ExpressionMatcher),
    /// Every method of every type in the package and its subpackages.
    Package { package: String },
    /// A single named method on a single named type.
    Method { type_name: String, method: String },
    /// Every method of one named type.
    Class { type_name: String },
}

impl Matcher {
    /// Whether this matcher accepts the given call identity.
    pub fn matches(&self, call: &CallRef<'_>) -> bool {
        match self {
            Matcher::Expression(expr) => expr.matches(call),
            // The named scope itself, or any type below it: the call's
            // qualified name must continue past `package` with a `.`.
            Matcher::Package { package } => match call.type_name.strip_prefix(package.as_str()) {
                Some("") => true,
                Some(rest) => rest.starts_with('.'),
                None => false,
            },
            Matcher::Method { type_name, method } => {
                call.type_name == type_name && call.method == method
            }
            Matcher::Class { type_name } => call.type_name == type_name,
        }
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Expression(expr) => write!(f, "expression {}", expr.raw()),
            Matcher::Package { package } => write!(f, "package {package}.*"),
            Matcher::Method { type_name, method } => write!(f, "method {type_name}.{method}"),
            Matcher::Class { type_name } => write!(f, "class {type_name}"),
        }
    }
}

/// Compile a match pattern into a [`Matcher`].
///
/// Total for non-empty input: anything the heuristics don't claim falls back
/// to a class pattern. Behavior for empty/blank input is unspecified; the
/// registry filters those out before compiling.
pub fn compile(pattern: &str) -> Matcher {
    if EXPRESSION_MARKERS.iter().any(|m| pattern.starts_with(m)) {
        return Matcher::Expression(ExpressionMatcher::parse(pattern));
    }

    if let Some(stripped) = pattern.strip_suffix(".*") {
        return Matcher::Package {
            package: stripped.to_string(),
        };
    }

    if let Some((type_name, method)) = split_method_pattern(pattern) {
        return Matcher::Method {
            type_name: type_name.to_string(),
            method: method.to_string(),
        };
    }

    Matcher::Class {
        type_name: pattern.to_string(),
    }
}

/// Method-pattern heuristic: the final segment is non-empty, starts with a
/// lowercase letter, and the pattern contains at least two dots overall.
/// A dot in first or last position disqualifies the pattern outright.
fn split_method_pattern(pattern: &str) -> Option<(&str, &str)> {
    let last_dot = pattern.rfind('.')?;
    if last_dot == 0 || last_dot == pattern.len() - 1 {
        return None;
    }

    let tail = &pattern[last_dot + 1..];
    let first = tail.chars().next()?;
    if first.is_lowercase() && pattern.matches('.').count() >= 2 {
        Some((&pattern[..last_dot], tail))
    } else {
        None
    }
}

// ── Expression engine ───────────────────────────────────────────────

/// Evaluable form of a raw matcher expression.
///
/// Two bodies are understood: `execution(* <name-pattern>(..))`, matched
/// against the call's qualified `type.method` name, and
/// `within(<type-pattern>)`, matched against the type name only. Name
/// patterns are dot-separated segments where `*` matches any run of
/// characters within a segment and `..` matches any number of intermediate
/// segments. An unparseable body yields a matcher that accepts nothing;
/// compilation itself never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionMatcher {
    raw: String,
    kind: ExpressionKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ExpressionKind {
    /// Match the qualified `type.method` name.
    Execution { name_pattern: Vec<String> },
    /// Match the declaring type name only.
    Within { type_pattern: Vec<String> },
    /// Unrecognized body; matches nothing.
    Opaque,
}

impl ExpressionMatcher {
    fn parse(raw: &str) -> Self {
        let kind = Self::parse_kind(raw).unwrap_or(ExpressionKind::Opaque);
        Self {
            raw: raw.to_string(),
            kind,
        }
    }

    fn parse_kind(raw: &str) -> Option<ExpressionKind> {
        if let Some(body) = raw
            .strip_prefix("execution(")
            .and_then(|r| r.strip_suffix(')'))
        {
            // Body shape: `<return-pattern> <name-pattern>(<params>)`.
            // Parameter patterns are not evaluated; every call carries
            // whatever arguments it carries.
            let name_end = body.find('(')?;
            let name = body[..name_end].split_whitespace().last()?;
            Some(ExpressionKind::Execution {
                name_pattern: split_pattern_segments(name),
            })
        } else if let Some(body) = raw.strip_prefix("within(").and_then(|r| r.strip_suffix(')')) {
            let body = body.trim();
            if body.is_empty() {
                return None;
            }
            Some(ExpressionKind::Within {
                type_pattern: split_pattern_segments(body),
            })
        } else {
            None
        }
    }

    /// The expression text exactly as configured.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    fn matches(&self, call: &CallRef<'_>) -> bool {
        match &self.kind {
            ExpressionKind::Execution { name_pattern } => {
                let mut segments: Vec<&str> = call.type_name.split('.').collect();
                segments.push(call.method);
                match_segments(name_pattern, &segments)
            }
            ExpressionKind::Within { type_pattern } => {
                let segments: Vec<&str> = call.type_name.split('.').collect();
                match_segments(type_pattern, &segments)
            }
            ExpressionKind::Opaque => false,
        }
    }
}

/// Split a dotted name pattern into segments; `..` shows up as an empty
/// segment between its neighbors.
fn split_pattern_segments(pattern: &str) -> Vec<String> {
    pattern.split('.').map(str::to_string).collect()
}

/// Match pattern segments against name segments. An empty pattern segment
/// (from `..`) absorbs zero or more name segments.
fn match_segments(pattern: &[String], segments: &[&str]) -> bool {
    let Some((first, rest)) = pattern.split_first() else {
        return segments.is_empty();
    };

    if first.is_empty() {
        (0..=segments.len()).any(|skip| match_segments(rest, &segments[skip..]))
    } else {
        match segments.split_first() {
            Some((segment, remaining)) if segment_matches(first, segment) => {
                match_segments(rest, remaining)
            }
            _ => false,
        }
    }
}

/// Glob-style match of one name segment: `*` matches any run of characters.
fn segment_matches(pattern: &str, segment: &str) -> bool {
    if !pattern.contains('*') {
        return pattern == segment;
    }

    let pieces: Vec<&str> = pattern.split('*').collect();
    let mut rest = segment;
    for (i, piece) in pieces.iter().enumerate() {
        if piece.is_empty() {
            continue;
        }
        if i == 0 {
            match rest.strip_prefix(piece) {
                Some(r) => rest = r,
                None => return false,
            }
        } else if i == pieces.len() - 1 {
            return rest.ends_with(piece);
        } else {
            match rest.find(piece) {
                Some(idx) => rest = &rest[idx + piece.len()..],
                None => return false,
            }
        }
    }
    true
}
