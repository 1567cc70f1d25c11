//! Identifier Sanitizing
//!
//! Asset names and screen names end up as C++ identifiers (`PROGMEM` array
//! names, `draw_<screen>` routines, `/data/<asset>.jpg` paths). Both go
//! through the same rules:
//! - every run of characters outside `[A-Za-z0-9_]` becomes one `_`
//! - trailing underscores are dropped; a leading `_` is kept
//! - a leading digit gets an `a` prefix
//! - collisions are resolved with `_1`, `_2`, ... suffixes

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

fn invalid_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new("[^a-zA-Z0-9_]+").expect("static pattern"))
}

/// Turn an arbitrary label into a valid identifier.
///
/// `fallback` is used when nothing identifier-worthy is left.
pub fn sanitize_identifier(raw: &str, fallback: &str) -> String {
    let replaced = invalid_run().replace_all(raw, "_");
    let trimmed = replaced.trim_end_matches('_');

    let base = if trimmed.is_empty() { fallback } else { trimmed };

    match base.chars().next() {
        Some(c) if c.is_ascii_digit() => format!("a{}", base),
        _ => base.to_string(),
    }
}

/// First of `base`, `base_1`, `base_2`, ... for which `taken` is false
pub fn unique_name(base: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(base) {
        return base.to_string();
    }
    let mut counter = 1;
    loop {
        let candidate = format!("{}_{}", base, counter);
        if !taken(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// Hands out unique identifiers in call order.
///
/// Used by the emitter so two screens named "Home" still produce two
/// distinct, compilable routines. The result depends only on the order of
/// calls, which keeps generation deterministic.
#[derive(Debug, Default)]
pub struct IdentifierPool {
    used: HashSet<String>,
    fallback: &'static str,
}

impl IdentifierPool {
    pub fn new(fallback: &'static str) -> Self {
        Self {
            used: HashSet::new(),
            fallback,
        }
    }

    pub fn claim(&mut self, raw: &str) -> String {
        let base = sanitize_identifier(raw, self.fallback);
        let name = unique_name(&base, |candidate| self.used.contains(candidate));
        self.used.insert(name.clone());
        name
    }
}

/// Escape text for use inside a C string literal
pub fn c_string_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}
