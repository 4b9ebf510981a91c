//! Alias expansion: `origin:arpae` looks up the `arpae` alias for the
//! `origin` kind and substitutes its expansion before a sub-pattern is
//! parsed. Expansion happens once per OR-component at parse time, not at
//! match time, so a changed alias database doesn't retroactively change
//! already-parsed matchers.

use std::collections::HashMap;

use crate::types::KindCode;

#[derive(Debug, Clone, Default)]
pub struct AliasDb {
    entries: HashMap<(KindCode, String), String>,
}

impl AliasDb {
    pub fn new() -> AliasDb {
        AliasDb::default()
    }

    pub fn insert(&mut self, kind: KindCode, name: impl Into<String>, expansion: impl Into<String>) {
        self.entries.insert((kind, name.into()), expansion.into());
    }

    /// Parse a `[kind]\nname = expansion` ini-style alias file, the format
    /// the original ships as `match-alias.conf`.
    pub fn parse(text: &str) -> AliasDb {
        let mut db = AliasDb::new();
        let mut current: Option<KindCode> = None;
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if line.starts_with('[') && line.ends_with(']') {
                current = KindCode::from_name(&line[1..line.len() - 1].to_lowercase()).ok();
                continue;
            }
            if let (Some(kind), Some(idx)) = (current, line.find('=')) {
                let name = line[..idx].trim();
                let expansion = line[idx + 1..].trim();
                db.insert(kind, name, expansion);
            }
        }
        db
    }

    /// Expand `pattern` once if it names an alias for `kind`, else return
    /// it unchanged.
    pub fn expand<'a>(&'a self, kind: KindCode, pattern: &'a str) -> &'a str {
        match self.entries.get(&(kind, pattern.trim().to_string())) {
            Some(expansion) => expansion,
            None => pattern,
        }
    }
}

#[cfg(test)]
#[path = "alias_test.rs"]
mod alias_test;
