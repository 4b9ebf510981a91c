//! The matcher expression language used to route and query messages
//! (§4.2): an AND of per-kind clauses, each an OR of style-specific
//! sub-patterns, with alias expansion at parse time.

pub mod alias;
pub mod patterns;
pub mod reftime_pattern;
pub mod utils;

use crate::{
    err_at,
    matcher::{
        alias::AliasDb,
        patterns::{LevelPattern, OriginPattern, ProductPattern, SubPattern, TimerangePattern, ValueBagPattern},
        reftime_pattern::ReftimePattern,
        utils::{split_and, split_clause, split_or},
    },
    types::{Item, ItemSet, KindCode},
    Result,
};

#[derive(Debug, Clone)]
struct Clause {
    kind: KindCode,
    alternatives: Vec<SubPattern>,
    reftime: Vec<ReftimePattern>,
}

/// A parsed matcher, ready to test `ItemSet`s (§4.2's core operation).
#[derive(Debug, Clone)]
pub struct Matcher {
    clauses: Vec<Clause>,
    /// The unparsed source text, kept for round-tripping through
    /// configuration files and error messages.
    source: String,
}

impl Matcher {
    /// Parses `expr` (semicolon/newline-separated `kind:pattern` clauses,
    /// each pattern possibly `alt1 or alt2 or ...`), expanding aliases from
    /// `aliases` per OR-component.
    pub fn parse(expr: &str, aliases: &AliasDb) -> Result<Matcher> {
        let mut clauses = vec![];
        for raw_clause in split_and(expr) {
            let (kind_name, pattern) = split_clause(raw_clause)?;
            let kind = KindCode::from_name(&kind_name.to_lowercase())?;
            let mut alternatives = vec![];
            let mut reftime = vec![];
            for alt in split_or(pattern) {
                let expanded = aliases.expand(kind, alt);
                if kind == KindCode::Reftime {
                    reftime.push(ReftimePattern::parse(expanded)?);
                } else {
                    alternatives.push(parse_subpattern(kind, expanded)?);
                }
            }
            clauses.push(Clause { kind, alternatives, reftime });
        }
        Ok(Matcher { clauses, source: expr.to_string() })
    }

    /// True if every clause has at least one matching alternative (AND of
    /// ORs).
    pub fn matches(&self, set: &ItemSet) -> bool {
        self.clauses.iter().all(|clause| {
            if clause.kind == KindCode::Reftime {
                match set.get(KindCode::Reftime) {
                    Some(Item::Reftime(rt)) => clause.reftime.iter().any(|p| p.matches(rt)),
                    _ => false,
                }
            } else {
                match set.get(clause.kind) {
                    Some(item) => clause.alternatives.iter().any(|p| p.matches(item)),
                    None => false,
                }
            }
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Render the reftime restriction (if any) as a SQL fragment, used by
    /// the sqlite-backed index to push the reftime range into the query.
    pub fn reftime_sql(&self, column: &str) -> Option<String> {
        let clause = self.clauses.iter().find(|c| c.kind == KindCode::Reftime)?;
        let parts: Vec<String> = clause.reftime.iter().map(|p| p.to_sql(column)).collect();
        Some(format!("({})", parts.join(" OR ")))
    }
}

fn parse_subpattern(kind: KindCode, pattern: &str) -> Result<SubPattern> {
    Ok(match kind {
        KindCode::Origin => SubPattern::Origin(OriginPattern::parse(pattern)),
        KindCode::Product => SubPattern::Product(ProductPattern::parse(pattern)),
        KindCode::Level => SubPattern::Level(LevelPattern::parse(pattern)),
        KindCode::Timerange => SubPattern::Timerange(TimerangePattern::parse(pattern)),
        KindCode::Area | KindCode::Proddef | KindCode::Ensemble => SubPattern::ValueBag(ValueBagPattern::parse(pattern)?),
        KindCode::Quantity => SubPattern::Quantity(pattern.split(',').map(|s| s.trim().to_string()).collect()),
        KindCode::Task => SubPattern::Task(pattern.to_string()),
        KindCode::Reftime => return err_at!(Fatal, msg: "reftime handled separately"),
        _ => SubPattern::TextEq(pattern.to_string()),
    })
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
