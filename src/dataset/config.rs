//! Dataset configuration: a `key = value` text format (§4.8), one dataset
//! per stanza in the real deployment but parsed here one dataset at a time
//! the way `robt::config::Config` builds up from explicit setters.

use std::{collections::HashMap, path::PathBuf};

use crate::{
    err_at,
    matcher::{alias::AliasDb, Matcher},
    segment::Flavour,
    types::KindCode,
    Result,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexFlavour {
    Ondisk2,
    Simple,
}

/// How a reftime maps to a segment name (§3, §6). `Singlefile` is the
/// degenerate case: one message per segment file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Yearly,
    Monthly,
    Biweekly,
    Weekly,
    Daily,
    Singlefile,
}

impl Step {
    pub fn from_name(name: &str) -> Result<Step> {
        Ok(match name {
            "yearly" => Step::Yearly,
            "monthly" => Step::Monthly,
            "biweekly" => Step::Biweekly,
            "weekly" => Step::Weekly,
            "daily" => Step::Daily,
            "singlefile" => Step::Singlefile,
            other => return err_at!(ParseError, msg: "unknown step {:?}", other),
        })
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub name: String,
    pub path: PathBuf,
    pub segment_flavour: Flavour,
    pub index_flavour: IndexFlavour,
    pub step: Step,
    /// Kinds given their own column (and `sub_<kind>` attribute table) in
    /// the sqlite index, for pushdown and uniqueness (§6). `unique` is
    /// always a subset.
    pub index: Vec<KindCode>,
    pub unique: Vec<KindCode>,
    pub filter: Option<String>,
    pub archive_age_days: Option<i64>,
    pub delete_age_days: Option<i64>,
    pub force_sqlite: bool,
}

impl Config {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Config {
        let unique = vec![KindCode::Origin, KindCode::Product, KindCode::Level, KindCode::Timerange, KindCode::Reftime];
        Config {
            name: name.into(),
            path: path.into(),
            segment_flavour: Flavour::Concat,
            index_flavour: IndexFlavour::Ondisk2,
            step: Step::Daily,
            index: unique.clone(),
            unique,
            filter: None,
            archive_age_days: None,
            delete_age_days: None,
            force_sqlite: false,
        }
    }

    pub fn set_segment_flavour(mut self, flavour: Flavour) -> Config {
        self.segment_flavour = flavour;
        self
    }

    pub fn set_index_flavour(mut self, flavour: IndexFlavour) -> Config {
        self.index_flavour = flavour;
        self
    }

    pub fn set_step(mut self, step: Step) -> Config {
        self.step = step;
        self
    }

    pub fn set_index(mut self, kinds: Vec<KindCode>) -> Config {
        self.index = kinds;
        self
    }

    pub fn set_unique(mut self, kinds: Vec<KindCode>) -> Config {
        self.unique = kinds;
        self
    }

    pub fn set_filter(mut self, filter: impl Into<String>) -> Config {
        self.filter = Some(filter.into());
        self
    }

    pub fn set_archive_age_days(mut self, days: i64) -> Config {
        self.archive_age_days = Some(days);
        self
    }

    pub fn set_delete_age_days(mut self, days: i64) -> Config {
        self.delete_age_days = Some(days);
        self
    }

    pub fn set_force_sqlite(mut self, force: bool) -> Config {
        self.force_sqlite = force;
        self
    }

    pub fn matcher(&self, aliases: &AliasDb) -> Result<Option<Matcher>> {
        match &self.filter {
            Some(text) => Ok(Some(Matcher::parse(text, aliases)?)),
            None => Ok(None),
        }
    }

    /// Parse a `key = value`-per-line stanza (the on-disk `config` file
    /// format, §4.8).
    pub fn parse(name: &str, path: impl Into<PathBuf>, text: &str) -> Result<Config> {
        let mut fields = HashMap::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let idx = line
                .find('=')
                .ok_or_else(|| crate::Error::ParseError("dataset config".into(), format!("malformed line {:?}", line)))?;
            fields.insert(line[..idx].trim().to_string(), line[idx + 1..].trim().to_string());
        }

        let mut cfg = Config::new(name, path);
        if let Some(v) = fields.get("segment") {
            cfg.segment_flavour = Flavour::from_name(v)
                .ok_or_else(|| crate::Error::ParseError("dataset config".into(), format!("unknown segment flavour {:?}", v)))?;
        }
        if let Some(v) = fields.get("type") {
            cfg.index_flavour = match v.as_str() {
                "ondisk2" | "iseg" => IndexFlavour::Ondisk2,
                "simple" | "manifest" => IndexFlavour::Simple,
                other => return err_at!(ParseError, msg: "unknown dataset type {:?}", other),
            };
        }
        if let Some(v) = fields.get("step") {
            cfg.step = Step::from_name(v.trim())?;
        }
        if let Some(v) = fields.get("index") {
            let mut kinds = vec![];
            for name in v.split(',') {
                kinds.push(KindCode::from_name(name.trim())?);
            }
            cfg.index = kinds;
        }
        if let Some(v) = fields.get("unique") {
            let mut kinds = vec![];
            for name in v.split(',') {
                kinds.push(KindCode::from_name(name.trim())?);
            }
            cfg.unique = kinds;
        }
        // the unique columns must exist to be part of the index's UNIQUE
        // constraint, so fold them into `index` regardless of how each was set
        for kind in &cfg.unique {
            if !cfg.index.contains(kind) {
                cfg.index.push(*kind);
            }
        }
        if let Some(v) = fields.get("filter") {
            cfg.filter = Some(v.clone());
        }
        if let Some(v) = fields.get("archive_age") {
            cfg.archive_age_days = Some(err_at!(ParseError, v.parse::<i64>())?);
        }
        if let Some(v) = fields.get("delete_age") {
            cfg.delete_age_days = Some(err_at!(ParseError, v.parse::<i64>())?);
        }
        if let Some(v) = fields.get("force_sqlite") {
            cfg.force_sqlite = v == "true" || v == "1" || v == "yes";
        }
        Ok(cfg)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
