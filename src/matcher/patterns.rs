//! Per-kind sub-pattern parsing and matching. Most styles reuse
//! [`OptionalCommaList`]; kinds with no dedicated pattern fall back to
//! comparing against [`crate::types::Codec::to_text`].

use crate::{
    matcher::utils::{field_matches_i64, OptionalCommaList},
    types::{level::Level, origin::Origin, product::Product, timerange::Timerange, value::Scalar, Item},
    Result,
};

#[derive(Debug, Clone)]
pub enum SubPattern {
    Origin(OriginPattern),
    Product(ProductPattern),
    Level(LevelPattern),
    Timerange(TimerangePattern),
    ValueBag(ValueBagPattern),
    Quantity(Vec<String>),
    Task(String),
    TextEq(String),
}

impl SubPattern {
    pub fn matches(&self, item: &Item) -> bool {
        match (self, item) {
            (SubPattern::Origin(p), Item::Origin(v)) => p.matches(v),
            (SubPattern::Product(p), Item::Product(v)) => p.matches(v),
            (SubPattern::Level(p), Item::Level(v)) => p.matches(v),
            (SubPattern::Timerange(p), Item::Timerange(v)) => p.matches(v),
            (SubPattern::ValueBag(p), Item::Area(v)) => p.matches(&v.values),
            (SubPattern::ValueBag(p), Item::Proddef(v)) => p.matches(&v.values),
            (SubPattern::ValueBag(p), Item::Ensemble(v)) => p.matches(&v.values),
            (SubPattern::Quantity(names), Item::Quantity(v)) => {
                names.iter().all(|n| v.names.iter().any(|vn| vn == n))
            }
            (SubPattern::Task(name), Item::Task(v)) => &v.name == name,
            (SubPattern::TextEq(text), other) => &other.to_text() == text,
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OriginPattern(OptionalCommaList);

impl OriginPattern {
    pub fn parse(pattern: &str) -> OriginPattern {
        OriginPattern(OptionalCommaList::parse(pattern))
    }

    pub fn matches(&self, origin: &Origin) -> bool {
        let l = &self.0;
        match (l.style.as_str(), origin) {
            ("GRIB1", Origin::Grib1 { centre, subcentre, process }) => {
                field_i64(l, 0, *centre as i64) && field_i64(l, 1, *subcentre as i64) && field_i64(l, 2, *process as i64)
            }
            ("GRIB2", Origin::Grib2 { centre, subcentre, process_type, bg_process, process }) => {
                field_i64(l, 0, *centre as i64)
                    && field_i64(l, 1, *subcentre as i64)
                    && field_i64(l, 2, *process_type as i64)
                    && field_i64(l, 3, *bg_process as i64)
                    && field_i64(l, 4, *process as i64)
            }
            ("BUFR", Origin::Bufr { centre, subcentre }) => {
                field_i64(l, 0, *centre as i64) && field_i64(l, 1, *subcentre as i64)
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProductPattern(OptionalCommaList);

impl ProductPattern {
    pub fn parse(pattern: &str) -> ProductPattern {
        ProductPattern(OptionalCommaList::parse(pattern))
    }

    pub fn matches(&self, product: &Product) -> bool {
        let l = &self.0;
        match (l.style.as_str(), product) {
            ("GRIB1", Product::Grib1 { origin, table, product }) => {
                field_i64(l, 0, *origin as i64) && field_i64(l, 1, *table as i64) && field_i64(l, 2, *product as i64)
            }
            ("GRIB2", Product::Grib2 { centre, discipline, category, number }) => {
                field_i64(l, 0, *centre as i64)
                    && field_i64(l, 1, *discipline as i64)
                    && field_i64(l, 2, *category as i64)
                    && field_i64(l, 3, *number as i64)
            }
            ("BUFR", Product::Bufr { kind_type, subtype, localsubtype }) => {
                field_i64(l, 0, *kind_type as i64) && field_i64(l, 1, *subtype as i64) && field_i64(l, 2, *localsubtype as i64)
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LevelPattern(OptionalCommaList);

impl LevelPattern {
    pub fn parse(pattern: &str) -> LevelPattern {
        LevelPattern(OptionalCommaList::parse(pattern))
    }

    pub fn matches(&self, level: &Level) -> bool {
        let l = &self.0;
        match (l.style.as_str(), level) {
            ("GRIB1", Level::Grib1 { kind_type, l1, l2 }) => {
                field_i64(l, 0, *kind_type as i64) && field_i64(l, 1, *l1 as i64) && field_i64(l, 2, *l2 as i64)
            }
            ("GRIB2S", Level::Grib2S { kind_type, scale, value }) => {
                field_i64(l, 0, *kind_type as i64) && field_i64(l, 1, *scale as i64) && field_i64(l, 2, *value)
            }
            ("GRIB2D", Level::Grib2D { kind_type1, scale1, value1, kind_type2, scale2, value2 }) => {
                field_i64(l, 0, *kind_type1 as i64)
                    && field_i64(l, 1, *scale1 as i64)
                    && field_i64(l, 2, *value1)
                    && field_i64(l, 3, *kind_type2 as i64)
                    && field_i64(l, 4, *scale2 as i64)
                    && field_i64(l, 5, *value2)
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TimerangePattern(OptionalCommaList);

impl TimerangePattern {
    pub fn parse(pattern: &str) -> TimerangePattern {
        TimerangePattern(OptionalCommaList::parse(pattern))
    }

    pub fn matches(&self, tr: &Timerange) -> bool {
        let l = &self.0;
        match (l.style.as_str(), tr) {
            ("GRIB1", Timerange::Grib1 { kind_type, unit, p1, p2 }) => {
                field_i64(l, 0, *kind_type as i64)
                    && field_i64(l, 1, *unit as i64)
                    && field_i64(l, 2, *p1 as i64)
                    && field_i64(l, 3, *p2 as i64)
            }
            ("Timedef", Timerange::Timedef { step_len, stat_type, stat_len, .. }) => {
                field_i64(l, 0, *step_len as i64) && field_i64(l, 1, *stat_type as i64) && field_i64(l, 2, *stat_len as i64)
            }
            _ => false,
        }
    }
}

/// Matches `Area`/`Proddef`/`Ensemble` value bags by a `key=value,...`
/// pattern; every listed key must be present with an equal value
/// (extra keys on the item are ignored).
#[derive(Debug, Clone)]
pub struct ValueBagPattern {
    pub wants: Vec<(String, Scalar)>,
}

impl ValueBagPattern {
    pub fn parse(pattern: &str) -> Result<ValueBagPattern> {
        let mut wants = vec![];
        for part in pattern.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let idx = part.find('=').ok_or_else(|| {
                crate::Error::ParseError("matcher".into(), format!("malformed value-bag term {:?}", part))
            })?;
            let key = part[..idx].trim().to_string();
            let raw = part[idx + 1..].trim();
            let val = match raw.parse::<i64>() {
                Ok(n) => Scalar::Int(n),
                Err(_) => Scalar::Str(raw.to_string()),
            };
            wants.push((key, val));
        }
        Ok(ValueBagPattern { wants })
    }

    pub fn matches(&self, bag: &[(String, Scalar)]) -> bool {
        self.wants
            .iter()
            .all(|(k, v)| bag.iter().any(|(bk, bv)| bk == k && bv == v))
    }
}

fn field_i64(l: &OptionalCommaList, idx: usize, actual: i64) -> bool {
    l.get_int(idx).unwrap_or(None).map_or(true, |p| field_matches_i64(Some(p), actual))
}
