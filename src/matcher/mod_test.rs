use super::*;
use crate::types::{level::Level, origin::Origin, product::Product, reftime::Reftime, timerange::Timerange};
use chrono::NaiveDate;

fn dt(y: i32, m: u32, d: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
}

fn sample() -> ItemSet {
    let mut set = ItemSet::new();
    set.set(Item::Origin(Origin::Grib1 { centre: 200, subcentre: 0, process: 1 }));
    set.set(Item::Product(Product::Grib1 { origin: 200, table: 2, product: 11 }));
    set.set(Item::Level(Level::Grib1 { kind_type: 1, l1: 0, l2: 0 }));
    set.set(Item::Timerange(Timerange::Timedef {
        step_len: 0,
        step_unit: 1,
        stat_type: 254,
        stat_len: 0,
        stat_unit: 1,
    }));
    set.set(Item::Reftime(Reftime::Position(dt(2021, 6, 15))));
    set
}

#[test]
fn origin_or_alternative_matches_either_value() {
    let aliases = AliasDb::new();
    let m = Matcher::parse("origin:GRIB1,200 or GRIB1,98", &aliases).unwrap();
    assert!(m.matches(&sample()));

    let m2 = Matcher::parse("origin:GRIB1,97 or GRIB1,98", &aliases).unwrap();
    assert!(!m2.matches(&sample()));
}

#[test]
fn and_across_clauses_requires_all_kinds() {
    let aliases = AliasDb::new();
    let m = Matcher::parse("origin:GRIB1,200;level:GRIB1,1", &aliases).unwrap();
    assert!(m.matches(&sample()));

    let m2 = Matcher::parse("origin:GRIB1,200;level:GRIB1,2", &aliases).unwrap();
    assert!(!m2.matches(&sample()));
}

#[test]
fn timedef_matches_by_stat_type() {
    let aliases = AliasDb::new();
    let m = Matcher::parse("timerange:Timedef,,254", &aliases).unwrap();
    assert!(m.matches(&sample()));
}

#[test]
fn reftime_clause_restricts_by_range() {
    let aliases = AliasDb::new();
    let m = Matcher::parse("reftime:2021-06-01 to 2021-06-30", &aliases).unwrap();
    assert!(m.matches(&sample()));

    let m2 = Matcher::parse("reftime:2021-07-01 to 2021-07-31", &aliases).unwrap();
    assert!(!m2.matches(&sample()));
}

#[test]
fn alias_expands_before_parsing() {
    let mut aliases = AliasDb::new();
    aliases.insert(KindCode::Origin, "myorigin", "GRIB1,200");
    let m = Matcher::parse("origin:myorigin", &aliases).unwrap();
    assert!(m.matches(&sample()));
}

#[test]
fn missing_kind_fails_the_clause() {
    let aliases = AliasDb::new();
    let m = Matcher::parse("area:lat=45", &aliases).unwrap();
    assert!(!m.matches(&sample()));
}
