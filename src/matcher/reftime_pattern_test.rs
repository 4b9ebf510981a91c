use super::*;
use chrono::NaiveDate;

fn dt(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
}

#[test]
fn ge_matches_instants_on_or_after() {
    let p = ReftimePattern::parse(">=2021-01-15").unwrap();
    assert!(p.matches(&Reftime::Position(dt(2021, 1, 15))));
    assert!(p.matches(&Reftime::Position(dt(2021, 2, 1))));
    assert!(!p.matches(&Reftime::Position(dt(2021, 1, 14))));
}

#[test]
fn range_matches_overlapping_periods() {
    let p = ReftimePattern::parse("2021-01-01 to 2021-01-31").unwrap();
    assert!(p.matches(&Reftime::Period(dt(2020, 12, 25), dt(2021, 1, 2))));
    assert!(!p.matches(&Reftime::Period(dt(2021, 2, 1), dt(2021, 2, 28))));
}

#[test]
fn to_sql_renders_both_bounds() {
    let p = ReftimePattern::parse("2021-01-01 to 2021-01-31").unwrap();
    let sql = p.to_sql("reftime");
    assert!(sql.contains(">="));
    assert!(sql.contains("<="));
}
