use super::*;
use chrono::NaiveDate;

fn dt(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
}

#[test]
fn current_when_younger_than_either_threshold() {
    let got = classify_age(dt(2021, 1, 1), dt(2021, 1, 10), Some(90), Some(365));
    assert_eq!(got, AgeClass::Current);
}

#[test]
fn archive_when_older_than_archive_age() {
    let got = classify_age(dt(2020, 1, 1), dt(2021, 1, 1), Some(90), Some(365));
    assert_eq!(got, AgeClass::Archive);
}

#[test]
fn delete_takes_priority_over_archive() {
    let got = classify_age(dt(2018, 1, 1), dt(2021, 1, 1), Some(90), Some(365));
    assert_eq!(got, AgeClass::Delete);
}

#[test]
fn age_is_measured_from_the_period_end() {
    use crate::types::Reftime;
    let period = Reftime::Period(dt(2018, 1, 1), dt(2020, 6, 1));
    let got = classify_age(period.age_instant(), dt(2021, 1, 1), Some(90), Some(365));
    assert_eq!(got, AgeClass::Current, "end is recent even though begin is ancient");
}
