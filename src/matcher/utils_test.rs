use super::*;

#[test]
fn split_and_handles_semicolons_and_newlines() {
    let got = split_and("origin:GRIB1,200;product:GRIB1,2,11\nlevel:GRIB1,100");
    assert_eq!(got, vec!["origin:GRIB1,200", "product:GRIB1,2,11", "level:GRIB1,100"]);
}

#[test]
fn split_clause_splits_on_first_colon_only() {
    let (kind, pattern) = split_clause("reftime:>=2021-01-01T00:00:00").unwrap();
    assert_eq!(kind, "reftime");
    assert_eq!(pattern, ">=2021-01-01T00:00:00");
}

#[test]
fn split_clause_rejects_missing_colon() {
    assert!(split_clause("origin GRIB1").is_err());
}

#[test]
fn split_or_is_case_insensitive() {
    let got = split_or("GRIB1,200 Or GRIB1,98 OR GRIB1,80");
    assert_eq!(got, vec!["GRIB1,200", "GRIB1,98", "GRIB1,80"]);
}

#[test]
fn optional_comma_list_leaves_gaps_as_none() {
    let l = OptionalCommaList::parse("GRIB1,200,,1");
    assert_eq!(l.style, "GRIB1");
    assert_eq!(l.get_int(0).unwrap(), Some(200));
    assert_eq!(l.get_int(1).unwrap(), None);
    assert_eq!(l.get_int(2).unwrap(), Some(1));
}
