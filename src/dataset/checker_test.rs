use super::*;
use crate::dataset::writer::{AcquireMode, Writer};
use crate::types::{origin::Origin, product::Product, Item, Reftime};
use chrono::NaiveDate;

fn dt(y: i32, m: u32, d: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
}

fn item_set(centre: u8, day: u32) -> ItemSet {
    let mut set = ItemSet::new();
    set.set(Item::Origin(Origin::Grib1 { centre, subcentre: 0, process: 1 }));
    set.set(Item::Product(Product::Grib1 { origin: centre, table: 2, product: 11 }));
    set.set(Item::Reftime(Reftime::Position(dt(2021, 1, day))));
    set
}

#[test]
fn check_reports_no_issues_on_a_freshly_written_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = Config::new("era5", dir.path());
    {
        let mut w = Writer::open(cfg.clone()).unwrap();
        w.acquire(b"payload-one", &item_set(200, 1), AcquireMode::Default).unwrap();
        w.acquire(b"payload-two", &item_set(98, 2), AcquireMode::Default).unwrap();
    }

    let checker = Checker::open(cfg).unwrap();
    let issues = checker.check().unwrap();
    assert!(issues.is_empty(), "unexpected issues: {:?}", issues);
}

#[test]
fn check_flags_a_segment_missing_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = Config::new("era5", dir.path());
    {
        let mut w = Writer::open(cfg.clone()).unwrap();
        w.acquire(b"payload-one", &item_set(200, 1), AcquireMode::Default).unwrap();
    }
    std::fs::remove_file(dir.path().join("2021/01-01.concat")).unwrap();

    let checker = Checker::open(cfg).unwrap();
    let issues = checker.check().unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].state, State::Missing);
}

#[test]
fn repack_drops_index_rows_for_a_segment_missing_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = Config::new("era5", dir.path());
    {
        let mut w = Writer::open(cfg.clone()).unwrap();
        w.acquire(b"payload-one", &item_set(200, 1), AcquireMode::Default).unwrap();
        w.acquire(b"payload-two", &item_set(98, 1), AcquireMode::Default).unwrap();
    }
    std::fs::remove_file(dir.path().join("2021/01-01.concat")).unwrap();

    let mut checker = Checker::open(cfg.clone()).unwrap();
    let report = checker.repack("2021/01-01.concat").unwrap();
    assert_eq!(report.bytes_reclaimed, 0);
    assert_eq!(report.rows_removed, 2);

    let checker = Checker::open(cfg).unwrap();
    let issues = checker.check().unwrap();
    assert!(issues.is_empty(), "unexpected issues: {:?}", issues);
}

#[test]
fn repack_keeps_the_surviving_entry_readable() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = Config::new("era5", dir.path());
    {
        let mut w = Writer::open(cfg.clone()).unwrap();
        w.acquire(b"first", &item_set(200, 1), AcquireMode::Default).unwrap();
        w.acquire(b"second-payload", &item_set(200, 1), AcquireMode::ReplaceAlways).unwrap();
    }

    let mut checker = Checker::open(cfg.clone()).unwrap();
    let report = checker.repack("2021/01-01.concat").unwrap();
    assert!(report.bytes_reclaimed > 0, "expected the replaced payload's bytes to be reclaimed");

    let mut r = crate::dataset::reader::Reader::open(cfg).unwrap();
    let got = r.query(&crate::index::DataQuery::all()).unwrap();
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].1, b"second-payload");
}
