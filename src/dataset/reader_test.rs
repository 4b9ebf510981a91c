use super::*;
use crate::dataset::writer::{AcquireMode, Writer};
use crate::matcher::{alias::AliasDb, Matcher};
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
fn query_reads_back_payload_bytes() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut w = Writer::open(Config::new("era5", dir.path())).unwrap();
        w.acquire(b"payload-one", &item_set(200, 1), AcquireMode::Default).unwrap();
        w.acquire(b"payload-two", &item_set(98, 2), AcquireMode::Default).unwrap();
    }

    let mut r = Reader::open(Config::new("era5", dir.path())).unwrap();
    let got = r.query(&DataQuery::all()).unwrap();
    assert_eq!(got.len(), 2);
    assert!(got.iter().any(|(_, bytes)| bytes == b"payload-one"));
    assert!(got.iter().any(|(_, bytes)| bytes == b"payload-two"));
}

#[test]
fn query_summary_rolls_up_every_matching_message() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut w = Writer::open(Config::new("era5", dir.path())).unwrap();
        w.acquire(b"payload-one", &item_set(200, 1), AcquireMode::Default).unwrap();
        w.acquire(b"payload-two", &item_set(98, 2), AcquireMode::Default).unwrap();
        w.acquire(b"payload-three", &item_set(200, 3), AcquireMode::Default).unwrap();
    }

    let mut r = Reader::open(Config::new("era5", dir.path())).unwrap();
    let summary = r.query_summary(None).unwrap();
    assert_eq!(summary.total_count(), 3);

    // Cache hit the second time: same total, no rebuild needed.
    let again = r.query_summary(None).unwrap();
    assert_eq!(again.total_count(), 3);

    let m = Matcher::parse("origin:GRIB1,200", &AliasDb::new()).unwrap();
    let restricted = r.query_summary(Some(&m)).unwrap();
    assert_eq!(restricted.total_count(), 2);
}

#[test]
fn query_applies_the_matcher() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut w = Writer::open(Config::new("era5", dir.path())).unwrap();
        w.acquire(b"payload-one", &item_set(200, 1), AcquireMode::Default).unwrap();
        w.acquire(b"payload-two", &item_set(98, 2), AcquireMode::Default).unwrap();
    }

    let mut r = Reader::open(Config::new("era5", dir.path())).unwrap();
    let m = Matcher::parse("origin:GRIB1,200", &AliasDb::new()).unwrap();
    let got = r.query(&DataQuery::matching(m)).unwrap();
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].1, b"payload-one");
}
