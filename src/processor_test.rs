use super::*;
use crate::dataset::{config::Config, writer::{AcquireMode, Writer}};
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

fn populated_dataset() -> (tempfile::TempDir, Config) {
    let dir = tempfile::tempdir().unwrap();
    let cfg = Config::new("era5", dir.path());
    {
        let mut w = Writer::open(cfg.clone()).unwrap();
        w.acquire(b"payload-one", &item_set(200, 1), AcquireMode::Default).unwrap();
        w.acquire(b"payload-two", &item_set(98, 2), AcquireMode::Default).unwrap();
    }
    (dir, cfg)
}

#[test]
fn metadata_mode_returns_records_without_reading_segments() {
    let (_dir, cfg) = populated_dataset();
    let mut reader = Reader::open(cfg).unwrap();
    let out = Processor::run(&mut reader, &DataQuery::all(), OutputMode::Metadata).unwrap();
    match out {
        ProcessorOutput::Metadata(rows) => assert_eq!(rows.len(), 2),
        _ => panic!("expected metadata output"),
    }
}

#[test]
fn data_mode_returns_payload_bytes() {
    let (_dir, cfg) = populated_dataset();
    let mut reader = Reader::open(cfg).unwrap();
    let out = Processor::run(&mut reader, &DataQuery::all(), OutputMode::Data).unwrap();
    match out {
        ProcessorOutput::Data(rows) => {
            assert_eq!(rows.len(), 2);
            assert!(rows.iter().any(|(_, bytes)| bytes == b"payload-one"));
        }
        _ => panic!("expected data output"),
    }
}

#[test]
fn summary_mode_aggregates_counts_and_sizes() {
    let (_dir, cfg) = populated_dataset();
    let mut reader = Reader::open(cfg).unwrap();
    let out = Processor::run(&mut reader, &DataQuery::all(), OutputMode::Summary).unwrap();
    match out {
        ProcessorOutput::Summary(summary) => assert_eq!(summary.total_count(), 2),
        _ => panic!("expected summary output"),
    }
}

#[test]
fn postproc_mode_pipes_every_record_through_the_hook() {
    let (_dir, cfg) = populated_dataset();
    let mut reader = Reader::open(cfg).unwrap();
    let mut seen = vec![];
    let mut hook = |_: &ItemSet, bytes: &[u8]| {
        seen.push(bytes.to_vec());
        Ok(())
    };
    let out = Processor::run(&mut reader, &DataQuery::all(), OutputMode::Postproc(&mut hook)).unwrap();
    match out {
        ProcessorOutput::Postproc(stats) => assert_eq!(stats.records, 2),
        _ => panic!("expected postproc output"),
    }
    assert_eq!(seen.len(), 2);
}
