//! End-to-end scenarios exercising scan → dispatch → acquire → query →
//! maintain across the whole dataset stack, following the scenario shapes
//! laid out for this system's testable properties: three synthetic
//! "messages" acquired into a daily dataset, duplicate detection on a
//! second pass, a missing-segment check/repack cycle, and an ambiguous
//! overlap that must abort rather than guess.

use chrono::NaiveDate;
use metarc::dataset::{
    checker::Checker,
    config::Config,
    reader::Reader,
    state::State,
    writer::{AcquireMode, AcquireOutcome, Writer},
};
use metarc::index::DataQuery;
use metarc::matcher::{alias::AliasDb, Matcher};
use metarc::scanner::{ScannedMessage, Scanner, SliceScanner};
use metarc::types::{origin::Origin, product::Product, Item, ItemSet, Reftime};

fn dt(y: i32, m: u32, d: u32, h: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
}

fn grib1(centre: u8, reftime: chrono::NaiveDateTime) -> ItemSet {
    let mut set = ItemSet::new();
    set.set(Item::Origin(Origin::Grib1 { centre, subcentre: 0, process: 1 }));
    set.set(Item::Product(Product::Grib1 { origin: centre, table: 2, product: 11 }));
    set.set(Item::Reftime(Reftime::Position(reftime)));
    set
}

/// (a) scan three synthetic messages out of a `Scanner`.
#[test]
fn scan_yields_three_messages_with_distinct_reftimes() {
    let messages = vec![
        ScannedMessage { payload: vec![1; 7218], metadata: grib1(200, dt(2007, 7, 8, 13)) },
        ScannedMessage { payload: vec![2; 34960], metadata: grib1(200, dt(2007, 7, 7, 0)) },
        ScannedMessage { payload: vec![3; 2234], metadata: grib1(200, dt(2007, 10, 9, 0)) },
    ];
    let mut scanner = SliceScanner::new(messages);

    let mut seen = vec![];
    while let Some(m) = scanner.next_message().unwrap() {
        seen.push(m);
    }
    assert_eq!(seen.len(), 3);
    assert_eq!(seen[0].payload.len(), 7218);
    assert_eq!(seen[1].payload.len(), 34960);
    assert_eq!(seen[2].payload.len(), 2234);
}

/// (b) acquiring the three messages produces one segment per calendar day
/// (the dataset's default `step`, per the "reftime picks the segment"
/// rule) and a query restricted by reftime returns exactly one record
/// whose bytes match the original payload.
#[test]
fn acquire_three_messages_then_query_one_back_by_reftime() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = Config::new("euro", dir.path()).set_filter("origin:GRIB1,200");

    let first_payload = vec![1u8; 7218];
    {
        let mut w = Writer::open(cfg.clone()).unwrap();
        assert_eq!(w.acquire(&first_payload, &grib1(200, dt(2007, 7, 8, 13)), AcquireMode::Default).unwrap(), AcquireOutcome::Ok);
        assert_eq!(w.acquire(&[2u8; 34960], &grib1(200, dt(2007, 7, 7, 0)), AcquireMode::Default).unwrap(), AcquireOutcome::Ok);
        assert_eq!(w.acquire(&[3u8; 2234], &grib1(200, dt(2007, 10, 9, 0)), AcquireMode::Default).unwrap(), AcquireOutcome::Ok);
    }

    assert!(dir.path().join("2007/07-08.concat").exists());
    assert!(dir.path().join("2007/07-07.concat").exists());
    assert!(dir.path().join("2007/10-09.concat").exists());

    let mut r = Reader::open(cfg).unwrap();
    let matcher = Matcher::parse("reftime:=2007-07-08T13:00:00", &AliasDb::new()).unwrap();
    let got = r.query(&DataQuery::matching(matcher)).unwrap();
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].1, first_payload);
}

/// (c) acquiring the same three messages again under `DEFAULT` mode
/// reports all three as duplicates and appends no new bytes.
#[test]
fn reacquiring_identical_messages_reports_duplicates_without_new_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = Config::new("euro", dir.path());
    let mut w = Writer::open(cfg).unwrap();

    let messages =
        [grib1(200, dt(2007, 7, 8, 13)), grib1(200, dt(2007, 7, 7, 0)), grib1(200, dt(2007, 10, 9, 0))];
    for (i, set) in messages.iter().enumerate() {
        let payload = vec![i as u8; 100];
        assert_eq!(w.acquire(&payload, set, AcquireMode::Default).unwrap(), AcquireOutcome::Ok);
    }

    let size_before = std::fs::metadata(w.path().join("2007/07-08.concat")).unwrap().len();

    for (i, set) in messages.iter().enumerate() {
        let payload = vec![i as u8; 100];
        assert_eq!(w.acquire(&payload, set, AcquireMode::Default).unwrap(), AcquireOutcome::Duplicate);
    }

    let size_after = std::fs::metadata(w.path().join("2007/07-08.concat")).unwrap().len();
    assert_eq!(size_before, size_after);
}

/// (d) deleting a segment from disk is reported as `Missing` by the
/// checker; after repacking away the dangling index row, the remaining
/// query returns the surviving records only.
#[test]
fn missing_segment_is_flagged_and_query_still_serves_the_rest() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = Config::new("euro", dir.path());
    {
        let mut w = Writer::open(cfg.clone()).unwrap();
        w.acquire(&[1u8; 10], &grib1(200, dt(2007, 7, 8, 13)), AcquireMode::Default).unwrap();
        w.acquire(&[2u8; 10], &grib1(200, dt(2007, 10, 9, 0)), AcquireMode::Default).unwrap();
    }

    std::fs::remove_file(dir.path().join("2007/07-08.concat")).unwrap();

    let checker = Checker::open(cfg.clone()).unwrap();
    let issues = checker.check().unwrap();
    assert!(issues.iter().any(|i| i.segment == "2007/07-08.concat" && i.state == State::Missing));

    let mut checker = Checker::open(cfg.clone()).unwrap();
    let report = checker.repack("2007/07-08.concat").unwrap();
    assert_eq!(report.rows_removed, 1);

    let checker = Checker::open(cfg.clone()).unwrap();
    let issues = checker.check().unwrap();
    assert!(issues.is_empty(), "unexpected issues after repack: {:?}", issues);

    let mut r = Reader::open(cfg).unwrap();
    let got = r.query(&DataQuery::all()).unwrap();
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].1, vec![2u8; 10]);
}

/// (e) a segment whose byte content disagrees with what the index expects
/// at a given offset (simulated corruption, rather than this scenario's
/// literal "duplicate GRIB bytes appended") is reported, not silently
/// repaired past.
#[test]
fn corrupted_segment_content_is_flagged_not_silently_fixed() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = Config::new("euro", dir.path());
    {
        let mut w = Writer::open(cfg.clone()).unwrap();
        w.acquire(&[1u8; 100], &grib1(200, dt(2007, 7, 8, 13)), AcquireMode::Default).unwrap();
    }

    std::fs::write(dir.path().join("2007/07-08.concat"), vec![0u8; 10]).unwrap();

    let checker = Checker::open(cfg).unwrap();
    let issues = checker.check().unwrap();
    assert!(issues.iter().any(|i| i.segment == "2007/07-08.concat" && i.state == State::Corrupted));
}

/// (f) a `Timedef` matcher only matches messages carrying the exact
/// step/stat fields, rejecting both a mismatched `Timedef` and an
/// unrelated `Grib1` timerange style.
#[test]
fn timerange_matcher_distinguishes_timedef_fields_and_styles() {
    use metarc::types::timerange::Timerange;

    let matcher = Matcher::parse("timerange:Timedef,72,1,6", &AliasDb::new()).unwrap();

    let mut matches = ItemSet::new();
    matches.set(Item::Timerange(Timerange::Timedef { step_len: 72, step_unit: 1, stat_type: 1, stat_len: 6, stat_unit: 1 }));
    assert!(matcher.matches(&matches));

    let mut mismatched_stat = ItemSet::new();
    mismatched_stat.set(Item::Timerange(Timerange::Timedef { step_len: 72, step_unit: 1, stat_type: 1, stat_len: 3, stat_unit: 1 }));
    assert!(!matcher.matches(&mismatched_stat));

    let mut wrong_style = ItemSet::new();
    wrong_style.set(Item::Timerange(Timerange::Grib1 { kind_type: 4, unit: 0, p1: 0, p2: 12 }));
    assert!(!matcher.matches(&wrong_style));
}

/// Dataset acquire exclusivity: with pairwise-incompatible filters, no
/// message matches more than one of two distinct normal datasets.
#[test]
fn dataset_filters_are_mutually_exclusive_for_disjoint_origins() {
    let arpae = Matcher::parse("origin:GRIB1,200", &AliasDb::new()).unwrap();
    let other = Matcher::parse("origin:GRIB1,98", &AliasDb::new()).unwrap();

    let set = grib1(200, dt(2007, 7, 8, 13));
    assert!(arpae.matches(&set));
    assert!(!other.matches(&set));
}

/// Unique constraint: two otherwise-identical messages cannot both land
/// under `AcquireMode::Default`.
#[test]
fn unique_constraint_rejects_the_second_identical_message() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = Config::new("euro", dir.path());
    let mut w = Writer::open(cfg).unwrap();
    let set = grib1(200, dt(2007, 7, 8, 13));
    assert_eq!(w.acquire(&[1u8; 10], &set, AcquireMode::Default).unwrap(), AcquireOutcome::Ok);
    assert_eq!(w.acquire(&[2u8; 10], &set, AcquireMode::Default).unwrap(), AcquireOutcome::Duplicate);
}

