use quillpost_core::config::{CoreLimits, DRAFT_TTL_MS};
use quillpost_core::db::{open_db, open_db_in_memory};
use quillpost_core::repo::draft_repo::POST_DRAFT_KEY;
use quillpost_core::{
    DraftData, DraftSaveOutcome, DraftService, DraftSlotRepository, ManualClock,
    SqliteDraftSlotRepository,
};
use rusqlite::Connection;

const NOW: i64 = 1_700_000_000_000;

fn sample() -> DraftData {
    DraftData {
        title: "Draft title".to_string(),
        content: "<p>Work in progress</p>".to_string(),
        tags: vec!["rust".to_string(), "editor".to_string()],
        category: "technology".to_string(),
    }
}

fn slot(conn: &Connection) -> Option<String> {
    SqliteDraftSlotRepository::try_new(conn)
        .unwrap()
        .read_slot(POST_DRAFT_KEY)
        .unwrap()
}

#[test]
fn saved_draft_loads_back() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(NOW);
    let service = DraftService::with_clock(SqliteDraftSlotRepository::try_new(&conn).unwrap(), &clock);

    assert_eq!(
        service.save(&sample()),
        DraftSaveOutcome::Saved {
            expiry: NOW + DRAFT_TTL_MS
        }
    );
    assert_eq!(service.load(), Some(sample()));

    let raw = slot(&conn).unwrap();
    assert!(raw.contains(r#""version":"1.0""#));
    assert!(raw.contains(&format!(r#""expiry":{}"#, NOW + DRAFT_TTL_MS)));
}

#[test]
fn expired_draft_is_discarded_and_storage_cleared() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(NOW);
    let service = DraftService::with_clock(SqliteDraftSlotRepository::try_new(&conn).unwrap(), &clock);
    assert!(service.save(&sample()).is_saved());

    clock.advance(DRAFT_TTL_MS);
    assert_eq!(service.load(), Some(sample()), "expiry is inclusive");

    clock.advance(1);
    assert_eq!(service.load(), None);
    assert_eq!(slot(&conn), None);
}

#[test]
fn oversized_draft_keeps_the_previous_one() {
    let conn = open_db_in_memory().unwrap();
    let service = DraftService::with_clock(
        SqliteDraftSlotRepository::try_new(&conn).unwrap(),
        ManualClock::new(NOW),
    );
    assert!(service.save(&sample()).is_saved());
    let stored = slot(&conn);

    let mut data = sample();
    data.content = "x".repeat(50_001);
    match service.save(&data) {
        DraftSaveOutcome::TooLarge { size, limit } => {
            assert!(size > 50_000);
            assert_eq!(limit, 50_000);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(slot(&conn), stored);
    assert_eq!(service.load(), Some(sample()));
}

#[test]
fn size_cap_counts_utf16_code_units() {
    let conn = open_db_in_memory().unwrap();
    let mut data = sample();
    data.content = "\u{1F600}".repeat(8);
    let serialized = serde_json::to_string(&data).unwrap();
    let chars = serialized.chars().count();
    let units = serialized.encode_utf16().count();
    assert_eq!(units, chars + 8);

    let limits = CoreLimits {
        max_draft_chars: chars,
        ..CoreLimits::default()
    };
    let service = DraftService::with_clock(
        SqliteDraftSlotRepository::try_new(&conn).unwrap(),
        ManualClock::new(NOW),
    )
    .with_limits(&limits);
    assert_eq!(
        service.save(&data),
        DraftSaveOutcome::TooLarge {
            size: units,
            limit: chars
        }
    );

    let service = service.with_limits(&CoreLimits {
        max_draft_chars: units,
        ..CoreLimits::default()
    });
    assert!(service.save(&data).is_saved());
}

#[test]
fn size_cap_follows_configured_limits() {
    let conn = open_db_in_memory().unwrap();
    let limits = CoreLimits {
        max_draft_chars: 10,
        ..CoreLimits::default()
    };
    let service = DraftService::with_clock(
        SqliteDraftSlotRepository::try_new(&conn).unwrap(),
        ManualClock::new(NOW),
    )
    .with_limits(&limits);
    assert!(matches!(
        service.save(&sample()),
        DraftSaveOutcome::TooLarge { limit: 10, .. }
    ));
}

#[test]
fn malformed_envelopes_are_discarded() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteDraftSlotRepository::try_new(&conn).unwrap();
    let service = DraftService::with_clock(
        SqliteDraftSlotRepository::try_new(&conn).unwrap(),
        ManualClock::new(NOW),
    );

    let data = r#"{"title":"t","content":"c","tags":[],"category":"general"}"#;
    let cases = [
        "not json at all".to_string(),
        format!(r#"{{"data":{data}}}"#),
        format!(r#"{{"data":{data},"expiry":0,"version":"1.0"}}"#),
        format!(r#"{{"data":{data},"expiry":"tomorrow"}}"#),
        r#"{"data":{"title":"only"},"expiry":99999999999999}"#.to_string(),
        r#"{"expiry":99999999999999}"#.to_string(),
    ];
    for raw in cases {
        repo.write_slot(POST_DRAFT_KEY, &raw).unwrap();
        assert_eq!(service.load(), None, "accepted {raw}");
        assert_eq!(slot(&conn), None, "slot kept for {raw}");
    }
}

#[test]
fn clear_removes_the_slot() {
    let conn = open_db_in_memory().unwrap();
    let service = DraftService::with_clock(
        SqliteDraftSlotRepository::try_new(&conn).unwrap(),
        ManualClock::new(NOW),
    );
    assert!(service.save(&sample()).is_saved());
    service.clear();
    assert_eq!(slot(&conn), None);
    service.clear();
}

#[test]
fn drafts_survive_reopening_a_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("drafts.db");

    {
        let conn = open_db(&path).unwrap();
        let service = DraftService::new(SqliteDraftSlotRepository::try_new(&conn).unwrap());
        assert!(service.save(&sample()).is_saved());
    }

    let conn = open_db(&path).unwrap();
    let service = DraftService::new(SqliteDraftSlotRepository::try_new(&conn).unwrap());
    assert_eq!(service.load(), Some(sample()));
}
