//! Integration tests for script replay.

use navstate_cli::script::{ScriptRunner, StepReport, parse_script, resume_location};
use navstate_core::{FileStorage, MemoryStorage, NavigationContext};
use navstate_model::{Location, NavigationConfig};

fn run(script: &str, start: &str) -> Vec<StepReport> {
    let steps = parse_script(script).unwrap();
    let context = NavigationContext::start(
        MemoryStorage::new(),
        NavigationConfig::default(),
        Location::parse(start),
    );
    ScriptRunner::new(context).run(&steps)
}

fn locations(reports: &[StepReport]) -> String {
    reports
        .iter()
        .map(|report| format!("{} {} [{}]", report.step, report.location, report.depth))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn list_detail_round_trip_restores_filters() {
    let reports = run(
        r#"[
            {"op": "mount", "page": "admin-client-list"},
            {"op": "write", "page": "admin-client-list",
             "params": {"page": 3, "pageSize": 50, "searchTerm": "foo"}},
            {"op": "unmount", "page": "admin-client-list"},
            {"op": "visit", "path": "/admin-client-list/7"},
            {"op": "back"},
            {"op": "mount", "page": "admin-client-list"}
        ]"#,
        "/admin-client-list",
    );

    insta::assert_snapshot!(locations(&reports), @r"
    mount /admin-client-list [1]
    write /admin-client-list?page=3&pageSize=50&searchTerm=foo [1]
    unmount /admin-client-list?page=3&pageSize=50&searchTerm=foo [1]
    visit /admin-client-list/7 [2]
    back /admin-client-list [1]
    mount /admin-client-list?page=3&pageSize=50&searchTerm=foo [1]
    ");
    assert_eq!(reports[4].detail, "via detail-under-list");
    assert_eq!(reports[5].detail, "restored 3 params");
}

#[test]
fn navbar_entry_skips_restoration() {
    let reports = run(
        r#"[
            {"op": "save", "page": "admin-client-list", "state": {"page": 3}},
            {"op": "visit", "path": "/admin-trip-list"},
            {"op": "navbar", "path": "/admin-client-list"},
            {"op": "mount", "page": "admin-client-list"}
        ]"#,
        "/admin-client-list",
    );
    let last = reports.last().unwrap();
    assert_eq!(last.detail, "reset (navbar)");
    assert_eq!(last.location, "/admin-client-list");
}

#[test]
fn source_pointer_shapes_back_target() {
    let reports = run(
        r#"[
            {"op": "visit", "path": "/admin-client-list/7"},
            {"op": "source", "tag": "client-details", "id": "7"},
            {"op": "visit", "path": "/admin-trip-list/42"},
            {"op": "clear-source"}
        ]"#,
        "/admin-client-list",
    );
    assert_eq!(reports[2].back, "/admin-client-list/7 (detail-under-list)");
    assert_eq!(reports[3].back, "/admin-trip-list (detail-under-list)");
}

#[test]
fn list_nav_orders_known_keys_first() {
    let reports = run(
        r#"[
            {"op": "write", "page": "admin-trip-list", "params": {"status": ["open", "held"]}},
            {"op": "list-nav", "page": "admin-trip-list", "path": "/admin-trip-list",
             "params": {"page": 2, "sortOption": "date"}}
        ]"#,
        "/admin-trip-list",
    );
    assert_eq!(
        reports[1].location,
        "/admin-trip-list?page=2&sortOption=date&status%5B%5D=open&status%5B%5D=held"
    );
}

#[test]
fn explicit_back_target_is_an_override() {
    let reports = run(
        r#"[
            {"op": "visit", "path": "/admin-trip-list/42/edit"},
            {"op": "back", "target": "/admin-reservation-list"}
        ]"#,
        "/admin-trip-list/42",
    );
    assert_eq!(reports[1].detail, "via override");
    assert_eq!(reports[1].location, "/admin-reservation-list");
}

#[test]
fn session_file_resumes_where_it_left_off() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let config = NavigationConfig::default();

    let steps = parse_script(
        r#"[
            {"op": "visit", "path": "/admin-trip-list"},
            {"op": "visit", "path": "/admin-trip-list/42"}
        ]"#,
    )
    .unwrap();
    let storage = FileStorage::open(&path).unwrap();
    let start = resume_location(&storage, &config);
    assert_eq!(start.to_string(), "/");
    let context = NavigationContext::start(storage, config.clone(), start);
    ScriptRunner::new(context).run(&steps);

    let storage = FileStorage::open(&path).unwrap();
    let start = resume_location(&storage, &config);
    assert_eq!(start.to_string(), "/admin-trip-list/42");
    let context = NavigationContext::start(storage, config, start);
    let reports = ScriptRunner::new(context).run(&parse_script(r#"[{"op": "back"}]"#).unwrap());
    assert_eq!(reports[0].location, "/admin-trip-list");
    assert_eq!(reports[0].depth, 2);
}
