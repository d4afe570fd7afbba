use classdesk::api::{ApiClient, MockApi};
use classdesk::app::{FilterSource, FilterSpec, LoadState, PageConfig};
use classdesk::select::SelectionMode;
use classdesk::storage::{LatencyConfig, TokenStore};
use classdesk::table::FieldMapping;
use classdesk::ui::helpers::strip_ansi;
use classdesk::{initialize, worker, Config, Event, Runtime};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;

fn page() -> PageConfig {
    PageConfig::new(
        "Students",
        "students",
        FieldMapping::new().label("name", "Name").label("balance", "Balance"),
    )
    .with_filter(
        FilterSpec::new(
            "group",
            "Group",
            SelectionMode::Single,
            FilterSource::Remote {
                resource: "groups".to_string(),
                key_field: "id".to_string(),
                label_field: "name".to_string(),
            },
        )
        .with_clear_row("Any group"),
    )
}

fn runtime() -> Runtime {
    let mock = MockApi::new(LatencyConfig::new(1, 2))
        .with_collection(
            "students",
            vec![
                json!({ "id": 1, "name": "Anna", "group": "g1", "balance": 1200 }),
                json!({ "id": 2, "name": "Boris", "group": "g2", "balance": -300 }),
                json!({ "id": 3, "name": "Annette", "group": "g1", "balance": 0 }),
            ],
        )
        .with_collection(
            "groups",
            vec![json!({ "id": "g1", "name": "5A" }), json!({ "id": "g2", "name": "5B" })],
        );
    let client = ApiClient::new("http://mock/", Box::new(mock), TokenStore::with_access("t"));
    let mut state = initialize(&Config::default(), page());
    state.set_viewport(24, 80);
    Runtime::new(state, worker::spawn(client).unwrap())
}

fn settle(runtime: &mut Runtime) {
    for _ in 0..100 {
        runtime.pump(Duration::from_millis(20)).unwrap();
        if runtime.state.load_state == LoadState::Loaded && !runtime.state.filters[0].options().is_empty() {
            return;
        }
    }
    panic!("page did not settle: {:?}", runtime.state.load_state);
}

fn names(runtime: &Runtime) -> Vec<String> {
    runtime
        .state
        .visible_records()
        .iter()
        .filter_map(|record| record["name"].as_str().map(String::from))
        .collect()
}

#[test]
fn filter_search_and_url_restore() {
    let mut runtime = runtime();
    runtime.dispatch(&Event::Mounted).unwrap();
    settle(&mut runtime);
    assert_eq!(names(&runtime), vec!["Anna", "Boris", "Annette"]);
    assert_eq!(runtime.state.filters[0].options().len(), 2);

    runtime.dispatch(&Event::ToggleFilter(0)).unwrap();
    runtime.dispatch(&Event::PickOption(1)).unwrap();
    assert_eq!(runtime.state.load_state, LoadState::Loading);
    assert!(runtime.url().starts_with("group="));
    settle(&mut runtime);
    assert_eq!(names(&runtime), vec!["Boris"]);

    let frame = strip_ansi(&classdesk::ui::render(&runtime.state).unwrap());
    assert!(frame.contains("Students (1)"));
    assert!(frame.contains("Boris"));
    assert!(!frame.contains("Annette"));

    runtime.dispatch(&Event::UrlChanged(String::new())).unwrap();
    settle(&mut runtime);
    assert_eq!(runtime.state.filters[0].button_label(), "Group");
    assert_eq!(names(&runtime).len(), 3);

    runtime.dispatch(&Event::FocusSearch).unwrap();
    for c in "Ann".chars() {
        runtime.dispatch(&Event::Char(c)).unwrap();
    }
    runtime.dispatch(&Event::Enter).unwrap();
    assert_eq!(names(&runtime), vec!["Anna", "Annette"]);
}

#[test]
fn unmount_leaves_no_listeners() {
    let mut runtime = runtime();
    runtime.dispatch(&Event::Mounted).unwrap();
    runtime.dispatch(&Event::ToggleFilter(0)).unwrap();
    assert_eq!(runtime.state.listener_count(), 1);

    runtime.dispatch(&Event::Unmounted).unwrap();
    assert_eq!(runtime.state.listener_count(), 0);
    for _ in 0..5 {
        runtime.pump(Duration::from_millis(10)).unwrap();
    }
    assert!(runtime.state.records.is_empty());
}
