use super::*;
use crate::nav_stack::ROOT_CRUMB_NAME;
use crate::schema::fixtures::{field, object, sample_schema, schema};
use pretty_assertions::assert_eq;

fn ready(schema: Schema) -> ProviderSnapshot {
    ProviderSnapshot {
        schema: Some(Arc::new(schema)),
        is_fetching: false,
        fetch_error: None,
    }
}

fn crumb_names(app: &App) -> Vec<String> {
    app.nav_stack()
        .crumbs()
        .iter()
        .map(|crumb| crumb.name.clone())
        .collect()
}

fn press(app: &mut App, events: &[AppEvent]) {
    for event in events {
        app.handle_event(*event, 100);
    }
}

fn select_link(app: &mut App, label: &str) {
    let page = app.current_page().expect("page should render");
    let idx = page
        .links()
        .iter()
        .position(|entry| entry.label == label)
        .unwrap_or_else(|| panic!("no link labelled {label}"));
    for _ in 0..idx {
        app.select_next();
    }
    assert_eq!(app.selected(), idx);
}

#[test]
fn default_state_is_running_at_root_without_schema() {
    let app = App::default();
    assert!(app.running);
    assert_eq!(app.ticks, 0);
    assert_eq!(crumb_names(&app), vec![ROOT_CRUMB_NAME.to_string()]);
    assert!(matches!(app.explorer_state(), ExplorerState::Empty));
    assert!(app.current_page().is_none());
}

#[test]
fn opening_links_pushes_type_field_and_argument_crumbs() {
    let mut app = App::default();
    app.apply_snapshot(ready(sample_schema()));

    select_link(&mut app, "query");
    press(&mut app, &[AppEvent::Open]);
    assert_eq!(app.current_page().expect("page").title, "Query");

    select_link(&mut app, "search");
    press(&mut app, &[AppEvent::Open]);
    select_link(&mut app, "first");
    press(&mut app, &[AppEvent::Open]);
    assert_eq!(crumb_names(&app), vec!["Docs", "Query", "search", "first"]);

    press(&mut app, &[AppEvent::Back, AppEvent::Back]);
    assert_eq!(crumb_names(&app), vec!["Docs", "Query"]);
    press(&mut app, &[AppEvent::Home]);
    assert!(app.nav_stack().is_at_root());
}

#[test]
fn back_at_root_is_a_no_op() {
    let mut app = App::default();
    app.apply_snapshot(ready(sample_schema()));
    assert!(!app.go_back());
    assert!(app.nav_stack().is_at_root());
}

#[test]
fn refetch_with_surviving_path_keeps_deepest_crumb() {
    let mut app = App::default();
    app.apply_snapshot(ready(sample_schema()));
    select_link(&mut app, "User");
    press(&mut app, &[AppEvent::Open]);
    select_link(&mut app, "posts");
    press(&mut app, &[AppEvent::Open]);

    app.apply_snapshot(ProviderSnapshot {
        is_fetching: true,
        ..app.snapshot().clone()
    });
    assert!(matches!(app.explorer_state(), ExplorerState::Loading));

    app.apply_snapshot(ready(sample_schema()));
    assert_eq!(app.current_page().expect("page").title, "posts");
}

#[test]
fn refetch_without_deepest_member_falls_back_to_parent() {
    let mut app = App::default();
    app.apply_snapshot(ready(sample_schema()));
    select_link(&mut app, "User");
    press(&mut app, &[AppEvent::Open]);
    select_link(&mut app, "posts");
    press(&mut app, &[AppEvent::Open]);

    let reduced = schema(
        Some("Query"),
        vec![
            object("Query", vec![field("me", "User")]),
            object("User", vec![field("id", "ID!")]),
        ],
    );
    app.apply_snapshot(ready(reduced));
    assert_eq!(crumb_names(&app), vec!["Docs", "User"]);
    assert_eq!(app.current_page().expect("page").title, "User");
    assert_eq!(app.selected(), 0);
}

#[test]
fn fetch_error_then_recovery_restores_content() {
    let mut app = App::default();
    app.apply_snapshot(ProviderSnapshot {
        schema: None,
        is_fetching: false,
        fetch_error: Some("Error fetching schema".to_string()),
    });
    assert!(matches!(
        app.explorer_state(),
        ExplorerState::Error("Error fetching schema")
    ));

    app.apply_snapshot(ready(sample_schema()));
    assert!(matches!(app.explorer_state(), ExplorerState::Ready(_)));
}

#[test]
fn stack_survives_schema_outage() {
    let mut app = App::default().with_initial_path("User.posts");
    app.apply_snapshot(ready(sample_schema()));
    assert_eq!(crumb_names(&app), vec!["Docs", "User", "posts"]);

    app.apply_snapshot(ProviderSnapshot::default());
    assert_eq!(crumb_names(&app), vec!["Docs", "User", "posts"]);
    app.apply_snapshot(ready(sample_schema()));
    assert_eq!(crumb_names(&app), vec!["Docs", "User", "posts"]);
}

#[test]
fn invalid_schema_is_reported_and_not_browsable() {
    let mut app = App::default();
    app.apply_snapshot(ready(schema(None, vec![object("Thing", vec![field("id", "ID")])])));
    assert_eq!(
        app.validation_errors(),
        &["Query root type must be provided.".to_string()]
    );
    assert!(matches!(app.explorer_state(), ExplorerState::Invalid(_)));
    assert!(!app.open_selected());
}

#[test]
fn initial_path_is_applied_once() {
    let mut app = App::new("schema.json").with_initial_path(" Query . user . id ");
    assert_eq!(app.source_label(), "schema.json");
    app.apply_snapshot(ready(sample_schema()));
    assert_eq!(crumb_names(&app), vec!["Docs", "Query", "user", "id"]);

    press(&mut app, &[AppEvent::Home]);
    app.apply_snapshot(ready(sample_schema()));
    assert!(app.nav_stack().is_at_root());
}

#[test]
fn search_filters_links_and_consumes_characters() {
    let mut app = App::default();
    app.apply_snapshot(ready(sample_schema()));
    press(
        &mut app,
        &[
            AppEvent::InputChar('/'),
            AppEvent::InputChar('r'),
            AppEvent::InputChar('o'),
        ],
    );
    assert_eq!(app.search_query(), Some("ro"));
    assert!(!app.take_refetch_request());
    let labels: Vec<String> = app
        .current_page()
        .expect("page")
        .links()
        .iter()
        .map(|entry| entry.label.clone())
        .collect();
    assert_eq!(labels, vec!["Role".to_string()]);

    press(&mut app, &[AppEvent::Open]);
    assert_eq!(app.current_page().expect("page").title, "Role");
    assert_eq!(app.search_query(), None);
}

#[test]
fn backspace_edits_search_then_exits_it() {
    let mut app = App::default();
    app.apply_snapshot(ready(sample_schema()));
    press(&mut app, &[AppEvent::InputChar('/'), AppEvent::InputChar('x')]);
    press(&mut app, &[AppEvent::Backspace]);
    assert_eq!(app.search_query(), Some(""));
    press(&mut app, &[AppEvent::Backspace]);
    assert_eq!(app.search_query(), None);

    press(&mut app, &[AppEvent::InputChar('/'), AppEvent::Escape]);
    assert_eq!(app.search_query(), None);
}

#[test]
fn plain_keys_quit_and_request_refetch() {
    let mut app = App::default();
    press(&mut app, &[AppEvent::InputChar('r')]);
    assert!(app.take_refetch_request());
    assert!(!app.take_refetch_request());
    press(&mut app, &[AppEvent::InputChar('q')]);
    assert!(!app.running);
}

#[test]
fn selection_is_clamped_to_available_links() {
    let mut app = App::default();
    app.apply_snapshot(ready(sample_schema()));
    let count = app.current_page().expect("page").links().len();
    for _ in 0..count + 5 {
        press(&mut app, &[AppEvent::MoveDown]);
    }
    assert_eq!(app.selected(), count - 1);
    press(&mut app, &[AppEvent::MoveUp]);
    assert_eq!(app.selected(), count - 2);
}

#[test]
fn scrolling_is_bounded_and_stops_following_selection() {
    let mut app = App::default();
    app.handle_event(AppEvent::ScrollDown, 7);
    assert_eq!(app.scroll(), 5);
    assert!(!app.follows_selection());
    app.handle_event(AppEvent::MouseScrollDown, 7);
    assert_eq!(app.scroll(), 7);
    app.handle_event(AppEvent::ScrollUp, 7);
    assert_eq!(app.scroll(), 2);
    app.handle_event(AppEvent::MoveDown, 7);
    assert!(app.follows_selection());
}

#[test]
fn ticks_advance() {
    let mut app = App::default();
    press(&mut app, &[AppEvent::Tick, AppEvent::Tick]);
    assert_eq!(app.ticks, 2);
}
