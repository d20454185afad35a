use super::*;
use crate::nav_stack::NavStack;
use crate::schema::fixtures::sample_schema;
use pretty_assertions::assert_eq;

fn page_for(path: &[&str]) -> Page {
    let schema = sample_schema();
    let mut stack = NavStack::default();
    assert_eq!(stack.open_path(&schema, path), path.len(), "path should resolve");
    build_page(&schema, stack.current())
}

fn section<'a>(page: &'a Page, title: &str) -> &'a Section {
    page.sections
        .iter()
        .find(|section| section.title == title)
        .unwrap_or_else(|| panic!("missing section {title}"))
}

fn labels(section: &Section) -> Vec<&str> {
    section.entries.iter().map(|entry| entry.label.as_str()).collect()
}

fn snapshot(schema: Option<Schema>, is_fetching: bool, fetch_error: Option<&str>) -> ProviderSnapshot {
    ProviderSnapshot {
        schema: schema.map(Arc::new),
        is_fetching,
        fetch_error: fetch_error.map(str::to_string),
    }
}

#[test]
fn fetching_shows_loading_regardless_of_schema() {
    for schema in [None, Some(sample_schema())] {
        let snapshot = snapshot(schema, true, None);
        assert!(matches!(explorer_state(&snapshot, &[]), ExplorerState::Loading));
    }
}

#[test]
fn fetch_error_is_surfaced_verbatim() {
    let snapshot = snapshot(None, false, Some("Failed to fetch: 502"));
    assert!(matches!(
        explorer_state(&snapshot, &[]),
        ExplorerState::Error("Failed to fetch: 502")
    ));
}

#[test]
fn null_schema_is_empty_state() {
    let snapshot = snapshot(None, false, None);
    assert!(matches!(explorer_state(&snapshot, &[]), ExplorerState::Empty));
}

#[test]
fn validation_errors_report_the_first_message() {
    let snapshot = snapshot(Some(sample_schema()), false, None);
    let errors = vec!["first problem".to_string(), "second".to_string()];
    assert!(matches!(
        explorer_state(&snapshot, &errors),
        ExplorerState::Invalid("first problem")
    ));
    assert!(matches!(explorer_state(&snapshot, &[]), ExplorerState::Ready(_)));
}

#[test]
fn schema_page_lists_root_types_then_other_types() {
    let page = page_for(&[]);
    assert_eq!(page.title, "Docs");
    assert_eq!(page.description.as_deref(), Some("The *sample* API."));
    let roots = section(&page, "Root Types");
    assert_eq!(labels(roots), vec!["query", "mutation"]);
    assert_eq!(roots.entries[0].detail, ": Query");

    let all = labels(section(&page, "All Schema Types"));
    assert!(all.contains(&"User"));
    assert!(!all.contains(&"Query"));
    assert!(!all.contains(&"__Schema"));
}

#[test]
fn object_page_splits_deprecated_fields() {
    let page = page_for(&["User"]);
    assert_eq!(page.signature.as_deref(), Some("type User implements Node"));
    assert_eq!(labels(section(&page, "Implements")), vec!["Node"]);
    assert_eq!(
        labels(section(&page, "Fields")),
        vec!["id", "name", "role", "posts"]
    );
    let deprecated = section(&page, "Deprecated Fields");
    assert_eq!(labels(deprecated), vec!["handle"]);
    assert!(deprecated.entries[0].deprecated);

    let posts = &section(&page, "Fields").entries[3];
    assert_eq!(posts.detail, "(first: Int): [Post!]!");
    assert!(matches!(posts.target, Some(LinkTarget::Field(_))));
}

#[test]
fn enum_page_lists_values_without_links() {
    let page = page_for(&["Role"]);
    assert_eq!(page.signature.as_deref(), Some("enum Role"));
    let values = section(&page, "Enum Values");
    assert_eq!(labels(values), vec!["ADMIN", "MEMBER"]);
    assert_eq!(values.entries[0].summary.as_deref(), Some("Full access."));
    let deprecated = section(&page, "Deprecated Enum Values");
    assert_eq!(deprecated.entries[0].summary.as_deref(), Some("No longer issued."));
    assert!(page.links().is_empty());
}

#[test]
fn union_and_interface_pages_link_their_members() {
    let union = page_for(&["SearchResult"]);
    assert_eq!(union.signature.as_deref(), Some("union SearchResult = User | Post"));
    assert_eq!(labels(section(&union, "Possible Types")), vec!["User", "Post"]);

    let interface = page_for(&["Node"]);
    assert_eq!(labels(section(&interface, "Implementations")), vec!["User", "Post"]);
}

#[test]
fn scalar_page_shows_specified_by_url() {
    let page = page_for(&["DateTime"]);
    assert_eq!(
        page.notices,
        vec!["Specified by: https://scalars.graphql.org/andimarek/date-time".to_string()]
    );
    assert!(page.sections.is_empty());
}

#[test]
fn field_page_links_return_type_and_arguments() {
    let page = page_for(&["Query", "search"]);
    assert_eq!(
        page.signature.as_deref(),
        Some("search(term: String!, first: Int = 10): [SearchResult!]!")
    );
    let ty = section(&page, "Type");
    assert_eq!(labels(ty), vec!["[SearchResult!]!"]);
    assert_eq!(ty.entries[0].target, Some(LinkTarget::Type("SearchResult".to_string())));
    let args = section(&page, "Arguments");
    assert_eq!(labels(args), vec!["term", "first"]);
    assert_eq!(args.entries[1].detail, ": Int = 10");
}

#[test]
fn deprecated_field_page_carries_notice() {
    let page = page_for(&["User", "handle"]);
    assert_eq!(page.notices, vec!["Deprecated: Use `name`.".to_string()]);
}

#[test]
fn argument_page_shows_default_and_type() {
    let page = page_for(&["Query", "search", "first"]);
    assert_eq!(page.title, "first");
    assert_eq!(page.signature.as_deref(), Some("first: Int = 10"));
    assert_eq!(page.notices, vec!["Default value: 10".to_string()]);
    assert_eq!(labels(section(&page, "Type")), vec!["Int"]);
}

#[test]
fn input_object_page_lists_input_fields() {
    let page = page_for(&["UserFilter"]);
    let inputs = section(&page, "Input Fields");
    assert_eq!(labels(inputs), vec!["role", "nameContains"]);
    assert!(matches!(inputs.entries[0].target, Some(LinkTarget::InputValue(_))));
}

#[test]
fn filter_is_case_insensitive_and_drops_empty_sections() {
    let mut page = page_for(&[]);
    page.filter("  uSER ");
    assert_eq!(page.sections.len(), 1);
    assert_eq!(
        labels(&page.sections[0]),
        vec!["User", "UserFilter"]
    );

    let mut unfiltered = page_for(&[]);
    let before = unfiltered.clone();
    unfiltered.filter("   ");
    assert_eq!(unfiltered, before);
}

#[test]
fn link_targets_become_crumbs() {
    let schema = sample_schema();
    let crumb = LinkTarget::Type("Post".to_string())
        .to_crumb(&schema)
        .expect("type crumb");
    assert_eq!(crumb.name, "Post");
    assert!(LinkTarget::Type("Gone".to_string()).to_crumb(&schema).is_none());

    let page = page_for(&["Post"]);
    let title = page.links()[2]
        .target
        .as_ref()
        .and_then(|target| target.to_crumb(&schema))
        .expect("field crumb");
    assert_eq!(title.name, "title");
    assert!(matches!(title.def, Def::Field(_)));
}
