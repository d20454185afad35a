use std::sync::Arc;

use crate::nav_stack::{Crumb, Def};
use crate::provider::ProviderSnapshot;
use crate::schema::{FieldDef, InputValueDef, Schema, TypeDef, TypeKind};

pub const NO_SCHEMA_TEXT: &str = "No GraphQL schema available";

#[derive(Debug, Clone, Copy)]
pub enum ExplorerState<'a> {
    Loading,
    Error(&'a str),
    Empty,
    Invalid(&'a str),
    Ready(&'a Schema),
}

/// Fetching wins over a stale error.
pub fn explorer_state<'a>(
    snapshot: &'a ProviderSnapshot,
    validation_errors: &'a [String],
) -> ExplorerState<'a> {
    if snapshot.is_fetching {
        return ExplorerState::Loading;
    }
    if let Some(error) = snapshot.fetch_error.as_deref() {
        return ExplorerState::Error(error);
    }
    let Some(schema) = snapshot.schema.as_deref() else {
        return ExplorerState::Empty;
    };
    if let Some(first) = validation_errors.first() {
        return ExplorerState::Invalid(first);
    }
    ExplorerState::Ready(schema)
}

#[derive(Debug, Clone, PartialEq)]
pub enum LinkTarget {
    Type(String),
    Field(Arc<FieldDef>),
    InputValue(Arc<InputValueDef>),
}

impl LinkTarget {
    /// The crumb to push when this link is followed, or `None` if a type link dangles.
    pub fn to_crumb(&self, schema: &Schema) -> Option<Crumb> {
        match self {
            Self::Type(name) => schema.type_by_name(name).map(Crumb::for_type),
            Self::Field(field) => Some(Crumb::for_field(field)),
            Self::InputValue(value) => Some(Crumb::for_input_value(value)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub label: String,
    pub detail: String,
    pub summary: Option<String>,
    pub deprecated: bool,
    pub target: Option<LinkTarget>,
}

impl Entry {
    fn link(label: impl Into<String>, detail: impl Into<String>, target: LinkTarget) -> Self {
        Self {
            label: label.into(),
            detail: detail.into(),
            summary: None,
            deprecated: false,
            target: Some(target),
        }
    }

    fn with_summary(mut self, description: Option<&str>) -> Self {
        self.summary = description.and_then(first_line);
        self
    }

    fn matches(&self, query: &str) -> bool {
        self.label.to_lowercase().contains(query) || self.detail.to_lowercase().contains(query)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: &'static str,
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub title: String,
    pub signature: Option<String>,
    pub description: Option<String>,
    pub notices: Vec<String>,
    pub sections: Vec<Section>,
}

impl Page {
    fn new(title: impl Into<String>, description: Option<&str>) -> Self {
        Self {
            title: title.into(),
            signature: None,
            description: description.map(str::to_string),
            notices: Vec::new(),
            sections: Vec::new(),
        }
    }

    fn section(&mut self, title: &'static str, entries: Vec<Entry>) {
        if !entries.is_empty() {
            self.sections.push(Section { title, entries });
        }
    }

    pub fn filter(&mut self, query: &str) {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return;
        }
        for section in &mut self.sections {
            section.entries.retain(|entry| entry.matches(&query));
        }
        self.sections.retain(|section| !section.entries.is_empty());
    }

    pub fn links(&self) -> Vec<&Entry> {
        self.sections
            .iter()
            .flat_map(|section| section.entries.iter())
            .filter(|entry| entry.target.is_some())
            .collect()
    }
}

/// `crumb` must already be reconciled against `schema`.
pub fn build_page(schema: &Schema, crumb: &Crumb) -> Page {
    let description = match &crumb.def {
        Def::Schema => schema.description(),
        def => def.description(),
    };
    let mut page = Page::new(&crumb.name, description);
    match &crumb.def {
        Def::Schema => fill_schema_page(&mut page, schema),
        Def::Type(ty) => fill_type_page(&mut page, ty),
        Def::Field(field) => fill_field_page(&mut page, field),
        Def::InputValue(value) => fill_input_value_page(&mut page, value),
    }
    page
}

fn fill_schema_page(page: &mut Page, schema: &Schema) {
    let roots = schema
        .root_types()
        .into_iter()
        .map(|(operation, name)| {
            Entry::link(operation, format!(": {name}"), LinkTarget::Type(name.to_string()))
        })
        .collect();
    page.section("Root Types", roots);
    let all = schema
        .types()
        .iter()
        .filter(|ty| !ty.is_introspection() && !schema.is_root_type(&ty.name))
        .map(|ty| {
            Entry::link(&ty.name, "", LinkTarget::Type(ty.name.clone()))
                .with_summary(ty.description.as_deref())
        })
        .collect();
    page.section("All Schema Types", all);
}

fn fill_type_page(page: &mut Page, ty: &TypeDef) {
    page.signature = Some(type_signature(ty));
    if let Some(url) = ty.specified_by_url.as_deref() {
        page.notices.push(format!("Specified by: {url}"));
    }

    page.section("Implements", type_links(&ty.interfaces));

    let (deprecated, active): (Vec<_>, Vec<_>) =
        ty.fields.iter().partition(|field| field.is_deprecated);
    page.section("Fields", active.into_iter().map(field_entry).collect());
    page.section(
        "Deprecated Fields",
        deprecated.into_iter().map(field_entry).collect(),
    );

    page.section(
        "Input Fields",
        ty.input_fields.iter().map(input_value_entry).collect(),
    );

    let (deprecated, active): (Vec<_>, Vec<_>) =
        ty.enum_values.iter().partition(|value| value.is_deprecated);
    let enum_entry = |value: &crate::schema::EnumValueDef| Entry {
        label: value.name.clone(),
        detail: String::new(),
        summary: value
            .deprecation_reason
            .as_deref()
            .or(value.description.as_deref())
            .and_then(first_line),
        deprecated: value.is_deprecated,
        target: None,
    };
    page.section("Enum Values", active.into_iter().map(enum_entry).collect());
    page.section(
        "Deprecated Enum Values",
        deprecated.into_iter().map(enum_entry).collect(),
    );

    let possible_title = if ty.kind == TypeKind::Interface {
        "Implementations"
    } else {
        "Possible Types"
    };
    page.section(possible_title, type_links(&ty.possible_types));
}

fn fill_field_page(page: &mut Page, field: &FieldDef) {
    page.signature = Some(format!("{}{}: {}", field.name, args_signature(&field.args), field.ty));
    push_deprecation(page, field.is_deprecated, field.deprecation_reason.as_deref());
    page.section("Type", vec![type_ref_entry(&field.ty)]);
    page.section(
        "Arguments",
        field.args.iter().map(input_value_entry).collect(),
    );
}

fn fill_input_value_page(page: &mut Page, value: &InputValueDef) {
    page.signature = Some(input_value_signature(value));
    push_deprecation(page, value.is_deprecated, value.deprecation_reason.as_deref());
    if let Some(default) = value.default_value.as_deref() {
        page.notices.push(format!("Default value: {default}"));
    }
    page.section("Type", vec![type_ref_entry(&value.ty)]);
}

fn push_deprecation(page: &mut Page, is_deprecated: bool, reason: Option<&str>) {
    if is_deprecated {
        page.notices.push(match reason {
            Some(reason) => format!("Deprecated: {reason}"),
            None => "Deprecated".to_string(),
        });
    }
}

fn type_signature(ty: &TypeDef) -> String {
    let mut signature = format!("{} {}", ty.kind.label(), ty.name);
    if !ty.interfaces.is_empty() {
        signature.push_str(" implements ");
        signature.push_str(&ty.interfaces.join(" & "));
    }
    if ty.kind == TypeKind::Union && !ty.possible_types.is_empty() {
        signature.push_str(" = ");
        signature.push_str(&ty.possible_types.join(" | "));
    }
    signature
}

fn args_signature(args: &[Arc<InputValueDef>]) -> String {
    if args.is_empty() {
        return String::new();
    }
    let rendered: Vec<String> = args.iter().map(|arg| input_value_signature(arg)).collect();
    format!("({})", rendered.join(", "))
}

fn input_value_signature(value: &InputValueDef) -> String {
    match value.default_value.as_deref() {
        Some(default) => format!("{}: {} = {default}", value.name, value.ty),
        None => format!("{}: {}", value.name, value.ty),
    }
}

fn field_entry(field: &Arc<FieldDef>) -> Entry {
    let mut entry = Entry::link(
        &field.name,
        format!("{}: {}", args_signature(&field.args), field.ty),
        LinkTarget::Field(Arc::clone(field)),
    )
    .with_summary(field.description.as_deref());
    entry.deprecated = field.is_deprecated;
    entry
}

fn input_value_entry(value: &Arc<InputValueDef>) -> Entry {
    let detail = match value.default_value.as_deref() {
        Some(default) => format!(": {} = {default}", value.ty),
        None => format!(": {}", value.ty),
    };
    let mut entry = Entry::link(&value.name, detail, LinkTarget::InputValue(Arc::clone(value)))
        .with_summary(value.description.as_deref());
    entry.deprecated = value.is_deprecated;
    entry
}

fn type_ref_entry(ty: &crate::schema::TypeRef) -> Entry {
    Entry::link(
        ty.to_string(),
        "",
        LinkTarget::Type(ty.named_type().to_string()),
    )
}

fn type_links(names: &[String]) -> Vec<Entry> {
    names
        .iter()
        .map(|name| Entry::link(name, "", LinkTarget::Type(name.clone())))
        .collect()
}

fn first_line(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
#[path = "../tests/unit/explorer_tests.rs"]
mod tests;
