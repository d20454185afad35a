use std::sync::Arc;

use crate::schema::{FieldDef, InputValueDef, Schema, TypeDef, TypeKind};

pub const ROOT_CRUMB_NAME: &str = "Docs";

#[derive(Debug, Clone, PartialEq)]
pub enum Def {
    Schema,
    Type(Arc<TypeDef>),
    Field(Arc<FieldDef>),
    InputValue(Arc<InputValueDef>),
}

impl Def {
    fn member(&self, name: &str) -> Option<Def> {
        match self {
            Def::Type(ty) if ty.has_fields() => ty.field(name).cloned().map(Def::Field),
            Def::Type(ty) if ty.kind == TypeKind::InputObject => {
                ty.input_field(name).cloned().map(Def::InputValue)
            }
            Def::Field(field) => field.arg(name).cloned().map(Def::InputValue),
            _ => None,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Def::Schema => None,
            Def::Type(ty) => ty.description.as_deref(),
            Def::Field(field) => field.description.as_deref(),
            Def::InputValue(value) => value.description.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Crumb {
    pub name: String,
    pub def: Def,
}

impl Crumb {
    pub fn new(name: impl Into<String>, def: Def) -> Self {
        Self {
            name: name.into(),
            def,
        }
    }

    pub fn root() -> Self {
        Self::new(ROOT_CRUMB_NAME, Def::Schema)
    }

    pub fn for_type(ty: &Arc<TypeDef>) -> Self {
        Self::new(ty.name.clone(), Def::Type(Arc::clone(ty)))
    }

    pub fn for_field(field: &Arc<FieldDef>) -> Self {
        Self::new(field.name.clone(), Def::Field(Arc::clone(field)))
    }

    pub fn for_input_value(value: &Arc<InputValueDef>) -> Self {
        Self::new(value.name.clone(), Def::InputValue(Arc::clone(value)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub kept: usize,
    pub dropped: usize,
}

/// Root-first path from the schema to the member on screen. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct NavStack {
    crumbs: Vec<Crumb>,
}

impl Default for NavStack {
    fn default() -> Self {
        Self {
            crumbs: vec![Crumb::root()],
        }
    }
}

impl NavStack {
    pub fn crumbs(&self) -> &[Crumb] {
        &self.crumbs
    }

    pub fn len(&self) -> usize {
        self.crumbs.len()
    }

    pub fn current(&self) -> &Crumb {
        self.crumbs
            .last()
            .expect("nav stack should always keep its root crumb")
    }

    pub fn parent(&self) -> Option<&Crumb> {
        self.crumbs.len().checked_sub(2).map(|idx| &self.crumbs[idx])
    }

    pub fn is_at_root(&self) -> bool {
        self.crumbs.len() == 1
    }

    pub fn push(&mut self, crumb: Crumb) {
        self.crumbs.push(crumb);
    }

    pub fn pop(&mut self) -> Option<Crumb> {
        if self.is_at_root() {
            return None;
        }
        self.crumbs.pop()
    }

    pub fn reset(&mut self) {
        self.truncate(1);
    }

    pub fn truncate(&mut self, len: usize) {
        self.crumbs.truncate(len.max(1));
    }

    /// Re-resolves every crumb by name against `schema` and truncates at the first one that
    /// no longer resolves. A type crumb under a field or input value must still be that
    /// member's named type; a member crumb must keep its kind.
    pub fn reconcile(&mut self, schema: &Schema) -> ReconcileOutcome {
        let before = self.crumbs.len();
        let mut idx = 1;
        while idx < self.crumbs.len() {
            let crumb = &self.crumbs[idx];
            let parent = &self.crumbs[idx - 1].def;
            let resolved = match &crumb.def {
                Def::Schema => None,
                Def::Type(_) => match parent {
                    Def::Field(field) if field.ty.named_type() != crumb.name => None,
                    Def::InputValue(value) if value.ty.named_type() != crumb.name => None,
                    _ => schema.type_by_name(&crumb.name).cloned().map(Def::Type),
                },
                Def::Field(_) => match parent.member(&crumb.name) {
                    Some(def @ Def::Field(_)) => Some(def),
                    _ => None,
                },
                Def::InputValue(_) => match parent.member(&crumb.name) {
                    Some(def @ Def::InputValue(_)) => Some(def),
                    _ => None,
                },
            };
            match resolved {
                Some(def) => {
                    self.crumbs[idx].def = def;
                    idx += 1;
                }
                None => {
                    tracing::debug!(
                        crumb = %self.crumbs[idx].name,
                        depth = idx,
                        "crumb no longer resolves; trimming nav stack"
                    );
                    self.crumbs.truncate(idx);
                    break;
                }
            }
        }
        ReconcileOutcome {
            kept: self.crumbs.len(),
            dropped: before - self.crumbs.len(),
        }
    }

    /// Returns how many segments resolved; a field's named type is entered implicitly.
    pub fn open_path(&mut self, schema: &Schema, segments: &[&str]) -> usize {
        self.reset();
        let mut resolved = 0;
        for segment in segments {
            let segment = segment.trim();
            if segment.is_empty() {
                break;
            }
            let Some(crumbs) = resolve_segment(schema, &self.current().def, segment) else {
                break;
            };
            self.crumbs.extend(crumbs);
            resolved += 1;
        }
        resolved
    }
}

/// Splits a dotted path such as `Query.user.id` into its non-blank segments.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('.')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect()
}

fn resolve_segment(schema: &Schema, current: &Def, segment: &str) -> Option<Vec<Crumb>> {
    if let Def::Schema = current {
        return schema
            .type_by_name(segment)
            .map(|ty| vec![Crumb::for_type(ty)]);
    }
    if let Some(def) = current.member(segment) {
        return Some(vec![Crumb::new(segment, def)]);
    }
    let named = match current {
        Def::Field(field) => field.ty.named_type(),
        Def::InputValue(value) => value.ty.named_type(),
        Def::Schema | Def::Type(_) => return None,
    };
    let ty = schema.type_by_name(named)?;
    let type_crumb = Crumb::for_type(ty);
    let member = type_crumb.def.member(segment)?;
    Some(vec![type_crumb, Crumb::new(segment, member)])
}

#[cfg(test)]
#[path = "../tests/unit/nav_stack_tests.rs"]
mod tests;
