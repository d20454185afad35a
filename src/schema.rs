use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::error::SchemaError;

const BUILTIN_SCALARS: [&str; 5] = ["String", "Int", "Float", "Boolean", "ID"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
}

impl TypeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Object => "type",
            Self::Interface => "interface",
            Self::Union => "union",
            Self::Enum => "enum",
            Self::InputObject => "input",
        }
    }
}

/// A type reference as it appears on fields and arguments, e.g. `[Post!]!`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    /// The innermost named type, with list and non-null wrappers stripped.
    pub fn named_type(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::List(inner) | Self::NonNull(inner) => inner.named_type(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::List(inner) => write!(f, "[{inner}]"),
            Self::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDef {
    pub name: String,
    pub kind: TypeKind,
    pub description: Option<String>,
    pub specified_by_url: Option<String>,
    pub fields: Vec<Arc<FieldDef>>,
    pub input_fields: Vec<Arc<InputValueDef>>,
    pub enum_values: Vec<EnumValueDef>,
    pub interfaces: Vec<String>,
    pub possible_types: Vec<String>,
}

impl TypeDef {
    pub fn field(&self, name: &str) -> Option<&Arc<FieldDef>> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn input_field(&self, name: &str) -> Option<&Arc<InputValueDef>> {
        self.input_fields.iter().find(|field| field.name == name)
    }

    pub fn has_fields(&self) -> bool {
        matches!(self.kind, TypeKind::Object | TypeKind::Interface)
    }

    pub fn is_introspection(&self) -> bool {
        self.name.starts_with("__")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub description: Option<String>,
    pub ty: TypeRef,
    pub args: Vec<Arc<InputValueDef>>,
    pub deprecation_reason: Option<String>,
    pub is_deprecated: bool,
}

impl FieldDef {
    pub fn arg(&self, name: &str) -> Option<&Arc<InputValueDef>> {
        self.args.iter().find(|arg| arg.name == name)
    }
}

/// An argument of a field or a field of an input object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputValueDef {
    pub name: String,
    pub description: Option<String>,
    pub ty: TypeRef,
    pub default_value: Option<String>,
    pub deprecation_reason: Option<String>,
    pub is_deprecated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValueDef {
    pub name: String,
    pub description: Option<String>,
    pub deprecation_reason: Option<String>,
    pub is_deprecated: bool,
}

/// An immutable schema graph. A refetch produces a new `Schema`; nothing mutates one in place.
#[derive(Debug, Clone)]
pub struct Schema {
    description: Option<String>,
    query_type: Option<String>,
    mutation_type: Option<String>,
    subscription_type: Option<String>,
    types: Vec<Arc<TypeDef>>,
    index: HashMap<String, usize>,
}

impl Schema {
    /// Parses a GraphQL introspection result. Accepts both the full response shape
    /// (`{"data": {"__schema": ...}}`) and the bare `{"__schema": ...}` object.
    pub fn from_introspection_str(text: &str) -> Result<Self, SchemaError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_introspection_value(value)
    }

    pub fn from_introspection_value(mut value: Value) -> Result<Self, SchemaError> {
        let raw = if let Some(schema) = value.pointer_mut("/data/__schema") {
            schema.take()
        } else if let Some(schema) = value.get_mut("__schema") {
            schema.take()
        } else {
            return Err(SchemaError::MissingSchema);
        };
        let raw: IntrospectionSchema = serde_json::from_value(raw)?;
        raw.into_schema()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn types(&self) -> &[Arc<TypeDef>] {
        &self.types
    }

    pub fn type_by_name(&self, name: &str) -> Option<&Arc<TypeDef>> {
        self.index.get(name).map(|idx| &self.types[*idx])
    }

    pub fn query_type_name(&self) -> Option<&str> {
        self.query_type.as_deref()
    }

    pub fn mutation_type_name(&self) -> Option<&str> {
        self.mutation_type.as_deref()
    }

    pub fn subscription_type_name(&self) -> Option<&str> {
        self.subscription_type.as_deref()
    }

    /// Root operation types in `query`, `mutation`, `subscription` order, skipping absent ones.
    pub fn root_types(&self) -> Vec<(&'static str, &str)> {
        [
            ("query", self.query_type.as_deref()),
            ("mutation", self.mutation_type.as_deref()),
            ("subscription", self.subscription_type.as_deref()),
        ]
        .into_iter()
        .filter_map(|(operation, name)| name.map(|name| (operation, name)))
        .collect()
    }

    pub fn is_root_type(&self, name: &str) -> bool {
        self.root_types().iter().any(|(_, root)| *root == name)
    }

    /// Structural problems that make the schema unusable for browsing. An empty result
    /// means the schema is valid as far as the explorer cares.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();
        for ty in &self.types {
            if !seen.insert(ty.name.as_str()) {
                errors.push(format!("There can be only one type named \"{}\".", ty.name));
            }
        }

        match self.query_type.as_deref() {
            None => errors.push("Query root type must be provided.".to_string()),
            Some(name) => self.check_root(&mut errors, "Query", name),
        }
        if let Some(name) = self.mutation_type.as_deref() {
            self.check_root(&mut errors, "Mutation", name);
        }
        if let Some(name) = self.subscription_type.as_deref() {
            self.check_root(&mut errors, "Subscription", name);
        }

        for ty in &self.types {
            for field in &ty.fields {
                let subject = format!("Field \"{}.{}\"", ty.name, field.name);
                self.check_ref(&mut errors, &subject, &field.ty);
                for arg in &field.args {
                    self.check_ref(
                        &mut errors,
                        &format!("Argument \"{}.{}({}:)\"", ty.name, field.name, arg.name),
                        &arg.ty,
                    );
                }
            }
            for input in &ty.input_fields {
                let subject = format!("Input field \"{}.{}\"", ty.name, input.name);
                self.check_ref(&mut errors, &subject, &input.ty);
            }
            for name in ty.interfaces.iter().chain(&ty.possible_types) {
                if !self.is_known_type(name) {
                    errors.push(format!(
                        "Type \"{}\" references unknown type \"{name}\".",
                        ty.name
                    ));
                }
            }
        }
        errors
    }

    fn check_root(&self, errors: &mut Vec<String>, operation: &str, name: &str) {
        match self.type_by_name(name) {
            None => errors.push(format!(
                "{operation} root type \"{name}\" does not exist in the schema."
            )),
            Some(ty) if ty.kind != TypeKind::Object => errors.push(format!(
                "{operation} root type must be Object type, it cannot be {name}."
            )),
            Some(_) => {}
        }
    }

    fn check_ref(&self, errors: &mut Vec<String>, subject: &str, ty: &TypeRef) {
        let name = ty.named_type();
        if !self.is_known_type(name) {
            errors.push(format!("{subject} references unknown type \"{name}\"."));
        }
    }

    fn is_known_type(&self, name: &str) -> bool {
        self.index.contains_key(name) || BUILTIN_SCALARS.contains(&name)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntrospectionSchema {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    query_type: Option<RootTypeName>,
    #[serde(default)]
    mutation_type: Option<RootTypeName>,
    #[serde(default)]
    subscription_type: Option<RootTypeName>,
    #[serde(default)]
    types: Vec<IntrospectionType>,
}

#[derive(Debug, Deserialize)]
struct RootTypeName {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntrospectionType {
    kind: TypeKind,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, rename = "specifiedByURL")]
    specified_by_url: Option<String>,
    #[serde(default)]
    fields: Option<Vec<IntrospectionField>>,
    #[serde(default)]
    input_fields: Option<Vec<IntrospectionInputValue>>,
    #[serde(default)]
    interfaces: Option<Vec<IntrospectionTypeRef>>,
    #[serde(default)]
    enum_values: Option<Vec<IntrospectionEnumValue>>,
    #[serde(default)]
    possible_types: Option<Vec<IntrospectionTypeRef>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntrospectionField {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    args: Vec<IntrospectionInputValue>,
    #[serde(rename = "type")]
    ty: IntrospectionTypeRef,
    #[serde(default)]
    is_deprecated: bool,
    #[serde(default)]
    deprecation_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntrospectionInputValue {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(rename = "type")]
    ty: IntrospectionTypeRef,
    #[serde(default)]
    default_value: Option<String>,
    #[serde(default)]
    is_deprecated: bool,
    #[serde(default)]
    deprecation_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntrospectionEnumValue {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    is_deprecated: bool,
    #[serde(default)]
    deprecation_reason: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum RefKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    List,
    NonNull,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntrospectionTypeRef {
    kind: RefKind,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    of_type: Option<Box<IntrospectionTypeRef>>,
}

impl IntrospectionSchema {
    fn into_schema(self) -> Result<Schema, SchemaError> {
        let mut types = Vec::with_capacity(self.types.len());
        let mut index = HashMap::with_capacity(self.types.len());
        for raw in self.types {
            let ty = raw.into_type_def()?;
            index.entry(ty.name.clone()).or_insert(types.len());
            types.push(Arc::new(ty));
        }
        Ok(Schema {
            description: self.description,
            query_type: self.query_type.map(|root| root.name),
            mutation_type: self.mutation_type.map(|root| root.name),
            subscription_type: self.subscription_type.map(|root| root.name),
            types,
            index,
        })
    }
}

impl IntrospectionType {
    fn into_type_def(self) -> Result<TypeDef, SchemaError> {
        let fields = self
            .fields
            .unwrap_or_default()
            .into_iter()
            .map(|field| field.into_field_def().map(Arc::new))
            .collect::<Result<Vec<_>, _>>()?;
        let input_fields = self
            .input_fields
            .unwrap_or_default()
            .into_iter()
            .map(|value| value.into_input_value_def().map(Arc::new))
            .collect::<Result<Vec<_>, _>>()?;
        let enum_values = self
            .enum_values
            .unwrap_or_default()
            .into_iter()
            .map(|value| EnumValueDef {
                name: value.name,
                description: value.description,
                deprecation_reason: value.deprecation_reason,
                is_deprecated: value.is_deprecated,
            })
            .collect();
        let interfaces = named_refs(self.interfaces.unwrap_or_default(), &self.name)?;
        let possible_types = named_refs(self.possible_types.unwrap_or_default(), &self.name)?;
        Ok(TypeDef {
            name: self.name,
            kind: self.kind,
            description: self.description,
            specified_by_url: self.specified_by_url,
            fields,
            input_fields,
            enum_values,
            interfaces,
            possible_types,
        })
    }
}

impl IntrospectionField {
    fn into_field_def(self) -> Result<FieldDef, SchemaError> {
        let args = self
            .args
            .into_iter()
            .map(|arg| arg.into_input_value_def().map(Arc::new))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(FieldDef {
            ty: self.ty.into_type_ref()?,
            name: self.name,
            description: self.description,
            args,
            deprecation_reason: self.deprecation_reason,
            is_deprecated: self.is_deprecated,
        })
    }
}

impl IntrospectionInputValue {
    fn into_input_value_def(self) -> Result<InputValueDef, SchemaError> {
        Ok(InputValueDef {
            ty: self.ty.into_type_ref()?,
            name: self.name,
            description: self.description,
            default_value: self.default_value,
            deprecation_reason: self.deprecation_reason,
            is_deprecated: self.is_deprecated,
        })
    }
}

impl IntrospectionTypeRef {
    fn into_type_ref(self) -> Result<TypeRef, SchemaError> {
        match self.kind {
            RefKind::List | RefKind::NonNull => {
                let Some(inner) = self.of_type else {
                    return Err(SchemaError::Malformed(format!(
                        "{:?} type reference without ofType",
                        self.kind
                    )));
                };
                let inner = Box::new(inner.into_type_ref()?);
                Ok(if self.kind == RefKind::List {
                    TypeRef::List(inner)
                } else {
                    TypeRef::NonNull(inner)
                })
            }
            _ => self.name.map(TypeRef::Named).ok_or_else(|| {
                SchemaError::Malformed("named type reference without a name".to_string())
            }),
        }
    }
}

fn named_refs(refs: Vec<IntrospectionTypeRef>, owner: &str) -> Result<Vec<String>, SchemaError> {
    refs.into_iter()
        .map(|raw| {
            raw.name.ok_or_else(|| {
                SchemaError::Malformed(format!("type \"{owner}\" lists an unnamed related type"))
            })
        })
        .collect()
}


#[cfg(test)]
#[path = "../tests/unit/schema_tests.rs"]
mod tests;
