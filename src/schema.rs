//! Parsed schema tree, as handed over by the schema parser.
//!
//! The shapes follow the JSON the DBML parser emits (`tables`, `refs`,
//! `enums`, camelCase endpoint keys), so a host can pass the parser output
//! straight through `serde_json`.

use serde::{Deserialize, Serialize};

/// Top-level parser output: one or more schemas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Database {
    #[serde(default)]
    pub schemas: Vec<Schema>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tables: Vec<Table>,
    #[serde(default)]
    pub refs: Vec<Ref>,
    #[serde(default)]
    pub enums: Vec<Enum>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type", default)]
    pub typ: FieldType,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub pk: bool,
    #[serde(default)]
    pub not_null: bool,
}

/// Column type. The parser emits `{ "type_name": "int" }`; a bare string is
/// accepted too.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldType {
    #[default]
    Unknown,
    Name(String),
    Detailed {
        type_name: String,
        #[serde(default)]
        args: Option<String>,
    },
}

impl FieldType {
    pub fn name(&self) -> &str {
        match self {
            FieldType::Unknown => "",
            FieldType::Name(name) => name,
            FieldType::Detailed { type_name, .. } => type_name,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ref {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub table_name: String,
    #[serde(default)]
    pub field_names: Vec<String>,
    #[serde(default)]
    pub relation: Cardinality,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Cardinality {
    #[default]
    One, // 1
    Many, // *
}

impl TryFrom<String> for Cardinality {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "1" | "one" => Ok(Self::One),
            "*" | "many" => Ok(Self::Many),
            other => Err(format!("unknown relation marker: {other}")),
        }
    }
}

impl From<Cardinality> for String {
    fn from(value: Cardinality) -> Self {
        match value {
            Cardinality::One => "1".into(),
            Cardinality::Many => "*".into(),
        }
    }
}

/// Enums are carried through for completeness; the diagram does not draw them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Enum {
    pub name: String,
    #[serde(default)]
    pub values: Vec<EnumValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnumValue {
    pub name: String,
}

impl Schema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }

    pub fn with_table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    pub fn with_ref(mut self, reference: Ref) -> Self {
        self.refs.push(reference);
        self
    }
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, typ: impl Into<String>) -> Self {
        self.fields.push(Field {
            name: name.into(),
            typ: FieldType::Name(typ.into()),
            ..Default::default()
        });
        self
    }
}

impl Ref {
    /// `left.field > right.field` style reference between two single fields.
    pub fn between(
        left: (&str, &str, Cardinality),
        right: (&str, &str, Cardinality),
    ) -> Self {
        Self {
            name: String::new(),
            endpoints: vec![
                Endpoint::new(left.0, [left.1], left.2),
                Endpoint::new(right.0, [right.1], right.2),
            ],
        }
    }
}

impl Endpoint {
    pub fn new<I, S>(table: impl Into<String>, fields: I, relation: Cardinality) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            table_name: table.into(),
            field_names: fields.into_iter().map(Into::into).collect(),
            relation,
        }
    }
}
