//! Record shapes and their schema
//!
//! Each [`RecordShape`] is declared once as a list of [`FieldSpec`]s. The MongoDB
//! `$jsonSchema` validator and the in-process validator used by the memory store
//! are both derived from that list, so both backends accept and reject exactly
//! the same documents.

use bson::{doc, Bson, Document};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use thiserror::Error;

/// Identifier field assigned by the store.
pub const ID_FIELD: &str = "_id";

/// Type of a declared field.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// Non-empty string.
    String,
    /// Embedded document with its own declared fields and no extras.
    Object(&'static [FieldSpec]),
}

/// A required field of a record shape.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub description: &'static str,
}

const NAME_FIELD: FieldSpec = FieldSpec {
    name: "name",
    kind: FieldKind::String,
    description: "'name' is required and is a non-empty string",
};

const URL_FIELD: FieldSpec = FieldSpec {
    name: "url",
    kind: FieldKind::String,
    description: "'url' is required and is a non-empty string",
};

const HOSTED_IMAGE_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "publicId",
        kind: FieldKind::String,
        description: "'publicId' is required and is a non-empty string",
    },
    URL_FIELD,
];

const HOSTED_FIELDS: &[FieldSpec] = &[
    NAME_FIELD,
    FieldSpec {
        name: "image",
        kind: FieldKind::Object(HOSTED_IMAGE_FIELDS),
        description: "'image' is required and holds the media host 'publicId' and 'url'",
    },
];

const DIRECT_FIELDS: &[FieldSpec] = &[NAME_FIELD, URL_FIELD];

/// Which record layout the service stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordShape {
    /// `name` + `image { publicId, url }`, bytes kept on a media host.
    Hosted,
    /// `name` + `url` supplied by the client.
    Direct,
}

/// Reason a document does not match its record shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaViolation {
    #[error("missing required field '{0}'")]
    MissingField(String),

    #[error("field '{0}' is not allowed")]
    UnexpectedField(String),

    #[error("field '{path}' must be of type {expected}")]
    WrongType { path: String, expected: &'static str },

    #[error("field '{0}' must not be empty")]
    EmptyString(String),
}

impl RecordShape {
    /// Declared top-level fields.
    pub fn fields(&self) -> &'static [FieldSpec] {
        match self {
            RecordShape::Hosted => HOSTED_FIELDS,
            RecordShape::Direct => DIRECT_FIELDS,
        }
    }

    /// Whether records of this shape reference a media host object.
    pub fn uses_media_host(&self) -> bool {
        matches!(self, RecordShape::Hosted)
    }

    /// Collection validator document (`{ "$jsonSchema": ... }`).
    pub fn validator(&self) -> Document {
        doc! { "$jsonSchema": object_schema(self.fields(), true) }
    }

    /// Check a full record document (with or without `_id`) against the shape.
    pub fn validate(&self, document: &Document) -> Result<(), SchemaViolation> {
        check_object(self.fields(), document, None, true)
    }
}

impl FromStr for RecordShape {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hosted" => Ok(RecordShape::Hosted),
            "direct" => Ok(RecordShape::Direct),
            _ => Err(anyhow::anyhow!("Invalid record shape: {}", s)),
        }
    }
}

impl Display for RecordShape {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            RecordShape::Hosted => write!(f, "hosted"),
            RecordShape::Direct => write!(f, "direct"),
        }
    }
}

fn object_schema(fields: &[FieldSpec], allow_id: bool) -> Document {
    let mut properties = Document::new();
    if allow_id {
        properties.insert(ID_FIELD, Document::new());
    }
    for field in fields {
        properties.insert(field.name, field_schema(field));
    }

    doc! {
        "bsonType": "object",
        "required": fields.iter().map(|f| f.name).collect::<Vec<_>>(),
        "additionalProperties": false,
        "properties": properties,
    }
}

fn field_schema(field: &FieldSpec) -> Document {
    match field.kind {
        FieldKind::String => doc! {
            "bsonType": "string",
            "minLength": 1,
            "description": field.description,
        },
        FieldKind::Object(children) => {
            let mut schema = object_schema(children, false);
            schema.insert("description", field.description);
            schema
        }
    }
}

fn join_path(prefix: Option<&str>, key: &str) -> String {
    match prefix {
        Some(prefix) => format!("{}.{}", prefix, key),
        None => key.to_string(),
    }
}

fn check_object(
    fields: &[FieldSpec],
    document: &Document,
    prefix: Option<&str>,
    allow_id: bool,
) -> Result<(), SchemaViolation> {
    for field in fields {
        let path = join_path(prefix, field.name);
        match document.get(field.name) {
            Some(value) => check_value(field, value, &path)?,
            None => return Err(SchemaViolation::MissingField(path)),
        }
    }

    for key in document.keys() {
        if allow_id && key == ID_FIELD {
            continue;
        }
        if !fields.iter().any(|f| f.name == key) {
            return Err(SchemaViolation::UnexpectedField(join_path(prefix, key)));
        }
    }

    Ok(())
}

fn check_value(field: &FieldSpec, value: &Bson, path: &str) -> Result<(), SchemaViolation> {
    match (field.kind, value) {
        (FieldKind::String, Bson::String(s)) if s.is_empty() => {
            Err(SchemaViolation::EmptyString(path.to_string()))
        }
        (FieldKind::String, Bson::String(_)) => Ok(()),
        (FieldKind::String, _) => Err(SchemaViolation::WrongType {
            path: path.to_string(),
            expected: "string",
        }),
        (FieldKind::Object(children), Bson::Document(inner)) => {
            check_object(children, inner, Some(path), false)
        }
        (FieldKind::Object(_), _) => Err(SchemaViolation::WrongType {
            path: path.to_string(),
            expected: "object",
        }),
    }
}
