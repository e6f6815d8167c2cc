//! Wire models for queries and sObject Collections.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sfconnect_client::RequestMethod;

use crate::error::{Error, ErrorKind};

/// A record that can be written through the collections endpoint.
///
/// Implementors serialize with an `"attributes": {"type": ...}` entry naming the
/// sObject type; the id is only required for deletes.
pub trait SalesforceObject: Serialize {
    /// The record id, absent until the record has been persisted.
    fn id(&self) -> Option<&str>;
}

impl SalesforceObject for Value {
    fn id(&self) -> Option<&str> {
        self.get("id")
            .or_else(|| self.get("Id"))
            .and_then(Value::as_str)
    }
}

impl<T: SalesforceObject> SalesforceObject for &T {
    fn id(&self) -> Option<&str> {
        (**self).id()
    }
}

/// Record type discriminator (`"attributes"` on the wire).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SObjectAttributes {
    /// sObject type, e.g. `Account`.
    #[serde(rename = "type")]
    pub object_type: String,
    /// Resource URL; present on query results, never sent.
    #[serde(default, skip_serializing)]
    pub url: Option<String>,
}

impl SObjectAttributes {
    pub fn new(object_type: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            url: None,
        }
    }
}

/// A dynamically typed record: id, type attributes and arbitrary fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SObjectRecord {
    #[serde(
        rename = "id",
        alias = "Id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(default)]
    pub attributes: SObjectAttributes,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl SObjectRecord {
    /// Create an unsaved record of the given sObject type.
    pub fn new(object_type: impl Into<String>) -> Self {
        Self {
            id: None,
            attributes: SObjectAttributes::new(object_type),
            fields: Map::new(),
        }
    }

    /// Set the record id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set a field value.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Get a field value.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// The sObject type.
    pub fn object_type(&self) -> &str {
        &self.attributes.object_type
    }
}

impl SalesforceObject for SObjectRecord {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

/// Kind of data modification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataModificationType {
    Insert,
    Update,
    Delete,
}

impl DataModificationType {
    /// HTTP verb used against the collections endpoint.
    pub fn method(&self) -> RequestMethod {
        match self {
            DataModificationType::Insert => RequestMethod::Post,
            DataModificationType::Update => RequestMethod::Patch,
            DataModificationType::Delete => RequestMethod::Delete,
        }
    }
}

impl fmt::Display for DataModificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DataModificationType::Insert => "insert",
            DataModificationType::Update => "update",
            DataModificationType::Delete => "delete",
        })
    }
}

impl FromStr for DataModificationType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "insert" => Ok(DataModificationType::Insert),
            "update" => Ok(DataModificationType::Update),
            "delete" => Ok(DataModificationType::Delete),
            _ => Err(Error::new(ErrorKind::UnsupportedOperation(format!(
                "unknown data modification type '{}'",
                s
            )))),
        }
    }
}

/// Per-record outcome of a collections request.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DataModificationResult {
    pub id: Option<String>,
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<SalesforceError>,
}

/// Salesforce error in operation results.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SalesforceError {
    #[serde(rename = "statusCode")]
    pub status_code: String,
    pub message: String,
    #[serde(default)]
    pub fields: Vec<String>,
}

/// One page of a SOQL query.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueryResult<T> {
    /// Total number of records matching the query.
    #[serde(rename = "totalSize")]
    pub total_size: u64,

    /// Whether this is the last page.
    pub done: bool,

    /// Continuation URL for the next page.
    #[serde(rename = "nextRecordsUrl", default)]
    pub next_records_url: Option<String>,

    /// The records.
    #[serde(default = "Vec::new")]
    pub records: Vec<T>,
}

/// Body of an insert/update collections request.
#[derive(Debug, Serialize)]
pub struct CollectionRequest<'a, T: Serialize> {
    #[serde(rename = "allOrNone")]
    pub all_or_none: bool,
    pub records: &'a [T],
}
