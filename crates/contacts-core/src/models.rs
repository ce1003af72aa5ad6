//! Data models for the contact directory
//!
//! A `Contact` is a named record with an optional phone number and any
//! number of additional free-form fields. Extra fields are flattened into
//! the same JSON object on disk, so a record written by another editor
//! survives a load/save cycle untouched: a missing `phone` stays missing and
//! a `phone` that is not a string is carried as a free-form field.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// The full, ordered set of contacts backing the directory
pub type ContactCollection = Vec<Contact>;

/// A single directory entry
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(try_from = "Map<String, Value>")]
pub struct Contact {
    /// Display name, also the unique key of the collection
    pub name: String,
    /// Phone number as entered (not normalized), `None` when the record has
    /// no string `phone`
    pub phone: Option<String>,
    /// Any other fields supplied by the caller
    pub extra: Map<String, Value>,
}

impl Contact {
    /// Create a contact with a phone number and no extra fields
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: Some(phone.into()),
            extra: Map::new(),
        }
    }

    /// Create a contact with only a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: None,
            extra: Map::new(),
        }
    }

    /// Builder-style variant of [`Contact::set_field`]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_field(key, value);
        self
    }

    /// Set a free-form field, replacing any previous value
    pub fn set_field(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.extra.insert(key.into(), value.into());
    }

    /// Get a free-form field
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// Whether the name is present (non-blank)
    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// Case-insensitive name comparison used by lookups
    pub fn name_matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }

    /// Extra fields that are written out, skipping keys shadowed by `name`
    /// and `phone`
    fn written_extra(&self) -> impl Iterator<Item = (&String, &Value)> + Clone + '_ {
        self.extra.iter().filter(move |(key, _)| match key.as_str() {
            "name" => false,
            "phone" => self.phone.is_none(),
            _ => true,
        })
    }
}

impl Serialize for Contact {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let extra = self.written_extra();
        let len = 1 + usize::from(self.phone.is_some()) + extra.clone().count();

        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("name", &self.name)?;
        if let Some(ref phone) = self.phone {
            map.serialize_entry("phone", phone)?;
        }
        for (key, value) in extra {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl TryFrom<Map<String, Value>> for Contact {
    type Error = String;

    /// Only `name` is checked: it must be present and a string. Everything
    /// else is kept as found.
    fn try_from(mut fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let name = match fields.remove("name") {
            Some(Value::String(name)) => name,
            Some(_) => return Err("`name` is not a string".to_string()),
            None => return Err("missing `name`".to_string()),
        };

        let phone = match fields.remove("phone") {
            Some(Value::String(phone)) => Some(phone),
            Some(other) => {
                fields.insert("phone".to_string(), other);
                None
            }
            None => None,
        };

        Ok(Self {
            name,
            phone,
            extra: fields,
        })
    }
}
