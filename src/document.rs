//! Loosely typed view over the contact API's response.
//!
//! The provider never committed to a schema, so each category we care about
//! has a list of alternate key names tried in order. All of that guessing
//! lives here; callers only see the accessors.

use serde_json::{Map, Value};

pub const EMAIL_KEYS: &[&str] = &["emails", "email"];
pub const PHONE_KEYS: &[&str] = &["phones", "phone"];
pub const SOCIAL_KEYS: &[&str] = &["socials", "social_links"];
pub const PAGE_KEYS: &[&str] = &["pages", "results"];

pub const PAGE_URL_KEYS: &[&str] = &["url", "page_url"];
pub const PAGE_SNIPPET_KEYS: &[&str] = &["snippet", "text"];

/// Keys tried, in order, to turn an object inside a contact list into a
/// single display value.
pub const ITEM_VALUE_KEYS: &[&str] = &["url", "value"];

/// Successful response body. Never mutated after it is received.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactResult {
    fields: Map<String, Value>,
    /// Keys that sat next to a `data` envelope.
    envelope: Map<String, Value>,
    raw: Value,
}

impl ContactResult {
    pub fn new(fields: Map<String, Value>) -> Self {
        let raw = Value::Object(fields.clone());
        Self {
            fields,
            envelope: Map::new(),
            raw,
        }
    }

    /// Result whose contact fields came from inside an envelope. `raw` is the
    /// body exactly as received.
    pub fn unwrapped(fields: Map<String, Value>, envelope: Map<String, Value>, raw: Value) -> Self {
        Self {
            fields,
            envelope,
            raw,
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn emails(&self) -> Vec<&Value> {
        self.list_field(EMAIL_KEYS)
    }

    pub fn phones(&self) -> Vec<&Value> {
        self.list_field(PHONE_KEYS)
    }

    pub fn socials(&self) -> Vec<&Value> {
        self.list_field(SOCIAL_KEYS)
    }

    pub fn pages(&self) -> Vec<&Value> {
        self.list_field(PAGE_KEYS)
    }

    /// Fields that belong to none of the known categories, including the
    /// envelope's siblings. Inner fields win on a name clash.
    pub fn residual(&self) -> Map<String, Value> {
        let mut residual: Map<String, Value> = self
            .fields
            .iter()
            .filter(|(key, _)| !is_recognized_key(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        for (key, value) in &self.envelope {
            residual
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
        residual
    }

    fn list_field(&self, keys: &[&str]) -> Vec<&Value> {
        match first_present(&self.fields, keys) {
            Some(Value::Array(items)) => items.iter().collect(),
            Some(other) => vec![other],
            None => Vec::new(),
        }
    }
}

impl From<Map<String, Value>> for ContactResult {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}

/// First key in `keys` whose value is non-empty. Null, `false`, `""`, `[]`
/// and `{}` all count as empty and fall through to the next alternate.
pub fn first_present<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find(|value| !is_empty_value(value))
}

/// Same as [`first_present`] but only accepts string values.
pub fn first_present_str<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .filter_map(Value::as_str)
        .find(|s| !s.is_empty())
}

pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Number(_) => false,
    }
}

fn is_recognized_key(key: &str) -> bool {
    [EMAIL_KEYS, PHONE_KEYS, SOCIAL_KEYS, PAGE_KEYS]
        .iter()
        .any(|keys| keys.contains(&key))
}
