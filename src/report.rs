use serde::Serialize;
use serde_json::{Map, Value};

use crate::document::{
    ContactResult, ITEM_VALUE_KEYS, PAGE_SNIPPET_KEYS, PAGE_URL_KEYS, first_present_str,
};

pub const MAX_PAGES: usize = 20;
pub const MAX_SNIPPET_CHARS: usize = 300;
pub const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    Emails,
    Phones,
    Socials,
}

impl CategoryKind {
    pub fn title(&self) -> &'static str {
        match self {
            CategoryKind::Emails => "Emails",
            CategoryKind::Phones => "Phone numbers",
            CategoryKind::Socials => "Social links",
        }
    }

    fn none_found(&self) -> &'static str {
        match self {
            CategoryKind::Emails => "No emails found (field 'emails' missing or empty).",
            CategoryKind::Phones => "No phone numbers found (field 'phones' missing or empty).",
            CategoryKind::Socials => "No social links found (field 'socials' missing or empty).",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub kind: CategoryKind,
    pub items: Vec<String>,
}

impl Category {
    fn new(kind: CategoryKind, values: Vec<&Value>) -> Self {
        Self {
            kind,
            items: values.into_iter().map(display_item).collect(),
        }
    }

    /// `Some` only when the category has nothing to show.
    pub fn none_found_message(&self) -> Option<&'static str> {
        if self.items.is_empty() {
            Some(self.kind.none_found())
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageEntry {
    pub url: Option<String>,
    pub snippet: Option<String>,
}

/// Display model for one successful lookup.
#[derive(Debug, Clone, Serialize)]
pub struct ContactReport {
    pub emails: Category,
    pub phones: Category,
    pub socials: Category,
    pub pages: Vec<PageEntry>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub residual: Map<String, Value>,
    pub raw: Value,
}

impl ContactReport {
    pub fn from_result(result: &ContactResult) -> Self {
        let pages = result
            .pages()
            .into_iter()
            .take(MAX_PAGES)
            .map(page_entry)
            .collect();

        ContactReport {
            emails: Category::new(CategoryKind::Emails, result.emails()),
            phones: Category::new(CategoryKind::Phones, result.phones()),
            socials: Category::new(CategoryKind::Socials, result.socials()),
            pages,
            residual: result.residual(),
            raw: result.raw().clone(),
        }
    }

    pub fn categories(&self) -> [&Category; 3] {
        [&self.emails, &self.phones, &self.socials]
    }

    pub fn raw_pretty(&self) -> String {
        pretty(&self.raw)
    }

    pub fn residual_pretty(&self) -> Option<String> {
        if self.residual.is_empty() {
            None
        } else {
            Some(pretty(&Value::Object(self.residual.clone())))
        }
    }
}

/// Strings are shown verbatim; objects by `url`, then `value`, then a compact dump.
pub fn display_item(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(obj) => first_present_str(obj, ITEM_VALUE_KEYS)
            .map(str::to_string)
            .unwrap_or_else(|| value.to_string()),
        other => other.to_string(),
    }
}

/// Cuts `text` to at most [`MAX_SNIPPET_CHARS`] characters, appending
/// [`ELLIPSIS`] only when something was dropped.
pub fn truncate_snippet(text: &str) -> String {
    match text.char_indices().nth(MAX_SNIPPET_CHARS) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}

fn page_entry(value: &Value) -> PageEntry {
    match value {
        Value::Object(obj) => PageEntry {
            url: first_present_str(obj, PAGE_URL_KEYS).map(str::to_string),
            snippet: first_present_str(obj, PAGE_SNIPPET_KEYS).map(truncate_snippet),
        },
        Value::String(s) => PageEntry {
            url: Some(s.clone()),
            snippet: None,
        },
        other => PageEntry {
            url: Some(other.to_string()),
            snippet: None,
        },
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
