use crate::error::{ApiError, Result};

/// A validated lookup target: a full URL or a bare domain, trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Query(String);

impl Query {
    /// Validate raw form input. Only trims surrounding whitespace; the text is
    /// otherwise forwarded verbatim.
    pub fn parse(input: &str, require_scheme: bool) -> Result<Query> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ApiError::validation("Please provide a URL or domain."));
        }
        if require_scheme && !has_http_scheme(trimmed) {
            return Err(ApiError::validation(
                "The URL must start with http:// or https://",
            ));
        }
        Ok(Query(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn has_http_scheme(input: &str) -> bool {
    ["http://", "https://"].iter().any(|prefix| {
        input
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    })
}
