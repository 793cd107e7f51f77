use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::report::ContactReport;

#[derive(Debug, Deserialize)]
pub struct LookupForm {
    #[serde(default)]
    pub session: Option<String>,
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct LookupParams {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct LookupResponse {
    pub query: String,
    pub report: ContactReport,
    pub processing_time_ms: u128,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub category: &'static str,
    pub error: String,
}

impl From<&ApiError> for ErrorBody {
    fn from(err: &ApiError) -> Self {
        ErrorBody {
            category: err.category().as_str(),
            error: err.to_string(),
        }
    }
}
