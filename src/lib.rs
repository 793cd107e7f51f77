pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod gateway;
pub mod output;
pub mod query;
pub mod report;
pub mod session;

pub use config::{ApiCredentials, Config, GatewaySettings};
pub use document::ContactResult;
pub use error::{ApiError, ErrorCategory};
pub use gateway::GatewayClient;
pub use query::Query;
pub use report::ContactReport;
