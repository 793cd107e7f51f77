//! Form lifecycle: `Idle -> Submitting -> {Success, Failed} -> Idle`.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use nanoid::nanoid;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::document::ContactResult;
use crate::error::{ApiError, ErrorCategory};
use crate::gateway::GatewayClient;
use crate::query::Query;

/// What the user sees when a cycle fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub category: ErrorCategory,
    pub message: String,
}

impl From<&ApiError> for Failure {
    fn from(err: &ApiError) -> Self {
        Failure {
            category: err.category(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum FormState {
    Idle,
    Submitting {
        query: Query,
    },
    Success {
        query: Query,
        result: Arc<ContactResult>,
        retrieved_at: DateTime<Utc>,
    },
    Failed {
        input: String,
        failure: Failure,
    },
}

#[derive(Debug, Clone)]
pub enum FormEvent {
    InputChanged,
    Submit(Query),
    /// Input failed validation; no request was made.
    Rejected { input: String, failure: Failure },
    ResponseReceived(Arc<ContactResult>),
    ErrorReceived(Failure),
    /// The in-flight submit was dropped before an outcome arrived.
    Abandoned,
}

impl FormState {
    pub fn name(&self) -> &'static str {
        match self {
            FormState::Idle => "idle",
            FormState::Submitting { .. } => "submitting",
            FormState::Success { .. } => "success",
            FormState::Failed { .. } => "failed",
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, FormState::Submitting { .. })
    }

    /// Apply one event. Events that make no sense in the current state leave
    /// it unchanged.
    pub fn transition(self, event: FormEvent) -> FormState {
        match (self, event) {
            (FormState::Submitting { query }, FormEvent::ResponseReceived(result)) => {
                FormState::Success {
                    query,
                    result,
                    retrieved_at: Utc::now(),
                }
            }
            (FormState::Submitting { query }, FormEvent::ErrorReceived(failure)) => {
                FormState::Failed {
                    input: query.to_string(),
                    failure,
                }
            }
            (FormState::Submitting { query }, FormEvent::Abandoned) => {
                tracing::debug!(query = %query, "discarding abandoned submit");
                FormState::Idle
            }
            (state @ FormState::Submitting { .. }, event) => {
                tracing::debug!(?event, "ignoring event while submitting");
                state
            }
            (_, FormEvent::Submit(query)) => FormState::Submitting { query },
            (_, FormEvent::Rejected { input, failure }) => FormState::Failed { input, failure },
            (FormState::Success { .. } | FormState::Failed { .. }, FormEvent::InputChanged) => {
                FormState::Idle
            }
            (state, event) => {
                tracing::debug!(state = state.name(), ?event, "ignoring event");
                state
            }
        }
    }
}

/// One user's form. Drives [`FormState`] through a full submit cycle.
#[derive(Debug)]
pub struct LookupSession {
    id: String,
    state: FormState,
}

impl LookupSession {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: FormState::Idle,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn apply(&mut self, event: FormEvent) -> &FormState {
        let previous = std::mem::replace(&mut self.state, FormState::Idle);
        let from = previous.name();
        self.state = previous.transition(event);
        tracing::debug!(session = %self.id, from, to = self.state.name(), "form transition");
        &self.state
    }

    /// Run one submit cycle. Invalid input fails without a network call.
    ///
    /// `&mut self` rules out a concurrent submit, so a `Submitting` state seen
    /// here was left behind by a cancelled cycle and is reset first.
    pub async fn submit(
        &mut self,
        input: &str,
        gateway: &GatewayClient,
        require_scheme: bool,
    ) -> &FormState {
        if self.state.is_submitting() {
            self.apply(FormEvent::Abandoned);
        }

        let query = match Query::parse(input, require_scheme) {
            Ok(query) => query,
            Err(err) => {
                return self.apply(FormEvent::Rejected {
                    input: input.to_string(),
                    failure: Failure::from(&err),
                });
            }
        };

        self.apply(FormEvent::Submit(query.clone()));
        let event = match gateway.fetch_contacts(&query).await {
            Ok(result) => FormEvent::ResponseReceived(result),
            Err(err) => {
                tracing::warn!(session = %self.id, category = %err.category(), "lookup failed: {err}");
                FormEvent::ErrorReceived(Failure::from(&err))
            }
        };
        self.apply(event)
    }
}

/// Sessions for every open form, keyed by a random id.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<String, Arc<Mutex<LookupSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self) -> Arc<Mutex<LookupSession>> {
        let id = nanoid!();
        let session = Arc::new(Mutex::new(LookupSession::new(id.clone())));
        self.sessions.insert(id, session.clone());
        session
    }

    /// Existing session for `id`, or a fresh one when the id is missing or unknown.
    pub fn get_or_create(&self, id: Option<&str>) -> Arc<Mutex<LookupSession>> {
        match id.and_then(|id| self.sessions.get(id)) {
            Some(entry) => entry.value().clone(),
            None => self.create(),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
