//! Mock assistant for testing.

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{Assistant, AssistantRequest};
use crate::error::AssistantError;

/// A configurable reply for [`MockAssistant`].
#[derive(Clone, Debug)]
pub enum MockReply {
    /// Return this message content.
    Content(String),
    /// Fail with a non-success status.
    Status(u16),
}

/// A hand-rolled mock implementing [`Assistant`] for tests.
///
/// Always answers with the same reply, counts calls and keeps the last
/// request for inspection.
pub struct MockAssistant {
    reply: MockReply,
    last_request: Mutex<Option<AssistantRequest>>,
    call_count: AtomicUsize,
}

impl MockAssistant {
    /// Create a mock that always returns `reply`.
    pub fn new(reply: MockReply) -> Self {
        Self {
            reply,
            last_request: Mutex::new(None),
            call_count: AtomicUsize::new(0),
        }
    }

    /// Mock answering with the given JSON value.
    pub fn replying(value: serde_json::Value) -> Self {
        Self::new(MockReply::Content(value.to_string()))
    }

    /// Mock failing every call.
    pub fn failing(status: u16) -> Self {
        Self::new(MockReply::Status(status))
    }

    /// How many times `complete()` has been called.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<AssistantRequest> {
        self.last_request
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
    }
}

impl Assistant for MockAssistant {
    fn name(&self) -> &str {
        "mock"
    }

    fn complete<'a>(
        &'a self,
        request: &'a AssistantRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String, AssistantError>> + Send + 'a>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(request.clone());
        }
        let reply = self.reply.clone();

        Box::pin(async move {
            match reply {
                MockReply::Content(content) => Ok(content),
                MockReply::Status(status) => Err(AssistantError::Status {
                    status,
                    body: "mock failure".to_string(),
                }),
            }
        })
    }
}
