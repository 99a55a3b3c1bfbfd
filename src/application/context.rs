/// Per-request values the service layer needs but does not own.
///
/// The HTTP adapter builds one context per inbound request and passes it by
/// reference into every service call. It is read-only after construction and
/// is never shared between requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    request_id: Option<String>,
}

impl RequestContext {
    pub fn new(request_id: Option<String>) -> Self {
        Self { request_id }
    }

    pub fn with_request_id(request_id: impl Into<String>) -> Self {
        Self::new(Some(request_id.into()))
    }

    /// Correlation id propagated into published events.
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }
}
