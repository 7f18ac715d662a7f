//! Host-framework integration seam for the exchange middleware.

// std
use std::collections::BTreeMap;
// crates.io
use serde_json::{Map, Value};

/// Request-scoped view handed to the exchange handler by the host framework.
///
/// Implementations expose the parsed request body, the per-request attribute store
/// where the host deposits the authenticated client, and the response mutators the
/// handler writes through on success. The trait is intentionally free of any HTTP
/// framework types so hosts can adapt whatever request/response pair they own.
pub trait ExchangeContext
where
	Self: Send,
{
	/// Parsed request body, when a body-parsing layer ran upstream of the handler.
	fn body(&self) -> Option<&Map<String, Value>>;

	/// Per-request attribute previously stored under `name`.
	fn attribute(&self, name: &str) -> Option<&Value>;

	/// Sets a response header.
	fn set_header(&mut self, name: &'static str, value: &'static str);

	/// Writes the serialized response body.
	fn set_body(&mut self, body: String);
}

/// Buffered [`ExchangeContext`] implementation.
///
/// Useful for hosts that assemble responses before flushing them to a transport,
/// and for exercising the handler in tests without a real HTTP stack.
#[derive(Clone, Debug, Default)]
pub struct BufferedContext {
	body: Option<Map<String, Value>>,
	attributes: Map<String, Value>,
	headers: BTreeMap<&'static str, &'static str>,
	response_body: Option<String>,
}
impl BufferedContext {
	/// Creates an empty context with no parsed body.
	pub fn new() -> Self {
		Self::default()
	}

	/// Replaces the parsed request body.
	pub fn with_body(mut self, body: Map<String, Value>) -> Self {
		self.body = Some(body);

		self
	}

	/// Stores a per-request attribute.
	pub fn with_attribute(mut self, name: impl Into<String>, value: Value) -> Self {
		self.attributes.insert(name.into(), value);

		self
	}

	/// Response headers set by the handler so far.
	pub fn headers(&self) -> &BTreeMap<&'static str, &'static str> {
		&self.headers
	}

	/// Serialized response body written by the handler, if any.
	pub fn response_body(&self) -> Option<&str> {
		self.response_body.as_deref()
	}
}
impl ExchangeContext for BufferedContext {
	fn body(&self) -> Option<&Map<String, Value>> {
		self.body.as_ref()
	}

	fn attribute(&self, name: &str) -> Option<&Value> {
		self.attributes.get(name)
	}

	fn set_header(&mut self, name: &'static str, value: &'static str) {
		self.headers.insert(name, value);
	}

	fn set_body(&mut self, body: String) {
		self.response_body = Some(body);
	}
}
