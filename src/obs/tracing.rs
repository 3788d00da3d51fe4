// self
use crate::{_prelude::*, obs::Operation};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedRequest<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedRequest<F> = F;

/// A span wrapping one API request.
#[derive(Clone, Debug)]
pub struct RequestSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl RequestSpan {
	/// Creates a new span tagged with the operation, HTTP method, and endpoint path.
	pub fn new(operation: Operation, method: &Method, path: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"pivnet_client.request",
				operation = operation.as_str(),
				method = method.as_str(),
				path,
				status = tracing::field::Empty,
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (operation, method, path);

			Self {}
		}
	}

	/// Records the HTTP status on the span once the transport returns.
	pub fn record_status(&self, status: u16) {
		#[cfg(feature = "tracing")]
		{
			self.span.record("status", status);

			tracing::debug!(parent: &self.span, status, "Received response.");
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = status;
		}
	}

	/// Emits a debug event describing the outgoing request. The token is never logged.
	pub fn record_dispatch(&self, url: &Url) {
		#[cfg(feature = "tracing")]
		{
			tracing::debug!(parent: &self.span, url = url.as_str(), "Making request.");
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = url;
		}
	}

	/// Emits a debug event describing a failed request.
	pub fn record_failure(&self, error: &Error) {
		#[cfg(feature = "tracing")]
		{
			tracing::debug!(parent: &self.span, error = %error, "Request failed.");
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = error;
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedRequest<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}
