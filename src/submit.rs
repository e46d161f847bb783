//! Transport seam for admitted submissions.
//!
//! [`Submitter`] is the crate's only dependency on an HTTP stack: the gate admits a caller,
//! the caller hands over a [`SubmitRequest`], and the submitter owns serialization, the POST,
//! and status interpretation. Implementations never retry and know nothing about rate limits,
//! so a submitter can be swapped (reqwest, in-memory fake, custom stack) without touching the
//! admission path.

pub mod memory;
pub use memory::MemorySubmitter;

// crates.io
#[cfg(feature = "reqwest")]
use reqwest::{
	StatusCode,
	header::{HeaderMap, RETRY_AFTER},
};
use time::{OffsetDateTime, format_description::well_known::Rfc2822};
// self
#[cfg(feature = "reqwest")]
use crate::error::{ConfigError, TransportError};
use crate::{
	_prelude::*,
	document::{Description, Document, Product, Signature},
	error::SubmissionError,
};

/// Production registry endpoint circulation documents are posted to.
pub const CIRCULATION_ENDPOINT: &str = "https://ismp.crpt.ru/api/v3/lk/documents/create";

/// Boxed future returned by [`Submitter::submit`].
pub type SubmitFuture<'a> = Pin<Box<dyn Future<Output = Result<SubmitReceipt>> + 'a + Send>>;

/// Transport contract invoked exactly once per admitted submission.
pub trait Submitter
where
	Self: Send + Sync,
{
	/// Serializes the request, performs the network call, and interprets the registry's
	/// answer. Any status other than 200 must surface as [`SubmissionError::Rejected`].
	fn submit(&self, request: SubmitRequest) -> SubmitFuture<'_>;
}

/// One admitted submission: the document plus its detached signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmitRequest {
	/// Document to put into circulation.
	pub document: Document,
	/// Detached signature over the document.
	pub signature: Signature,
}
impl SubmitRequest {
	/// Pairs a document with its signature.
	pub fn new(document: Document, signature: Signature) -> Self {
		Self { document, signature }
	}

	/// Renders the exact wire payload the registry expects.
	pub fn to_json(&self) -> serde_json::Result<String> {
		serde_json::to_string(&WirePayload::new(self))
	}
}

/// Exact wire shape: scalar document fields, the description block, a one-element `products`
/// array, then the top-level signature.
#[derive(Serialize)]
struct WirePayload<'a> {
	doc_id: &'a str,
	doc_status: &'a str,
	doc_type: &'a str,
	#[serde(rename = "importRequest")]
	import_request: bool,
	owner_inn: &'a str,
	participant_inn: &'a str,
	producer_inn: &'a str,
	production_date: &'a str,
	production_type: &'a str,
	reg_date: &'a str,
	reg_number: &'a str,
	description: &'a Description,
	products: [&'a Product; 1],
	signature: &'a str,
}
impl<'a> WirePayload<'a> {
	fn new(request: &'a SubmitRequest) -> Self {
		let document = &request.document;

		Self {
			doc_id: &document.doc_id,
			doc_status: &document.doc_status,
			doc_type: &document.doc_type,
			import_request: document.import_request,
			owner_inn: &document.owner_inn,
			participant_inn: &document.participant_inn,
			producer_inn: &document.producer_inn,
			production_date: &document.production_date,
			production_type: &document.production_type,
			reg_date: &document.reg_date,
			reg_number: &document.reg_number,
			description: &document.description,
			products: [&document.product],
			signature: request.signature.expose(),
		}
	}
}

/// Receipt for a submission the registry accepted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmitReceipt {
	/// HTTP status code returned by the registry.
	pub status: u16,
	/// Response body, kept verbatim.
	pub body: String,
}

#[cfg(feature = "reqwest")]
/// Reqwest-backed [`Submitter`] posting to a single registry endpoint.
///
/// The inner client pools connections, so clone the submitter freely instead of building one
/// per request.
#[derive(Clone, Debug)]
pub struct ReqwestSubmitter {
	client: ReqwestClient,
	endpoint: Url,
}
#[cfg(feature = "reqwest")]
impl ReqwestSubmitter {
	/// Builds a submitter with a default client against [`CIRCULATION_ENDPOINT`].
	pub fn new() -> Result<Self, ConfigError> {
		Self::with_client(ReqwestClient::default())
	}

	/// Wraps an existing reqwest [`ReqwestClient`], posting to [`CIRCULATION_ENDPOINT`].
	pub fn with_client(client: ReqwestClient) -> Result<Self, ConfigError> {
		let endpoint = Url::parse(CIRCULATION_ENDPOINT)
			.map_err(|source| ConfigError::InvalidEndpoint { source })?;

		Ok(Self { client, endpoint })
	}

	/// Overrides the registry endpoint (test servers, alternate contours).
	pub fn with_endpoint(mut self, endpoint: Url) -> Self {
		self.endpoint = endpoint;

		self
	}

	/// Endpoint this submitter posts to.
	pub fn endpoint(&self) -> &Url {
		&self.endpoint
	}

	async fn submit_now(&self, request: SubmitRequest) -> Result<SubmitReceipt> {
		let response = self
			.client
			.post(self.endpoint.clone())
			.json(&WirePayload::new(&request))
			.send()
			.await
			.map_err(TransportError::from)?;
		let status = response.status();
		let retry_after = retry_after_header(response.headers());
		let body = response.text().await.map_err(TransportError::from)?;

		if status != StatusCode::OK {
			return Err(SubmissionError::Rejected { status: status.as_u16(), body, retry_after }
				.into());
		}

		Ok(SubmitReceipt { status: status.as_u16(), body })
	}
}
#[cfg(feature = "reqwest")]
impl Submitter for ReqwestSubmitter {
	fn submit(&self, request: SubmitRequest) -> SubmitFuture<'_> {
		Box::pin(self.submit_now(request))
	}
}

#[cfg(feature = "reqwest")]
fn retry_after_header(headers: &HeaderMap) -> Option<Duration> {
	parse_retry_after(headers.get(RETRY_AFTER)?.to_str().ok()?)
}

/// Parses a `Retry-After` value, either delay seconds or an RFC 2822 date.
///
/// Returns [`None`] for dates in the past and for values in neither form. Custom
/// [`Submitter`] implementations can reuse this when classifying throttled responses.
pub fn parse_retry_after(raw: &str) -> Option<Duration> {
	let raw = raw.trim();

	if let Ok(secs) = raw.parse::<u64>() {
		return Some(Duration::from_secs(secs));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Duration::try_from(delta).ok();
		}
	}

	None
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::_preludet::{sample_document, sample_signature};

	fn request() -> SubmitRequest {
		SubmitRequest::new(sample_document(), sample_signature())
	}

	#[test]
	fn wire_json_matches_the_registry_contract() {
		let expected = concat!(
			r#"{"doc_id":"123","#,
			r#""doc_status":"ACTIVE","#,
			r#""doc_type":"LP_INTRODUCE_GOODS","#,
			r#""importRequest":true,"#,
			r#""owner_inn":"123456789","#,
			r#""participant_inn":"987654321","#,
			r#""producer_inn":"123456789","#,
			r#""production_date":"2020-01-23","#,
			r#""production_type":"TYPE","#,
			r#""reg_date":"2020-01-23","#,
			r#""reg_number":"REG123","#,
			r#""description":{"participantInn":"987654321"},"#,
			r#""products":[{"certificate_document":"DOC123","#,
			r#""certificate_document_date":"2020-01-23","#,
			r#""certificate_document_number":"NUM123","#,
			r#""owner_inn":"123456789","#,
			r#""producer_inn":"987654321","#,
			r#""production_date":"2020-01-23","#,
			r#""tnved_code":"CODE","#,
			r#""uit_code":"UIT123","#,
			r#""uitu_code":"UITU123"}],"#,
			r#""signature":"c2lnbmF0dXJl"}"#,
		);
		let json = request().to_json().expect("Wire payload should serialize.");

		assert_eq!(json, expected);
	}

	#[test]
	fn wire_products_is_a_single_element_array() {
		let json = request().to_json().expect("Wire payload should serialize.");
		let value: serde_json::Value =
			serde_json::from_str(&json).expect("Wire payload should be valid JSON.");
		let products = value["products"].as_array().expect("Products should decode as an array.");

		assert_eq!(products.len(), 1);
		assert_eq!(products[0]["uit_code"], "UIT123");
		assert_eq!(value["signature"], "c2lnbmF0dXJl");
	}

	#[test]
	fn parse_retry_after_reads_delay_seconds() {
		assert_eq!(parse_retry_after("30"), Some(Duration::from_secs(30)));
		assert_eq!(parse_retry_after(" 5 "), Some(Duration::from_secs(5)));
	}

	#[test]
	fn parse_retry_after_reads_future_http_dates() {
		let moment = OffsetDateTime::now_utc() + time::Duration::minutes(5);
		let raw = moment.format(&Rfc2822).expect("RFC 2822 formatting should succeed.");
		let parsed = parse_retry_after(&raw).expect("A future date should parse.");

		assert!(parsed <= Duration::from_secs(5 * 60));
		assert!(parsed >= Duration::from_secs(4 * 60));
	}

	#[test]
	fn parse_retry_after_rejects_past_dates_and_garbage() {
		assert_eq!(parse_retry_after("Mon, 01 Jan 2024 00:00:00 GMT"), None);
		assert_eq!(parse_retry_after("soon"), None);
		assert_eq!(parse_retry_after(""), None);
	}
}
