//! Circulation document model, its builder, and the detached signature wrapper.
//!
//! Dates and classifier codes are carried as verbatim strings: the registry treats them as
//! opaque text and round-tripping them untouched keeps submissions byte-stable.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
// self
use crate::_prelude::*;

/// Errors produced by [`DocumentBuilder`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum DocumentBuilderError {
	/// Issued when a required field was never supplied.
	#[error("Document field `{field}` is required.")]
	MissingField {
		/// Wire name of the missing field.
		field: String,
	},
}

/// Goods-circulation document accepted by the registry.
///
/// One document covers exactly one product; the registry's wire format still expects a
/// `products` array, which the submit layer produces from [`Document::product`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
	/// Document identifier.
	pub doc_id: String,
	/// Document status label.
	pub doc_status: String,
	/// Document type label (e.g. `LP_INTRODUCE_GOODS`).
	pub doc_type: String,
	/// Marks the document as an import request.
	#[serde(rename = "importRequest")]
	pub import_request: bool,
	/// Owner INN.
	pub owner_inn: String,
	/// Participant INN.
	pub participant_inn: String,
	/// Producer INN.
	pub producer_inn: String,
	/// Production date, verbatim `YYYY-MM-DD` text.
	pub production_date: String,
	/// Production type label.
	pub production_type: String,
	/// Registration date, verbatim `YYYY-MM-DD` text.
	pub reg_date: String,
	/// Registration number.
	pub reg_number: String,
	/// Participant description block.
	pub description: Description,
	/// The single product covered by this document.
	pub product: Product,
}
impl Document {
	/// Returns a builder collecting the document fields.
	pub fn builder() -> DocumentBuilder {
		DocumentBuilder::default()
	}
}

/// Participant description block nested in the document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
	/// Participant INN, serialized under the registry's camel-case key.
	#[serde(rename = "participantInn")]
	pub participant_inn: String,
}

/// Product entry carried by a circulation document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
	/// Certificate document code.
	pub certificate_document: String,
	/// Certificate document date, verbatim `YYYY-MM-DD` text.
	pub certificate_document_date: String,
	/// Certificate document number.
	pub certificate_document_number: String,
	/// Owner INN.
	pub owner_inn: String,
	/// Producer INN.
	pub producer_inn: String,
	/// Production date, verbatim `YYYY-MM-DD` text.
	pub production_date: String,
	/// TNVED classifier code.
	pub tnved_code: String,
	/// Unit identification code.
	pub uit_code: String,
	/// Packaging unit identification code.
	pub uitu_code: String,
}

/// Builder for [`Document`].
///
/// Every field is required; [`DocumentBuilder::build`] reports the first missing one by its
/// wire name.
#[derive(Clone, Debug, Default)]
pub struct DocumentBuilder {
	doc_id: Option<String>,
	doc_status: Option<String>,
	doc_type: Option<String>,
	import_request: Option<bool>,
	owner_inn: Option<String>,
	participant_inn: Option<String>,
	producer_inn: Option<String>,
	production_date: Option<String>,
	production_type: Option<String>,
	reg_date: Option<String>,
	reg_number: Option<String>,
	description: Option<Description>,
	product: Option<Product>,
}
impl DocumentBuilder {
	/// Sets the document identifier.
	pub fn doc_id(mut self, value: impl Into<String>) -> Self {
		self.doc_id = Some(value.into());

		self
	}

	/// Sets the document status label.
	pub fn doc_status(mut self, value: impl Into<String>) -> Self {
		self.doc_status = Some(value.into());

		self
	}

	/// Sets the document type label.
	pub fn doc_type(mut self, value: impl Into<String>) -> Self {
		self.doc_type = Some(value.into());

		self
	}

	/// Marks or unmarks the document as an import request.
	pub fn import_request(mut self, value: bool) -> Self {
		self.import_request = Some(value);

		self
	}

	/// Sets the owner INN.
	pub fn owner_inn(mut self, value: impl Into<String>) -> Self {
		self.owner_inn = Some(value.into());

		self
	}

	/// Sets the participant INN.
	pub fn participant_inn(mut self, value: impl Into<String>) -> Self {
		self.participant_inn = Some(value.into());

		self
	}

	/// Sets the producer INN.
	pub fn producer_inn(mut self, value: impl Into<String>) -> Self {
		self.producer_inn = Some(value.into());

		self
	}

	/// Sets the production date.
	pub fn production_date(mut self, value: impl Into<String>) -> Self {
		self.production_date = Some(value.into());

		self
	}

	/// Sets the production type label.
	pub fn production_type(mut self, value: impl Into<String>) -> Self {
		self.production_type = Some(value.into());

		self
	}

	/// Sets the registration date.
	pub fn reg_date(mut self, value: impl Into<String>) -> Self {
		self.reg_date = Some(value.into());

		self
	}

	/// Sets the registration number.
	pub fn reg_number(mut self, value: impl Into<String>) -> Self {
		self.reg_number = Some(value.into());

		self
	}

	/// Sets the participant description block.
	pub fn description(mut self, value: Description) -> Self {
		self.description = Some(value);

		self
	}

	/// Sets the product entry.
	pub fn product(mut self, value: Product) -> Self {
		self.product = Some(value);

		self
	}

	/// Consumes the builder and produces a [`Document`].
	pub fn build(self) -> Result<Document, DocumentBuilderError> {
		Ok(Document {
			doc_id: required(self.doc_id, "doc_id")?,
			doc_status: required(self.doc_status, "doc_status")?,
			doc_type: required(self.doc_type, "doc_type")?,
			import_request: required(self.import_request, "importRequest")?,
			owner_inn: required(self.owner_inn, "owner_inn")?,
			participant_inn: required(self.participant_inn, "participant_inn")?,
			producer_inn: required(self.producer_inn, "producer_inn")?,
			production_date: required(self.production_date, "production_date")?,
			production_type: required(self.production_type, "production_type")?,
			reg_date: required(self.reg_date, "reg_date")?,
			reg_number: required(self.reg_number, "reg_number")?,
			description: required(self.description, "description")?,
			product: required(self.product, "products")?,
		})
	}
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, DocumentBuilderError> {
	value.ok_or_else(|| DocumentBuilderError::MissingField { field: field.into() })
}

/// Redacted detached-signature wrapper keeping signing material out of logs.
///
/// The crate never produces or verifies signatures; callers obtain the detached signature
/// elsewhere and hand it over as an opaque string.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature(String);
impl Signature {
	/// Wraps an already-encoded signature string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Encodes raw signature bytes with standard base64.
	pub fn from_bytes(bytes: impl AsRef<[u8]>) -> Self {
		Self(STANDARD.encode(bytes))
	}

	/// Returns the inner signature value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for Signature {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for Signature {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("Signature").field(&"<redacted>").finish()
	}
}
impl Display for Signature {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn description() -> Description {
		Description { participant_inn: "987654321".into() }
	}

	fn product() -> Product {
		Product {
			certificate_document: "DOC123".into(),
			certificate_document_date: "2020-01-23".into(),
			certificate_document_number: "NUM123".into(),
			owner_inn: "123456789".into(),
			producer_inn: "987654321".into(),
			production_date: "2020-01-23".into(),
			tnved_code: "CODE".into(),
			uit_code: "UIT123".into(),
			uitu_code: "UITU123".into(),
		}
	}

	#[test]
	fn builder_reports_the_first_missing_field_by_wire_name() {
		assert_eq!(
			Document::builder().build(),
			Err(DocumentBuilderError::MissingField { field: "doc_id".into() })
		);
		assert_eq!(
			Document::builder().doc_id("123").build(),
			Err(DocumentBuilderError::MissingField { field: "doc_status".into() })
		);
		assert_eq!(
			Document::builder().doc_id("123").doc_status("ACTIVE").build(),
			Err(DocumentBuilderError::MissingField { field: "doc_type".into() })
		);
	}

	#[test]
	fn builder_produces_a_complete_document() {
		let document = Document::builder()
			.doc_id("123")
			.doc_status("ACTIVE")
			.doc_type("LP_INTRODUCE_GOODS")
			.import_request(true)
			.owner_inn("123456789")
			.participant_inn("987654321")
			.producer_inn("123456789")
			.production_date("2020-01-23")
			.production_type("TYPE")
			.reg_date("2020-01-23")
			.reg_number("REG123")
			.description(description())
			.product(product())
			.build()
			.expect("Document builder should succeed with every field supplied.");

		assert_eq!(document.doc_id, "123");
		assert_eq!(document.doc_type, "LP_INTRODUCE_GOODS");
		assert!(document.import_request);
		assert_eq!(document.description.participant_inn, "987654321");
		assert_eq!(document.product.uit_code, "UIT123");
	}

	#[test]
	fn signature_formatters_redact() {
		let signature = Signature::new("super-secret");

		assert_eq!(format!("{signature:?}"), "Signature(\"<redacted>\")");
		assert_eq!(format!("{signature}"), "<redacted>");
	}

	#[test]
	fn signature_from_bytes_encodes_standard_base64() {
		assert_eq!(Signature::from_bytes(b"signature").expose(), "c2lnbmF0dXJl");
	}
}
