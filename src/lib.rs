//! Rate-gated client for the ISMP marking registry - a fixed-window admission gate with blocking
//! backpressure plus the document-circulation wire glue, in one crate built for production.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod client;
pub mod document;
pub mod error;
pub mod gate;
pub mod obs;
pub mod submit;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and fixtures for unit and integration tests; enabled via
	//! `cfg(test)` or the `test` crate feature.

	pub use crate::_prelude::*;

	// self
	#[cfg(feature = "reqwest")]
	use crate::{client::IsmpClient, error::ConfigError, submit::ReqwestSubmitter};
	use crate::document::{Description, Document, Product, Signature};

	#[cfg(feature = "reqwest")]
	/// Client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestClient = IsmpClient<ReqwestSubmitter>;

	#[cfg(feature = "reqwest")]
	/// Constructs an [`IsmpClient`] whose transport posts to the provided endpoint (usually an
	/// `httpmock` server) instead of the production registry.
	pub fn build_reqwest_test_client(
		limit: u32,
		period: Duration,
		endpoint: Url,
	) -> Result<ReqwestTestClient, ConfigError> {
		let submitter = ReqwestSubmitter::new()?.with_endpoint(endpoint);

		IsmpClient::with_submitter(limit, period, submitter)
	}

	/// Circulation document fixture matching the registry's documented example payload.
	pub fn sample_document() -> Document {
		Document {
			doc_id: "123".into(),
			doc_status: "ACTIVE".into(),
			doc_type: "LP_INTRODUCE_GOODS".into(),
			import_request: true,
			owner_inn: "123456789".into(),
			participant_inn: "987654321".into(),
			producer_inn: "123456789".into(),
			production_date: "2020-01-23".into(),
			production_type: "TYPE".into(),
			reg_date: "2020-01-23".into(),
			reg_number: "REG123".into(),
			description: Description { participant_inn: "987654321".into() },
			product: Product {
				certificate_document: "DOC123".into(),
				certificate_document_date: "2020-01-23".into(),
				certificate_document_number: "NUM123".into(),
				owner_inn: "123456789".into(),
				producer_inn: "987654321".into(),
				production_date: "2020-01-23".into(),
				tnved_code: "CODE".into(),
				uit_code: "UIT123".into(),
				uitu_code: "UITU123".into(),
			},
		}
	}

	/// Detached-signature fixture paired with [`sample_document`].
	pub fn sample_signature() -> Signature {
		Signature::new("c2lnbmF0dXJl")
	}
}

mod _prelude {
	pub use std::{
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
		time::Duration,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use tokio::time::Instant;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
