//! Demonstrates pushing a burst of circulation documents through a five-per-second admission
//! gate against a mock registry, printing how long the gate held each submission back.

// std
use std::time::{Duration, Instant};
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use ismp_gate::{
	client::IsmpClient,
	document::{Description, Document, Product, Signature},
	submit::ReqwestSubmitter,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let registry_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/v3/lk/documents/create");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"value\":\"demo-document\"}");
		})
		.await;
	let submitter = ReqwestSubmitter::new()?
		.with_endpoint(Url::parse(&server.url("/api/v3/lk/documents/create"))?);
	let client = IsmpClient::with_submitter(5, Duration::from_secs(1), submitter)?;
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
		.description(Description { participant_inn: "987654321".into() })
		.product(Product {
			certificate_document: "DOC123".into(),
			certificate_document_date: "2020-01-23".into(),
			certificate_document_number: "NUM123".into(),
			owner_inn: "123456789".into(),
			producer_inn: "987654321".into(),
			production_date: "2020-01-23".into(),
			tnved_code: "CODE".into(),
			uit_code: "UIT123".into(),
			uitu_code: "UITU123".into(),
		})
		.build()?;
	let signature = Signature::new("c2lnbmF0dXJl");

	for attempt in 1..=10 {
		let started = Instant::now();
		let receipt = client.put_into_circulation(document.clone(), signature.clone()).await?;

		println!(
			"Submission {attempt:>2} accepted after {:?} with body {}.",
			started.elapsed(),
			receipt.body
		);
	}

	registry_mock.assert_calls_async(10).await;

	Ok(())
}
