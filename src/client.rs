// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! HTTP access to the Figma REST API.
//!
//! Document and image resolution requests carry the `X-Figma-Token` header.
//! Rendered payloads are downloaded with a plain request because the
//! resolved URLs are pre-signed.

use std::collections::HashMap;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{config::Secret, document::FigmaFile, error::Error};

const TOKEN_HEADER: &str = "X-Figma-Token";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Response of the image resolution endpoint.
#[derive(Debug, Deserialize)]
struct ImagesResponse {
    #[serde(default)]
    err:    Option<String>,
    #[serde(default)]
    images: HashMap<String, Option<String>>
}

/// Thin async client over the file and image endpoints.
#[derive(Debug, Clone)]
pub struct FigmaClient {
    http:     Client,
    api_base: String,
    token:    Secret
}

impl FigmaClient {
    /// Builds a client targeting `api_base`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when the HTTP client cannot be
    /// constructed.
    pub fn new(api_base: &str, token: &Secret) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|error| Error::configuration(format!("failed to build HTTP client: {error}")))?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_owned(),
            token: token.clone()
        })
    }

    /// Fetches the document of the file identified by `file_key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DocumentFetch`] on transport failures, non-success
    /// statuses or undecodable bodies.
    pub async fn fetch_file(&self, file_key: &str) -> Result<FigmaFile, Error> {
        let url = format!("{}/files/{file_key}", self.api_base);
        debug!("Fetching document {url}");

        let response = self
            .http
            .get(&url)
            .header(TOKEN_HEADER, self.token.expose())
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|error| Error::document_fetch(error.to_string()))?;

        response
            .json::<FigmaFile>()
            .await
            .map_err(|error| Error::document_fetch(format!("invalid document body: {error}")))
    }

    /// Fetches the document, degrading to an empty document on failure.
    ///
    /// The failure is logged. An empty document later surfaces as a
    /// structure error when sections are looked up.
    pub async fn fetch_file_or_empty(&self, file_key: &str) -> FigmaFile {
        match self.fetch_file(file_key).await {
            Ok(file) => file,
            Err(error) => {
                warn!("{}", error.to_display_string());
                FigmaFile::default()
            }
        }
    }

    /// Resolves rendered SVG URLs for `ids` in a single batched call.
    ///
    /// Ids the service omits are absent from the returned map. Ids it could
    /// not render map to `None`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RenderResolution`] on transport failures, non-success
    /// statuses, undecodable bodies, or a service-reported `err`.
    pub async fn resolve_images(
        &self,
        file_key: &str,
        ids: &[&str]
    ) -> Result<HashMap<String, Option<String>>, Error> {
        let url = format!("{}/images/{file_key}", self.api_base);
        let joined = ids.join(",");
        debug!("Resolving {} image URLs", ids.len());

        let response = self
            .http
            .get(&url)
            .header(TOKEN_HEADER, self.token.expose())
            .query(&[("ids", joined.as_str()), ("format", "svg")])
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|error| Error::render_resolution(error.to_string()))?;

        let body = response
            .json::<ImagesResponse>()
            .await
            .map_err(|error| Error::render_resolution(format!("invalid images body: {error}")))?;

        match body.err {
            Some(message) => Err(Error::render_resolution(message)),
            None => Ok(body.images)
        }
    }

    /// Downloads the rendered payload of icon `id` from `url`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IconDownload`] on transport failures, non-success
    /// statuses or unreadable bodies.
    pub async fn download(&self, id: &str, url: &str) -> Result<String, Error> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|error| Error::icon_download(id, error.to_string()))?;

        response
            .text()
            .await
            .map_err(|error| Error::icon_download(id, format!("failed to read body: {error}")))
    }
}

#[cfg(test)]
mod tests {
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path, query_param}
    };

    use super::*;

    fn client(server: &MockServer) -> FigmaClient {
        FigmaClient::new(&format!("{}/", server.uri()), &Secret::new("figd_test"))
            .expect("client builds")
    }

    #[tokio::test]
    async fn fetch_file_sends_token_and_decodes_document() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files/KEY"))
            .and(header("X-Figma-Token", "figd_test"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"name":"Library","document":{"id":"0:0","name":"Document","type":"DOCUMENT","children":[]}}"#
            ))
            .mount(&server)
            .await;

        let file = client(&server).fetch_file("KEY").await.expect("document fetched");
        assert_eq!(file.name, "Library");
        assert!(file.document.is_some());
    }

    #[tokio::test]
    async fn fetch_file_or_empty_degrades_on_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files/KEY"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let client = client(&server);
        let error = client.fetch_file("KEY").await.expect_err("403 must fail");
        assert!(matches!(error, Error::DocumentFetch { .. }));
        assert!(client.fetch_file_or_empty("KEY").await.document.is_none());
    }

    #[tokio::test]
    async fn resolve_images_batches_ids() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/images/KEY"))
            .and(query_param("ids", "1:1,1:2"))
            .and(query_param("format", "svg"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"err":null,"images":{"1:1":"https://cdn.example/1.svg","1:2":null}}"#
            ))
            .expect(1)
            .mount(&server)
            .await;

        let images = client(&server)
            .resolve_images("KEY", &["1:1", "1:2"])
            .await
            .expect("images resolved");
        assert_eq!(images.get("1:1"), Some(&Some("https://cdn.example/1.svg".to_owned())));
        assert_eq!(images.get("1:2"), Some(&None));
    }

    #[tokio::test]
    async fn resolve_images_reports_service_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/images/KEY"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"err":"Render timeout","images":{}}"#)
            )
            .mount(&server)
            .await;

        let error = client(&server)
            .resolve_images("KEY", &["1:1"])
            .await
            .expect_err("service error must fail");
        assert_eq!(
            error.to_display_string(),
            "failed to resolve rendered images: Render timeout"
        );
    }

    #[tokio::test]
    async fn download_maps_status_to_icon_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/render/1.svg"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let url = format!("{}/render/1.svg", server.uri());
        let error = client(&server).download("1:1", &url).await.expect_err("404 must fail");
        match error {
            Error::IconDownload {
                id, ..
            } => assert_eq!(id, "1:1"),
            other => panic!("unexpected error variant: {other:?}")
        }
    }
}
