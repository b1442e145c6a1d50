//! Hotmart club API HTTP client.

use std::time::Duration;

use reqwest::{header, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::api::player::extract_master_playlist_url;
use crate::api::types::*;
use crate::error::{Error, Result};

/// Club API base URL.
const CLUB_API_BASE: &str = "https://api-club.hotmart.com/hot-club-api/rest/v3";

/// Security API base URL (token introspection).
const SEC_API_BASE: &str = "https://api-sec-vlc.hotmart.com";

/// Request timeout, matching the original client configuration.
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Hotmart API client. Immutable after construction; the session token is
/// fixed for the client's lifetime.
pub struct HotmartApi {
    client: Client,
    access_token: String,
}

impl HotmartApi {
    /// Create a new API client for an authenticated session.
    pub fn new(access_token: String, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Api(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            access_token,
        })
    }

    /// Build an authenticated request against a course's club.
    fn club_request(&self, url: &str, subdomain: &str) -> RequestBuilder {
        self.client
            .get(url)
            .bearer_auth(&self.access_token)
            .header("Club", subdomain)
            .header(header::REFERER, "https://hotmart.com")
    }

    /// Send a request and deserialize its JSON body.
    async fn get_json<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();

        tracing::debug!("{} response status: {}", what, status);

        if status == 401 || status == 403 {
            return Err(Error::Authentication(format!(
                "HTTP {} while fetching {}",
                status, what
            )));
        }

        let text = response.text().await?;

        if !status.is_success() {
            return Err(Error::Api(format!(
                "Failed to fetch {}: HTTP {}",
                what, status
            )));
        }

        serde_json::from_str(&text)
            .map_err(|e| Error::Api(format!("Failed to parse {}: {}", what, e)))
    }

    /// List the account's purchased courses, with display names resolved
    /// through the membership endpoint.
    pub async fn list_courses(&self) -> Result<Vec<Course>> {
        let url = format!("{}/security/oauth/check_token", SEC_API_BASE);
        let check: CheckTokenResponse = self
            .get_json(
                self.client.get(&url).query(&[("token", &self.access_token)]),
                "token check",
            )
            .await?;

        let mut courses = Vec::with_capacity(check.resources.len());

        for entry in check.resources {
            let subdomain = entry.resource.subdomain;
            let membership: MembershipResponse = self
                .get_json(
                    self.club_request(&format!("{}/membership", CLUB_API_BASE), &subdomain),
                    "membership",
                )
                .await?;

            courses.push(Course {
                name: membership.name,
                subdomain,
            });
        }

        Ok(courses)
    }

    /// Get the module/page tree of a course, in API order.
    pub async fn get_modules(&self, subdomain: &str) -> Result<Vec<Module>> {
        let nav: NavigationResponse = self
            .get_json(
                self.club_request(&format!("{}/navigation", CLUB_API_BASE), subdomain),
                "navigation",
            )
            .await?;

        Ok(nav.modules)
    }

    /// Get one page's media sources and attachments.
    pub async fn get_page(&self, subdomain: &str, hash: &str) -> Result<PageDetail> {
        self.get_json(
            self.club_request(&format!("{}/page/{}", CLUB_API_BASE, hash), subdomain),
            "page",
        )
        .await
    }

    /// Resolve an attachment reference to its direct download URL.
    pub async fn get_attachment_url(&self, subdomain: &str, id: &str) -> Result<String> {
        let download: AttachmentDownload = self
            .get_json(
                self.club_request(
                    &format!("{}/attachment/{}/download", CLUB_API_BASE, id),
                    subdomain,
                ),
                "attachment",
            )
            .await?;

        Ok(download.direct_download_url)
    }

    /// Fetch the embedded player page for a media source and scrape the
    /// master playlist URL out of it.
    pub async fn get_master_playlist_url(
        &self,
        subdomain: &str,
        media_src_url: &str,
    ) -> Result<String> {
        let response = self.club_request(media_src_url, subdomain).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(Error::Api(format!(
                "Failed to fetch player page: HTTP {}",
                status
            )));
        }

        let html = response.text().await?;
        extract_master_playlist_url(&html)
    }

    /// Download a file from a URL, returning the streaming response.
    pub async fn download_file(&self, url: &str) -> Result<Response> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(Error::Download(format!(
                "Failed to download file: HTTP {}",
                response.status()
            )));
        }

        Ok(response)
    }
}
