use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::SourceError;
use crate::models::LicenseRecord;
use crate::source::{LicensePage, LicenseSource};

pub const DEFAULT_API_BASE_URL: &str = "https://licensing.googleapis.com";
const MAX_RESULTS: &str = "1000";

/// Client for the Enterprise License Manager API.
///
/// Token minting is handled elsewhere; this client only needs a bearer token.
#[derive(Clone)]
pub struct GoogleLicenseClient {
    client: Client,
    base_url: String,
    access_token: String,
}

impl std::fmt::Debug for GoogleLicenseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleLicenseClient")
            .field("base_url", &self.base_url)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LicenseAssignmentList {
    #[serde(default)]
    items: Vec<LicenseAssignmentItem>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LicenseAssignmentItem {
    user_id: String,
    sku_id: String,
    product_id: String,
}

impl GoogleLicenseClient {
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        }
    }

    /// Read the bearer token from the environment variable `token_env`.
    pub fn from_env(base_url: impl Into<String>, token_env: &str) -> Result<Self, SourceError> {
        let token = std::env::var(token_env)
            .ok()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| SourceError::MissingToken(format!("{token_env} is not set")))?;
        Ok(Self::new(base_url, token))
    }

    fn product_users_url(&self, product_id: &str) -> String {
        format!(
            "{}/apps/licensing/v1/product/{}/users",
            self.base_url, product_id
        )
    }
}

#[async_trait]
impl LicenseSource for GoogleLicenseClient {
    async fn list_licenses_for_product(
        &self,
        product_id: &str,
        customer_id: &str,
        page_token: Option<&str>,
    ) -> Result<LicensePage, SourceError> {
        let mut query = vec![("customerId", customer_id), ("maxResults", MAX_RESULTS)];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        debug!(product_id, has_page_token = page_token.is_some(), "Requesting license page");

        let response = self
            .client
            .get(self.product_users_url(product_id))
            .bearer_auth(&self.access_token)
            .query(&query)
            .send()
            .await
            .map_err(|e| SourceError::Http(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let list: LicenseAssignmentList = response
            .json()
            .await
            .map_err(|e| SourceError::Http(e.without_url()))?;
        let items = list
            .items
            .into_iter()
            .map(|item| LicenseRecord {
                user_id: item.user_id,
                sku_id: item.sku_id,
                product_id: item.product_id,
            })
            .collect();

        Ok(LicensePage {
            items,
            next_page_token: list.next_page_token,
        })
    }
}
