//! License assignment sources.
//!
//! A [`LicenseSource`] hands out one page of assignments at a time;
//! [`collect_licenses`] walks every page of every product sequentially.

pub mod google;

use async_trait::async_trait;
use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::error::{FetchFailure, PartialResult, SourceError};
use crate::models::LicenseRecord;

pub use google::GoogleLicenseClient;

/// One page of license assignments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LicensePage {
    pub items: Vec<LicenseRecord>,
    pub next_page_token: Option<String>,
}

#[async_trait]
pub trait LicenseSource: Send + Sync {
    async fn list_licenses_for_product(
        &self,
        product_id: &str,
        customer_id: &str,
        page_token: Option<&str>,
    ) -> Result<LicensePage, SourceError>;
}

/// Fetch all assignments for `product_ids`, one page at a time.
///
/// A failed page stops that product's pagination (pages already fetched are
/// kept) and is recorded as a [`FetchFailure`]; the remaining products are
/// still fetched. A page token that comes back a second time is recorded the
/// same way.
pub async fn collect_licenses(
    source: &dyn LicenseSource,
    product_ids: &[String],
    customer_id: &str,
) -> PartialResult<Vec<LicenseRecord>, FetchFailure> {
    let mut records = Vec::new();
    let mut failures = Vec::new();

    for product_id in product_ids {
        let mut page_token: Option<String> = None;
        let mut seen_tokens: HashSet<String> = HashSet::new();
        let mut page = 0usize;
        let before = records.len();

        loop {
            match source
                .list_licenses_for_product(product_id, customer_id, page_token.as_deref())
                .await
            {
                Ok(result) => {
                    debug!(product_id = %product_id, page, items = result.items.len(), "Fetched license page");
                    records.extend(result.items);
                    match result.next_page_token {
                        Some(token) if !token.is_empty() => {
                            if !seen_tokens.insert(token.clone()) {
                                warn!(product_id = %product_id, page, "Licensing API repeated a page token");
                                failures.push(FetchFailure {
                                    product_id: product_id.clone(),
                                    page: page + 1,
                                    message: format!("page token {token:?} was already requested"),
                                });
                                break;
                            }
                            page_token = Some(token);
                            page += 1;
                        }
                        _ => break,
                    }
                }
                Err(e) => {
                    warn!(product_id = %product_id, page, error = %e, "Failed to fetch license page");
                    failures.push(FetchFailure {
                        product_id: product_id.clone(),
                        page,
                        message: e.to_string(),
                    });
                    break;
                }
            }
        }

        info!(product_id = %product_id, assignments = records.len() - before, "Collected license assignments");
    }

    PartialResult::new(records, failures)
}
