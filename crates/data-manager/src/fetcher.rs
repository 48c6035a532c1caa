//! Remote listing service contract used by the server-mode page source

use crate::FetchError;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Page requested from the listing service (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
    pub number: usize,
    pub size: usize,
}

/// Label filter forwarded to the listing service
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ListFilter {
    pub label: String,
}

impl ListFilter {
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

/// One page as answered by the listing service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPage<T> {
    pub items: Vec<T>,
    pub current_page: usize,
    pub total_pages: usize,
}

impl<T> ListingPage<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            current_page: 1,
            total_pages: 0,
        }
    }
}

/// Device/template listing service
pub trait ListingService<T> {
    fn list(
        &self,
        page: PageQuery,
        filter: &ListFilter,
    ) -> impl Future<Output = Result<ListingPage<T>, FetchError>>;
}
