//! Data Manager crate for the widget wizard
//! Pages and filters the lists the wizard steps render, either locally or by
//! delegating to a remote listing service.

pub mod debounce;
pub mod fetcher;
pub mod page_source;
pub mod paginator;

use thiserror::Error;
use widget_wizard_shared::WizardError;

pub use debounce::{Debouncer, Moment};
#[cfg(not(target_arch = "wasm32"))]
pub use debounce::run_debounced;
pub use fetcher::{ListFilter, ListingPage, ListingService, PageQuery};
pub use page_source::{ClientPageSource, FetchOutcome, FetchTicket, PageRequest, PageSource, RemotePageSource};
pub use paginator::{paginate, PageWindow, PaginationController, PaginatorMode, PaginatorPayload, PaginatorState};

/// Page size used when none is configured
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Opaque failure reported by a remote listing service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct FetchError {
    pub message: String,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Pagination errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaginatorError {
    #[error("{payload} payload given to a {mode} paginator")]
    ModeMismatch {
        mode: PaginatorMode,
        payload: &'static str,
    },

    #[error("Page size must be greater than zero")]
    InvalidPageSize,

    #[error("Remote fetch failed: {0}")]
    Fetch(#[from] FetchError),
}

pub type Result<T> = std::result::Result<T, PaginatorError>;

impl From<PaginatorError> for WizardError {
    fn from(err: PaginatorError) -> Self {
        match err {
            PaginatorError::Fetch(fetch) => WizardError::Fetch {
                message: fetch.message,
            },
            other => WizardError::Paginator {
                message: other.to_string(),
            },
        }
    }
}

impl From<FetchError> for WizardError {
    fn from(err: FetchError) -> Self {
        WizardError::Fetch {
            message: err.message,
        }
    }
}
