//! Page/size/result-set bookkeeping shared by local and remote listings

use crate::{FetchError, ListingPage, PaginatorError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where slicing and filtering happen. Fixed when the controller is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaginatorMode {
    /// The full result set is held locally and sliced here
    Client,
    /// The remote service slices; the controller mirrors its pages
    Server,
}

impl fmt::Display for PaginatorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaginatorMode::Client => f.write_str("client"),
            PaginatorMode::Server => f.write_str("server"),
        }
    }
}

/// Data accepted by [`PaginationController::set_paginator_data`]
#[derive(Debug, Clone, PartialEq)]
pub enum PaginatorPayload<T> {
    /// Complete list, paged locally
    Local(Vec<T>),
    /// One page as returned by the remote service
    Remote(ListingPage<T>),
}

impl<T> PaginatorPayload<T> {
    fn kind(&self) -> &'static str {
        match self {
            PaginatorPayload::Local(_) => "local",
            PaginatorPayload::Remote(_) => "remote",
        }
    }
}

/// Observable paginator state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatorState<T> {
    pub data: Vec<T>,
    pub page_data: Vec<T>,
    pub current_page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub disabled: bool,
    pub mode: PaginatorMode,
    #[serde(skip)]
    pub last_error: Option<PaginatorError>,
}

/// Result of slicing a list into one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow<T> {
    pub page_data: Vec<T>,
    pub current_page: usize,
    pub total_pages: usize,
}

/// Slice `items` into the page `page` of `page_size` rows.
///
/// `page` is clamped into `[1, max(total_pages, 1)]`. A zero `page_size` is
/// treated as one row per page.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> PageWindow<T> {
    let page_size = page_size.max(1);
    let total_pages = items.len().div_ceil(page_size);
    let current_page = clamp_page(page, total_pages);
    let start = (current_page - 1) * page_size;
    let end = (start + page_size).min(items.len());

    PageWindow {
        page_data: items.get(start..end).map(<[T]>::to_vec).unwrap_or_default(),
        current_page,
        total_pages,
    }
}

fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Pagination controller
///
/// Holds page, size and result-set state for one list. In client mode the
/// controller slices the data it was given; in server mode it stores pages
/// verbatim as the remote service returns them.
#[derive(Debug, Clone)]
pub struct PaginationController<T> {
    state: PaginatorState<T>,
}

impl<T: Clone> PaginationController<T> {
    pub fn new(mode: PaginatorMode, page_size: usize) -> Self {
        Self {
            state: PaginatorState {
                data: Vec::new(),
                page_data: Vec::new(),
                current_page: 1,
                page_size: page_size.max(1),
                total_pages: 0,
                disabled: false,
                mode,
                last_error: None,
            },
        }
    }

    pub fn client(page_size: usize) -> Self {
        Self::new(PaginatorMode::Client, page_size)
    }

    pub fn server(page_size: usize) -> Self {
        Self::new(PaginatorMode::Server, page_size)
    }

    pub fn state(&self) -> &PaginatorState<T> {
        &self.state
    }

    pub fn mode(&self) -> PaginatorMode {
        self.state.mode
    }

    pub fn page_data(&self) -> &[T] {
        &self.state.page_data
    }

    pub fn current_page(&self) -> usize {
        self.state.current_page
    }

    pub fn page_size(&self) -> usize {
        self.state.page_size
    }

    pub fn total_pages(&self) -> usize {
        self.state.total_pages
    }

    pub fn is_disabled(&self) -> bool {
        self.state.disabled
    }

    pub fn last_error(&self) -> Option<&PaginatorError> {
        self.state.last_error.as_ref()
    }

    /// Change the page size; always returns to the first page
    pub fn set_page_size(&mut self, page_size: usize) -> Result<()> {
        if page_size == 0 {
            return Err(PaginatorError::InvalidPageSize);
        }

        self.state.page_size = page_size;
        self.state.current_page = 1;
        if self.state.mode == PaginatorMode::Client {
            self.recompute();
        }
        Ok(())
    }

    /// Move to `page`, clamped into range. Returns the page actually selected.
    pub fn set_current_page(&mut self, page: usize) -> usize {
        self.state.current_page = clamp_page(page, self.state.total_pages);
        if self.state.mode == PaginatorMode::Client {
            self.recompute();
        }
        self.state.current_page
    }

    /// Replace the data behind the paginator.
    ///
    /// Client controllers accept only [`PaginatorPayload::Local`], server
    /// controllers only [`PaginatorPayload::Remote`].
    pub fn set_paginator_data(&mut self, payload: PaginatorPayload<T>) -> Result<()> {
        match (self.state.mode, payload) {
            (PaginatorMode::Client, PaginatorPayload::Local(data)) => {
                self.state.data = data;
                self.recompute();
            }
            (PaginatorMode::Server, PaginatorPayload::Remote(page)) => {
                self.state.total_pages = page.total_pages;
                self.state.current_page = clamp_page(page.current_page, page.total_pages);
                self.state.page_data = page.items.clone();
                self.state.data = page.items;
            }
            (mode, payload) => {
                return Err(PaginatorError::ModeMismatch {
                    mode,
                    payload: payload.kind(),
                });
            }
        }

        self.state.disabled = false;
        self.state.last_error = None;
        Ok(())
    }

    pub fn set_disable_paginator(&mut self, disabled: bool) {
        self.state.disabled = disabled;
    }

    /// Record a failed remote fetch: the paginator is re-enabled and the
    /// error kept until the next successful load.
    pub fn record_failure(&mut self, err: FetchError) {
        log::error!("Paginator fetch failed: {err}");
        self.state.disabled = false;
        self.state.last_error = Some(PaginatorError::Fetch(err));
    }

    fn recompute(&mut self) {
        let window = paginate(&self.state.data, self.state.current_page, self.state.page_size);
        self.state.page_data = window.page_data;
        self.state.current_page = window.current_page;
        self.state.total_pages = window.total_pages;
    }
}
