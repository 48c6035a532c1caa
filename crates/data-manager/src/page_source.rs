//! Page sources: the capability the wizard steps page through.
//!
//! [`ClientPageSource`] filters and slices a list it already holds.
//! [`RemotePageSource`] mirrors pages fetched from a [`ListingService`] and
//! sequences its requests so that only the newest response is applied.

use crate::{
    FetchError, ListFilter, ListingPage, ListingService, PageQuery, PaginationController,
    PaginatorMode, PaginatorPayload, PaginatorState, Result,
};

/// Uniform page view over either kind of source
pub trait PageSource<T> {
    fn state(&self) -> &PaginatorState<T>;

    fn set_current_page(&mut self, page: usize) -> usize;

    fn set_page_size(&mut self, page_size: usize) -> Result<()>;

    fn page_data(&self) -> &[T] {
        &self.state().page_data
    }

    fn current_page(&self) -> usize {
        self.state().current_page
    }

    fn page_size(&self) -> usize {
        self.state().page_size
    }

    fn total_pages(&self) -> usize {
        self.state().total_pages
    }

    fn is_disabled(&self) -> bool {
        self.state().disabled
    }

    fn mode(&self) -> PaginatorMode {
        self.state().mode
    }
}

type Predicate<T> = Box<dyn Fn(&T) -> bool>;

/// Client-side filtering and slicing over a fetched list
pub struct ClientPageSource<T> {
    controller: PaginationController<T>,
    items: Vec<T>,
    filter: Option<Predicate<T>>,
}

impl<T: Clone> ClientPageSource<T> {
    pub fn new(items: Vec<T>, page_size: usize) -> Self {
        let mut source = Self {
            controller: PaginationController::client(page_size),
            items,
            filter: None,
        };
        source.refilter();
        source
    }

    /// Full, unfiltered list
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Replace the full list, keeping the current filter and page
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.refilter();
    }

    /// Apply a new filter and return to the first page
    pub fn set_filter<F>(&mut self, predicate: F)
    where
        F: Fn(&T) -> bool + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self.controller.set_current_page(1);
        self.refilter();
    }

    pub fn clear_filter(&mut self) {
        self.filter = None;
        self.controller.set_current_page(1);
        self.refilter();
    }

    fn refilter(&mut self) {
        let filtered: Vec<T> = match &self.filter {
            Some(predicate) => self.items.iter().filter(|item| predicate(item)).cloned().collect(),
            None => self.items.clone(),
        };

        // Client controllers always accept local payloads
        if let Err(err) = self.controller.set_paginator_data(PaginatorPayload::Local(filtered)) {
            log::error!("Client page source rejected local data: {err}");
        }
    }
}

impl<T: Clone> PageSource<T> for ClientPageSource<T> {
    fn state(&self) -> &PaginatorState<T> {
        self.controller.state()
    }

    fn set_current_page(&mut self, page: usize) -> usize {
        self.controller.set_current_page(page)
    }

    fn set_page_size(&mut self, page_size: usize) -> Result<()> {
        self.controller.set_page_size(page_size)
    }
}

/// Sequence number of a remote request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl From<u64> for FetchTicket {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Request issued by [`RemotePageSource::begin_fetch`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub ticket: FetchTicket,
    pub query: PageQuery,
}

/// What happened to a resolved request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Response stored as the current page
    Applied,
    /// Newest request failed; paginator re-enabled with an error recorded
    Failed,
    /// A newer request was issued meanwhile; response dropped
    Stale,
}

/// Server-side paging through a remote listing service
#[derive(Debug, Clone)]
pub struct RemotePageSource<T> {
    controller: PaginationController<T>,
    last_ticket: u64,
    in_flight: Option<FetchTicket>,
}

impl<T: Clone> RemotePageSource<T> {
    pub fn new(page_size: usize) -> Self {
        Self {
            controller: PaginationController::server(page_size),
            last_ticket: 0,
            in_flight: None,
        }
    }

    pub fn in_flight(&self) -> Option<FetchTicket> {
        self.in_flight
    }

    pub fn last_error(&self) -> Option<&crate::PaginatorError> {
        self.controller.last_error()
    }

    /// Issue a request for the current page. Supersedes any request still in
    /// flight and disables the paginator until it resolves.
    pub fn begin_fetch(&mut self) -> PageRequest {
        self.last_ticket += 1;
        let ticket = FetchTicket(self.last_ticket);
        if let Some(previous) = self.in_flight.replace(ticket) {
            log::debug!("Request {} superseded by {}", previous.0, ticket.0);
        }
        self.controller.set_disable_paginator(true);

        PageRequest {
            ticket,
            query: PageQuery {
                number: self.controller.current_page(),
                size: self.controller.page_size(),
            },
        }
    }

    /// Forget the request in flight, if any. Its response will resolve as
    /// [`FetchOutcome::Stale`]. Called whenever the query changes under it.
    pub fn invalidate(&mut self) {
        if let Some(previous) = self.in_flight.take() {
            log::debug!("Request {} invalidated by a query change", previous.0);
            self.controller.set_disable_paginator(false);
        }
    }

    /// Apply the answer to a request if it is still the newest one
    pub fn resolve(
        &mut self,
        ticket: FetchTicket,
        response: std::result::Result<ListingPage<T>, FetchError>,
    ) -> FetchOutcome {
        if self.in_flight != Some(ticket) {
            log::debug!("Dropping stale response for request {}", ticket.0);
            return FetchOutcome::Stale;
        }
        self.in_flight = None;

        match response {
            Ok(page) => match self.controller.set_paginator_data(PaginatorPayload::Remote(page)) {
                Ok(()) => FetchOutcome::Applied,
                Err(err) => {
                    log::error!("Remote page source rejected page: {err}");
                    self.controller.set_disable_paginator(false);
                    FetchOutcome::Failed
                }
            },
            Err(err) => {
                self.controller.record_failure(err);
                FetchOutcome::Failed
            }
        }
    }

    /// Fetch the current page from `service` and apply it
    pub async fn fetch<S>(&mut self, service: &S, filter: &ListFilter) -> FetchOutcome
    where
        S: ListingService<T>,
    {
        let request = self.begin_fetch();
        let response = service.list(request.query, filter).await;
        self.resolve(request.ticket, response)
    }
}

impl<T: Clone> PageSource<T> for RemotePageSource<T> {
    fn state(&self) -> &PaginatorState<T> {
        self.controller.state()
    }

    fn set_current_page(&mut self, page: usize) -> usize {
        self.invalidate();
        self.controller.set_current_page(page)
    }

    fn set_page_size(&mut self, page_size: usize) -> Result<()> {
        self.controller.set_page_size(page_size)?;
        self.invalidate();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn words() -> Vec<String> {
        ["alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta"]
            .iter()
            .map(|w| w.to_string())
            .collect()
    }

    #[test]
    fn test_client_filter_returns_to_first_page() {
        let mut source = ClientPageSource::new(words(), 2);
        source.set_current_page(3);
        assert_eq!(source.current_page(), 3);

        source.set_filter(|w: &String| w.contains("eta"));

        assert_eq!(source.current_page(), 1);
        assert_eq!(source.total_pages(), 2);
        assert_eq!(source.page_data(), &["beta".to_string(), "zeta".to_string()]);
        assert_eq!(source.items().len(), 7);

        source.clear_filter();
        assert_eq!(source.total_pages(), 4);
    }

    #[test]
    fn test_remote_ticket_sequencing() {
        let mut source = RemotePageSource::<String>::new(5);

        let first = source.begin_fetch();
        source.set_current_page(1);
        let second = source.begin_fetch();
        assert!(source.is_disabled());

        let late = ListingPage {
            items: vec!["old".to_string()],
            current_page: 1,
            total_pages: 1,
        };
        assert_eq!(source.resolve(first.ticket, Ok(late)), FetchOutcome::Stale);
        assert!(source.is_disabled());

        let fresh = ListingPage {
            items: vec!["new".to_string()],
            current_page: 1,
            total_pages: 1,
        };
        assert_eq!(source.resolve(second.ticket, Ok(fresh)), FetchOutcome::Applied);
        assert_eq!(source.page_data(), &["new".to_string()]);
        assert!(!source.is_disabled());
        assert_eq!(source.in_flight(), None);
    }

    #[test]
    fn test_remote_failure_reenables() {
        let mut source = RemotePageSource::<String>::new(5);
        let request = source.begin_fetch();

        let outcome = source.resolve(request.ticket, Err(FetchError::new("boom")));

        assert_eq!(outcome, FetchOutcome::Failed);
        assert!(!source.is_disabled());
        assert!(source.last_error().is_some());
    }

    fn remote_page(label: &str, current_page: usize, total_pages: usize) -> ListingPage<String> {
        ListingPage {
            items: vec![label.to_string()],
            current_page,
            total_pages,
        }
    }

    #[test]
    fn test_page_change_invalidates_in_flight_request() {
        let mut source = RemotePageSource::<String>::new(5);
        let first = source.begin_fetch();
        source.resolve(first.ticket, Ok(remote_page("p1", 1, 4)));

        source.set_current_page(3);
        let page_three = source.begin_fetch();
        assert_eq!(source.set_current_page(2), 2);
        assert_eq!(source.in_flight(), None);
        assert!(!source.is_disabled());

        let outcome = source.resolve(page_three.ticket, Ok(remote_page("p3", 3, 4)));
        assert_eq!(outcome, FetchOutcome::Stale);
        assert_eq!(source.current_page(), 2);
        assert_eq!(source.page_data(), &["p1".to_string()]);

        let next = source.begin_fetch();
        assert_eq!(next.query.number, 2);
    }

    #[test]
    fn test_page_size_change_invalidates_in_flight_request() {
        let mut source = RemotePageSource::<String>::new(5);
        let request = source.begin_fetch();

        source.set_page_size(20).unwrap();
        assert_eq!(
            source.resolve(request.ticket, Ok(remote_page("small", 1, 9))),
            FetchOutcome::Stale
        );
        assert_eq!(source.total_pages(), 0);

        let next = source.begin_fetch();
        assert_eq!(next.query, PageQuery { number: 1, size: 20 });
        assert_eq!(
            source.resolve(next.ticket, Ok(remote_page("large", 1, 3))),
            FetchOutcome::Applied
        );
    }

    #[test]
    fn test_rejected_page_size_keeps_request() {
        let mut source = RemotePageSource::<String>::new(5);
        let request = source.begin_fetch();

        assert!(source.set_page_size(0).is_err());
        assert_eq!(source.in_flight(), Some(request.ticket));
    }

    struct Recorder {
        queries: RefCell<Vec<(PageQuery, ListFilter)>>,
    }

    impl ListingService<String> for Recorder {
        async fn list(
            &self,
            page: PageQuery,
            filter: &ListFilter,
        ) -> std::result::Result<ListingPage<String>, FetchError> {
            self.queries.borrow_mut().push((page, filter.clone()));
            Ok(ListingPage {
                items: vec![format!("page-{}", page.number)],
                current_page: page.number,
                total_pages: 4,
            })
        }
    }

    #[tokio::test]
    async fn test_fetch_forwards_page_and_filter() {
        let service = Recorder {
            queries: RefCell::new(Vec::new()),
        };
        let mut source = RemotePageSource::new(10);

        source.fetch(&service, &ListFilter::default()).await;
        source.set_current_page(3);
        let outcome = source.fetch(&service, &ListFilter::label("boiler")).await;

        assert_eq!(outcome, FetchOutcome::Applied);
        assert_eq!(source.page_data(), &["page-3".to_string()]);
        let queries = service.queries.borrow();
        assert_eq!(queries[1].0, PageQuery { number: 3, size: 10 });
        assert_eq!(queries[1].1.label, "boiler");
    }
}
