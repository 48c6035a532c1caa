//! Device and template pickers backed by the remote listing service

use widget_wizard_data::{
    FetchError, FetchOutcome, FetchTicket, ListFilter, ListingPage, ListingService, PageRequest,
    PageSource, PaginatorState, RemotePageSource,
};
use widget_wizard_shared::{AttributeOwner, Device, StepPayload, Template, WizardResult};

/// A server-paginated list with label search and multi-selection keyed by id
#[derive(Debug, Clone)]
pub struct RemotePicker<T> {
    pages: RemotePageSource<T>,
    filter: ListFilter,
    selected: Vec<T>,
}

pub type DevicePicker = RemotePicker<Device>;
pub type TemplatePicker = RemotePicker<Template>;

impl<T: AttributeOwner + Clone> RemotePicker<T> {
    pub fn new(page_size: usize) -> Self {
        Self {
            pages: RemotePageSource::new(page_size),
            filter: ListFilter::default(),
            selected: Vec::new(),
        }
    }

    /// Restore the items chosen on an earlier visit
    pub fn with_selected(mut self, selected: Vec<T>) -> Self {
        self.selected = selected;
        self
    }

    /// Change the label filter. A new label returns to page 1 and drops any
    /// request in flight; the caller fetches afterwards.
    pub fn search(&mut self, label: &str) -> bool {
        if self.filter.label == label {
            return false;
        }
        self.filter = ListFilter::label(label);
        self.pages.set_current_page(1);
        true
    }

    pub fn filter(&self) -> &ListFilter {
        &self.filter
    }

    pub fn paginator(&self) -> &PaginatorState<T> {
        self.pages.state()
    }

    pub fn set_current_page(&mut self, page: usize) -> usize {
        self.pages.set_current_page(page)
    }

    pub fn set_page_size(&mut self, page_size: usize) -> WizardResult<()> {
        Ok(self.pages.set_page_size(page_size)?)
    }

    /// Start a request for the current page and filter
    pub fn begin_fetch(&mut self) -> (PageRequest, ListFilter) {
        (self.pages.begin_fetch(), self.filter.clone())
    }

    pub fn resolve(
        &mut self,
        ticket: FetchTicket,
        response: Result<ListingPage<T>, FetchError>,
    ) -> FetchOutcome {
        self.pages.resolve(ticket, response)
    }

    /// Fetch the current page from `service`
    pub async fn refresh<S: ListingService<T>>(&mut self, service: &S) -> FetchOutcome {
        let filter = self.filter.clone();
        self.pages.fetch(service, &filter).await
    }

    pub fn last_error(&self) -> Option<String> {
        self.pages.last_error().map(|err| err.to_string())
    }

    /// Check or uncheck an item
    pub fn toggle(&mut self, item: &T, checked: bool) {
        let present = self.is_selected(item.id());
        if checked && !present {
            self.selected.push(item.clone());
        } else if !checked && present {
            self.selected.retain(|s| s.id() != item.id());
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|s| s.id() == id)
    }

    pub fn selected(&self) -> &[T] {
        &self.selected
    }
}

impl RemotePicker<Device> {
    /// Payload submitted with `next`
    pub fn payload(&self) -> StepPayload {
        StepPayload::Devices(self.selected.clone())
    }
}

impl RemotePicker<Template> {
    /// Payload submitted with `next`
    pub fn payload(&self) -> StepPayload {
        StepPayload::Templates(self.selected.clone())
    }
}
