//! Lead browser with transcript panel

use super::{RawParams, SettleMode, link, param, retry_link, settle};
use crate::{
    api_client::LeadsQuery,
    components::{lead_detail, leads_list, page_shell, pagination, sort_selector},
    query::Query,
    resources::Resources,
    view::ViewState,
};
use botdash_core::{
    config::DashboardConfig,
    types::{LeadDetail, LeadsResponse, SortField, SortOrder},
    utils::{clamp_page, page_offset, total_pages},
};
use chrono::{DateTime, Utc};

const PATH: &str = "/leads";

/// State of the leads screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeadsPage {
    /// 1-based page number
    pub page: u32,
    /// Sort column, always descending
    pub sort_by: SortField,
    /// Lead whose transcript is open
    pub selected: Option<i64>,
}

impl Default for LeadsPage {
    fn default() -> Self {
        Self {
            page: 1,
            sort_by: SortField::UpdatedAt,
            selected: None,
        }
    }
}

impl LeadsPage {
    /// Parse from the request
    ///
    /// Page numbers below one become one; the upper bound is only known once
    /// the count has been fetched, see [`LeadsPage::clamped`].
    #[must_use]
    pub fn from_query(params: &RawParams) -> Self {
        Self {
            page: param::<u32>(params, "page").unwrap_or(1).max(1),
            sort_by: param(params, "sort").unwrap_or_default(),
            selected: param(params, "selected"),
        }
    }

    fn pairs(self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("sort", self.sort_by.as_str().to_string()),
        ];
        if let Some(id) = self.selected {
            pairs.push(("selected", id.to_string()));
        }
        pairs
    }

    /// Link to this state
    #[must_use]
    pub fn href(self) -> String {
        link(PATH, &self.pairs())
    }

    /// Open the transcript of `id`
    #[must_use]
    pub const fn select(self, id: i64) -> Self {
        Self {
            selected: Some(id),
            ..self
        }
    }

    /// Close the transcript
    #[must_use]
    pub const fn close(self) -> Self {
        Self {
            selected: None,
            ..self
        }
    }

    /// Sort by `field`, starting again on the first page
    #[must_use]
    pub const fn sorted_by(self, field: SortField) -> Self {
        Self {
            page: 1,
            sort_by: field,
            selected: None,
        }
    }

    /// Jump to `page`, kept within `1..=total_pages`
    #[must_use]
    pub fn go_to(self, page: u32, total_pages: u32) -> Self {
        Self {
            page: clamp_page(page, total_pages),
            ..self
        }
    }

    /// Next page, staying on the last one
    #[must_use]
    pub fn next_page(self, total_pages: u32) -> Self {
        self.go_to(self.page.saturating_add(1), total_pages)
    }

    /// Previous page, staying on the first one
    #[must_use]
    pub fn prev_page(self) -> Self {
        self.go_to(self.page.saturating_sub(1), self.page)
    }

    /// The page clamped against a known lead count
    #[must_use]
    pub fn clamped(self, count: u64, page_size: u32) -> Self {
        self.go_to(self.page, total_pages(count, page_size))
    }

    /// The page clamped against a count already cached for this sort
    ///
    /// Unchanged when no page of the same listing has been fetched yet.
    #[must_use]
    pub fn clamped_to_cached(self, resources: &Resources, page_size: u32) -> Self {
        resources
            .cached_leads_count(&self.leads_query(page_size))
            .map_or(self, |count| self.clamped(count, page_size))
    }

    /// Listing parameters for this state
    #[must_use]
    pub fn leads_query(self, page_size: u32) -> LeadsQuery {
        LeadsQuery {
            user_id: None,
            limit: Some(page_size),
            offset: Some(page_offset(self.page, page_size)),
            sort_by: Some(self.sort_by),
            sort_order: Some(SortOrder::Desc),
        }
    }

    /// Mount every query of the screen
    #[must_use]
    pub fn mount(self, resources: &Resources, config: &DashboardConfig) -> LeadsQueries {
        LeadsQueries {
            page: self,
            page_size: config.leads_page_size,
            leads: resources.leads(&self.leads_query(config.leads_page_size)),
            detail: resources.lead_detail(self.selected),
        }
    }
}

/// Queries backing one render of the leads screen
#[derive(Debug)]
pub struct LeadsQueries {
    page: LeadsPage,
    page_size: u32,
    /// The current page of leads
    pub leads: Query<LeadsResponse>,
    /// Transcript of the selected lead
    pub detail: Query<LeadDetail>,
}

impl LeadsQueries {
    /// State these queries were mounted for
    #[must_use]
    pub const fn page(&self) -> LeadsPage {
        self.page
    }

    /// Wait for the list and the transcript
    pub async fn settle(&self, mode: SettleMode) {
        futures::join!(settle(&self.leads, mode), settle(&self.detail, mode));
    }

    /// The state to render instead, if the requested page lies past the end
    #[must_use]
    pub fn out_of_range(&self) -> Option<LeadsPage> {
        let count = self.leads.state().data?.count;
        let clamped = self.page.clamped(count, self.page_size);
        (clamped != self.page).then_some(clamped)
    }

    /// The whole document
    #[must_use]
    pub fn render(&self, now: DateTime<Utc>) -> String {
        let page = self.page;
        let retry = retry_link(PATH, &page.pairs());

        let leads_state = self.leads.state();
        let count = leads_state.data.as_ref().map_or(0, |response| response.count);
        let total = total_pages(count, self.page_size);

        let sort = sort_selector(page.sort_by, |field| page.sorted_by(field).href());
        let list = leads_list(
            &ViewState::from_query(&leads_state, |response| response.leads.is_empty()),
            &retry,
            page.selected,
            &|id: i64| page.select(id).href(),
            now,
        );
        let pager = pagination(page.page, total, count, &|target: u32| {
            page.go_to(target, total).href()
        });
        let detail = lead_detail(
            &ViewState::of(&self.detail.state()),
            &retry,
            &page.close().href(),
        );

        let body = format!(
            r#"<div class="toolbar"><p class="muted">Review customer conversations</p>{sort}</div><div class="split leads"><div class="card list-panel">{list}{pager}</div>{detail}</div>"#
        );
        page_shell("Leads", PATH, &body)
    }
}
