//! Splits a result limit into the page requests needed to satisfy it.

use crate::options::{Order, SortKey, API_DEFAULT_PAGE_SIZE, API_MAX_PAGE_SIZE};

/// How a page expresses its size on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageStyle {
    /// Rely on the API's own default page size.
    ApiDefault,
    /// Single page with an explicit `per_page`.
    PerPage,
    /// One of several numbered pages.
    Numbered,
}

/// One page of results to request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub number: u32,
    pub size: u32,
    sort: Option<SortKey>,
    order: Option<Order>,
    style: PageStyle,
}

impl PageRequest {
    /// The `sort/order/page/per_page` query suffix for this page.
    pub fn fragment(&self) -> String {
        let mut fragment = String::new();
        if let Some(sort) = self.sort {
            fragment.push_str(&format!("sort={}&", sort));
        }
        if let Some(order) = self.order {
            fragment.push_str(&format!("order={}&", order));
        }
        match self.style {
            PageStyle::ApiDefault => {}
            PageStyle::PerPage => fragment.push_str(&format!("per_page={}", self.size)),
            PageStyle::Numbered => {
                fragment.push_str(&format!("page={}&per_page={}", self.number, self.size))
            }
        }
        fragment
    }
}

/// The ordered pages for one search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPlan {
    pages: Vec<PageRequest>,
}

impl RequestPlan {
    pub fn pages(&self) -> &[PageRequest] {
        &self.pages
    }

    /// Total number of results requested across all pages.
    pub fn total(&self) -> u32 {
        self.pages.iter().map(|p| p.size).sum()
    }

    pub fn fragments(&self) -> Vec<String> {
        self.pages.iter().map(PageRequest::fragment).collect()
    }
}

/// Plans the minimal sequence of pages for `limit` results.
///
/// `limit` is expected to be validated already (1 to 500).
pub fn plan(limit: u32, sort: Option<SortKey>, order: Option<Order>) -> RequestPlan {
    let page = |number: u32, size: u32, style: PageStyle| PageRequest {
        number,
        size,
        sort,
        order,
        style,
    };

    if limit == API_DEFAULT_PAGE_SIZE {
        return RequestPlan {
            pages: vec![page(1, limit, PageStyle::ApiDefault)],
        };
    }

    if limit <= API_MAX_PAGE_SIZE {
        return RequestPlan {
            pages: vec![page(1, limit, PageStyle::PerPage)],
        };
    }

    let count = limit.div_ceil(API_MAX_PAGE_SIZE);
    let pages = (1..=count)
        .map(|number| {
            let size = if number == count {
                limit - (number - 1) * API_MAX_PAGE_SIZE
            } else {
                API_MAX_PAGE_SIZE
            };
            page(number, size, PageStyle::Numbered)
        })
        .collect();

    RequestPlan { pages }
}
