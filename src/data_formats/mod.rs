mod request;
mod response;
mod wrapper;

pub use request::*;
pub use response::*;
pub use wrapper::*;

use serde::{Deserialize, Serialize};

pub const ITEMS_PER_PAGE: i64 = 10;
pub const MAX_ITEMS_PER_PAGE: i64 = 50;

#[derive(Deserialize, Serialize, Debug, Clone, Copy)]
pub struct FeedQueryParams {
    #[serde(default = "get_default_page")]
    pub page: i64,
    #[serde(default = "get_default_limit")]
    pub limit: i64,
}

impl Default for FeedQueryParams {
    fn default() -> Self {
        Self {
            page: get_default_page(),
            limit: get_default_limit(),
        }
    }
}

impl FeedQueryParams {
    pub fn page(&self) -> i64 {
        self.page.max(1)
    }

    pub fn limit(&self) -> i64 {
        self.limit.clamp(1, MAX_ITEMS_PER_PAGE)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.limit())
    }

    pub fn total_pages(&self, total: i64) -> i64 {
        let limit = self.limit();
        (total + limit - 1) / limit
    }
}

fn get_default_page() -> i64 {
    1
}

fn get_default_limit() -> i64 {
    ITEMS_PER_PAGE
}
