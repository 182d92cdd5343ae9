use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

fn default_page() -> u64 { 1 }
fn default_per_page() -> u64 { 20 }

impl PaginationParams {
    pub fn offset(&self) -> u64 {
        (self.page.saturating_sub(1)) * self.limit()
    }

    /// Effective page size: never 0, never above 100.
    pub fn limit(&self) -> u64 {
        self.per_page.clamp(1, 100)
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self { page: 1, per_page: 20 }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Paginated<T: Serialize> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

impl<T: Serialize> Paginated<T> {
    pub fn new(items: Vec<T>, total: u64, params: &PaginationParams) -> Self {
        let per_page = params.limit();
        let total_pages = if total == 0 { 0 } else { (total + per_page - 1) / per_page };
        Self {
            items,
            total,
            page: params.page,
            per_page,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_page_is_clamped_to_1_through_100() {
        let params = PaginationParams { page: 1, per_page: 500 };
        assert_eq!(params.limit(), 100);
        let params = PaginationParams { page: 1, per_page: 0 };
        assert_eq!(params.limit(), 1);
    }

    #[test]
    fn offset_starts_at_zero_for_first_page() {
        let params = PaginationParams { page: 1, per_page: 20 };
        assert_eq!(params.offset(), 0);
        let params = PaginationParams { page: 3, per_page: 20 };
        assert_eq!(params.offset(), 40);
    }

    #[test]
    fn offset_uses_the_clamped_page_size() {
        // Oversized per_page must not skip rows the page will never serve
        let params = PaginationParams { page: 2, per_page: 500 };
        assert_eq!(params.offset(), 100);
    }

    #[test]
    fn per_page_zero_does_not_panic() {
        let params = PaginationParams { page: 1, per_page: 0 };
        let page: Paginated<u64> = Paginated::new(vec![], 5, &params);
        assert_eq!(page.per_page, 1);
        assert_eq!(page.total_pages, 5);
    }

    #[test]
    fn total_pages_rounds_up() {
        let params = PaginationParams { page: 1, per_page: 20 };
        let page: Paginated<u64> = Paginated::new(vec![], 41, &params);
        assert_eq!(page.total_pages, 3);
        let empty: Paginated<u64> = Paginated::new(vec![], 0, &params);
        assert_eq!(empty.total_pages, 0);
    }
}
