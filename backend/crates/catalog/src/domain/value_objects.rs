//! Domain Value Objects
//!
//! Listing parameters for the product catalog.

use crate::error::{CatalogError, CatalogResult};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

/// Sortable product column. Anything unrecognised sorts by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    ProductName,
    Category,
    Price,
    Quantity,
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    /// Parse the API name (`product_name`, `createdAt`, ...).
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("product_name") => SortField::ProductName,
            Some("category") => SortField::Category,
            Some("price") => SortField::Price,
            Some("quantity") => SortField::Quantity,
            Some("updatedAt") => SortField::UpdatedAt,
            _ => SortField::CreatedAt,
        }
    }

    /// Database column. Only these literals ever reach SQL.
    pub const fn column(self) -> &'static str {
        match self {
            SortField::ProductName => "product_name",
            SortField::Category => "category",
            SortField::Price => "price",
            SortField::Quantity => "quantity",
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// `ASC` in any case is ascending; everything else is descending.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(s) if s.eq_ignore_ascii_case("ASC") => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }

    pub const fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Validated product listing query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    /// Case-insensitive substring of `product_name`
    pub search: Option<String>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    /// 1-based
    pub page: u32,
    pub limit: u32,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            search: None,
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl ProductQuery {
    /// `page` and `limit` must be at least 1; `limit` is capped at [`MAX_LIMIT`].
    pub fn new(
        search: Option<String>,
        sort_by: Option<&str>,
        sort_order: Option<&str>,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> CatalogResult<Self> {
        let page = match page {
            None => DEFAULT_PAGE,
            Some(p) if p >= 1 => u32::try_from(p)
                .map_err(|_| CatalogError::InvalidQuery("page is too large".to_string()))?,
            Some(_) => {
                return Err(CatalogError::InvalidQuery(
                    "page must be greater than or equal to 1".to_string(),
                ));
            }
        };

        let limit = match limit {
            None => DEFAULT_LIMIT,
            Some(l) if l >= 1 => l.min(i64::from(MAX_LIMIT)) as u32,
            Some(_) => {
                return Err(CatalogError::InvalidQuery(
                    "limit must be greater than or equal to 1".to_string(),
                ));
            }
        };

        Ok(Self {
            search: search.filter(|s| !s.is_empty()),
            sort_by: SortField::parse(sort_by),
            sort_order: SortOrder::parse(sort_order),
            page,
            limit,
        })
    }

    pub fn offset(&self) -> u64 {
        kernel::page::offset(self.page, self.limit)
    }

    /// `ILIKE` pattern with `\`, `%` and `_` escaped.
    pub fn search_pattern(&self) -> Option<String> {
        self.search.as_deref().map(|term| {
            let mut pattern = String::with_capacity(term.len() + 2);
            pattern.push('%');
            for ch in term.chars() {
                if matches!(ch, '\\' | '%' | '_') {
                    pattern.push('\\');
                }
                pattern.push(ch);
            }
            pattern.push('%');
            pattern
        })
    }

    /// In-memory equivalent of the `ILIKE` filter.
    pub fn matches_name(&self, product_name: &str) -> bool {
        match &self.search {
            Some(term) => product_name.to_lowercase().contains(&term.to_lowercase()),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let query = ProductQuery::new(None, None, None, None, None).unwrap();
        assert_eq!(query, ProductQuery::default());
        assert_eq!(query.sort_by, SortField::CreatedAt);
        assert_eq!(query.sort_order, SortOrder::Desc);
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn test_sort_whitelist() {
        assert_eq!(SortField::parse(Some("price")), SortField::Price);
        assert_eq!(SortField::parse(Some("updatedAt")), SortField::UpdatedAt);
        assert_eq!(SortField::parse(Some("password; DROP TABLE")), SortField::CreatedAt);
        assert_eq!(SortField::parse(Some("Price")), SortField::CreatedAt);
    }

    #[test]
    fn test_sort_order() {
        assert_eq!(SortOrder::parse(Some("ASC")), SortOrder::Asc);
        assert_eq!(SortOrder::parse(Some("asc")), SortOrder::Asc);
        assert_eq!(SortOrder::parse(Some("ascending")), SortOrder::Desc);
        assert_eq!(SortOrder::parse(None), SortOrder::Desc);
    }

    #[test]
    fn test_page_and_limit_bounds() {
        assert!(ProductQuery::new(None, None, None, Some(0), None).is_err());
        assert!(ProductQuery::new(None, None, None, None, Some(0)).is_err());
        assert!(ProductQuery::new(None, None, None, Some(-3), None).is_err());

        let capped = ProductQuery::new(None, None, None, Some(3), Some(500)).unwrap();
        assert_eq!(capped.limit, MAX_LIMIT);
        assert_eq!(capped.offset(), 200);
    }

    #[test]
    fn test_search_pattern_escapes_wildcards() {
        let query = ProductQuery::new(Some("50%_off\\".into()), None, None, None, None).unwrap();
        assert_eq!(query.search_pattern().as_deref(), Some("%50\\%\\_off\\\\%"));

        let empty = ProductQuery::new(Some(String::new()), None, None, None, None).unwrap();
        assert_eq!(empty.search_pattern(), None);
    }

    #[test]
    fn test_matches_name_is_case_insensitive() {
        let query = ProductQuery::new(Some("PHO".into()), None, None, None, None).unwrap();
        assert!(query.matches_name("Smartphone"));
        assert!(!query.matches_name("Laptop"));
    }
}
