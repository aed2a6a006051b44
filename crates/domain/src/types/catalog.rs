//! Offer catalogs (categories) reference data

use serde::{Deserialize, Serialize};

use super::ids::CatalogId;
use crate::config::ApiConfig;
use crate::constants::{DEFAULT_CATALOG_PAGE_SIZE, DEFAULT_CATALOG_SORT_BY};
use crate::impl_domain_enum_conversions;

/// A named grouping of offers. Read-only from the wizard's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub id: CatalogId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub offer_count: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl_domain_enum_conversions!(SortDirection {
    Asc => "asc",
    Desc => "desc",
});

/// Listing parameters for the catalog service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogQuery {
    pub page_size: u32,
    pub sort_by: String,
    pub sort_direction: SortDirection,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_CATALOG_PAGE_SIZE,
            sort_by: DEFAULT_CATALOG_SORT_BY.to_string(),
            sort_direction: SortDirection::Asc,
        }
    }
}

/// Default listing with the configured page size.
impl From<&ApiConfig> for CatalogQuery {
    fn from(config: &ApiConfig) -> Self {
        Self { page_size: config.catalog_page_size, ..Self::default() }
    }
}

/// Pagination metadata returned alongside a catalog page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// One page of catalogs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogPage {
    pub data: Vec<Catalog>,
    #[serde(default)]
    pub meta: PageMeta,
}
