//! Domain constants
//!
//! Centralized location for the wizard's fixed values and user-facing
//! messages.

// Wizard navigation
pub const TOTAL_STEPS: u8 = 6;
pub const MAX_JUMP_AHEAD: u8 = 2;

// Field keys used in error maps and request payloads
pub const FIELD_NAME: &str = "name";
pub const FIELD_OFFER_TYPE: &str = "offer_type";
pub const FIELD_CATEGORY_ID: &str = "category_id";
pub const FIELD_PRODUCT_ID: &str = "product_id";

// Validation messages
pub const MSG_NAME_REQUIRED: &str = "Offer name is required";
pub const MSG_OFFER_TYPE_REQUIRED: &str = "Offer type is required";
pub const MSG_CATEGORY_REQUIRED: &str = "Category is required";
pub const MSG_PRODUCT_REQUIRED: &str = "Product is required";

// Submission summaries
pub const MSG_FIX_VALIDATION_ERRORS: &str = "Please fix the validation errors below";
pub const MSG_CREATE_FAILED: &str = "Failed to create offer";
pub const MSG_UPDATE_FAILED: &str = "Failed to update offer";
pub const MSG_LOAD_FAILED: &str = "Failed to load offer";

// Catalog reference data
pub const DEFAULT_CATALOG_PAGE_SIZE: u32 = 100;
pub const DEFAULT_CATALOG_SORT_BY: &str = "name";

// Creative defaults
pub const DEFAULT_CREATIVE_LOCALE: &str = "en";
