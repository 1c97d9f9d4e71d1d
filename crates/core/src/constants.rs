/// Bucket key for line items and expenses without a cost code
pub const NO_COST_CODE_ID: &str = "no-cost-code";

/// Display name of the unassigned bucket
pub const NO_COST_CODE_NAME: &str = "Unassigned";

/// Category of the unassigned bucket
pub const NO_COST_CODE_CATEGORY: &str = "Uncategorized";

/// Category used when a cost code carries none
pub const DEFAULT_COST_CODE_CATEGORY: &str = "General";

/// Unit label used when a line item has none
pub const DEFAULT_UNIT: &str = "ea";

/// Category selector that matches every bucket
pub const ALL_CATEGORIES: &str = "all";

/// Vendor label for expenses recorded without one
pub const UNSPECIFIED_VENDOR: &str = "Unspecified";

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Default currency for rendering amounts
pub const DEFAULT_CURRENCY: &str = "USD";

/// Largest quantity, price or amount accepted on write
pub const MAX_INPUT_VALUE: i64 = 1_000_000_000_000;
