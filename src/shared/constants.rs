/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// AMBULANCE CONSTRAINTS
// =============================================================================

/// Earliest accepted insurance expiry year
pub const MIN_INSURANCE_YEAR: i32 = 2000;

/// Latest accepted insurance expiry year
pub const MAX_INSURANCE_YEAR: i32 = 2100;

/// Integer digits allowed in a price per km (NUMERIC(7, 2))
pub const PRICE_PER_KM_MAX_INTEGER_DIGITS: u32 = 5;

/// Decimal places allowed in a price per km
pub const PRICE_PER_KM_SCALE: u32 = 2;
