//! Application constants
//!
//! Centralized location for domain-level constants shared by the client crates.

// Backend defaults
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const HEALTH_CHECK_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_CLASSIFY_PATH: &str = "/classify";
pub const DEFAULT_USER_AGENT: &str = "WasteWise-Client/0.1";

// Durable session storage keys (shared with the web and mobile clients)
pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const USER_DATA_KEY: &str = "user_data";
pub const DEFAULT_KEYCHAIN_SERVICE: &str = "WasteWise";

// Payments
pub const DEFAULT_CURRENCY: &str = "INR";
pub const SIMULATED_GATEWAY_DELAY_MS: u64 = 2000;
pub const SIMULATED_GATEWAY_FAILURE_RATE: f64 = 0.05;
pub const SIMULATED_PAYMENT_PREFIX: &str = "pay_sim_";
pub const SIMULATED_DECLINE_REASON: &str = "Payment declined by gateway";

// Paging
pub const DEFAULT_PAGE_LIMIT: u32 = 20;
