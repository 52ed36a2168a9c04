//! System-wide constants for the OpenSwap exchange engine.

/// Length of a valid currency code (ISO 4217 style).
pub const CURRENCY_CODE_LEN: usize = 3;

/// Maximum decimal places accepted for amounts.
pub const MAX_AMOUNT_SCALE: u32 = 8;

/// Maximum decimal places accepted for rates.
pub const MAX_RATE_SCALE: u32 = 8;

/// Default cap on open (pending) offers per exchange request.
pub const DEFAULT_MAX_OPEN_OFFERS: usize = 64;

/// Number of lock stripes in the account ledger. Transfers on disjoint
/// stripes run concurrently.
pub const LEDGER_STRIPES: usize = 16;

/// Default API listen port.
pub const DEFAULT_API_PORT: u16 = 8080;

/// Environment variable overriding the API listen address.
pub const ENV_LISTEN_ADDR: &str = "OPENSWAP_LISTEN_ADDR";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "OpenSwap";
