mod server;

pub use server::{DEFAULT_PAYPAL_API_BASE, IdentityConfig, PayPalConfig, ServerConfig};
