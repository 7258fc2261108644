mod identity;
mod models;
mod tier;

pub use identity::SessionUser;
pub use models::*;
pub use tier::{PURCHASE_TIERS, PurchaseTier};
