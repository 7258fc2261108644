use serde::Serialize;

/// A fixed purchase package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PurchaseTier {
    pub id: &'static str,
    #[serde(skip)]
    pub price_cents: u32,
    pub token_grant: i64,
}

pub const PURCHASE_TIERS: [PurchaseTier; 3] = [
    PurchaseTier {
        id: "tier1",
        price_cents: 500,
        token_grant: 75,
    },
    PurchaseTier {
        id: "tier2",
        price_cents: 2000,
        token_grant: 500,
    },
    PurchaseTier {
        id: "tier3",
        price_cents: 5000,
        token_grant: 2000,
    },
];

impl PurchaseTier {
    #[must_use]
    pub fn find(id: &str) -> Option<&'static PurchaseTier> {
        PURCHASE_TIERS.iter().find(|t| t.id == id)
    }

    /// Price as a decimal string, the form PayPal expects for amounts.
    #[must_use]
    pub fn price(&self) -> String {
        format!("{}.{:02}", self.price_cents / 100, self.price_cents % 100)
    }

    #[must_use]
    pub fn description(&self) -> String {
        format!("{} Calculator Tokens", self.token_grant)
    }
}
