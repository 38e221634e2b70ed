/// A stored price target for a coin. Alerts are only recorded; nothing
/// compares them against live prices.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceAlert {
    pub id: i64,
    pub user_id: i64,
    pub coin: String,
    pub target_price: f64,
}

/// Fields supplied when creating an alert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAlert {
    pub coin: String,
    pub target_price: f64,
}

impl NewAlert {
    pub fn new(coin: impl Into<String>, target_price: f64) -> Self {
        Self {
            coin: coin.into(),
            target_price,
        }
    }
}

impl crate::domain::traits::Resource for PriceAlert {
    type Fields = NewAlert;

    fn id(&self) -> i64 {
        self.id
    }

    fn user_id(&self) -> i64 {
        self.user_id
    }
}
