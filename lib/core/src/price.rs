use serde::{Deserialize, Serialize};

/// Coarse price band used by price-aware ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PriceBucket {
    /// price < 30
    Budget,
    /// 30 <= price < 100
    MidRange,
    /// 100 <= price < 300
    Premium,
    /// price >= 300
    Luxury,
}

impl PriceBucket {
    pub fn of(price: f64) -> Self {
        if price < 30.0 {
            PriceBucket::Budget
        } else if price < 100.0 {
            PriceBucket::MidRange
        } else if price < 300.0 {
            PriceBucket::Premium
        } else {
            PriceBucket::Luxury
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceBucket::Budget => "budget",
            PriceBucket::MidRange => "mid-range",
            PriceBucket::Premium => "premium",
            PriceBucket::Luxury => "luxury",
        }
    }
}

impl std::fmt::Display for PriceBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
