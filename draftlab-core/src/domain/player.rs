use serde::{Deserialize, Serialize};

/// A player in the auction catalog.
///
/// Attributes are fixed at catalog load. The outcome fields (`sold`,
/// `sold_price`, `awarded_to`) are written once by a successful award and
/// never revert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub name: String,
    pub position: String,
    /// Display image reference (path or URL). Not interpreted by the engine.
    #[serde(default)]
    pub photo: Option<String>,
    pub rating: f64,
    #[serde(default)]
    pub sold: bool,
    #[serde(default)]
    pub sold_price: Option<u64>,
    #[serde(default)]
    pub awarded_to: Option<String>,
}

impl Player {
    /// An unsold player, as built from the catalog feed.
    pub fn new(
        name: impl Into<String>,
        position: impl Into<String>,
        photo: Option<String>,
        rating: f64,
    ) -> Self {
        Self {
            name: name.into(),
            position: position.into(),
            photo,
            rating,
            sold: false,
            sold_price: None,
            awarded_to: None,
        }
    }

    /// `sold` holds iff both outcome fields are present.
    pub fn is_consistent(&self) -> bool {
        self.sold == (self.sold_price.is_some() && self.awarded_to.is_some())
    }

    pub(crate) fn record_sale(&mut self, price: u64, captain: &str) {
        self.sold = true;
        self.sold_price = Some(price);
        self.awarded_to = Some(captain.to_string());
    }
}
