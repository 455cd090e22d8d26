use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Latest known buy/sell rates parsed from one feed message
///
/// Numbers are kept as the JSON numbers the model produced, so an integer
/// rate is written back as an integer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateRecord {
    /// Date as written in the message, free-form
    pub date: Option<String>,

    /// US dollar buy rate
    pub usd_buy: Option<Number>,

    /// US dollar sell rate
    pub usd_sell: Option<Number>,

    /// Gold buy price
    pub gold_buy: Option<Number>,

    /// Gold sell price
    pub gold_sell: Option<Number>,
}

impl RateRecord {
    /// Names of the record's fields, in output order
    pub const FIELDS: [&'static str; 5] = ["date", "usd_buy", "usd_sell", "gold_buy", "gold_sell"];

    /// Returns true when the model could not determine any field
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.usd_buy.is_none()
            && self.usd_sell.is_none()
            && self.gold_buy.is_none()
            && self.gold_sell.is_none()
    }
}

/// Raw HTML of the feed page for a single run
#[derive(Debug, Clone)]
pub struct RawPage {
    /// URL the page was fetched from
    pub url: String,

    /// Response body
    pub html: String,
}

impl RawPage {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }
}
