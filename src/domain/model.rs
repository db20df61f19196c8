use serde::{Deserialize, Deserializer, Serialize};

pub type ProductId = u64;

/// A catalog product. Accepts both a flat `rate` field and the nested
/// `rating: { rate, count }` shape served by public store APIs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawProduct")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub category: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
}

impl Product {
    pub fn new(id: ProductId, title: impl Into<String>, category: impl Into<String>, price: f64) -> Self {
        Self {
            id,
            title: title.into(),
            category: category.into(),
            price,
            rate: None,
        }
    }

    pub fn with_rate(mut self, rate: f64) -> Self {
        self.rate = Some(rate);
        self
    }

    pub fn has_valid_price(&self) -> bool {
        self.price.is_finite() && self.price >= 0.0
    }
}

#[derive(Deserialize)]
struct RawProduct {
    id: ProductId,
    #[serde(default)]
    title: String,
    #[serde(default)]
    category: String,
    price: f64,
    #[serde(default)]
    rate: Option<f64>,
    #[serde(default)]
    rating: Option<RawRating>,
}

#[derive(Deserialize)]
struct RawRating {
    rate: Option<f64>,
}

impl From<RawProduct> for Product {
    fn from(raw: RawProduct) -> Self {
        Self {
            id: raw.id,
            title: raw.title,
            category: raw.category,
            price: raw.price,
            rate: raw.rate.or_else(|| raw.rating.and_then(|r| r.rate)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}
