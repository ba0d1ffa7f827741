//! Catalog side entities: categories, brands, services and banners.
//!
//! These are plain records edited wholesale from the back-office.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn new_id() -> String { Uuid::now_v7().to_string() }
fn default_true() -> bool { true }

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self { id: new_id(), name: name.into(), description: None, image_url: None, active: true }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub logo_url: Option<String>,
}

impl Brand {
    pub fn new(name: impl Into<String>) -> Self { Self { id: new_id(), name: name.into(), logo_url: None } }
}

/// An installation or repair service the shop offers alongside its products.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Service {
    pub fn new(name: impl Into<String>) -> Self {
        Self { id: new_id(), name: name.into(), description: String::new(), price: None, image_url: None }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    pub image_url: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub position: u32,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl Banner {
    pub fn new(title: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self { id: new_id(), title: title.into(), subtitle: None, image_url: image_url.into(), link: None, position: 0, active: true }
    }
}

/// Active banners in display order.
pub fn visible_banners(mut banners: Vec<Banner>) -> Vec<Banner> {
    banners.retain(|b| b.active);
    banners.sort_by_key(|b| b.position);
    banners
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn test_visible_banners_sorted() {
        let mut a = Banner::new("A", "a.png"); a.position = 2;
        let mut b = Banner::new("B", "b.png"); b.position = 1;
        let mut c = Banner::new("C", "c.png"); c.active = false;
        let out = visible_banners(vec![a, b, c]);
        assert_eq!(out.iter().map(|b| b.title.as_str()).collect::<Vec<_>>(), vec!["B", "A"]);
    }
    #[test]
    fn test_category_defaults_active() {
        let c: Category = serde_json::from_str(r#"{"id":"c1","name":"Lighting"}"#).unwrap();
        assert!(c.active);
    }
}
