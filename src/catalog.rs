//! Catalog reads for the storefront and wholesale edits from the back-office.

use tracing::info;

use crate::domain::aggregates::{visible_banners, Banner, Brand, Category, Product, Service};
use crate::storage::{DataStore, Record, StoreError, WriteOutcome};

#[derive(Clone)]
pub struct CatalogService {
    store: DataStore,
}

impl CatalogService {
    pub fn new(store: DataStore) -> Self { Self { store } }

    /// Every product, archived ones included, for the back-office.
    pub async fn all_products(&self) -> Vec<Product> { self.store.list::<Product>().await }

    /// Products shown in the shop, sorted by name.
    pub async fn active_products(&self) -> Vec<Product> {
        let mut products: Vec<Product> = self.all_products().await.into_iter().filter(Product::is_active).collect();
        products.sort_by(|a, b| a.name().to_lowercase().cmp(&b.name().to_lowercase()));
        products
    }

    pub async fn by_category(&self, category_id: &str) -> Vec<Product> {
        self.active_products().await.into_iter().filter(|p| p.category_id() == Some(category_id)).collect()
    }

    pub async fn featured(&self) -> Vec<Product> {
        self.active_products().await.into_iter().filter(Product::is_featured).collect()
    }

    /// Case-insensitive match on name or description.
    pub async fn search(&self, query: &str) -> Vec<Product> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() { return self.active_products().await; }
        self.active_products().await.into_iter()
            .filter(|p| p.name().to_lowercase().contains(&needle) || p.description().to_lowercase().contains(&needle))
            .collect()
    }

    pub async fn product(&self, id: &str) -> Option<Product> { self.store.get::<Product>(id).await }

    pub async fn categories(&self) -> Vec<Category> {
        self.store.list::<Category>().await.into_iter().filter(|c| c.active).collect()
    }

    pub async fn brands(&self) -> Vec<Brand> { self.store.list::<Brand>().await }

    pub async fn services(&self) -> Vec<Service> { self.store.list::<Service>().await }

    pub async fn banners(&self) -> Vec<Banner> { visible_banners(self.store.list::<Banner>().await) }

    /// Creates or replaces any catalog record.
    pub async fn save<T: Record>(&self, record: &T) -> Result<WriteOutcome, StoreError> {
        let outcome = self.store.save(record).await?;
        info!(collection = %T::COLLECTION, id = record.record_id(), ?outcome, "catalog record saved");
        Ok(outcome)
    }

    pub async fn delete<T: Record>(&self, id: &str) -> Result<WriteOutcome, StoreError> {
        let outcome = self.store.delete::<T>(id).await?;
        info!(collection = %T::COLLECTION, id, ?outcome, "catalog record deleted");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{LocalMirror, MemoryRemote, MemoryStore};
    use rust_decimal::Decimal;
    use std::sync::Arc;

    async fn catalog() -> CatalogService {
        let svc = CatalogService::new(DataStore::new(Arc::new(MemoryRemote::new()), LocalMirror::new(Arc::new(MemoryStore::new()))));
        let lighting = Category::new("Lighting");
        svc.save(&lighting).await.unwrap();
        svc.save(&Product::create("led strip 5m", Decimal::from(40)).with_category(lighting.id.clone()).featured()).await.unwrap();
        svc.save(&Product::create("Ceiling lamp", Decimal::from(90)).with_category(lighting.id.clone()).with_description("Warm LED")).await.unwrap();
        let mut old = Product::create("Halogen bulb", Decimal::from(5)).with_category(lighting.id);
        old.archive();
        svc.save(&old).await.unwrap();
        svc.save(&Product::create("Breaker 16A", Decimal::from(25))).await.unwrap();
        svc
    }

    fn names(products: &[Product]) -> Vec<&str> { products.iter().map(Product::name).collect() }

    #[tokio::test]
    async fn test_active_products_sorted_case_insensitive() {
        let svc = catalog().await;
        assert_eq!(names(&svc.active_products().await), vec!["Breaker 16A", "Ceiling lamp", "led strip 5m"]);
        assert_eq!(svc.all_products().await.len(), 4);
    }

    #[tokio::test]
    async fn test_category_featured_and_search() {
        let svc = catalog().await;
        let lighting = svc.categories().await.remove(0);
        assert_eq!(names(&svc.by_category(&lighting.id).await), vec!["Ceiling lamp", "led strip 5m"]);
        assert_eq!(names(&svc.featured().await), vec!["led strip 5m"]);
        assert_eq!(names(&svc.search("LED").await), vec!["Ceiling lamp", "led strip 5m"]);
        assert_eq!(svc.search("  ").await.len(), 3);
    }

    #[tokio::test]
    async fn test_delete_and_banners() {
        let svc = catalog().await;
        let mut hidden = Banner::new("Old sale", "old.png");
        hidden.active = false;
        let shown = Banner::new("Summer", "summer.png");
        svc.save(&hidden).await.unwrap();
        svc.save(&shown).await.unwrap();
        assert_eq!(svc.banners().await, vec![shown.clone()]);
        svc.delete::<Banner>(&shown.id).await.unwrap();
        assert!(svc.banners().await.is_empty());
    }
}
