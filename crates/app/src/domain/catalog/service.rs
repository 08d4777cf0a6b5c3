//! Catalog service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::catalog::{
        data::{CatalogSeed, NewItem, NewProduct, NewServer, ProductDetails, SeedSummary},
        errors::CatalogServiceError,
        records::{ItemRecord, ProductRecord, ProductUuid, ServerRecord},
        repositories::{
            items::PgItemsRepository, products::PgProductsRepository,
            servers::PgServersRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgCatalogService {
    db: Db,
    products: PgProductsRepository,
    items: PgItemsRepository,
    servers: PgServersRepository,
}

impl PgCatalogService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            products: PgProductsRepository::new(),
            items: PgItemsRepository::new(),
            servers: PgServersRepository::new(),
        }
    }
}

#[async_trait]
impl CatalogService for PgCatalogService {
    async fn list_products(&self) -> Result<Vec<ProductRecord>, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let products = self.products.list_products(&mut tx).await?;

        tx.commit().await?;

        Ok(products)
    }

    async fn get_product(&self, product: ProductUuid) -> Result<ProductRecord, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let product = self.products.get_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(product)
    }

    #[tracing::instrument(
        name = "catalog.service.create_product",
        skip(self, product),
        fields(product_uuid = %product.uuid, name = %product.details.name),
        err
    )]
    async fn create_product(&self, product: NewProduct) -> Result<ProductRecord, CatalogServiceError> {
        if !product.details.is_valid() {
            return Err(CatalogServiceError::InvalidData);
        }

        let mut tx = self.db.begin().await?;

        let created = self
            .products
            .create_product(&mut tx, product.uuid, &product.details)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    #[tracing::instrument(
        name = "catalog.service.update_product",
        skip(self, details),
        fields(product_uuid = %product),
        err
    )]
    async fn update_product(
        &self,
        product: ProductUuid,
        details: ProductDetails,
    ) -> Result<ProductRecord, CatalogServiceError> {
        if !details.is_valid() {
            return Err(CatalogServiceError::InvalidData);
        }

        let mut tx = self.db.begin().await?;

        let updated = self
            .products
            .update_product(&mut tx, product, &details)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    #[tracing::instrument(
        name = "catalog.service.delete_product",
        skip(self),
        fields(product_uuid = %product),
        err
    )]
    async fn delete_product(&self, product: ProductUuid) -> Result<(), CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.products.delete_product(&mut tx, product).await?;

        if rows_affected == 0 {
            return Err(CatalogServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn list_items(&self) -> Result<Vec<ItemRecord>, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let items = self.items.list_items(&mut tx).await?;

        tx.commit().await?;

        Ok(items)
    }

    async fn upsert_item(&self, item: NewItem) -> Result<ItemRecord, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.items.upsert_item(&mut tx, &item).await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn list_servers(&self) -> Result<Vec<ServerRecord>, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let servers = self.servers.list_servers(&mut tx).await?;

        tx.commit().await?;

        Ok(servers)
    }

    async fn upsert_server(&self, server: NewServer) -> Result<ServerRecord, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.servers.upsert_server(&mut tx, &server).await?;

        tx.commit().await?;

        Ok(record)
    }

    #[tracing::instrument(name = "catalog.service.seed", skip(self, seed), err)]
    async fn seed(&self, seed: CatalogSeed) -> Result<SeedSummary, CatalogServiceError> {
        if !seed.products.iter().all(ProductDetails::is_valid) {
            return Err(CatalogServiceError::InvalidData);
        }

        let mut tx = self.db.begin().await?;
        let mut summary = SeedSummary::default();

        for item in &seed.items {
            self.items.upsert_item(&mut tx, item).await?;
            summary.items += 1;
        }

        for server in &seed.servers {
            self.servers.upsert_server(&mut tx, server).await?;
            summary.servers += 1;
        }

        // Products have no natural key, so they are only seeded into an empty catalog.
        if self.products.count_products(&mut tx).await? == 0 {
            for details in &seed.products {
                self.products
                    .create_product(&mut tx, ProductUuid::new(), details)
                    .await?;
                summary.products += 1;
            }
        }

        tx.commit().await?;

        info!(
            items = summary.items,
            servers = summary.servers,
            products = summary.products,
            "seeded catalog"
        );

        Ok(summary)
    }
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Lists products that have not been deleted, oldest first.
    async fn list_products(&self) -> Result<Vec<ProductRecord>, CatalogServiceError>;

    /// Retrieve a single product.
    async fn get_product(&self, product: ProductUuid) -> Result<ProductRecord, CatalogServiceError>;

    /// Creates a new product.
    async fn create_product(&self, product: NewProduct) -> Result<ProductRecord, CatalogServiceError>;

    /// Replaces the editable fields of a product.
    async fn update_product(
        &self,
        product: ProductUuid,
        details: ProductDetails,
    ) -> Result<ProductRecord, CatalogServiceError>;

    /// Soft-deletes a product. Past transactions and pending items keep their copies.
    async fn delete_product(&self, product: ProductUuid) -> Result<(), CatalogServiceError>;

    async fn list_items(&self) -> Result<Vec<ItemRecord>, CatalogServiceError>;

    async fn upsert_item(&self, item: NewItem) -> Result<ItemRecord, CatalogServiceError>;

    async fn list_servers(&self) -> Result<Vec<ServerRecord>, CatalogServiceError>;

    async fn upsert_server(&self, server: NewServer) -> Result<ServerRecord, CatalogServiceError>;

    /// Upserts items and servers, and creates products when the catalog has none yet.
    async fn seed(&self, seed: CatalogSeed) -> Result<SeedSummary, CatalogServiceError>;
}
