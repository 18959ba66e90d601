use crate::db::{DbConnection, DbPool};
use crate::domain::category::Category;
use crate::domain::images::ImageDiff;
use crate::domain::product::{NewProduct, Product, ProductImage, ProductUpdate};
use crate::domain::types::{CategoryName, ProductId};

pub mod category;
pub mod errors;
pub mod product;

pub use errors::{RepositoryError, RepositoryResult};

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Query parameters used when listing products.
#[derive(Debug, Clone, Default)]
pub struct ProductListQuery {
    /// Restrict to products with the given featured flag.
    pub featured: Option<bool>,
    /// Maximum number of rows to return.
    pub limit: Option<usize>,
}

impl ProductListQuery {
    pub fn featured(mut self, featured: bool) -> Self {
        self.featured = Some(featured);
        self
    }
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Read-only operations for product entities and their images.
pub trait ProductReader {
    /// List products matching the supplied query parameters, ordered by name.
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<Vec<Product>>;
    /// Retrieve a product by its identifier.
    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>>;
    /// List the images attached to a product.
    fn list_product_images(&self, id: ProductId) -> RepositoryResult<Vec<ProductImage>>;
}

/// Write operations for product entities. Each call is atomic.
pub trait ProductWriter {
    /// Persist a new product together with its images.
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product>;
    /// Replace the product's fields and reconcile its image set against
    /// `update.images`. Returns the image operations that were applied.
    fn update_product(&self, id: ProductId, update: &ProductUpdate)
    -> RepositoryResult<ImageDiff>;
    /// Delete a product and its images. Returns the number of products removed.
    fn delete_product(&self, id: ProductId) -> RepositoryResult<usize>;
    /// Flip the featured flag. Returns the new value, or `None` for an
    /// unknown product.
    fn toggle_featured(&self, id: ProductId) -> RepositoryResult<Option<bool>>;
}

/// Read-only operations for category entities.
pub trait CategoryReader {
    /// List all categories ordered by name.
    fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
    /// Resolve a category by its unique name.
    fn get_category_by_name(&self, name: &CategoryName) -> RepositoryResult<Option<Category>>;
}
