use crate::domain::category::Category;
use crate::domain::images::ImageDiff;
use crate::domain::product::{Product, ProductImage};
use crate::domain::types::{CategoryId, CategoryName, ProductId};
use crate::dto::categories::CategoryDto;
use crate::dto::products::ProductDto;
use crate::forms::products::{ProductForm, ProductFormPayload};
use crate::repository::{
    CategoryReader, ProductListQuery, ProductReader, ProductWriter, RepositoryError,
};

use super::{ServiceError, ServiceResult};

/// Number of featured products shown above the listing.
pub const FEATURED_PRODUCTS_LIMIT: usize = 4;

/// Data for the products index page.
#[derive(Debug, Clone)]
pub struct ProductListing {
    pub products: Vec<ProductDto>,
    pub featured_products: Vec<ProductDto>,
}

/// Data for the edit form.
#[derive(Debug, Clone)]
pub struct EditProductView {
    pub product: ProductDto,
    pub categories: Vec<CategoryDto>,
    /// Image URLs currently attached to the product.
    pub images: Vec<String>,
    /// Form pre-populated with the stored values.
    pub form: ProductForm,
}

fn parse_product_id(product_id: i32) -> ServiceResult<ProductId> {
    ProductId::new(product_id).map_err(|_| ServiceError::NotFound)
}

fn load_product<R>(product_id: ProductId, repo: &R) -> ServiceResult<Product>
where
    R: ProductReader,
{
    match repo.get_product_by_id(product_id) {
        Ok(Some(product)) => Ok(product),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get product {product_id}: {e}");
            Err(ServiceError::Internal)
        }
    }
}

fn load_images<R>(product_id: ProductId, repo: &R) -> ServiceResult<Vec<ProductImage>>
where
    R: ProductReader,
{
    repo.list_product_images(product_id).map_err(|e| {
        log::error!("Failed to list images of product {product_id}: {e}");
        ServiceError::Internal
    })
}

fn load_categories<R>(repo: &R) -> ServiceResult<Vec<Category>>
where
    R: CategoryReader,
{
    repo.list_categories().map_err(|e| {
        log::error!("Failed to list categories: {e}");
        ServiceError::Internal
    })
}

fn resolve_category<R>(name: Option<&CategoryName>, repo: &R) -> ServiceResult<CategoryId>
where
    R: CategoryReader,
{
    let Some(name) = name else {
        return Err(ServiceError::CategoryNotFound(String::new()));
    };

    match repo.get_category_by_name(name) {
        Ok(Some(category)) => Ok(category.id),
        Ok(None) => Err(ServiceError::CategoryNotFound(name.as_str().to_string())),
        Err(e) => {
            log::error!("Failed to get category {name}: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// All products ordered by name plus up to [`FEATURED_PRODUCTS_LIMIT`]
/// featured ones.
pub fn show_products<R>(repo: &R) -> ServiceResult<ProductListing>
where
    R: ProductReader,
{
    let products = repo.list_products(ProductListQuery::default());
    let featured = repo.list_products(
        ProductListQuery::default()
            .featured(true)
            .limit(FEATURED_PRODUCTS_LIMIT),
    );

    match (products, featured) {
        (Ok(products), Ok(featured)) => Ok(ProductListing {
            products: products.into_iter().map(ProductDto::from).collect(),
            featured_products: featured.into_iter().map(ProductDto::from).collect(),
        }),
        (Err(e), _) | (_, Err(e)) => {
            log::error!("Failed to list products: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Categories offered by the create form.
pub fn show_categories<R>(repo: &R) -> ServiceResult<Vec<CategoryDto>>
where
    R: CategoryReader,
{
    Ok(load_categories(repo)?
        .into_iter()
        .map(CategoryDto::from)
        .collect())
}

/// Validate the submitted form and create the product with its images.
///
/// Field errors are returned as [`ServiceError::Validation`] before any store
/// access. An unknown category yields [`ServiceError::CategoryNotFound`].
pub fn create_product<R>(form: ProductForm, repo: &R) -> ServiceResult<ProductId>
where
    R: ProductWriter + CategoryReader,
{
    let payload: ProductFormPayload = form.try_into()?;
    let category_id = resolve_category(payload.category.as_ref(), repo)?;

    let new_product = payload.into_new_product(category_id);
    match repo.create_product(&new_product) {
        Ok(product) => {
            log::info!(
                "Created product {} ({}) with {} image(s)",
                product.id,
                product.sku,
                new_product.images.len()
            );
            Ok(product.id)
        }
        Err(e) => {
            log::error!("Failed to create product: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Current product state, categories and images for the edit form.
pub fn show_edit_product<R>(product_id: i32, repo: &R) -> ServiceResult<EditProductView>
where
    R: ProductReader + CategoryReader,
{
    let product_id = parse_product_id(product_id)?;
    let product = load_product(product_id, repo)?;
    let images = load_images(product_id, repo)?;
    let categories = load_categories(repo)?;

    let current_category = categories
        .iter()
        .find(|c| c.id == product.category_id)
        .map(|c| c.name.as_str())
        .unwrap_or_default();
    let form = ProductForm::from_product(&product, &images, current_category);

    Ok(EditProductView {
        product: product.into(),
        categories: categories.into_iter().map(CategoryDto::from).collect(),
        images: images.into_iter().map(|i| i.url.into_inner()).collect(),
        form,
    })
}

/// Validate the submitted form, update the product and reconcile its images.
///
/// The category is only changed when one is submitted. Returns the image
/// operations that were applied.
pub fn edit_product<R>(product_id: i32, form: ProductForm, repo: &R) -> ServiceResult<ImageDiff>
where
    R: ProductReader + ProductWriter + CategoryReader,
{
    let product_id = parse_product_id(product_id)?;
    load_product(product_id, repo)?;

    let payload: ProductFormPayload = form.try_into()?;
    let category_id = match payload.category.as_ref() {
        Some(name) => Some(resolve_category(Some(name), repo)?),
        None => None,
    };

    match repo.update_product(product_id, &payload.into_update(category_id)) {
        Ok(diff) => {
            log::info!(
                "Updated product {product_id}: {} image(s) removed, {} added",
                diff.to_delete.len(),
                diff.to_create.len()
            );
            Ok(diff)
        }
        Err(RepositoryError::NotFound) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to update product {product_id}: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Product shown on the delete confirmation page. Performs no mutation.
pub fn show_delete_product<R>(product_id: i32, repo: &R) -> ServiceResult<ProductDto>
where
    R: ProductReader,
{
    let product_id = parse_product_id(product_id)?;
    Ok(load_product(product_id, repo)?.into())
}

/// Delete a product together with its images.
pub fn delete_product<R>(product_id: i32, repo: &R) -> ServiceResult<()>
where
    R: ProductWriter,
{
    let product_id = parse_product_id(product_id)?;

    match repo.delete_product(product_id) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => {
            log::info!("Deleted product {product_id}");
            Ok(())
        }
        Err(e) => {
            log::error!("Failed to delete product {product_id}: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Flip the featured flag of a product and return the new value.
pub fn toggle_featured<R>(product_id: i32, repo: &R) -> ServiceResult<bool>
where
    R: ProductWriter,
{
    let product_id = parse_product_id(product_id)?;

    match repo.toggle_featured(product_id) {
        Ok(Some(featured)) => {
            log::info!("Product {product_id} featured set to {featured}");
            Ok(featured)
        }
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to toggle featured flag of product {product_id}: {e}");
            Err(ServiceError::Internal)
        }
    }
}
