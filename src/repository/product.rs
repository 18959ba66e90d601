use diesel::prelude::*;

use crate::domain::images::ImageDiff;
use crate::domain::product::{NewProduct, Product, ProductImage, ProductUpdate};
use crate::domain::types::{ImageUrl, ProductId};
use crate::models::product::{NewProduct as DbNewProduct, Product as DbProduct};
use crate::models::product_image::{NewProductImage, ProductImage as DbProductImage};
use crate::repository::{
    DieselRepository, ProductListQuery, ProductReader, ProductWriter, RepositoryError,
    RepositoryResult,
};

impl ProductReader for DieselRepository {
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<Vec<Product>> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let mut items = products::table.into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(featured) = query.featured {
            items = items.filter(products::featured.eq(featured));
        }

        if let Some(limit) = query.limit {
            items = items.limit(limit as i64);
        }

        let items = items
            .order((products::name.asc(), products::id.asc()))
            .load::<DbProduct>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Product>, _>>()?;

        Ok(items)
    }

    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let product = products::table
            .filter(products::id.eq(id.get()))
            .first::<DbProduct>(&mut conn)
            .optional()?;

        let product = product.map(TryInto::try_into).transpose()?;
        Ok(product)
    }

    fn list_product_images(&self, id: ProductId) -> RepositoryResult<Vec<ProductImage>> {
        use crate::schema::product_images;

        let mut conn = self.conn()?;

        let images = product_images::table
            .filter(product_images::product_id.eq(id.get()))
            .order(product_images::id.asc())
            .load::<DbProductImage>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<ProductImage>, _>>()?;

        Ok(images)
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product> {
        use crate::schema::{product_images, products};

        let mut conn = self.conn()?;

        let created = conn.transaction::<_, RepositoryError, _>(|conn| {
            let db_product: DbNewProduct = product.into();
            let created = diesel::insert_into(products::table)
                .values(&db_product)
                .get_result::<DbProduct>(conn)?;

            let images = product
                .images
                .iter()
                .map(|url| NewProductImage {
                    product_id: created.id,
                    url: url.as_str(),
                })
                .collect::<Vec<_>>();

            if !images.is_empty() {
                diesel::insert_into(product_images::table)
                    .values(&images)
                    .execute(conn)?;
            }

            Ok(created)
        })?;

        Ok(created.try_into()?)
    }

    fn update_product(
        &self,
        id: ProductId,
        update: &ProductUpdate,
    ) -> RepositoryResult<ImageDiff> {
        use crate::schema::{product_images, products};

        let mut conn = self.conn()?;

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let affected = diesel::update(products::table.filter(products::id.eq(id.get())))
                .set((
                    products::name.eq(update.name.as_str()),
                    products::sku.eq(update.sku.as_str()),
                    products::price.eq(update.price.get()),
                    products::description.eq(update.description.as_ref().map(|d| d.as_str())),
                    products::updated_at.eq(diesel::dsl::now),
                ))
                .execute(conn)?;

            if affected == 0 {
                return Err(RepositoryError::NotFound);
            }

            if let Some(category_id) = update.category_id {
                diesel::update(products::table.filter(products::id.eq(id.get())))
                    .set(products::category_id.eq(category_id.get()))
                    .execute(conn)?;
            }

            let old_images = product_images::table
                .filter(product_images::product_id.eq(id.get()))
                .select(product_images::url)
                .load::<String>(conn)?
                .into_iter()
                .map(ImageUrl::new)
                .collect::<Result<Vec<_>, _>>()?;

            let diff = ImageDiff::between(&old_images, &update.images);

            if !diff.to_delete.is_empty() {
                let urls = diff
                    .to_delete
                    .iter()
                    .map(ImageUrl::as_str)
                    .collect::<Vec<_>>();
                diesel::delete(
                    product_images::table
                        .filter(product_images::product_id.eq(id.get()))
                        .filter(product_images::url.eq_any(urls)),
                )
                .execute(conn)?;
            }

            if !diff.to_create.is_empty() {
                let images = diff
                    .to_create
                    .iter()
                    .map(|url| NewProductImage {
                        product_id: id.get(),
                        url: url.as_str(),
                    })
                    .collect::<Vec<_>>();
                diesel::insert_into(product_images::table)
                    .values(&images)
                    .execute(conn)?;
            }

            Ok(diff)
        })
    }

    fn delete_product(&self, id: ProductId) -> RepositoryResult<usize> {
        use crate::schema::{product_images, products};

        let mut conn = self.conn()?;

        let affected = conn.transaction::<_, RepositoryError, _>(|conn| {
            diesel::delete(product_images::table.filter(product_images::product_id.eq(id.get())))
                .execute(conn)?;

            let affected =
                diesel::delete(products::table.filter(products::id.eq(id.get()))).execute(conn)?;
            Ok(affected)
        })?;

        Ok(affected)
    }

    fn toggle_featured(&self, id: ProductId) -> RepositoryResult<Option<bool>> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let Some(featured) = products::table
                .filter(products::id.eq(id.get()))
                .select(products::featured)
                .first::<bool>(conn)
                .optional()?
            else {
                return Ok(None);
            };

            diesel::update(products::table.filter(products::id.eq(id.get())))
                .set((
                    products::featured.eq(!featured),
                    products::updated_at.eq(diesel::dsl::now),
                ))
                .execute(conn)?;

            Ok(Some(!featured))
        })
    }
}
