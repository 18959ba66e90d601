use std::collections::BTreeSet;

use diesel::prelude::*;
use pushkind_catalog::domain::product::{NewProduct, ProductUpdate};
use pushkind_catalog::domain::types::{
    CategoryId, CategoryName, ImageUrl, ProductDescription, ProductId, ProductName, ProductPrice,
    ProductSku,
};
use pushkind_catalog::repository::{
    CategoryReader, DieselRepository, ProductListQuery, ProductReader, ProductWriter,
    RepositoryError,
};
use pushkind_catalog::schema::product_images;

mod common;

fn urls(values: &[&str]) -> Vec<ImageUrl> {
    values.iter().map(|v| ImageUrl::new(*v).unwrap()).collect()
}

fn new_product(name: &str, category_id: i32, images: &[&str]) -> NewProduct {
    NewProduct {
        name: ProductName::new(name).unwrap(),
        sku: ProductSku::new("ABCD1234").unwrap(),
        price: ProductPrice::new(19.99).unwrap(),
        description: None,
        category_id: CategoryId::new(category_id).unwrap(),
        images: urls(images),
    }
}

fn update_for(name: &str, category_id: Option<i32>, images: &[&str]) -> ProductUpdate {
    ProductUpdate {
        name: ProductName::new(name).unwrap(),
        sku: ProductSku::new("WXYZ9876").unwrap(),
        price: ProductPrice::new(5.5).unwrap(),
        description: Some(ProductDescription::new("updated").unwrap()),
        category_id: category_id.map(|id| CategoryId::new(id).unwrap()),
        images: urls(images),
    }
}

fn image_urls(repo: &DieselRepository, id: ProductId) -> Vec<String> {
    repo.list_product_images(id)
        .unwrap()
        .into_iter()
        .map(|i| i.url.into_inner())
        .collect()
}

#[test]
fn categories_are_resolved_by_name() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    test_db.add_category("Tools");
    test_db.add_category("Garden");

    let categories = repo.list_categories().unwrap();
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0].name, "Garden");

    let tools = repo
        .get_category_by_name(&CategoryName::new("Tools").unwrap())
        .unwrap()
        .expect("category should exist");
    assert_eq!(tools.name, "Tools");

    let missing = repo
        .get_category_by_name(&CategoryName::new("Kitchen").unwrap())
        .unwrap();
    assert!(missing.is_none());
}

#[test]
fn create_product_persists_images_and_defaults() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let category_id = test_db.add_category("Tools");

    let product = repo
        .create_product(&new_product("Widget", category_id, &["u1", "u2"]))
        .unwrap();

    assert_eq!(product.name, "Widget");
    assert_eq!(product.price.get(), 19.99);
    assert!(!product.featured);
    assert_eq!(image_urls(&repo, product.id), vec!["u1", "u2"]);

    let stored = repo.get_product_by_id(product.id).unwrap().unwrap();
    assert_eq!(stored.sku, "ABCD1234");
}

#[test]
fn create_product_with_unknown_category_rolls_back() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let result = repo.create_product(&new_product("Widget", 77, &["u1"]));

    assert!(result.is_err());
    assert!(repo.list_products(ProductListQuery::default()).unwrap().is_empty());

    let mut conn = test_db.pool().get().unwrap();
    let images: i64 = product_images::table.count().get_result(&mut conn).unwrap();
    assert_eq!(images, 0);
}

#[test]
fn update_product_reconciles_images() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let category_id = test_db.add_category("Tools");
    let product = repo
        .create_product(&new_product("Widget", category_id, &["u1", "u2", "u3"]))
        .unwrap();
    let kept_id = repo.list_product_images(product.id).unwrap()[1].id;

    let diff = repo
        .update_product(product.id, &update_for("Gadget", None, &["u2", "u4"]))
        .unwrap();

    assert_eq!(diff.to_delete, urls(&["u1", "u3"]).into_iter().collect::<BTreeSet<_>>());
    assert_eq!(diff.to_create, urls(&["u4"]).into_iter().collect::<BTreeSet<_>>());

    let images = repo.list_product_images(product.id).unwrap();
    assert_eq!(images.len(), 2);
    // u2 keeps its row instead of being recreated.
    assert_eq!(images[0].id, kept_id);
    assert_eq!(images[0].url, "u2");
    assert_eq!(images[1].url, "u4");

    let stored = repo.get_product_by_id(product.id).unwrap().unwrap();
    assert_eq!(stored.name, "Gadget");
    assert_eq!(stored.sku, "WXYZ9876");
    assert_eq!(stored.description.unwrap().as_str(), "updated");
    assert_eq!(stored.category_id.get(), category_id);

    let again = repo
        .update_product(product.id, &update_for("Gadget", None, &["u4", "u2"]))
        .unwrap();
    assert!(again.is_empty());
}

#[test]
fn update_product_deletes_only_own_images() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let category_id = test_db.add_category("Tools");
    let first = repo
        .create_product(&new_product("First", category_id, &["shared"]))
        .unwrap();
    let second = repo
        .create_product(&new_product("Second", category_id, &["shared"]))
        .unwrap();

    repo.update_product(first.id, &update_for("First", None, &[]))
        .unwrap();

    assert!(image_urls(&repo, first.id).is_empty());
    assert_eq!(image_urls(&repo, second.id), vec!["shared"]);
}

#[test]
fn update_product_changes_category_when_given() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let tools = test_db.add_category("Tools");
    let garden = test_db.add_category("Garden");
    let product = repo
        .create_product(&new_product("Rake", tools, &[]))
        .unwrap();

    repo.update_product(product.id, &update_for("Rake", Some(garden), &[]))
        .unwrap();

    let stored = repo.get_product_by_id(product.id).unwrap().unwrap();
    assert_eq!(stored.category_id.get(), garden);
}

#[test]
fn update_missing_product_is_not_found() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let result = repo.update_product(
        ProductId::new(5).unwrap(),
        &update_for("Ghost", None, &["u1"]),
    );

    assert!(matches!(result, Err(RepositoryError::NotFound)));
}

#[test]
fn delete_product_removes_images() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let category_id = test_db.add_category("Tools");
    let product = repo
        .create_product(&new_product("Widget", category_id, &["u1", "u2"]))
        .unwrap();

    assert_eq!(repo.delete_product(product.id).unwrap(), 1);
    assert!(repo.get_product_by_id(product.id).unwrap().is_none());
    assert!(image_urls(&repo, product.id).is_empty());
    assert_eq!(repo.delete_product(product.id).unwrap(), 0);
}

#[test]
fn toggle_featured_flips_and_filters() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let category_id = test_db.add_category("Tools");
    let ids = (1..=5)
        .map(|i| {
            repo.create_product(&new_product(&format!("Product {i}"), category_id, &[]))
                .unwrap()
                .id
        })
        .collect::<Vec<_>>();

    for id in &ids {
        assert_eq!(repo.toggle_featured(*id).unwrap(), Some(true));
    }
    assert_eq!(repo.toggle_featured(ids[0]).unwrap(), Some(false));
    assert_eq!(repo.toggle_featured(ids[0]).unwrap(), Some(true));

    let featured = repo
        .list_products(ProductListQuery::default().featured(true).limit(4))
        .unwrap();
    assert_eq!(featured.len(), 4);
    assert!(featured.iter().all(|p| p.featured));

    assert_eq!(
        repo.toggle_featured(ProductId::new(999).unwrap()).unwrap(),
        None
    );
}
