use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Serialize;
use tera::Tera;

use crate::dto::categories::CategoryDto;
use crate::dto::products::ProductDto;
use crate::forms::products::{FormErrors, ProductForm, REQUIRED_MESSAGE};
use crate::repository::DieselRepository;
use crate::routes::{Alert, alerts, redirect, render_template};
use crate::services::ServiceError;
use crate::services::products::{
    create_product as create_product_service, delete_product as delete_product_service,
    edit_product as edit_product_service, show_categories as show_categories_service,
    show_delete_product as show_delete_product_service,
    show_edit_product as show_edit_product_service, show_products as show_products_service,
    toggle_featured as toggle_featured_service,
};

const PRODUCTS_URL: &str = "/products";
const PRODUCT_NOT_FOUND: &str = "Product does not exist.";

#[derive(Serialize)]
struct ProductsPage<'a> {
    alerts: Vec<Alert>,
    products: &'a [ProductDto],
    featured_products: &'a [ProductDto],
}

/// Context shared by the create and edit forms.
#[derive(Serialize)]
struct ProductFormPage<'a> {
    alerts: Vec<Alert>,
    categories: &'a [CategoryDto],
    /// Product being edited; absent on the create form.
    product: Option<&'a ProductDto>,
    /// Image URLs currently attached to the product.
    images: &'a [String],
    errors: Option<&'a FormErrors>,
    payload: Option<&'a ProductForm>,
}

#[derive(Serialize)]
struct DeleteProductPage<'a> {
    alerts: Vec<Alert>,
    product: &'a ProductDto,
}

fn category_errors(name: &str) -> FormErrors {
    if name.is_empty() {
        FormErrors::single("category", REQUIRED_MESSAGE)
    } else {
        FormErrors::single("category", format!("Category \"{name}\" does not exist."))
    }
}

fn render_create_form(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    repo: &DieselRepository,
    errors: Option<&FormErrors>,
    payload: Option<&ProductForm>,
) -> HttpResponse {
    let categories = match show_categories_service(repo) {
        Ok(categories) => categories,
        Err(err) => {
            log::error!("Failed to load categories for product form: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    render_template(
        tera,
        "products/create.html",
        &ProductFormPage {
            alerts: alerts(flash_messages),
            categories: &categories,
            product: None,
            images: &[],
            errors,
            payload,
        },
    )
}

fn render_edit_form(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    repo: &DieselRepository,
    product_id: i32,
    errors: Option<&FormErrors>,
    payload: Option<&ProductForm>,
) -> HttpResponse {
    match show_edit_product_service(product_id, repo) {
        Ok(view) => render_template(
            tera,
            "products/edit.html",
            &ProductFormPage {
                alerts: alerts(flash_messages),
                categories: &view.categories,
                product: Some(&view.product),
                images: &view.images,
                errors,
                payload: Some(payload.unwrap_or(&view.form)),
            },
        ),
        Err(ServiceError::NotFound) => {
            FlashMessage::error(PRODUCT_NOT_FOUND).send();
            redirect(PRODUCTS_URL)
        }
        Err(err) => {
            log::error!("Failed to render edit form of product {product_id}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/products")]
pub async fn show_products(
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_products_service(repo.get_ref()) {
        Ok(listing) => render_template(
            &tera,
            "products/index.html",
            &ProductsPage {
                alerts: alerts(&flash_messages),
                products: &listing.products,
                featured_products: &listing.featured_products,
            },
        ),
        Err(err) => {
            log::error!("Failed to render products page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/products/create")]
pub async fn show_create_product(
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    render_create_form(&tera, &flash_messages, repo.get_ref(), None, None)
}

#[post("/products/create")]
pub async fn create_product(
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<ProductForm>,
) -> impl Responder {
    let errors = match create_product_service(form.clone(), repo.get_ref()) {
        Ok(_) => {
            FlashMessage::success("Product created.").send();
            return redirect(PRODUCTS_URL);
        }
        Err(ServiceError::Validation(errors)) => errors,
        Err(ServiceError::CategoryNotFound(name)) => category_errors(&name),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            return redirect("/products/create");
        }
        Err(err) => {
            log::error!("Failed to create product: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    render_create_form(
        &tera,
        &flash_messages,
        repo.get_ref(),
        Some(&errors),
        Some(&form),
    )
}

#[get("/products/{product_id}/edit")]
pub async fn show_edit_product(
    product_id: web::Path<i32>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    render_edit_form(
        &tera,
        &flash_messages,
        repo.get_ref(),
        product_id.into_inner(),
        None,
        None,
    )
}

#[post("/products/{product_id}/edit")]
pub async fn edit_product(
    product_id: web::Path<i32>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<ProductForm>,
) -> impl Responder {
    let product_id = product_id.into_inner();

    let errors = match edit_product_service(product_id, form.clone(), repo.get_ref()) {
        Ok(_) => {
            FlashMessage::success("Product updated.").send();
            return redirect(PRODUCTS_URL);
        }
        Err(ServiceError::Validation(errors)) => errors,
        Err(ServiceError::CategoryNotFound(name)) => category_errors(&name),
        Err(ServiceError::NotFound) => {
            FlashMessage::error(PRODUCT_NOT_FOUND).send();
            return redirect(PRODUCTS_URL);
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            return redirect(&format!("/products/{product_id}/edit"));
        }
        Err(err) => {
            log::error!("Failed to update product {product_id}: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    render_edit_form(
        &tera,
        &flash_messages,
        repo.get_ref(),
        product_id,
        Some(&errors),
        Some(&form),
    )
}

#[get("/products/{product_id}/delete")]
pub async fn show_delete_product(
    product_id: web::Path<i32>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_delete_product_service(product_id.into_inner(), repo.get_ref()) {
        Ok(product) => render_template(
            &tera,
            "products/delete.html",
            &DeleteProductPage {
                alerts: alerts(&flash_messages),
                product: &product,
            },
        ),
        Err(ServiceError::NotFound) => {
            FlashMessage::error(PRODUCT_NOT_FOUND).send();
            redirect(PRODUCTS_URL)
        }
        Err(err) => {
            log::error!("Failed to render delete confirmation: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/products/{product_id}/delete")]
pub async fn delete_product(
    product_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match delete_product_service(product_id.into_inner(), repo.get_ref()) {
        Ok(()) => FlashMessage::success("Product deleted.").send(),
        Err(ServiceError::NotFound) => FlashMessage::error(PRODUCT_NOT_FOUND).send(),
        Err(err) => {
            log::error!("Failed to delete product: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    redirect(PRODUCTS_URL)
}

#[post("/products/{product_id}/toggle-featured")]
pub async fn toggle_featured(
    product_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match toggle_featured_service(product_id.into_inner(), repo.get_ref()) {
        Ok(true) => FlashMessage::success("Product is now featured.").send(),
        Ok(false) => FlashMessage::info("Product is no longer featured.").send(),
        Err(ServiceError::NotFound) => FlashMessage::error(PRODUCT_NOT_FOUND).send(),
        Err(err) => {
            log::error!("Failed to toggle featured flag: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    redirect(PRODUCTS_URL)
}
