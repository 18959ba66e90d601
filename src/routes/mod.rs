use actix_web::http::header::{self, ContentType};
use actix_web::{HttpResponse, web};
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use serde::Serialize;
use tera::{Context, Tera};

pub mod main;
pub mod products;

/// Flash message prepared for templates.
#[derive(Debug, Serialize)]
pub struct Alert {
    pub message: String,
    pub level: &'static str,
}

/// Map a flash level onto the CSS class used by the templates.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        Level::Info | Level::Debug => "info",
    }
}

pub fn alerts(flash_messages: &IncomingFlashMessages) -> Vec<Alert> {
    flash_messages
        .iter()
        .map(|f| Alert {
            message: f.content().to_string(),
            level: alert_level_to_str(&f.level()),
        })
        .collect()
}

/// Render `template` with a typed page context.
pub fn render_template<T: Serialize>(tera: &Tera, template: &str, page: &T) -> HttpResponse {
    let context = match Context::from_serialize(page) {
        Ok(context) => context,
        Err(e) => {
            log::error!("Failed to build context for template '{template}': {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    match tera.render(template, &context) {
        Ok(body) => HttpResponse::Ok()
            .content_type(ContentType::html())
            .body(body),
        Err(e) => {
            log::error!("Failed to render template '{template}': {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Register every HTML route of the service.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(main::index)
        .service(products::show_products)
        .service(products::show_create_product)
        .service(products::create_product)
        .service(products::show_edit_product)
        .service(products::edit_product)
        .service(products::show_delete_product)
        .service(products::delete_product)
        .service(products::toggle_featured);
}
