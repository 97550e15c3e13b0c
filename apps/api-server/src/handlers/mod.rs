//! HTTP handlers and route configuration.

mod categories;
mod health;
mod posts;
mod tags;

#[cfg(test)]
mod tests;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/posts")
                    .route("", web::post().to(posts::create))
                    .route("", web::get().to(posts::list))
                    .route("/{id}", web::get().to(posts::get))
                    .route("/{id}", web::put().to(posts::update))
                    .route("/{id}", web::delete().to(posts::delete)),
            )
            .service(
                web::scope("/categories")
                    .route("", web::post().to(categories::create))
                    .route("", web::get().to(categories::list))
                    .route("/{id}", web::get().to(categories::get))
                    .route("/{id}", web::put().to(categories::update))
                    .route("/{id}", web::delete().to(categories::delete)),
            )
            .service(
                web::scope("/tags")
                    .route("", web::post().to(tags::create))
                    .route("", web::get().to(tags::list))
                    .route("/{id}", web::get().to(tags::get))
                    .route("/{id}", web::put().to(tags::update))
                    .route("/{id}", web::delete().to(tags::delete)),
            ),
    );
}
