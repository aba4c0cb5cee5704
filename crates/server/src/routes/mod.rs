pub mod export;
pub mod info;
pub mod list;
pub mod root;
pub mod vectors;

use actix_web::web;

/// Register every inspector route
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(root::index)
        .service(info::info)
        .service(info::stats)
        .service(list::list)
        .service(export::export)
        .service(vectors::get_vector)
        .service(vectors::get_vectors_batch);
}
