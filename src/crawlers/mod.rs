pub mod crawler;
pub mod web;

pub use crawler::PageSource;
pub use web::WebFetcher;
