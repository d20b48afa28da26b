// Property listings: derived pricing, persistence, map/listing view models and handlers.

pub mod categories;
pub mod dto;
pub mod handlers;
pub mod map;
pub mod media;
pub mod pricing;
pub mod repository;
