// Public property registration: multipart form intake, uploads to object storage.

pub mod form;
pub mod handlers;
pub mod repository;
