// Real-estate agents and their derived active listing count.

pub mod dto;
pub mod handlers;
pub mod repository;
