pub mod agent;
pub mod category;
pub mod property;
pub mod registration;
