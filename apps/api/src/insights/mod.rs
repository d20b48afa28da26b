// AI-generated marketing copy for properties and cities.
// Every completion call goes through llm_client; nothing here talks HTTP directly.

pub mod cache;
pub mod city_content;
pub mod html;
pub mod prompts;
pub mod property_content;

pub use cache::{CityInsightCache, RedisCityInsightCache};
pub use city_content::{get_city_investment_info, CityInvestmentInfo};
pub use property_content::generate_property_content;
