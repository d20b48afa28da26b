// Prompt templates for property and city copy.
// Shared fragments live in llm_client::prompts.

/// Per-property prompt. Replace `{name}`, `{city}`, `{price}`, `{area}`, `{json_only}`.
pub const PROPERTY_PROMPT_TEMPLATE: &str = "Generate real estate data for '{name}' in {city}.
Price: ₹{price}, Area: {area} sqft

Return JSON with these keys (each as array of 3-4 points):
- key_highlights
- investment_data
- nearby_places
- unique_features
- lifestyle_benefits
{json_only}";

/// Per-city prompt. Replace `{city}`, `{json_only}`.
pub const CITY_PROMPT_TEMPLATE: &str = "Create real estate investment summary for {city}, India.

Return JSON with these keys (each as array of 2-3 bullet points):
- investment_reasons: Why invest here
- growth_potential: Future developments
- infrastructure: Transport & amenities
- market_trends: Current property trends

{json_only}";

/// Placeholder payload returned by the city generator when no API key is set.
pub const CITY_NOT_CONFIGURED_REASONS: &str =
    "<p>Please configure Groq API key to see investment data.</p>";
pub const CITY_NOT_CONFIGURED_GROWTH: &str =
    "<p>Get free API key from https://console.groq.com</p>";
pub const CITY_NOT_CONFIGURED_OTHER: &str = "<p>Configuration needed.</p>";
