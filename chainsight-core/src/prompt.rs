//! Prompt composition for the supply-chain analyst model.
//!
//! The wording below is a wire contract with the upstream model: the
//! three-item structure (trends, risks, recommendations) is what downstream
//! consumers render. Changes here change the shape of every generated
//! insight, so the template lives behind one pure function and is pinned by
//! golden tests.

/// System message framing the assistant for every request.
pub const SYSTEM_PROMPT: &str =
    "You are an expert supply chain analyst providing professional insights and recommendations.";

/// Render the analysis prompt for one dashboard section.
///
/// `data` is embedded as compact JSON; callers enforce any size cap before
/// composing.
pub fn compose_prompt(context: &str, data: &serde_json::Value, lang: &str) -> String {
    format!(
        "Analyze the following supply chain data for the section: {context}.\n\
         Data: {data}\n\
         \n\
         Please provide a concise analysis in {lang} including:\n\
         1. Key Trends observed.\n\
         2. Potential risks or bottlenecks.\n\
         3. Actionable recommendations.\n\
         \n\
         Keep the tone professional and expert-level."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prompt_golden_text() {
        let data = json!([{"day": "Mon", "hours": 42}]);
        let prompt = compose_prompt("Warehouse KPIs", &data, "English");

        assert_eq!(
            prompt,
            "Analyze the following supply chain data for the section: Warehouse KPIs.\n\
             Data: [{\"day\":\"Mon\",\"hours\":42}]\n\
             \n\
             Please provide a concise analysis in English including:\n\
             1. Key Trends observed.\n\
             2. Potential risks or bottlenecks.\n\
             3. Actionable recommendations.\n\
             \n\
             Keep the tone professional and expert-level."
        );
    }

    #[test]
    fn test_prompt_three_item_structure() {
        let prompt = compose_prompt("Logistics", &json!({}), "German");
        assert!(prompt.contains("1. Key Trends observed."));
        assert!(prompt.contains("2. Potential risks or bottlenecks."));
        assert!(prompt.contains("3. Actionable recommendations."));
    }

    #[test]
    fn test_prompt_embeds_language_and_context() {
        let prompt = compose_prompt("Fleet Load Factor", &json!([1, 2, 3]), "Turkish");
        assert!(prompt.contains("section: Fleet Load Factor."));
        assert!(prompt.contains("analysis in Turkish"));
        assert!(prompt.contains("Data: [1,2,3]"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let data = json!({"loadFactor": 88, "count": 12});
        let a = compose_prompt("Transport", &data, "English");
        let b = compose_prompt("Transport", &data, "English");
        assert_eq!(a, b);
    }

    #[test]
    fn test_system_prompt_wording() {
        assert_eq!(
            SYSTEM_PROMPT,
            "You are an expert supply chain analyst providing professional insights and recommendations."
        );
    }
}
