//! Prompt templates for the text generator.
//!
//! Both templates pin the reply to a bare JSON object with a fixed key
//! skeleton. The generator still ignores this often enough that every reply
//! goes through [`crate::repair`].

use leafscan_types::PlantType;

const ADVISOR_PREAMBLE: &str = "You are an expert agriculture advisor.";

const STRICT_RULES: &str = "STRICT RULES:
- Respond ONLY with valid JSON.
- Do NOT wrap JSON in backticks.
- Do NOT include any explanation before or after the JSON.
- Do NOT use markdown formatting.
- The JSON must be the ONLY content returned.";

const EXPLANATION_SKELETON: &str = r#"{
    "disease_overview": "",
    "symptoms": "",
    "cause": "",
    "recommended_treatment": "",
    "prevention_tips": ""
}"#;

const PLANT_INFO_SKELETON: &str = r#"{
    "plant_info": "",
    "common_diseases": ""
}"#;

/// Prompt asking for an explanation of `disease` on `plant`.
pub fn explanation_prompt(plant: PlantType, disease: &str) -> String {
    format!(
        "{ADVISOR_PREAMBLE}\n\n{STRICT_RULES}\n\nReturn a JSON object exactly like this:\n\n\
         {EXPLANATION_SKELETON}\n\nFill each field with accurate information.\n\n\
         PLANT: {plant}\nDISEASE: {disease}\n"
    )
}

/// Prompt asking for general crop information about `plant`.
pub fn plant_info_prompt(plant: PlantType) -> String {
    format!(
        "{ADVISOR_PREAMBLE} Retrieve crisp general information about the crop {plant} in terms \
         of agricultural importance and value. Provide plant {plant} information including \
         common diseases.\n\n{STRICT_RULES}\n\nReturn a JSON object exactly like this:\n\n\
         {PLANT_INFO_SKELETON}\n\nFill each field with accurate information.\n\n\
         PLANT: {plant}\n"
    )
}
