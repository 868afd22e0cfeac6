//! Tool specifications advertised over the tool transport.

use serde_json::{json, Value};

/// Returns the list of available diagnosis tool specifications.
pub fn tool_specs() -> Vec<Value> {
    vec![
        json!({
            "name": "health_check",
            "description": "Check whether the diagnosis backend is reachable and healthy.",
            "inputSchema": { "type": "object", "properties": {} }
        }),
        json!({
            "name": "analyze_plant",
            "description": "Diagnose plant leaf disease from a local image. Returns the predicted disease, confidence, an explanation and an audio locator.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "plant": { "type": "string", "enum": ["potato", "tomato", "pepper"] },
                    "image_path": { "type": "string", "description": "Local filesystem path to the leaf image (JPEG or PNG)" }
                },
                "required": ["plant", "image_path"]
            }
        }),
        json!({
            "name": "play_audio",
            "description": "Download a synthesized audio summary and return it base64-encoded.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "audio_url": { "type": "string", "description": "Audio locator, e.g. /audio/<id>.mp3" }
                },
                "required": ["audio_url"]
            }
        }),
        json!({
            "name": "plant_info",
            "description": "General information about a supported crop, including its common diseases.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "plant": { "type": "string", "enum": ["potato", "tomato", "pepper"] }
                },
                "required": ["plant"]
            }
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_spec_has_schema() {
        let specs = tool_specs();
        let names: Vec<_> = specs.iter().filter_map(|s| s["name"].as_str()).collect();
        assert_eq!(names, ["health_check", "analyze_plant", "play_audio", "plant_info"]);
        for spec in &specs {
            assert_eq!(spec["inputSchema"]["type"], "object");
        }
    }
}
