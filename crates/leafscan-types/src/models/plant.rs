//! Supported plant types and their classification vocabularies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DiagnosisError;

const POTATO_CLASSES: &[&str] = &["Early Blight", "Late Blight", "Healthy"];

const PEPPER_CLASSES: &[&str] = &["Bacterial Spot", "Healthy"];

const TOMATO_CLASSES: &[&str] = &[
    "Target Spot",
    "Mosaic Virus",
    "Yellow Leaf Curl Virus",
    "Bacterial Spot",
    "Early Blight",
    "Healthy",
    "Late Blight",
    "Leaf Mold",
    "Septoria Leaf Spot",
    "Two Spotted Spider Mite",
];

/// Label every vocabulary uses for a leaf with no detected disease.
pub const HEALTHY_LABEL: &str = "Healthy";

/// Closed set of plants the classifiers are trained for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlantType {
    Potato,
    Tomato,
    Pepper,
}

impl PlantType {
    /// All supported plants, in the order they are advertised to callers.
    pub const ALL: [PlantType; 3] = [PlantType::Potato, PlantType::Tomato, PlantType::Pepper];

    /// Lowercase wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            PlantType::Potato => "potato",
            PlantType::Tomato => "tomato",
            PlantType::Pepper => "pepper",
        }
    }

    /// Ordered label set; index `i` corresponds to output `i` of the plant's model.
    pub const fn vocabulary(self) -> &'static [&'static str] {
        match self {
            PlantType::Potato => POTATO_CLASSES,
            PlantType::Tomato => TOMATO_CLASSES,
            PlantType::Pepper => PEPPER_CLASSES,
        }
    }

    /// Whether `label` belongs to this plant's vocabulary.
    pub fn is_known_label(self, label: &str) -> bool {
        self.vocabulary().contains(&label)
    }

    /// Wire names of every supported plant.
    pub fn supported_names() -> Vec<String> {
        Self::ALL.iter().map(|p| p.as_str().to_string()).collect()
    }

    /// Parse a caller-supplied plant name, failing with `InvalidPlantType`.
    pub fn parse(raw: &str) -> Result<Self, DiagnosisError> {
        raw.parse()
    }
}

impl fmt::Display for PlantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlantType {
    type Err = DiagnosisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "potato" => Ok(PlantType::Potato),
            "tomato" => Ok(PlantType::Tomato),
            "pepper" => Ok(PlantType::Pepper),
            _ => Err(DiagnosisError::InvalidPlantType { plant: s.to_string() }),
        }
    }
}

/// Whether a predicted label denotes a healthy leaf.
pub fn is_healthy_label(label: &str) -> bool {
    label.eq_ignore_ascii_case(HEALTHY_LABEL)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "test assertions")]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Potato".parse::<PlantType>().unwrap(), PlantType::Potato);
        assert_eq!(" TOMATO ".parse::<PlantType>().unwrap(), PlantType::Tomato);
        assert_eq!("pepper".parse::<PlantType>().unwrap(), PlantType::Pepper);
    }

    #[test]
    fn test_parse_rejects_unknown_plant() {
        let err = PlantType::parse("banana").unwrap_err();
        assert_eq!(err, DiagnosisError::InvalidPlantType { plant: "banana".to_string() });
    }

    #[test]
    fn test_every_vocabulary_has_healthy_label() {
        for plant in PlantType::ALL {
            assert!(plant.is_known_label(HEALTHY_LABEL), "{plant} lacks a healthy class");
        }
    }

    #[test]
    fn test_vocabulary_sizes() {
        assert_eq!(PlantType::Potato.vocabulary().len(), 3);
        assert_eq!(PlantType::Pepper.vocabulary().len(), 2);
        assert_eq!(PlantType::Tomato.vocabulary().len(), 10);
    }

    #[test]
    fn test_serde_uses_lowercase() {
        assert_eq!(serde_json::to_string(&PlantType::Pepper).unwrap(), "\"pepper\"");
        let plant: PlantType = serde_json::from_str("\"potato\"").unwrap();
        assert_eq!(plant, PlantType::Potato);
    }

    #[test]
    fn test_supported_names_order() {
        assert_eq!(PlantType::supported_names(), vec!["potato", "tomato", "pepper"]);
    }
}
