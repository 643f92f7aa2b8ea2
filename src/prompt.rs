//! Prompt construction helpers.
//!
//! Research prompts tend to follow one layout: an instruction line, a block
//! of `Label: value` facts about a record, a few bulleted sections, a
//! numbered list of what to analyze, and finally a JSON schema the model is
//! asked to fill in so [`extract`](crate::extract::extract) has something to
//! find. [`PromptBuilder`] produces that layout.
//!
//! ```rust
//! use llm_envelope::prompt::PromptBuilder;
//! use serde_json::json;
//!
//! let prompt = PromptBuilder::new("Analyze the following sample:")
//!     .system("You are a research assistant.")
//!     .field("Sample ID", "S-17")
//!     .optional_field("Species", None::<&str>)
//!     .numbered("Please provide:", ["Overall assessment", "Recommendations"])
//!     .json_schema(&json!({"overall_assessment": "text"}))
//!     .build();
//!
//! assert!(prompt.user.contains("Species: Unknown\n"));
//! assert!(prompt.user.contains("2. Recommendations\n"));
//! ```

use std::fmt::{Display, Write};

use serde_json::{Map, Value};

use crate::types::Prompt;

const MISSING: &str = "Unknown";

/// Incremental builder for [`Prompt`] text.
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    system: Option<String>,
    body: String,
}

impl PromptBuilder {
    /// Start a prompt with an instruction line followed by a blank line.
    pub fn new(instruction: impl AsRef<str>) -> Self {
        let mut body = String::new();
        let instruction = instruction.as_ref();
        if !instruction.is_empty() {
            body.push_str(instruction);
            body.push_str("\n\n");
        }
        Self { system: None, body }
    }

    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// `Label: value`
    pub fn field(mut self, label: &str, value: impl Display) -> Self {
        let _ = writeln!(self.body, "{label}: {value}");
        self
    }

    /// `Label: value`, or `Label: Unknown` when the value is missing.
    pub fn optional_field<V: Display>(self, label: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.field(label, value),
            None => self.field(label, MISSING),
        }
    }

    /// `Label: value` for a JSON value; strings are written without quotes,
    /// `null` counts as missing.
    pub fn json_field(self, label: &str, value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => self.field(label, MISSING),
            Some(Value::String(s)) => self.field(label, s),
            Some(other) => self.field(label, other),
        }
    }

    /// A titled section with one `- key: value` line per map entry.
    ///
    /// Empty maps are skipped entirely.
    pub fn map_section(mut self, title: &str, map: &Map<String, Value>) -> Self {
        if map.is_empty() {
            return self;
        }
        let _ = writeln!(self.body, "\n{title}");
        for (key, value) in map {
            match value {
                Value::String(s) => {
                    let _ = writeln!(self.body, "- {key}: {s}");
                }
                other => {
                    let _ = writeln!(self.body, "- {key}: {other}");
                }
            }
        }
        self
    }

    /// A titled section with one `- item` line per entry. Empty lists are skipped.
    pub fn bullets<I, S>(mut self, title: &str, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Display,
    {
        let mut items = items.into_iter().peekable();
        if items.peek().is_none() {
            return self;
        }
        let _ = writeln!(self.body, "\n{title}");
        for item in items {
            let _ = writeln!(self.body, "- {item}");
        }
        self
    }

    /// A titled, numbered list (`1. ...`).
    pub fn numbered<I, S>(mut self, title: &str, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Display,
    {
        let _ = writeln!(self.body, "\n{title}");
        for (i, item) in items.into_iter().enumerate() {
            let _ = writeln!(self.body, "{}. {item}", i + 1);
        }
        self
    }

    /// Free-form paragraph, separated by a blank line.
    pub fn paragraph(mut self, text: impl AsRef<str>) -> Self {
        let _ = writeln!(self.body, "\n{}", text.as_ref());
        self
    }

    /// Ask for a structured JSON summary following `schema`.
    ///
    /// The schema is pretty-printed as an example object; field values
    /// describe the expected content.
    pub fn json_schema(mut self, schema: &Value) -> Self {
        let rendered =
            serde_json::to_string_pretty(schema).unwrap_or_else(|_| schema.to_string());
        let _ = writeln!(
            self.body,
            "\nPlease include a structured JSON summary with the following schema:\n{rendered}"
        );
        self
    }

    pub fn build(self) -> Prompt {
        Prompt {
            system: self.system,
            user: self.body,
            images: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_layout() {
        let sample = json!({
            "id": 42,
            "name": "Oyster batch",
            "species": null,
            "sample_metadata": {"substrate": "straw", "humidity": 85}
        });
        let prompt = PromptBuilder::new("Analyze the following mycological sample data:")
            .system("You are a mycology research assistant.")
            .json_field("Sample ID", sample.get("id"))
            .json_field("Name", sample.get("name"))
            .json_field("Species", sample.get("species"))
            .json_field("Location", sample.get("location"))
            .map_section("Metadata:", sample["sample_metadata"].as_object().unwrap())
            .build();

        assert_eq!(
            prompt.system.as_deref(),
            Some("You are a mycology research assistant.")
        );
        assert_eq!(
            prompt.user,
            "Analyze the following mycological sample data:\n\n\
             Sample ID: 42\n\
             Name: Oyster batch\n\
             Species: Unknown\n\
             Location: Unknown\n\
             \nMetadata:\n\
             - humidity: 85\n\
             - substrate: straw\n"
        );
        assert!(prompt.images.is_empty());
    }

    #[test]
    fn test_lists_and_schema() {
        let prompt = PromptBuilder::new("Compare species.")
            .bullets("Compounds:", ["psilocybin", "ergosterol"])
            .bullets("Empty:", Vec::<String>::new())
            .numbered("Please provide:", ["Similarities", "Differences"])
            .json_schema(&json!({"confidence_level": "high/medium/low"}))
            .build();

        assert!(prompt.user.contains("\nCompounds:\n- psilocybin\n- ergosterol\n"));
        assert!(!prompt.user.contains("Empty:"));
        assert!(prompt.user.contains("\nPlease provide:\n1. Similarities\n2. Differences\n"));
        assert!(prompt.user.ends_with(
            "following schema:\n{\n  \"confidence_level\": \"high/medium/low\"\n}\n"
        ));
        assert!(prompt.system.is_none());
    }

    #[test]
    fn test_optional_field_and_paragraph() {
        let prompt = PromptBuilder::new("")
            .optional_field("Formula", Some("C12H17N2O4P"))
            .optional_field::<&str>("Bioactivity Index", None)
            .paragraph("Be concise.")
            .build();
        assert_eq!(
            prompt.user,
            "Formula: C12H17N2O4P\nBioactivity Index: Unknown\n\nBe concise.\n"
        );
    }
}
