use scrape_core::{PropertyRule, Record};
use serde::{Deserialize, Serialize};

/// JSON body posted to the extraction endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRequestBody {
    pub url: String,
    pub properties: Vec<WireProperty>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireProperty {
    pub name: String,
    pub selector: String,
    #[serde(rename = "type")]
    pub value_type: String,
}

impl From<&PropertyRule> for WireProperty {
    fn from(rule: &PropertyRule) -> Self {
        Self {
            name: rule.name.clone(),
            selector: rule.selector.clone(),
            value_type: rule.value_type.as_str().to_string(),
        }
    }
}

impl ExtractionRequestBody {
    pub fn new(url: impl Into<String>, rules: &[PropertyRule]) -> Self {
        Self {
            url: url.into(),
            properties: rules.iter().map(WireProperty::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResponseBody {
    pub status_code: u16,
    #[serde(default)]
    pub result: Vec<Record>,
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ExtractionResponseBody {
    pub const SUCCESS: u16 = 200;

    pub fn is_success(&self) -> bool {
        self.status_code == Self::SUCCESS
    }
}
