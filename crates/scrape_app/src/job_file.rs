//! RON job files: saved scrape presets.
//!
//! ```ron
//! (
//!     url: "news.example.com/page/{{page_number}}",
//!     multiple: true,
//!     from: Some(1),
//!     to: Some(3),
//!     properties: [
//!         (name: "headline", selector: ".story h2"),
//!         (name: "link", selector: ".story a", type: "attribute"),
//!     ],
//! )
//! ```

use std::fs;
use std::path::Path;

use anyhow::Context;
use scrape_core::{Preset, PropertyRule, ValueType};
use scrape_logging::scrape_info;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct JobProperty {
    name: String,
    selector: String,
    #[serde(rename = "type", default = "default_value_type")]
    value_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct JobFile {
    url: String,
    #[serde(default)]
    multiple: bool,
    #[serde(default)]
    from: Option<i64>,
    #[serde(default)]
    to: Option<i64>,
    #[serde(default)]
    properties: Vec<JobProperty>,
}

fn default_value_type() -> String {
    ValueType::TEXT.to_string()
}

pub(crate) fn parse_job(content: &str) -> anyhow::Result<Preset> {
    let job: JobFile = ron::from_str(content).context("invalid job file")?;
    Ok(Preset {
        url: job.url,
        multiple: job.multiple,
        from: job.from,
        to: job.to,
        properties: job
            .properties
            .into_iter()
            .map(|p| PropertyRule::new(p.name, p.selector).with_value_type(p.value_type.as_str()))
            .collect(),
    })
}

pub(crate) fn load_job(path: &Path) -> anyhow::Result<Preset> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read job file {}", path.display()))?;
    let preset =
        parse_job(&content).with_context(|| format!("failed to parse {}", path.display()))?;
    scrape_info!(
        "Loaded job {:?} with {} properties",
        path,
        preset.properties.len()
    );
    Ok(preset)
}
