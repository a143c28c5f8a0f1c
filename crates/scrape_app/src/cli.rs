use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use scrape_core::{Preset, PropertyRule};
use scrape_logging::LogDestination;

#[derive(Debug, Parser)]
#[command(
    name = "scrape",
    about = "Scrape one page or a numbered range of pages through an extraction service"
)]
pub struct Cli {
    /// URL to scrape; `{{page_number}}` is replaced by the page index with --from/--to
    pub url: Option<String>,

    /// First page index (inclusive); enables multi-page mode together with --to
    #[arg(long, requires = "to", allow_negative_numbers = true)]
    pub from: Option<i64>,

    /// Last page index (inclusive)
    #[arg(long, requires = "from", allow_negative_numbers = true)]
    pub to: Option<i64>,

    /// Property to extract as `name=selector` or `name:type=selector`
    #[arg(short, long = "property", value_name = "RULE", value_parser = parse_property)]
    pub properties: Vec<PropertyRule>,

    /// RON job file with url, multiple, from, to and properties
    #[arg(short, long, value_name = "FILE")]
    pub job: Option<PathBuf>,

    /// Extraction service endpoint
    #[arg(long, env = "SCRAPE_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Per-page request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Cancel the whole run after this many seconds
    #[arg(long)]
    pub max_duration_secs: Option<u64>,

    /// Write the collected records to this JSON file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogArg::Terminal)]
    pub log: LogArg,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogArg {
    Terminal,
    File,
    Both,
}

impl From<LogArg> for LogDestination {
    fn from(arg: LogArg) -> Self {
        match arg {
            LogArg::Terminal => LogDestination::Terminal,
            LogArg::File => LogDestination::File,
            LogArg::Both => LogDestination::Both,
        }
    }
}

impl Cli {
    /// Overlay the command-line values on a preset loaded from a job file.
    pub fn apply_to(&self, mut preset: Preset) -> Preset {
        if let Some(url) = &self.url {
            preset.url = url.clone();
        }
        if self.from.is_some() || self.to.is_some() {
            preset.multiple = true;
            preset.from = self.from;
            preset.to = self.to;
        }
        if !self.properties.is_empty() {
            preset.properties = self.properties.clone();
        }
        preset
    }
}

/// Parse `name=selector` or `name:type=selector`.
pub fn parse_property(raw: &str) -> Result<PropertyRule, String> {
    let (head, selector) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=selector, got {raw:?}"))?;
    let (name, value_type) = match head.split_once(':') {
        Some((name, value_type)) if !value_type.trim().is_empty() => (name, Some(value_type)),
        Some((name, _)) => (name, None),
        None => (head, None),
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("property name is empty in {raw:?}"));
    }
    let rule = PropertyRule::new(name, selector.trim());
    Ok(match value_type {
        Some(value_type) => rule.with_value_type(value_type.trim()),
        None => rule,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn property_defaults_to_text() {
        let rule = parse_property("title=h2 > a").unwrap();
        assert_eq!(rule, PropertyRule::new("title", "h2 > a"));
    }

    #[test]
    fn property_with_type_keeps_colons_in_selector() {
        let rule = parse_property("link:attribute=li:first-child a").unwrap();
        assert_eq!(rule.name, "link");
        assert_eq!(rule.selector, "li:first-child a");
        assert_eq!(rule.value_type.as_str(), "attribute");
    }

    #[test]
    fn property_without_selector_separator_is_rejected() {
        assert!(parse_property("title").is_err());
        assert!(parse_property("=h2").is_err());
    }

    #[test]
    fn range_flags_enable_multiple_mode() {
        let cli = Cli::parse_from([
            "scrape",
            "example.com/{{page_number}}",
            "--from",
            "2",
            "--to",
            "4",
            "-p",
            "title=h2",
        ]);
        let preset = cli.apply_to(Preset::default());
        assert_eq!(
            preset,
            Preset {
                url: "example.com/{{page_number}}".to_string(),
                multiple: true,
                from: Some(2),
                to: Some(4),
                properties: vec![PropertyRule::new("title", "h2")],
            }
        );
    }

    #[test]
    fn job_file_values_survive_missing_flags() {
        let cli = Cli::parse_from(["scrape", "--job", "news.ron"]);
        let job = Preset {
            url: "news.example.com".to_string(),
            multiple: false,
            from: None,
            to: None,
            properties: vec![PropertyRule::new("headline", "h1")],
        };
        assert_eq!(cli.apply_to(job.clone()), job);
    }

    #[test]
    fn from_without_to_is_a_usage_error() {
        assert!(Cli::try_parse_from(["scrape", "example.com", "--from", "1"]).is_err());
    }
}
