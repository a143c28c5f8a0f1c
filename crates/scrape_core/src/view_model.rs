use crate::{PropertyRule, ScrapeProgress, ScrapeStatus};

/// Prepended to every error shown to the user.
pub const ERROR_PREFIX: &str = "Oops! Something went wrong: ";

/// Shown above the raw markup when a selector matched nothing.
pub const EMPTY_MATCH_PREAMBLE: &str = "Property selector found no html element matches.\n\
Note: pages rendered via JavaScript may not be visible to the extraction service,\n\
and some websites put measures in place to block scraping.\n\n\
HTML loaded is:\n";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormViewModel {
    pub status: ScrapeStatus,
    pub url: String,
    pub multiple: bool,
    pub from: Option<i64>,
    pub to: Option<i64>,
    pub properties: Vec<PropertyRule>,
    pub button_label: String,
    pub scrape_enabled: bool,
    pub can_delete_property: bool,
    pub current_index: Option<i64>,
    pub record_count: usize,
    pub error_text: Option<String>,
    /// Pretty-printed JSON of every record collected so far.
    pub result_text: Option<String>,
    pub notice_text: Option<String>,
    /// Output is only worth showing once the first rule has a name.
    pub show_result: bool,
    pub dirty: bool,
}

pub(crate) fn button_label(progress: &ScrapeProgress, multiple: bool, to: Option<i64>) -> String {
    if !progress.is_running {
        return "Scrape".to_string();
    }
    match (multiple, progress.current_index, to) {
        (true, Some(index), Some(to)) => format!("Scraping page {index} of {to}"),
        (true, Some(index), None) => format!("Scraping page {index}"),
        _ => "Scraping".to_string(),
    }
}

pub(crate) fn error_text(message: Option<&str>) -> Option<String> {
    message.map(|message| format!("{ERROR_PREFIX}{message}"))
}

pub(crate) fn result_text(progress: &ScrapeProgress) -> Option<String> {
    if progress.accumulated.is_empty() {
        return None;
    }
    serde_json::to_string_pretty(&progress.accumulated).ok()
}

pub(crate) fn notice_text(progress: &ScrapeProgress) -> Option<String> {
    progress
        .empty_notice
        .as_deref()
        .map(|html| format!("{EMPTY_MATCH_PREAMBLE}{html}"))
}
