use crate::view_model::{self, FormViewModel};
use crate::{PropertyRule, ScrapeMode, ScrapeProgress, ScrapeRequest};

/// Saved form contents that can be loaded in one step.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Preset {
    pub url: String,
    pub multiple: bool,
    pub from: Option<i64>,
    pub to: Option<i64>,
    pub properties: Vec<PropertyRule>,
}

/// Editable scrape form plus the last progress snapshot received from the
/// engine.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    url: String,
    multiple: bool,
    from: Option<i64>,
    to: Option<i64>,
    properties: Vec<PropertyRule>,
    progress: ScrapeProgress,
    error: Option<String>,
    dirty: bool,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            url: String::new(),
            multiple: false,
            from: None,
            to: None,
            properties: vec![PropertyRule::default()],
            progress: ScrapeProgress::default(),
            error: None,
            dirty: false,
        }
    }
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> FormViewModel {
        let progress = &self.progress;
        let result_text = view_model::result_text(progress);
        let notice_text = view_model::notice_text(progress);
        let has_output = result_text.is_some() || notice_text.is_some();
        FormViewModel {
            status: progress.status,
            url: self.url.clone(),
            multiple: self.multiple,
            from: self.from,
            to: self.to,
            properties: self.properties.clone(),
            button_label: view_model::button_label(progress, self.multiple, self.to),
            scrape_enabled: !progress.is_running,
            can_delete_property: self.properties.len() > 1,
            current_index: progress.current_index,
            record_count: progress.accumulated.len(),
            error_text: view_model::error_text(self.error.as_deref().or(progress.error.as_deref())),
            show_result: self.properties.first().is_some_and(PropertyRule::is_named) && has_output,
            result_text,
            notice_text,
            dirty: self.dirty,
        }
    }

    pub fn properties(&self) -> &[PropertyRule] {
        &self.properties
    }

    pub fn progress(&self) -> &ScrapeProgress {
        &self.progress
    }

    pub fn is_running(&self) -> bool {
        self.progress.is_running
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_url(&mut self, url: String) {
        if self.url != url {
            self.url = url;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_multiple(&mut self, multiple: bool) {
        if self.multiple != multiple {
            self.multiple = multiple;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_from(&mut self, from: Option<i64>) {
        if self.from != from {
            self.from = from;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_to(&mut self, to: Option<i64>) {
        if self.to != to {
            self.to = to;
            self.mark_dirty();
        }
    }

    pub(crate) fn change_property(&mut self, index: usize, rule: PropertyRule) {
        let Some(slot) = self.properties.get_mut(index) else {
            return;
        };
        *slot = rule;
        self.clear_output();
        self.mark_dirty();
    }

    pub(crate) fn add_property(&mut self) {
        self.properties.push(PropertyRule::default());
        self.clear_output();
        self.mark_dirty();
    }

    /// The last remaining rule cannot be removed.
    pub(crate) fn remove_property(&mut self, index: usize) {
        if self.properties.len() <= 1 || index >= self.properties.len() {
            return;
        }
        self.properties.remove(index);
        self.clear_output();
        self.mark_dirty();
    }

    pub(crate) fn apply_preset(&mut self, preset: Option<Preset>) {
        match preset {
            Some(preset) => {
                self.url = preset.url;
                self.multiple = preset.multiple;
                self.from = preset.from;
                self.to = preset.to;
                self.properties = if preset.properties.is_empty() {
                    vec![PropertyRule::default()]
                } else {
                    preset.properties
                };
            }
            None => {
                self.url.clear();
                self.properties = vec![PropertyRule::default()];
            }
        }
        self.clear_output();
        self.mark_dirty();
    }

    /// Validate the form and build the request for a new run.
    pub(crate) fn build_request(&self) -> Result<ScrapeRequest, String> {
        if self.url.trim().is_empty() {
            return Err("a URL to scrape is required".to_string());
        }
        let mode = if self.multiple {
            match (self.from, self.to) {
                (Some(from), Some(to)) => ScrapeMode::Ranged { from, to },
                _ => return Err("both page bounds are required for multiple pages".to_string()),
            }
        } else {
            ScrapeMode::Single
        };
        Ok(ScrapeRequest::new(
            self.url.trim(),
            mode,
            self.properties.clone(),
        ))
    }

    pub(crate) fn begin_run(&mut self) {
        self.error = None;
        self.progress.begin();
        self.mark_dirty();
    }

    pub(crate) fn apply_progress(&mut self, snapshot: ScrapeProgress) {
        if self.progress != snapshot {
            self.progress = snapshot;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_error(&mut self, message: String) {
        self.error = Some(message);
        self.mark_dirty();
    }

    /// A rejection caused by another active run keeps tracking that run.
    pub(crate) fn reject_run(&mut self, reason: String, in_flight: Option<ScrapeProgress>) {
        self.progress = in_flight.unwrap_or_default();
        self.set_error(reason);
    }

    /// Edits invalidate the displayed output, but never an in-flight run.
    fn clear_output(&mut self) {
        self.error = None;
        if !self.progress.is_running {
            self.progress = ScrapeProgress::default();
        }
    }
}
