use std::fmt;

/// One extracted record as returned by the extraction service.
///
/// The shape is owned by the remote service; the core only concatenates them.
pub type Record = serde_json::Value;

/// Extraction mode token forwarded verbatim to the extraction service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValueType(String);

impl ValueType {
    pub const TEXT: &'static str = "text";

    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn text() -> Self {
        Self::new(Self::TEXT)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ValueType {
    fn default() -> Self {
        Self::text()
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ValueType {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

/// A named extraction descriptor.
///
/// Fields may be empty while the rule is being edited; nothing here rejects
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PropertyRule {
    pub name: String,
    pub selector: String,
    pub value_type: ValueType,
}

impl PropertyRule {
    pub fn new(name: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            selector: selector.into(),
            value_type: ValueType::default(),
        }
    }

    pub fn with_value_type(mut self, value_type: impl Into<ValueType>) -> Self {
        self.value_type = value_type.into();
        self
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_selector(&mut self, selector: impl Into<String>) {
        self.selector = selector.into();
    }

    pub fn set_value_type(&mut self, value_type: impl Into<ValueType>) {
        self.value_type = value_type.into();
    }

    /// Whether this rule produces a labelled field in the output.
    pub fn is_named(&self) -> bool {
        !self.name.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrapeMode {
    #[default]
    Single,
    /// Inclusive page range; `from > to` yields no iterations.
    Ranged { from: i64, to: i64 },
}

impl ScrapeMode {
    /// Page indices in dispatch order. `Single` yields one `None`.
    pub fn page_indices(&self) -> impl Iterator<Item = Option<i64>> {
        let (single, range) = match *self {
            ScrapeMode::Single => (Some(None), 1..=0),
            ScrapeMode::Ranged { from, to } => (None, from..=to),
        };
        single.into_iter().chain(range.map(Some))
    }

    pub fn iteration_count(&self) -> u64 {
        match *self {
            ScrapeMode::Single => 1,
            ScrapeMode::Ranged { from, to } if from > to => 0,
            ScrapeMode::Ranged { from, to } => {
                u64::try_from(i128::from(to) - i128::from(from) + 1).unwrap_or(u64::MAX)
            }
        }
    }
}

/// One user-initiated scrape, built fresh per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeRequest {
    pub url_template: String,
    pub mode: ScrapeMode,
    pub rules: Vec<PropertyRule>,
}

impl ScrapeRequest {
    pub fn new(url_template: impl Into<String>, mode: ScrapeMode, rules: Vec<PropertyRule>) -> Self {
        Self {
            url_template: url_template.into(),
            mode,
            rules,
        }
    }

    pub fn has_rules(&self) -> bool {
        !self.rules.is_empty()
    }
}
