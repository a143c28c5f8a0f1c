#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User edited the URL template.
    UrlChanged(String),
    /// User toggled multi-page mode.
    MultipleToggled(bool),
    FromChanged(Option<i64>),
    ToChanged(Option<i64>),
    /// User edited the rule at `index`.
    PropertyChanged {
        index: usize,
        rule: crate::PropertyRule,
    },
    PropertyAdded,
    PropertyRemoved(usize),
    /// Load a saved preset, or reset the form with `None`.
    PresetSelected(Option<crate::Preset>),
    ScrapeClicked,
    CancelClicked,
    /// Orchestrator snapshot taken at a step boundary.
    Progress(crate::ScrapeProgress),
    /// The engine refused to start the run. `in_flight` is the snapshot of
    /// a run that is still active, if any.
    ScrapeRejected {
        reason: String,
        in_flight: Option<crate::ScrapeProgress>,
    },
    /// Fallback for placeholder wiring.
    NoOp,
}
