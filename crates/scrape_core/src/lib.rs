//! Scrape core: pure data model, URL expansion and the form state machine.
mod effect;
mod expand;
mod model;
mod msg;
mod progress;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use expand::{expand, normalize_scheme, PAGE_NUMBER_TOKEN};
pub use model::{PropertyRule, Record, ScrapeMode, ScrapeRequest, ValueType};
pub use msg::Msg;
pub use progress::{ScrapeProgress, ScrapeStatus};
pub use state::{FormState, Preset};
pub use update::update;
pub use view_model::{FormViewModel, EMPTY_MATCH_PREAMBLE, ERROR_PREFIX};
