use crate::ScrapeRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartScrape(ScrapeRequest),
    CancelScrape,
}
