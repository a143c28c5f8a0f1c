use scrape_core::{FormViewModel, ScrapeStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputBlock {
    Result(String),
    Notice(String),
    Error(String),
    Hint(String),
}

/// One-line progress summary, redrawn while the run is active.
pub fn status_line(view: &FormViewModel) -> String {
    let status = match view.status {
        ScrapeStatus::Idle => "Idle",
        ScrapeStatus::Running => "Running",
        ScrapeStatus::Succeeded => "Done",
        ScrapeStatus::EmptyMatch => "No matches",
        ScrapeStatus::Failed => "Failed",
        ScrapeStatus::Cancelled => "Cancelled",
    };
    if view.scrape_enabled {
        format!("[{status}] records: {}", view.record_count)
    } else {
        format!(
            "[{status}] {} | records: {}",
            view.button_label, view.record_count
        )
    }
}

/// What to print once the run has ended, in display order.
pub fn final_output(view: &FormViewModel) -> Vec<OutputBlock> {
    let mut blocks = Vec::new();
    if view.show_result {
        if let Some(result) = &view.result_text {
            blocks.push(OutputBlock::Result(result.clone()));
        }
        if let Some(notice) = &view.notice_text {
            blocks.push(OutputBlock::Notice(notice.clone()));
        }
    } else if view.result_text.is_some() || view.notice_text.is_some() {
        blocks.push(OutputBlock::Hint(
            "output hidden: the first property has no name".to_string(),
        ));
    }
    if let Some(error) = &view.error_text {
        blocks.push(OutputBlock::Error(error.clone()));
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finished(status: ScrapeStatus) -> FormViewModel {
        FormViewModel {
            status,
            button_label: "Scrape".to_string(),
            scrape_enabled: true,
            show_result: true,
            ..FormViewModel::default()
        }
    }

    #[test]
    fn running_line_uses_page_label() {
        let view = FormViewModel {
            status: ScrapeStatus::Running,
            button_label: "Scraping page 2 of 5".to_string(),
            scrape_enabled: false,
            record_count: 4,
            ..FormViewModel::default()
        };
        assert_eq!(
            status_line(&view),
            "[Running] Scraping page 2 of 5 | records: 4"
        );
    }

    #[test]
    fn finished_line_shows_status() {
        let view = FormViewModel {
            record_count: 2,
            ..finished(ScrapeStatus::Succeeded)
        };
        assert_eq!(status_line(&view), "[Done] records: 2");
    }

    #[test]
    fn result_notice_and_error_are_all_printed() {
        let view = FormViewModel {
            result_text: Some("[]".to_string()),
            notice_text: Some("nothing matched".to_string()),
            error_text: Some("Oops! Something went wrong: boom".to_string()),
            ..finished(ScrapeStatus::Failed)
        };
        assert_eq!(
            final_output(&view),
            vec![
                OutputBlock::Result("[]".to_string()),
                OutputBlock::Notice("nothing matched".to_string()),
                OutputBlock::Error("Oops! Something went wrong: boom".to_string()),
            ]
        );
    }

    #[test]
    fn hidden_result_becomes_hint() {
        let view = FormViewModel {
            result_text: Some("[{}]".to_string()),
            show_result: false,
            ..finished(ScrapeStatus::Succeeded)
        };
        assert!(matches!(
            final_output(&view).as_slice(),
            [OutputBlock::Hint(_)]
        ));
    }
}
