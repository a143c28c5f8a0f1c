use crate::{Effect, FormState, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: FormState, msg: Msg) -> (FormState, Vec<Effect>) {
    let effects = match msg {
        Msg::UrlChanged(url) => {
            state.set_url(url);
            Vec::new()
        }
        Msg::MultipleToggled(multiple) => {
            state.set_multiple(multiple);
            Vec::new()
        }
        Msg::FromChanged(from) => {
            state.set_from(from);
            Vec::new()
        }
        Msg::ToChanged(to) => {
            state.set_to(to);
            Vec::new()
        }
        Msg::PropertyChanged { index, rule } => {
            state.change_property(index, rule);
            Vec::new()
        }
        Msg::PropertyAdded => {
            state.add_property();
            Vec::new()
        }
        Msg::PropertyRemoved(index) => {
            state.remove_property(index);
            Vec::new()
        }
        Msg::PresetSelected(preset) => {
            state.apply_preset(preset);
            Vec::new()
        }
        Msg::ScrapeClicked => {
            // The trigger is disabled while a run is active.
            if state.is_running() {
                return (state, Vec::new());
            }
            match state.build_request() {
                Ok(request) => {
                    state.begin_run();
                    vec![Effect::StartScrape(request)]
                }
                Err(message) => {
                    state.set_error(message);
                    Vec::new()
                }
            }
        }
        Msg::CancelClicked => {
            if state.is_running() {
                vec![Effect::CancelScrape]
            } else {
                Vec::new()
            }
        }
        Msg::Progress(snapshot) => {
            state.apply_progress(snapshot);
            Vec::new()
        }
        Msg::ScrapeRejected { reason, in_flight } => {
            state.reject_run(reason, in_flight);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
