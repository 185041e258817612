use shared::{ModelKind, Severity, SessionView};
use yew::prelude::*;

/// Title, overall model status and per-model load times.
pub fn render_header(view: &SessionView) -> Html {
    let status_class = match view.status_severity {
        Severity::Ok => "status-ok",
        Severity::Warn => "status-warn",
        Severity::Error => "status-error",
    };

    html! {
        <header class="app-header">
            <h1><i class="fa-solid fa-magnifying-glass"></i> {" Object Detection"}</h1>
            <div class="status-line">
                <span class={classes!("status-message", status_class)}>{ &view.status_message }</span>
                if view.any_online() {
                    <span class="online-indicator" title="At least one model is online"></span>
                }
            </div>
            <p class="load-summary">{ view.model(ModelKind::Classifier).load_summary() }</p>
            <p class="load-summary">{ view.model(ModelKind::Detector).load_summary() }</p>
        </header>
    }
}
