use shared::{ModelView, PredictionsView, SessionView};
use yew::prelude::*;

pub fn render_results(view: &SessionView) -> Html {
    if view.image.is_none() {
        return html! {};
    }

    html! {
        <div class="results-container">
            { render_model_predictions(&view.detector) }
            { render_model_predictions(&view.classifier) }
        </div>
    }
}

fn render_model_predictions(model: &ModelView) -> Html {
    let body = match &model.predictions {
        PredictionsView::NoImage => return html! {},
        PredictionsView::Unavailable => html! {
            <p class="model-unavailable">{ format!("{} is unavailable.", model.name) }</p>
        },
        PredictionsView::Pending => html! {
            <p class="pending"><i class="fa-solid fa-spinner fa-spin"></i>{" Analyzing..."}</p>
        },
        PredictionsView::Failed { error } => html! {
            <p class="error-message">{ format!("{} could not analyze this image: {}", model.name, error) }</p>
        },
        PredictionsView::Ready { items } if items.is_empty() => html! {
            <p class="no-results-message">{ format!("No {} predictions found.", model.name) }</p>
        },
        PredictionsView::Ready { items } => html! {
            <ol class="prediction-list">
                { for items.iter().map(|prediction| html! {
                    <li>
                        <span class="prediction-label">{ format!("{}:", prediction.label) }</span>
                        { format!(" Probability: {}", prediction.score_text()) }
                    </li>
                })}
            </ol>
        },
    };

    html! {
        <div class={classes!("model-results", model.kind.to_string())}>
            <h3>{ format!("{} Predictions:", model.name) }</h3>
            { body }
        </div>
    }
}
