use super::super::{App, Msg};
use web_sys::HtmlImageElement;
use yew::prelude::*;

/// The selected image. Its `load` event is what starts inference, so the
/// element is keyed by token to get a fresh load event per selection.
pub fn render_preview_area(model: &App, ctx: &Context<App>) -> Html {
    let Some(image) = &model.view.image else {
        return html! {
            <div class="select-preview">
                <p>{"Upload an image or pick one from the gallery"}</p>
            </div>
        };
    };

    let token = image.id;
    let onload = ctx.link().callback(move |e: Event| {
        let element: HtmlImageElement = e.target_unchecked_into();
        Msg::ImageDecoded(token, element)
    });
    let onerror = ctx.link().callback(move |_: Event| Msg::ImageFailed(token));

    html! {
        <div id="preview-container">
            <img id="uploaded-image"
                key={token.get().to_string()}
                src={image.uri.clone()}
                alt={format!("Selected {} image", image.origin)}
                {onload}
                {onerror} />
        </div>
    }
}
