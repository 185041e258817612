use super::super::{App, Msg};
use yew::prelude::*;

pub fn render_gallery(model: &App, ctx: &Context<App>) -> Html {
    if model.config.gallery.is_empty() {
        return html! {};
    }

    let selected = model.view.image.as_ref().map(|image| image.uri.as_str());

    html! {
        <div id="gallery">
            <h2><i class="fa-solid fa-images"></i>{" Try It!"}</h2>
            <p>{"Click an image below to try out the models."}</p>
            <div id="gallery-grid">
                { for model.config.gallery.iter().enumerate().map(|(index, image)| {
                    let is_selected = selected == Some(image.src.as_str());
                    html! {
                        <img
                            key={image.src.clone()}
                            class={classes!("gallery-item", is_selected.then_some("selected"))}
                            src={image.src.clone()}
                            alt={image.alt.clone()}
                            title={image.alt.clone()}
                            onclick={ctx.link().callback(move |_| Msg::GalleryClicked(index))}
                        />
                    }
                })}
            </div>
        </div>
    }
}
