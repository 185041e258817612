use super::super::App;
use gloo_file::File as GlooFile;
use web_sys::FileList;
use yew::prelude::*;

/// Milliseconds from `performance.now()`, falling back to wall-clock time.
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|window| window.performance())
        .map(|performance| performance.now())
        .unwrap_or_else(js_sys::Date::now)
}

pub fn extract_image_files(file_list: &FileList) -> Vec<GlooFile> {
    (0..file_list.length())
        .filter_map(|i| file_list.item(i))
        .filter(|file| file.type_().starts_with("image/"))
        .map(GlooFile::from)
        .collect()
}

pub fn skipped_files_message(names: &[String]) -> Option<String> {
    match names {
        [] => None,
        [name] => Some(format!("Skipped non-image file: {name}")),
        names => Some(format!("Skipped non-image files: {}", names.join(", "))),
    }
}

pub fn render_error_message(model: &App) -> Html {
    let message = model.error.as_ref().or(model.view.image_error.as_ref());

    if let Some(error_msg) = message {
        html! {
            <div class="error-message">
                <i class="fa-solid fa-circle-exclamation"></i>
                <p>{ error_msg }</p>
            </div>
        }
    } else {
        html! {}
    }
}
