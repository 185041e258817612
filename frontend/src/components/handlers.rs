use super::super::{App, Msg};
use super::utils::skipped_files_message;
use gloo_file::{File as GlooFile, ObjectUrl};
use shared::{ImageOrigin, ImageToken};
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys::{ClipboardEvent, DragEvent, FileList, HtmlImageElement};
use yew::prelude::*;

pub fn handle_files_added(model: &mut App, files: Vec<GlooFile>) -> bool {
    // One image at a time; the last file picked wins.
    let Some(file) = files.into_iter().last() else {
        return false;
    };

    model.error = None;
    let url = ObjectUrl::from(file);
    model.session.select(url.to_string(), ImageOrigin::Upload);
    model.upload_url = Some(url);
    true
}

pub fn handle_gallery_clicked(model: &mut App, index: usize) -> bool {
    let Some(image) = model.config.gallery.get(index) else {
        log::warn!("Gallery index {} out of range", index);
        return false;
    };

    model.error = None;
    model.session.select(image.src.clone(), ImageOrigin::Gallery);
    model.upload_url = None;
    true
}

pub fn handle_image_decoded(model: &mut App, token: ImageToken, image: HtmlImageElement) -> bool {
    log::debug!(
        "Image {} decoded ({}x{})",
        token,
        image.natural_width(),
        image.natural_height()
    );
    let inference = model.session.on_image_selected(token, Rc::new(image));
    spawn_local(async move {
        inference.await;
    });
    false
}

pub fn handle_image_failed(model: &mut App, token: ImageToken) -> bool {
    model
        .session
        .on_image_failed(token, "The selected file could not be displayed as an image.");
    false
}

pub fn handle_drop(model: &mut App, ctx: &Context<App>, event: DragEvent) -> bool {
    event.prevent_default();
    model.is_dragging = false;

    if let Some(data_transfer) = event.data_transfer() {
        if let Some(file_list) = data_transfer.files() {
            process_file_list(ctx, file_list);
        }
    }

    true
}

pub fn handle_paste(_model: &mut App, ctx: &Context<App>, event: ClipboardEvent) -> bool {
    if let Some(data_transfer) = event.clipboard_data() {
        if let Some(file_list) = data_transfer.files() {
            if file_list.length() > 0 {
                event.prevent_default();
                process_file_list(ctx, file_list);
                return true;
            }
        }
    }
    false
}

pub fn process_file_list(ctx: &Context<App>, file_list: FileList) {
    let mut files_to_process = Vec::new();
    let mut skipped = Vec::new();

    for i in 0..file_list.length() {
        if let Some(file) = file_list.item(i) {
            if file.type_().starts_with("image/") {
                files_to_process.push(GlooFile::from(file));
            } else {
                log::warn!("Skipping non-image file: {}", file.name());
                skipped.push(file.name());
            }
        }
    }

    // Selecting a file clears the error, so the skip notice must come after it.
    if !files_to_process.is_empty() {
        ctx.link().send_message(Msg::FilesAdded(files_to_process));
    }
    if let Some(message) = skipped_files_message(&skipped) {
        ctx.link().send_message(Msg::SetError(Some(message)));
    }
}
