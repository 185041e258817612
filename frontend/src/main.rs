mod components;
mod tfjs;

use components::handlers;
use components::utils::now_ms;
use gloo_events::EventListener;
use gloo_file::{File as GlooFile, ObjectUrl};
use shared::{AppConfig, ImageToken, Session, SessionView};
use tfjs::{CocoSsdService, MobileNetService};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{ClipboardEvent, DragEvent, HtmlImageElement};
use yew::prelude::*;

pub enum Msg {
    // Session
    SessionChanged,

    // Image selection
    FilesAdded(Vec<GlooFile>),
    GalleryClicked(usize),
    ImageDecoded(ImageToken, HtmlImageElement),
    ImageFailed(ImageToken),

    // UI states
    SetError(Option<String>),
    SetDragging(bool),

    // Input events
    HandleDrop(DragEvent),
    HandlePaste(ClipboardEvent),
}

pub struct App {
    config: AppConfig,
    session: Session<HtmlImageElement>,
    view: SessionView,
    // Keeps the uploaded file's object URL alive while it is on screen.
    upload_url: Option<ObjectUrl>,
    error: Option<String>,
    is_dragging: bool,
    _paste_listener: EventListener,
}

impl Component for App {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let config = AppConfig::default();
        let session = Session::new(
            CocoSsdService::new(config.models.detector.clone()),
            MobileNetService::new(config.models.classifier.clone()),
            now_ms,
        );

        let link = ctx.link().clone();
        session.subscribe(move || link.send_message(Msg::SessionChanged));
        spawn_local(session.load_all());

        let link = ctx.link().clone();
        let window = web_sys::window().expect("no global `window` exists");
        let paste_listener = EventListener::new(&window, "paste", move |event| {
            if let Some(clipboard_event) = event.dyn_ref::<ClipboardEvent>() {
                link.send_message(Msg::HandlePaste(clipboard_event.clone()));
            }
        });

        Self {
            view: session.view(),
            config,
            session,
            upload_url: None,
            error: None,
            is_dragging: false,
            _paste_listener: paste_listener,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::SessionChanged => {
                let view = self.session.view();
                let changed = view != self.view;
                self.view = view;
                changed
            }

            Msg::FilesAdded(files) => handlers::handle_files_added(self, files),
            Msg::GalleryClicked(index) => handlers::handle_gallery_clicked(self, index),
            Msg::ImageDecoded(token, image) => handlers::handle_image_decoded(self, token, image),
            Msg::ImageFailed(token) => handlers::handle_image_failed(self, token),

            Msg::SetError(error) => {
                self.error = error;
                true
            }
            Msg::SetDragging(is_dragging) => {
                self.is_dragging = is_dragging;
                true
            }

            Msg::HandleDrop(event) => handlers::handle_drop(self, ctx, event),
            Msg::HandlePaste(event) => handlers::handle_paste(self, ctx, event),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="container">
                { components::header::render_header(&self.view) }

                <main class="main-content">
                    <section class="lab-panel">
                        { components::upload_section::render_upload_section(self, ctx) }
                        { components::utils::render_error_message(self) }
                        { components::preview_area::render_preview_area(self, ctx) }
                        { components::results::render_results(&self.view) }
                    </section>
                    <aside class="gallery-panel">
                        { components::gallery::render_gallery(self, ctx) }
                    </aside>
                </main>
            </div>
        }
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");
    yew::Renderer::<App>::new().render();
}
