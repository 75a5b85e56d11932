use std::{cell::RefCell, rc::Rc};

use gloo_timers::future::TimeoutFuture;
use js_sys::Uint8Array;
use leptos::logging::{error, log, warn};
use leptos::*;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

use crate::config::{rgb, ViewerConfig};
use crate::convert::{placeholder_cube, ConvertedFile, CONVERSION_NOTICE};
use crate::error::ViewError;
use crate::fallback::{unsupported_preview_text, FallbackStyle, PLACEHOLDER_MIME, PLACEHOLDER_PNG};
use crate::file_kind::FileKind;
use crate::importer::import_step;
use crate::mode::Surface;
use crate::render::viewer::Viewer;
use crate::session::{Selection, Session, UiState};
use crate::task::TaskToken;
use crate::SCENE_CANVAS_ID;

fn object_url(bytes: &[u8], mime: &str) -> Result<String, JsValue> {
    let data: JsValue = Uint8Array::from(bytes).into();
    let parts = js_sys::Array::of1(&data);
    let mut properties = web_sys::BlobPropertyBag::new();
    properties.type_(mime);
    let blob = web_sys::Blob::new_with_buffer_source_sequence_and_options(&parts, &properties)?;
    web_sys::Url::create_object_url_with_blob(&blob)
}

fn revoke_url(url: &str) {
    if let Err(err) = web_sys::Url::revoke_object_url(url) {
        warn!("failed to revoke object url {} with error {:?}", url, err);
    }
}

fn alert(message: &str) {
    if let Err(err) = window().alert_with_message(message) {
        warn!("failed to show alert with error {:?}", err);
    }
}

async fn read_file_bytes(file: web_sys::File) -> Result<Vec<u8>, ViewError> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|err| ViewError::ImportFailure(format!("failed to read file buffer: {:?}", err)))?;
    Ok(Uint8Array::new(&buffer).to_vec())
}

/// The wgpu canvas and its container.
struct SceneSurface {
    visible: RwSignal<bool>,
    viewer: Rc<RefCell<Viewer>>,
}

impl Surface for SceneSurface {
    fn show(&mut self) {
        self.visible.set(true);
        self.viewer.borrow_mut().set_active(true);
    }

    fn hide(&mut self) {
        self.visible.set(false);
        self.viewer.borrow_mut().set_active(false);
    }

    fn release(&mut self) {
        self.viewer.borrow_mut().clear();
    }
}

#[derive(Clone, Debug, PartialEq)]
enum FallbackPreview {
    Notice(String),
    Image { url: String },
}

/// Stub viewer for formats without an importer.
struct FallbackSurface {
    visible: RwSignal<bool>,
    preview: RwSignal<Option<FallbackPreview>>,
    style: FallbackStyle,
}

impl FallbackSurface {
    fn load(&mut self, file_name: &str) {
        self.release();
        let preview = match self.style {
            FallbackStyle::Text => FallbackPreview::Notice(unsupported_preview_text(file_name)),
            FallbackStyle::Image => match object_url(&PLACEHOLDER_PNG, PLACEHOLDER_MIME) {
                Ok(url) => FallbackPreview::Image { url },
                Err(err) => {
                    let failure = ViewError::DisplayFailure(format!("{:?}", err));
                    warn!("{}", failure);
                    FallbackPreview::Notice(failure.to_string())
                }
            },
        };
        self.preview.set(Some(preview));
    }
}

impl Surface for FallbackSurface {
    fn show(&mut self) {
        self.visible.set(true);
    }

    fn hide(&mut self) {
        self.visible.set(false);
    }

    fn release(&mut self) {
        self.preview.with_untracked(|preview| {
            if let Some(FallbackPreview::Image { url }) = preview {
                revoke_url(url);
            }
        });
        self.preview.set(None);
    }
}

/// Object url behind the "Download" link, revoked once the link goes away.
#[derive(Clone, Copy)]
struct DownloadLink {
    current: RwSignal<Option<(ConvertedFile, String)>>,
}

impl DownloadLink {
    fn new() -> Self {
        Self {
            current: create_rw_signal(None),
        }
    }

    fn sync(&self, file: Option<&ConvertedFile>) {
        let unchanged = self
            .current
            .with_untracked(|current| current.as_ref().map(|(f, _)| f) == file);
        if unchanged {
            return;
        }
        self.current.update(|current| {
            if let Some((_, url)) = current.take() {
                revoke_url(&url);
            }
            if let Some(file) = file {
                match object_url(&file.bytes, file.mime) {
                    Ok(url) => *current = Some((file.clone(), url)),
                    Err(err) => error!("failed to create download link with error {:?}", err),
                }
            }
        });
    }

    fn is_empty(&self) -> bool {
        self.current.with(|current| current.is_none())
    }

    fn href(&self) -> String {
        self.current
            .with(|current| current.as_ref().map(|(_, url)| url.clone()))
            .unwrap_or_default()
    }

    fn file_name(&self) -> String {
        self.current
            .with(|current| current.as_ref().map(|(f, _)| f.file_name.clone()))
            .unwrap_or_default()
    }

    fn label(&self) -> String {
        self.current
            .with(|current| current.as_ref().map(|(f, _)| f.label()))
            .unwrap_or_default()
    }
}

type PageSession = Session<SceneSurface, FallbackSurface>;

/// Everything the event handlers share.
#[derive(Clone)]
struct Page {
    session: Rc<RefCell<PageSession>>,
    viewer: Rc<RefCell<Viewer>>,
    ui: RwSignal<UiState>,
    download: DownloadLink,
    config: Rc<ViewerConfig>,
}

impl Page {
    fn publish(&self) {
        let state = self.session.borrow().ui_state();
        self.download.sync(state.download.as_ref());
        self.ui.set(state);
    }

    fn select(&self, file: web_sys::File) {
        let name = file.name();
        let selection = self.session.borrow_mut().select_file(&name);
        self.publish();
        match selection {
            Err(err) => {
                warn!("{}", err);
                alert(&err.notice());
            }
            Ok(Selection {
                kind: FileKind::Step,
                token,
            }) => spawn_local(self.clone().load_step(file, token)),
            Ok(Selection {
                kind: FileKind::Sldprt,
                token,
            }) => self.load_fallback(&name, token),
        }
    }

    async fn load_step(self, file: web_sys::File, token: TaskToken) {
        let imported = match read_file_bytes(file).await {
            Ok(bytes) => import_step(&bytes).await,
            Err(err) => Err(err),
        };
        let outcome = match imported {
            Ok(model) => {
                if !self.session.borrow().is_load_current(token) {
                    log!("dropping an import superseded by a newer selection");
                    return;
                }
                let mut viewer = self.viewer.borrow_mut();
                for mesh in &model.meshes {
                    viewer.append_imported(mesh);
                }
                viewer.frame_all();
                log!(
                    "imported {} meshes, {} triangles",
                    model.meshes.len(),
                    model.triangle_count()
                );
                Ok(())
            }
            Err(err) => {
                error!("An error occurred during model import: {}", err);
                Err(err)
            }
        };

        let finished = self.session.borrow_mut().finish_load(token, outcome);
        if let Some(Err(err)) = finished {
            alert(&err.notice());
        }
        self.publish();
    }

    fn load_fallback(&self, name: &str, token: TaskToken) {
        self.session
            .borrow_mut()
            .modes_mut()
            .fallback_mut()
            .load(name);
        let finished = self.session.borrow_mut().finish_load(token, Ok(()));
        if let Some(Err(err)) = finished {
            alert(&err.notice());
        }
        self.publish();
    }

    fn convert(&self) {
        let started = self.session.borrow_mut().start_conversion();
        let token = match started {
            Ok(token) => token,
            Err(err) => {
                warn!("{}", err);
                return;
            }
        };
        self.publish();

        let page = self.clone();
        spawn_local(async move {
            TimeoutFuture::new(page.config.conversion_delay_ms).await;
            let converted = page.session.borrow_mut().complete_conversion(token);
            let Some(file) = converted else {
                log!("conversion superseded by a newer selection");
                return;
            };
            {
                let cube = placeholder_cube(
                    page.config.placeholder_size,
                    rgb(page.config.placeholder_color),
                );
                let mut viewer = page.viewer.borrow_mut();
                viewer.append_imported(&cube);
                viewer.frame_all();
            }
            page.publish();
            log!("converted to {}", file.file_name);
            alert(CONVERSION_NOTICE);
        });
    }
}

#[component]
pub fn App(viewer: Rc<RefCell<Viewer>>, config: ViewerConfig) -> impl IntoView {
    let scene_visible = create_rw_signal(false);
    let fallback_visible = create_rw_signal(false);
    let preview = create_rw_signal(None::<FallbackPreview>);

    let session = Session::new(
        SceneSurface {
            visible: scene_visible,
            viewer: viewer.clone(),
        },
        FallbackSurface {
            visible: fallback_visible,
            preview,
            style: config.fallback_style,
        },
    );
    let page = Page {
        session: Rc::new(RefCell::new(session)),
        viewer,
        ui: create_rw_signal(UiState::default()),
        download: DownloadLink::new(),
        config: Rc::new(config),
    };
    let ui = page.ui;
    let download = page.download;

    let file_input = create_node_ref::<html::Input>();
    let on_change = {
        let page = page.clone();
        move |_| {
            let Some(input) = file_input.get() else {
                return;
            };
            let file = input.files().and_then(|files| files.item(0));
            if let Some(file) = file {
                page.select(file);
            }
            input.set_value("");
        }
    };
    let on_convert = move |_| page.convert();

    let preview_view = move || match preview.get() {
        Some(FallbackPreview::Notice(text)) => view! {
            <div class = "fallback-notice">{text}</div>
        }
        .into_view(),
        Some(FallbackPreview::Image { url }) => {
            let failed_url = url.clone();
            let on_error = move |_| {
                revoke_url(&failed_url);
                let failure =
                    ViewError::DisplayFailure("the placeholder image could not be decoded".into());
                warn!("{}", failure);
                preview.set(Some(FallbackPreview::Notice(failure.to_string())));
            };
            view! {
                <img src = url alt = "placeholder preview" on:error = on_error/>
            }
            .into_view()
        }
        None => ().into_view(),
    };

    view! {
        <div class = "app">
            <div class = "toolbar">
                <input type = "file" node_ref = file_input accept = FileKind::ACCEPT on:change = on_change/>
                <button
                    class:hidden = move || ui.with(|s| !s.convert_visible)
                    on:click = on_convert
                >
                    "Convert to STP"
                </button>
                <a
                    class:hidden = move || download.is_empty()
                    href = move || download.href()
                    download = move || download.file_name()
                >
                    {move || download.label()}
                </a>
                <span class = "loader" class:hidden = move || ui.with(|s| !s.loading)>"Loading..."</span>
                <span class = "loader" class:hidden = move || ui.with(|s| !s.converting)>"Converting..."</span>
            </div>
            <div id = "viewer-container" class:hidden = move || !scene_visible.get()>
                <canvas id = SCENE_CANVAS_ID/>
            </div>
            <div id = "fallback-container" class:hidden = move || !fallback_visible.get()>
                {preview_view}
            </div>
        </div>
    }
}
