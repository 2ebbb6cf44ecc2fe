//! Browser bindings for the triage workflow.
//!
//! The page calls the exported functions from its event handlers and
//! re-renders from [`state_json`] whenever the `on_change` callback fires.
//! Progress ticks come from a `setInterval` that only runs while a transfer
//! is in flight.

use std::cell::RefCell;

use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_time::Instant;

use crate::config::TriageConfig;
use crate::export::TriageExport;
use crate::handlers::update;
use crate::logging::init_logging;
use crate::message::{
    ClassificationMessage, Message, Outcome, ToolbarMessage, TreeMessage, UploadMessage,
    ViewerMessage,
};
use crate::model::{AssetId, Fleet, MediaItem, ZoneId};
use crate::state::TriageSession;
use crate::wasm_file::open_file_picker;

struct App {
    session: TriageSession,
    tick_interval_ms: i32,
    /// Created once and kept for the page lifetime; only the interval
    /// handle comes and goes.
    tick_callback: Option<Closure<dyn FnMut()>>,
    interval_id: Option<i32>,
    on_change: Option<js_sys::Function>,
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

/// Everything the page needs to render.
#[derive(Serialize)]
struct ViewState<'a> {
    fleet: &'a Fleet,
    expanded: Vec<&'a AssetId>,
    can_start_batch: bool,
    can_confirm: bool,
    upload_label: String,
    #[serde(flatten)]
    snapshot: TriageExport,
}

#[wasm_bindgen(start)]
pub fn start() {
    let stored = TriageConfig::load_from_local_storage();
    let config = stored.clone().unwrap_or_default();
    init_logging(config.preferences.log_level);
    log::info!("{} starting", config.app_name);
    if stored.is_none() {
        if let Err(e) = config.save_to_local_storage() {
            log::warn!("Failed to store default config: {}", e);
        }
    }

    let tick_interval_ms = i32::try_from(config.workflow.progress_interval_ms).unwrap_or(i32::MAX);
    let session = TriageSession::with_defaults(&config.workflow);
    APP.with(|app| {
        *app.borrow_mut() = Some(App {
            session,
            tick_interval_ms,
            tick_callback: None,
            interval_id: None,
            on_change: None,
        });
    });
}

/// Register the callback invoked after every state change.
#[wasm_bindgen]
pub fn set_on_change(callback: js_sys::Function) {
    with_app(|app| app.on_change = Some(callback));
}

fn with_app<R: Default>(f: impl FnOnce(&mut App) -> R) -> R {
    APP.with(|app| match app.borrow_mut().as_mut() {
        Some(app) => f(app),
        None => {
            log::error!("Triage session used before start()");
            R::default()
        }
    })
}

/// Run one message through the session and refresh the page.
///
/// Returns the outcome so callers can react to navigation and exports.
fn dispatch(message: Message) -> Option<Outcome> {
    let outcome = APP.with(|cell| {
        let mut guard = cell.borrow_mut();
        let app = guard.as_mut()?;
        let outcome = update(&mut app.session, message, Instant::now());
        sync_driver(app);
        Some(outcome)
    });
    if matches!(outcome, Some(Outcome::Updated)) {
        notify_change();
    }
    outcome
}

fn accepted(outcome: Option<Outcome>) -> bool {
    !matches!(outcome, None | Some(Outcome::Rejected(_)))
}

fn notify_change() {
    // Cloned out so the callback may call back into this module.
    let callback = with_app(|app| app.on_change.clone());
    if let Some(callback) = callback {
        if let Err(e) = callback.call0(&JsValue::NULL) {
            log::warn!("on_change callback failed: {:?}", e);
        }
    }
}

/// Start or stop the interval so it runs exactly while the timer is live.
fn sync_driver(app: &mut App) {
    let Some(window) = web_sys::window() else {
        return;
    };
    match (app.session.timer_active(), app.interval_id) {
        (true, None) => {
            let callback = app
                .tick_callback
                .get_or_insert_with(|| Closure::wrap(Box::new(on_interval) as Box<dyn FnMut()>));
            match window.set_interval_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                app.tick_interval_ms,
            ) {
                Ok(id) => app.interval_id = Some(id),
                Err(e) => log::error!("Failed to start progress interval: {:?}", e),
            }
        }
        (false, Some(id)) => {
            window.clear_interval_with_handle(id);
            app.interval_id = None;
        }
        _ => {}
    }
}

fn on_interval() {
    let advanced = with_app(|app| {
        let outcomes = app.session.tick(Instant::now());
        sync_driver(app);
        !outcomes.is_empty()
    });
    if advanced {
        notify_change();
    }
}

#[wasm_bindgen]
pub fn toggle_asset(asset_id: &str) -> bool {
    accepted(dispatch(Message::Tree(TreeMessage::ToggleAsset(
        AssetId::from(asset_id),
    ))))
}

#[wasm_bindgen]
pub fn select_zone(asset_id: &str, zone_id: &str) -> bool {
    accepted(dispatch(Message::Tree(TreeMessage::SelectZone(
        AssetId::from(asset_id),
        ZoneId::from(zone_id),
    ))))
}

#[wasm_bindgen]
pub fn clear_selection() -> bool {
    accepted(dispatch(Message::Tree(TreeMessage::ClearSelection)))
}

/// Open the file picker; the batch starts once every file has been read.
#[wasm_bindgen]
pub fn pick_files() -> Result<(), JsValue> {
    if !with_app(|app| app.session.can_start_batch()) {
        log::warn!("Select a zone before uploading images");
        return Ok(());
    }
    open_file_picker(|items: Vec<MediaItem>| {
        dispatch(Message::Upload(UploadMessage::FilesPicked(items)));
    })
}

/// "Aplicar"
#[wasm_bindgen]
pub fn apply() -> bool {
    accepted(dispatch(Message::Upload(UploadMessage::Apply)))
}

/// "Borrar Imágenes"
#[wasm_bindgen]
pub fn delete_images() -> bool {
    accepted(dispatch(Message::Upload(UploadMessage::DeleteImages)))
}

#[wasm_bindgen]
pub fn select_category(category_id: u32) -> bool {
    accepted(dispatch(Message::Classification(
        ClassificationMessage::CategorySelected(category_id),
    )))
}

#[wasm_bindgen]
pub fn close_category() -> bool {
    accepted(dispatch(Message::Classification(
        ClassificationMessage::CategoryClosed,
    )))
}

#[wasm_bindgen]
pub fn select_image(category_id: u32, index: usize) -> bool {
    accepted(dispatch(Message::Viewer(ViewerMessage::ImageSelected {
        category: category_id,
        index,
    })))
}

#[wasm_bindgen]
pub fn close_image() -> bool {
    accepted(dispatch(Message::Viewer(ViewerMessage::Closed)))
}

/// "Generar Reportes": leaves the workflow page.
#[wasm_bindgen]
pub fn open_report() -> Result<(), JsValue> {
    if let Some(Outcome::Navigate(target)) = dispatch(Message::Toolbar(ToolbarMessage::OpenReport))
    {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        window.location().set_href(target.route())?;
    }
    Ok(())
}

/// "Exportar Datos": JSON snapshot of the session.
#[wasm_bindgen]
pub fn export_data() -> Option<String> {
    match dispatch(Message::Toolbar(ToolbarMessage::ExportData)) {
        Some(Outcome::Exported(json)) => Some(json),
        _ => None,
    }
}

/// Render state of the whole page as JSON.
#[wasm_bindgen]
pub fn state_json() -> Option<String> {
    APP.with(|cell| {
        let guard = cell.borrow();
        let app = guard.as_ref()?;
        let session = &app.session;
        let view = ViewState {
            fleet: session.fleet(),
            expanded: session.tracker().expanded().collect(),
            can_start_batch: session.can_start_batch(),
            can_confirm: session.can_confirm(),
            upload_label: session.ingestion().summary(),
            snapshot: TriageExport::from_session(session),
        };
        match serde_json::to_string(&view) {
            Ok(json) => Some(json),
            Err(e) => {
                log::error!("Failed to serialize view state: {}", e);
                None
            }
        }
    })
}
