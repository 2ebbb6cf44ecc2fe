//! Browser file picking for the upload card.
//!
//! Opens a hidden `<input type="file">`, reads every chosen file with a
//! `FileReader` and hands the raw bytes back once all reads have finished.
//! Decoding is left to the batch ingestion.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, FileReader, HtmlInputElement};

use crate::model::MediaItem;

type OnLoaded = Box<dyn FnOnce(Vec<MediaItem>)>;

/// Bytes read so far plus the callback waiting for the whole selection.
struct PendingRead {
    items: Vec<MediaItem>,
    remaining: u32,
    on_loaded: Option<OnLoaded>,
}

impl PendingRead {
    fn finish_one(&mut self, item: Option<MediaItem>) {
        if let Some(item) = item {
            self.items.push(item);
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.deliver();
        }
    }

    fn deliver(&mut self) {
        if let Some(on_loaded) = self.on_loaded.take() {
            log::info!("Read {} file(s) from the picker", self.items.len());
            on_loaded(std::mem::take(&mut self.items));
        }
    }
}

fn js_error(context: &str, e: JsValue) -> JsValue {
    JsValue::from_str(&format!("{}: {:?}", context, e))
}

/// Open the browser file picker.
///
/// `on_loaded` runs once with every file that could be read, in completion
/// order. An empty selection delivers an empty list.
pub fn open_file_picker(
    on_loaded: impl FnOnce(Vec<MediaItem>) + 'static,
) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let input: HtmlInputElement = document
        .create_element("input")
        .map_err(|e| js_error("failed to create input", e))?
        .dyn_into()
        .map_err(|_| JsValue::from_str("not an input element"))?;
    input.set_type("file");
    input.set_accept("image/*");
    input.set_multiple(true);

    let pending = Rc::new(RefCell::new(PendingRead {
        items: Vec::new(),
        remaining: 0,
        on_loaded: Some(Box::new(on_loaded)),
    }));

    let onchange = Closure::wrap(Box::new(move |event: Event| {
        let Some(input) = event
            .target()
            .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
        else {
            return;
        };
        let Some(files) = input.files() else {
            return;
        };

        let count = files.length();
        pending.borrow_mut().remaining = count;
        if count == 0 {
            log::warn!("No files selected");
            pending.borrow_mut().deliver();
            return;
        }

        for i in 0..count {
            let Some(file) = files.get(i) else {
                pending.borrow_mut().finish_one(None);
                continue;
            };
            if let Err(e) = read_file(file, pending.clone()) {
                log::warn!("{:?}", e);
                pending.borrow_mut().finish_one(None);
            }
        }
    }) as Box<dyn FnMut(Event)>);

    input.set_onchange(Some(onchange.as_ref().unchecked_ref()));
    onchange.forget();

    input.click();
    Ok(())
}

fn read_file(file: web_sys::File, pending: Rc<RefCell<PendingRead>>) -> Result<(), JsValue> {
    let name = file.name();
    let reader = FileReader::new().map_err(|e| js_error("failed to create FileReader", e))?;

    // loadend fires after both success and failure
    let onloadend = Closure::wrap(Box::new(move |event: Event| {
        let item = event
            .target()
            .and_then(|t| t.dyn_into::<FileReader>().ok())
            .and_then(|reader| reader.result().ok())
            .filter(|result| !result.is_null())
            .map(|result| MediaItem::new(name.clone(), js_sys::Uint8Array::new(&result).to_vec()));
        if item.is_none() {
            log::warn!("Failed to read {}", name);
        }
        pending.borrow_mut().finish_one(item);
    }) as Box<dyn FnMut(Event)>);

    reader.set_onloadend(Some(onloadend.as_ref().unchecked_ref()));
    onloadend.forget();

    reader
        .read_as_array_buffer(&file)
        .map_err(|e| js_error("failed to read file", e))
}
