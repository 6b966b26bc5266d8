use js_sys::JSON;
use serde::Serialize;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use cadence_sections::{
    build_tracker, progress_from_scroll, ActiveChange, SectionWatch, Signal, TrackerConfig,
};
use cadence_sequencer::scenes::chat_draft::{chat_rotation, default_scripts, ChatDraft, ChatScript};
use cadence_sequencer::scenes::code_rotation::{code_rotation, default_snippets, CodeScene, Snippet};
use cadence_sequencer::{
    parse_stored_rotation_json, parse_stored_timeline_json, Config, Scene, Sequencer,
};

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn parse_config(config: JsValue) -> Result<Config, JsError> {
    if jsvalue_is_undefined_or_null(&config) {
        Ok(Config::default())
    } else {
        swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))
    }
}

fn to_js<T: Serialize + ?Sized>(value: &T, what: &str) -> Result<JsValue, JsError> {
    swb::to_value(value).map_err(|e| JsError::new(&format!("{what} error: {e}")))
}

fn stringify(value: &JsValue, what: &str) -> Result<String, JsError> {
    if jsvalue_is_undefined_or_null(value) {
        return Err(JsError::new(&format!("{what}: document is null/undefined")));
    }
    JSON::stringify(value)
        .map_err(|e| JsError::new(&format!("{what} stringify error: {:?}", e)))?
        .as_string()
        .ok_or_else(|| JsError::new(&format!("{what}: stringify produced non-string")))
}

/// Start a stored document on `seq`: a rotation when it has `scenarios`,
/// otherwise a single timeline.
fn start_stored<S: Scene>(seq: &mut Sequencer<S>, doc: JsValue) -> Result<u32, JsError> {
    let text = stringify(&doc, "start_stored")?;
    let style = seq.config().type_style();
    let is_rotation = serde_json::from_str::<serde_json::Value>(&text)
        .map(|v| v.get("scenarios").is_some())
        .unwrap_or(false);
    let id = if is_rotation {
        let rot = parse_stored_rotation_json::<S>(&text, &style)
            .map_err(|e| JsError::new(&format!("start_stored parse error: {e}")))?;
        seq.start_rotation(rot)
            .map_err(|e| JsError::new(&format!("start_stored error: {e}")))?
    } else {
        let tl = parse_stored_timeline_json::<S>(&text, &style)
            .map_err(|e| JsError::new(&format!("start_stored parse error: {e}")))?;
        seq.start(tl)
    };
    Ok(id.0)
}

fn update<S: Scene>(seq: &mut Sequencer<S>, dt_ms: f64) -> Result<JsValue, JsError> {
    let out = seq.update_frame(dt_ms);
    to_js(&out, "outputs")
}

/// Chat assistant mockup: question typed, thinking dots, answer typed.
#[wasm_bindgen]
pub struct ChatDraftDemo {
    core: Sequencer<ChatDraft>,
}

#[wasm_bindgen]
impl ChatDraftDemo {
    /// Pass a JSON config object or undefined/null for defaults.
    /// Example:
    ///   new ChatDraftDemo({ type_interval_ms: 25 })
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<ChatDraftDemo, JsError> {
        console_error_panic_hook::set_once();
        Ok(ChatDraftDemo {
            core: Sequencer::new(parse_config(config)?),
        })
    }

    /// Rotate through `[{ question, answer }, ...]`, or the built-in scripts
    /// when undefined/null. Returns the session id.
    #[wasm_bindgen]
    pub fn start(&mut self, scripts: JsValue) -> Result<u32, JsError> {
        let scripts: Vec<ChatScript> = if jsvalue_is_undefined_or_null(&scripts) {
            default_scripts()
        } else {
            swb::from_value(scripts).map_err(|e| JsError::new(&format!("scripts error: {e}")))?
        };
        let rot = chat_rotation(scripts, self.core.config())
            .map_err(|e| JsError::new(&format!("start error: {e}")))?;
        let id = self
            .core
            .start_rotation(rot)
            .map_err(|e| JsError::new(&format!("start error: {e}")))?;
        Ok(id.0)
    }

    /// Run a stored timeline or rotation document.
    #[wasm_bindgen(js_name = start_stored)]
    pub fn start_stored(&mut self, doc: JsValue) -> Result<u32, JsError> {
        start_stored(&mut self.core, doc)
    }

    /// Stop the running session. `false` when nothing was running.
    #[wasm_bindgen]
    pub fn cancel(&mut self) -> bool {
        self.core.cancel_current()
    }

    /// Advance by a frame delta in milliseconds. Returns Outputs JSON.
    #[wasm_bindgen]
    pub fn update(&mut self, dt_ms: f64) -> Result<JsValue, JsError> {
        update(&mut self.core, dt_ms)
    }

    #[wasm_bindgen]
    pub fn snapshot(&self) -> Result<JsValue, JsError> {
        to_js(self.core.snapshot(), "snapshot")
    }

    #[wasm_bindgen]
    pub fn status(&self) -> Result<JsValue, JsError> {
        to_js(&self.core.status(), "status")
    }
}

/// Code editor mockup: snippets typed, held, erased, next.
#[wasm_bindgen]
pub struct CodeRotationDemo {
    core: Sequencer<CodeScene>,
}

#[wasm_bindgen]
impl CodeRotationDemo {
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<CodeRotationDemo, JsError> {
        console_error_panic_hook::set_once();
        Ok(CodeRotationDemo {
            core: Sequencer::new(parse_config(config)?),
        })
    }

    /// Rotate through `[{ language, code }, ...]`, or the built-in snippets
    /// when undefined/null. Returns the session id.
    #[wasm_bindgen]
    pub fn start(&mut self, snippets: JsValue) -> Result<u32, JsError> {
        let snippets: Vec<Snippet> = if jsvalue_is_undefined_or_null(&snippets) {
            default_snippets()
        } else {
            swb::from_value(snippets)
                .map_err(|e| JsError::new(&format!("snippets error: {e}")))?
        };
        let rot = code_rotation(snippets, self.core.config())
            .map_err(|e| JsError::new(&format!("start error: {e}")))?;
        let id = self
            .core
            .start_rotation(rot)
            .map_err(|e| JsError::new(&format!("start error: {e}")))?;
        Ok(id.0)
    }

    #[wasm_bindgen(js_name = start_stored)]
    pub fn start_stored(&mut self, doc: JsValue) -> Result<u32, JsError> {
        start_stored(&mut self.core, doc)
    }

    #[wasm_bindgen]
    pub fn cancel(&mut self) -> bool {
        self.core.cancel_current()
    }

    #[wasm_bindgen]
    pub fn update(&mut self, dt_ms: f64) -> Result<JsValue, JsError> {
        update(&mut self.core, dt_ms)
    }

    #[wasm_bindgen]
    pub fn snapshot(&self) -> Result<JsValue, JsError> {
        to_js(self.core.snapshot(), "snapshot")
    }

    #[wasm_bindgen]
    pub fn status(&self) -> Result<JsValue, JsError> {
        to_js(&self.core.status(), "status")
    }
}

/// Sticky-navigation helper. Every observing method returns the
/// `{ previous, current }` change, or null when the active section stayed.
#[wasm_bindgen(js_name = SectionTracker)]
pub struct SectionTrackerJs {
    watch: SectionWatch,
}

fn change_to_js(change: Option<ActiveChange>) -> Result<JsValue, JsError> {
    match change {
        Some(change) => to_js(&change, "section change"),
        None => Ok(JsValue::NULL),
    }
}

#[wasm_bindgen(js_class = SectionTracker)]
impl SectionTrackerJs {
    /// Example:
    ///   new SectionTracker({ sections: ["intro", "usage"], strategy: { kind: "progress" } })
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<SectionTrackerJs, JsError> {
        console_error_panic_hook::set_once();
        let cfg: TrackerConfig = swb::from_value(config)
            .map_err(|e| JsError::new(&format!("tracker config error: {e}")))?;
        let tracker = build_tracker(&cfg).map_err(|e| JsError::new(&e.to_string()))?;
        Ok(SectionTrackerJs {
            watch: SectionWatch::new(tracker),
        })
    }

    #[wasm_bindgen]
    pub fn progress(&mut self, progress: f64) -> Result<JsValue, JsError> {
        change_to_js(self.watch.observe(&Signal::progress(progress)))
    }

    /// Raw DOM metrics: `scrollTop`, `scrollHeight`, `clientHeight`.
    #[wasm_bindgen]
    pub fn scroll(
        &mut self,
        scroll_top: f64,
        scroll_height: f64,
        viewport_height: f64,
    ) -> Result<JsValue, JsError> {
        let p = progress_from_scroll(scroll_top, scroll_height, viewport_height);
        change_to_js(self.watch.observe(&Signal::progress(p)))
    }

    /// One IntersectionObserver entry.
    #[wasm_bindgen]
    pub fn visibility(
        &mut self,
        id: String,
        intersecting: bool,
        ratio: f64,
    ) -> Result<JsValue, JsError> {
        change_to_js(self.watch.observe(&Signal::Visibility {
            id,
            intersecting,
            ratio,
        }))
    }

    #[wasm_bindgen]
    pub fn active(&self) -> Option<String> {
        self.watch.active().map(str::to_string)
    }

    #[wasm_bindgen(js_name = active_index)]
    pub fn active_index(&self) -> Option<u32> {
        self.watch.active_index().map(|i| i as u32)
    }

    #[wasm_bindgen]
    pub fn reset(&mut self) -> Result<JsValue, JsError> {
        change_to_js(self.watch.reset())
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
