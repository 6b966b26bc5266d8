#![cfg(target_arch = "wasm32")]
use serde_wasm_bindgen as swb;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

use cadence_sequencer::scenes::chat_draft::{ChatPhase, ANSWER};
use cadence_sequencer::scenes::ChatDraft;
use cadence_sequencer::{Outputs, SessionStatus, Snapshot};
use cadence_wasm::{abi_version, ChatDraftDemo, CodeRotationDemo, SectionTrackerJs};
use serde_json::json;

wasm_bindgen_test_configure!(run_in_browser);

fn fast_config() -> JsValue {
    swb::to_value(&json!({
        "type_interval_ms": 1,
        "erase_interval_ms": 1,
        "lead_in_ms": 0,
        "think_ms": 10,
        "hold_ms": 100,
        "loop_pause_ms": 50
    }))
    .unwrap()
}

#[wasm_bindgen_test]
fn abi_is_1() {
    assert_eq!(abi_version(), 1);
}

#[wasm_bindgen_test]
fn construct_with_defaults() {
    assert!(ChatDraftDemo::new(JsValue::UNDEFINED).is_ok());
    assert!(CodeRotationDemo::new(JsValue::NULL).is_ok());
}

#[wasm_bindgen_test]
fn chat_demo_runs_custom_script() {
    let mut demo = ChatDraftDemo::new(fast_config()).unwrap();
    let scripts = swb::to_value(&json!([{ "question": "hi", "answer": "hey" }])).unwrap();
    demo.start(scripts).unwrap();

    let out: Outputs<ChatDraft> = swb::from_value(demo.update(30.0).unwrap()).unwrap();
    assert!(!out.changes.is_empty());

    let snap: Snapshot<ChatDraft> = swb::from_value(demo.snapshot().unwrap()).unwrap();
    assert_eq!(snap.phase, ChatPhase::Complete);
    assert_eq!(snap.text(ANSWER), "hey");

    assert!(demo.cancel());
    assert!(!demo.cancel());
    let status: SessionStatus = swb::from_value(demo.status().unwrap()).unwrap();
    assert_eq!(status, SessionStatus::Cancelled);
}

#[wasm_bindgen_test]
fn stored_timeline_is_accepted() {
    let mut demo = ChatDraftDemo::new(fast_config()).unwrap();
    let doc = swb::to_value(&json!({
        "steps": [
            { "emit": "typing_question" },
            { "type": { "slot": "question", "text": "ok?" } }
        ]
    }))
    .unwrap();
    assert!(demo.start_stored(doc).is_ok());
    let bad = swb::to_value(&json!({ "steps": [ { "emit": "complete" } ] })).unwrap();
    assert!(demo.start_stored(bad).is_err());
}

#[wasm_bindgen_test]
fn section_tracker_reports_changes() {
    let cfg = swb::to_value(&json!({ "sections": ["a", "b"] })).unwrap();
    let mut tracker = SectionTrackerJs::new(cfg).unwrap();
    assert!(!tracker.progress(0.1).unwrap().is_null());
    assert!(tracker.progress(0.2).unwrap().is_null());
    assert_eq!(tracker.active().as_deref(), Some("a"));
    assert!(!tracker.scroll(900.0, 2_000.0, 1_000.0).unwrap().is_null());
    assert_eq!(tracker.active_index(), Some(1));

    let bad = swb::to_value(&json!({ "sections": [] })).unwrap();
    assert!(SectionTrackerJs::new(bad).is_err());
}
