#![cfg(target_arch = "wasm32")]
use serde_json::json;
use serde_wasm_bindgen as swb;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

use pivot_wasm::{abi_version, apply_drag, timing_t, validate_figure, PivotEditor};

wasm_bindgen_test_configure!(run_in_browser);

fn stick_json() -> JsValue {
    let fig = json!({
        "id": "stick",
        "root_pivot": {
            "id": "root", "type": "joint", "x": 0.0, "y": 0.0,
            "children": [ { "id": "end", "type": "joint", "x": 10.0, "y": 0.0, "children": [] } ]
        },
        "shapes": [ { "type": "line", "pivotIds": ["root", "end"] } ]
    });
    swb::to_value(&fig).unwrap()
}

#[wasm_bindgen_test]
fn abi_is_1() {
    assert_eq!(abi_version(), 1);
}

#[wasm_bindgen_test]
fn drag_returns_nested_figure() {
    let out = apply_drag(stick_json(), "end".into(), 0.0, 20.0, "rotate".into(), JsValue::NULL)
        .expect("drag ok");
    let fig: serde_json::Value = swb::from_value(out).unwrap();
    let end = &fig["root_pivot"]["children"][0];
    assert!((end["x"].as_f64().unwrap()).abs() < 1e-9);
    assert!((end["y"].as_f64().unwrap() - 10.0).abs() < 1e-9);
}

#[wasm_bindgen_test]
fn unknown_mode_is_an_error() {
    assert!(apply_drag(stick_json(), "end".into(), 0.0, 0.0, "spin".into(), JsValue::NULL).is_err());
}

#[wasm_bindgen_test]
fn validation_reports_codes() {
    let ok = validate_figure(stick_json(), None).unwrap();
    let ok: Vec<serde_json::Value> = swb::from_value(ok).unwrap();
    assert!(ok.is_empty());

    let bad = validate_figure(stick_json(), Some("ghost".into())).unwrap();
    let bad: Vec<serde_json::Value> = swb::from_value(bad).unwrap();
    assert_eq!(bad[0]["code"], "no_root");
}

#[wasm_bindgen_test]
fn timing_matches_core() {
    assert_eq!(timing_t(0.75, 0.5), 0.5);
}

#[wasm_bindgen_test]
fn editor_session_round_trip() {
    let mut ed = PivotEditor::new(JsValue::UNDEFINED, JsValue::UNDEFINED).unwrap();
    ed.add_template("simple_stick".into()).unwrap();
    ed.add_frame();
    assert_eq!(ed.current_index(), 1);
    let integrity: Vec<serde_json::Value> = swb::from_value(ed.check_integrity().unwrap()).unwrap();
    assert!(integrity.is_empty());
    assert!(ed.toggle_play());
    assert!(!ed.advance(0.05).unwrap().is_undefined());
}
