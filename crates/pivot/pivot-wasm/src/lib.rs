use js_sys::JSON;
use serde::Serialize;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use pivot_core::baking::bake_project as bake_core;
use pivot_core::{
    apply_drag_with, interpolate_frame as interpolate_core, parse_figure_json, parse_project_json,
    timing_t as timing_core, validate, BakingConfig, Config, Editor, Figure, Frame, IdAllocator,
    InteractionMode, PoseOptions, Project, Template, Vec2,
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

fn parse_mode(mode: &str) -> Result<InteractionMode, JsError> {
    match mode {
        "rotate" => Ok(InteractionMode::Rotate),
        "stretch" => Ok(InteractionMode::Stretch),
        "flip" => Ok(InteractionMode::Flip),
        other => Err(JsError::new(&format!("unknown interaction mode '{other}'"))),
    }
}

fn parse_template(name: &str) -> Result<Template, JsError> {
    match name {
        "stickman" => Ok(Template::Stickman),
        "simple_stick" => Ok(Template::SimpleStick),
        "curve" => Ok(Template::Curve),
        "circle" => Ok(Template::Circle),
        other => Err(JsError::new(&format!("unknown template '{other}'"))),
    }
}

/// Stringify a JS object so the core JSON parsers can be reused.
fn stringify(value: &JsValue, what: &str) -> Result<String, JsError> {
    if jsvalue_is_undefined_or_null(value) {
        return Err(JsError::new(&format!("{what}: value is null/undefined")));
    }
    JSON::stringify(value)
        .map_err(|e| JsError::new(&format!("{what} stringify error: {:?}", e)))?
        .as_string()
        .ok_or_else(|| JsError::new(&format!("{what}: stringify produced non-string")))
}

fn figure_from_js(value: &JsValue) -> Result<Figure, JsError> {
    let s = stringify(value, "figure")?;
    parse_figure_json(&s).map_err(|e| JsError::new(&format!("figure parse error: {e}")))
}

fn frame_from_js(value: JsValue) -> Result<Frame, JsError> {
    swb::from_value(value).map_err(|e| JsError::new(&format!("frame parse error: {e}")))
}

fn project_from_js(value: &JsValue) -> Result<Project, JsError> {
    let s = stringify(value, "project")?;
    parse_project_json(&s).map_err(|e| JsError::new(&format!("project parse error: {e}")))
}

fn to_js<T: Serialize>(value: &T, what: &str) -> Result<JsValue, JsError> {
    swb::to_value(value).map_err(|e| JsError::new(&format!("{what} error: {e}")))
}

/// One validator finding as shown in the builder's error panel.
#[derive(Serialize)]
struct JsValidationError {
    code: &'static str,
    message: String,
    #[serde(rename = "pivotId", skip_serializing_if = "Option::is_none")]
    pivot_id: Option<String>,
}

/// Apply one drag gesture and return the new figure. `mode` is
/// `"rotate" | "stretch" | "flip"`; `config` is optional.
#[wasm_bindgen]
pub fn apply_drag(
    figure: JsValue,
    pivot_id: String,
    x: f64,
    y: f64,
    mode: String,
    config: JsValue,
) -> Result<JsValue, JsError> {
    let fig = figure_from_js(&figure)?;
    let opts = PoseOptions::from(&parse_config(config)?);
    let out = apply_drag_with(&fig, &pivot_id, Vec2::new(x, y), parse_mode(&mode)?, &opts);
    to_js(&out, "figure")
}

/// Interpolated frame between keyframes `a` and `b` at `t`.
#[wasm_bindgen]
pub fn interpolate_frame(a: JsValue, b: JsValue, t: f64) -> Result<JsValue, JsError> {
    let a = frame_from_js(a)?;
    let b = frame_from_js(b)?;
    to_js(&interpolate_core(&a, &b, t), "frame")
}

/// Validate a figure. `root_id` defaults to the figure's tree root.
#[wasm_bindgen]
pub fn validate_figure(figure: JsValue, root_id: Option<String>) -> Result<JsValue, JsError> {
    let fig = figure_from_js(&figure)?;
    let errors = match root_id.as_deref() {
        Some(root) => validate(&fig, Some(root)),
        None => fig.validate(),
    };
    let out: Vec<JsValidationError> = errors
        .iter()
        .map(|e| JsValidationError {
            code: e.code(),
            message: e.to_string(),
            pivot_id: e.pivot_id().map(str::to_string),
        })
        .collect();
    to_js(&out, "validation")
}

#[wasm_bindgen]
pub fn timing_t(raw_progress: f64, hold_threshold: f64) -> f64 {
    timing_core(raw_progress, hold_threshold)
}

/// Fresh template figure. Ids are random per call.
#[wasm_bindgen]
pub fn create_template(name: String) -> Result<JsValue, JsError> {
    let fig = parse_template(&name)?.instantiate(&mut IdAllocator::new());
    to_js(&fig, "figure")
}

/// Bake a project for video export. `config` is an optional editor config.
#[wasm_bindgen]
pub fn bake_project(project: JsValue, config: JsValue) -> Result<JsValue, JsError> {
    let project = project_from_js(&project)?;
    let cfg = BakingConfig::from(&parse_config(config)?);
    to_js(&bake_core(&project, &cfg), "baked animation")
}

/// Editor session held on the Rust side between calls.
#[wasm_bindgen]
pub struct PivotEditor {
    core: Editor,
}

#[wasm_bindgen]
impl PivotEditor {
    /// Create a session. Pass an existing project (or undefined/null for a
    /// new one) and an optional config object.
    #[wasm_bindgen(constructor)]
    pub fn new(project: JsValue, config: JsValue) -> Result<PivotEditor, JsError> {
        console_error_panic_hook::set_once();
        let cfg = parse_config(config)?;
        let core = if jsvalue_is_undefined_or_null(&project) {
            Editor::new("Untitled", cfg)
        } else {
            Editor::with_project(project_from_js(&project)?, cfg, IdAllocator::new())
        };
        Ok(PivotEditor { core })
    }

    #[wasm_bindgen(js_name = set_mode)]
    pub fn set_mode(&mut self, mode: String) -> Result<(), JsError> {
        self.core.mode = parse_mode(&mode)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = add_frame)]
    pub fn add_frame(&mut self) -> String {
        self.core.add_frame()
    }

    #[wasm_bindgen(js_name = delete_frame)]
    pub fn delete_frame(&mut self, index: usize) -> Result<bool, JsError> {
        self.core
            .delete_frame(index)
            .map_err(|e| JsError::new(&format!("delete_frame: {e}")))
    }

    #[wasm_bindgen(js_name = set_current_frame)]
    pub fn set_current_frame(&mut self, index: usize) -> Result<(), JsError> {
        self.core
            .set_current_frame(index)
            .map_err(|e| JsError::new(&format!("set_current_frame: {e}")))
    }

    #[wasm_bindgen(js_name = add_template)]
    pub fn add_template(&mut self, name: String) -> Result<String, JsError> {
        Ok(self.core.add_template(parse_template(&name)?))
    }

    #[wasm_bindgen(js_name = drag_pivot)]
    pub fn drag_pivot(&mut self, pivot_id: String, x: f64, y: f64) {
        self.core.drag_pivot(&pivot_id, Vec2::new(x, y));
    }

    /// Drop a dragged figure at (x, y); removes it when over the delete zone.
    #[wasm_bindgen(js_name = release_figure_at)]
    pub fn release_figure_at(&mut self, figure_id: String, x: f64, y: f64) -> Result<bool, JsError> {
        self.core
            .release_figure_at(&figure_id, Vec2::new(x, y))
            .map_err(|e| JsError::new(&format!("release_figure_at: {e}")))
    }

    #[wasm_bindgen(js_name = toggle_play)]
    pub fn toggle_play(&mut self) -> bool {
        self.core.toggle_play()
    }

    /// Advance playback by `dt` seconds. Returns the displayed sample or
    /// undefined when not playing.
    #[wasm_bindgen]
    pub fn advance(&mut self, dt: f64) -> Result<JsValue, JsError> {
        match self.core.advance(dt) {
            Some(s) => to_js(&s, "sample"),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    #[wasm_bindgen(js_name = current_frame)]
    pub fn current_frame(&self) -> Result<JsValue, JsError> {
        to_js(self.core.current(), "frame")
    }

    #[wasm_bindgen(js_name = current_index)]
    pub fn current_index(&self) -> usize {
        self.core.current_frame
    }

    #[wasm_bindgen]
    pub fn project(&self) -> Result<JsValue, JsError> {
        to_js(&self.core.project, "project")
    }

    #[wasm_bindgen(js_name = check_integrity)]
    pub fn check_integrity(&self) -> Result<JsValue, JsError> {
        to_js(&self.core.check_integrity(), "integrity")
    }
}

/// ABI guard for JS glue.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
