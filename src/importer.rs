//! Bindings to the occt-import-js global loaded by `index.html`.
//!
//! The importer is an Emscripten build of OpenCascade. `occtimportjs()`
//! resolves to a module whose `ReadStepFile(bytes, params)` returns
//! `{ success, meshes: [{ attributes: { position: { array } }, index: { array }, color }] }`.

use js_sys::{Array, Function, Reflect, Uint8Array};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::error::{Result, ViewError};
use crate::import::{ImportedMesh, ImportedModel};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_name = occtimportjs)]
    fn occt_import_js() -> std::result::Result<js_sys::Promise, JsValue>;
}

fn import_failure(err: JsValue) -> ViewError {
    ViewError::ImportFailure(
        err.as_string()
            .unwrap_or_else(|| format!("{:?}", err)),
    )
}

fn get(target: &JsValue, key: &str) -> Result<JsValue> {
    Reflect::get(target, &JsValue::from_str(key)).map_err(import_failure)
}

fn numbers(array: &JsValue) -> Vec<f64> {
    Array::from(array).iter().filter_map(|v| v.as_f64()).collect()
}

fn read_mesh(mesh: &JsValue) -> Result<ImportedMesh> {
    let position = get(&get(&get(mesh, "attributes")?, "position")?, "array")?;
    let index = get(&get(mesh, "index")?, "array")?;
    let color = get(mesh, "color")?;

    let color = if color.is_undefined() || color.is_null() {
        None
    } else {
        match numbers(&color).as_slice() {
            [r, g, b, ..] => Some([*r as f32, *g as f32, *b as f32]),
            _ => None,
        }
    };

    Ok(ImportedMesh {
        positions: numbers(&position),
        indices: numbers(&index).into_iter().map(|i| i as usize).collect(),
        color,
    })
}

/// Runs the external STEP importer over `bytes`.
pub async fn import_step(bytes: &[u8]) -> Result<ImportedModel> {
    let occt = JsFuture::from(occt_import_js().map_err(import_failure)?)
        .await
        .map_err(import_failure)?;
    let read_step = get(&occt, "ReadStepFile")?
        .dyn_into::<Function>()
        .map_err(|_| ViewError::ImportFailure("ReadStepFile is not a function".into()))?;

    let buffer = Uint8Array::from(bytes);
    let result = read_step
        .call2(&occt, &buffer, &JsValue::NULL)
        .map_err(import_failure)?;

    if !get(&result, "success")?.as_bool().unwrap_or(false) {
        return Err(ViewError::ImportFailure(
            "the importer could not read the file".into(),
        ));
    }

    let meshes = Array::from(&get(&result, "meshes")?)
        .iter()
        .map(|mesh| read_mesh(&mesh))
        .collect::<Result<Vec<_>>>()?;
    ImportedModel::new(meshes).validate()
}
