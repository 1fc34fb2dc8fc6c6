//! Reads the JS options object into an [`AnimationConfig`].

use js_sys::Reflect;
use wasm_bindgen::JsValue;

use crate::config::{AnimationConfig, Credits, StepCap};
use crate::error::{DweetError, DweetResult};

pub fn parse(options: &JsValue) -> DweetResult<AnimationConfig> {
    let mut builder = AnimationConfig::builder();
    if options.is_undefined() || options.is_null() {
        return builder.build();
    }
    if !options.is_object() {
        return Err(DweetError::configuration("options has to be an object"));
    }

    if let Some(fps) = number(options, &["targetFps", "fps"])? {
        builder = builder.target_fps(fps);
    }
    if let Some(steps) = number(options, &["maxStepsPerTick", "intermediateDraws"])? {
        builder = builder.max_steps(StepCap::from_f64(steps)?);
    }
    if let Some(show) = boolean(options, &["showSource", "showCode"])? {
        builder = builder.show_source(show);
    }
    if let Some(draw) = boolean(options, &["drawIntermediate"])? {
        builder = builder.draw_intermediate(draw);
    }
    if let Some(display) = boolean(options, &["displayCanvas"])? {
        builder = builder.display_canvas(display);
    }
    if let Some(credits) = get(options, &["credits"])? {
        if credits.is_object() {
            builder = builder.credits(Credits {
                title: string(&credits, "title")?,
                author: string(&credits, "author")?,
                link: string(&credits, "link")?,
            });
        } else if credits.is_truthy() {
            return Err(DweetError::configuration("credits has to be an object"));
        }
    }

    builder.build()
}

/// First of `keys` that is present and not `undefined`.
fn get(object: &JsValue, keys: &[&str]) -> DweetResult<Option<JsValue>> {
    for key in keys {
        let value = Reflect::get(object, &JsValue::from_str(key))
            .map_err(|_| DweetError::configuration(format!("could not read option `{key}`")))?;
        if !value.is_undefined() {
            return Ok(Some(value));
        }
    }
    Ok(None)
}

fn number(object: &JsValue, keys: &[&str]) -> DweetResult<Option<f64>> {
    get(object, keys)?
        .map(|v| {
            v.as_f64().ok_or_else(|| {
                DweetError::configuration(format!(
                    "{} has to be a number that is also not NaN",
                    keys[0]
                ))
            })
        })
        .transpose()
}

fn boolean(object: &JsValue, keys: &[&str]) -> DweetResult<Option<bool>> {
    get(object, keys)?
        .map(|v| {
            v.as_bool()
                .ok_or_else(|| DweetError::configuration(format!("{} has to be a boolean", keys[0])))
        })
        .transpose()
}

fn string(object: &JsValue, key: &str) -> DweetResult<Option<String>> {
    match get(object, &[key])? {
        None => Ok(None),
        Some(v) if v.is_null() => Ok(None),
        Some(v) => v
            .as_string()
            .map(Some)
            .ok_or_else(|| DweetError::configuration(format!("credits.{key} has to be a string"))),
    }
}
