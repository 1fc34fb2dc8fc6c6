//! Compiles dweet source into a JS function and calls it once per sample.

use js_sys::{Array, Function, Reflect};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::color;
use crate::error::{DweetError, DweetResult};
use crate::sandbox::{DrawArgs, DrawRoutine};

/// Parameter names, in call order.
const PARAMS: [&str; 7] = ["t", "c", "x", "R", "C", "S", "T"];

type ColorClosure = Closure<dyn Fn(JsValue, JsValue, JsValue, JsValue) -> String>;

pub struct ScriptRoutine {
    function: Function,
    // Owned so the JS side can keep calling it.
    color: ColorClosure,
    cos: JsValue,
    sin: JsValue,
    tan: JsValue,
}

impl ScriptRoutine {
    /// Fails with a configuration error when `code` is not a string and a
    /// compile error when it does not parse as a function body.
    pub fn compile(code: &JsValue) -> DweetResult<Self> {
        let code = code
            .as_string()
            .ok_or_else(|| DweetError::configuration("type of code has to be a string"))?;

        let global = js_sys::global();
        let constructor: Function = Reflect::get(&global, &JsValue::from_str("Function"))
            .ok()
            .and_then(|f| f.dyn_into().ok())
            .ok_or_else(|| DweetError::host("Function constructor unavailable"))?;
        let args: Array = PARAMS.iter().map(|p| JsValue::from_str(p)).collect();
        args.push(&JsValue::from_str(&code));
        let function = Reflect::construct(&constructor, &args)
            .map_err(|err| DweetError::compile(describe(&err)))?
            .dyn_into::<Function>()
            .map_err(|_| DweetError::compile("code did not compile to a function"))?;

        let math = Reflect::get(&global, &JsValue::from_str("Math"))
            .map_err(|_| DweetError::host("Math unavailable"))?;
        let trig = |name: &str| {
            Reflect::get(&math, &JsValue::from_str(name))
                .map_err(|_| DweetError::host(format!("Math.{name} unavailable")))
        };

        Ok(Self {
            function,
            color: Closure::wrap(Box::new(|r: JsValue, g: JsValue, b: JsValue, a: JsValue| {
                let alpha = if a.is_undefined() { None } else { Some(number(&a)) };
                color::rgba(number(&r), number(&g), number(&b), alpha)
            }) as Box<dyn Fn(JsValue, JsValue, JsValue, JsValue) -> String>),
            cos: trig("cos")?,
            sin: trig("sin")?,
            tan: trig("tan")?,
        })
    }
}

impl DrawRoutine<HtmlCanvasElement, CanvasRenderingContext2d> for ScriptRoutine {
    fn draw(&mut self, args: &DrawArgs<'_, HtmlCanvasElement, CanvasRenderingContext2d>) -> DweetResult<()> {
        let params = Array::new();
        params.push(&JsValue::from_f64(args.t));
        params.push(args.c.as_ref());
        params.push(args.x.as_ref());
        params.push(self.color.as_ref());
        params.push(&self.cos);
        params.push(&self.sin);
        params.push(&self.tan);
        self.function
            .apply(&JsValue::UNDEFINED, &params)
            .map(drop)
            .map_err(|err| DweetError::runtime(describe(&err)))
    }
}

/// Non-numbers become NaN, which `color::rgba` turns into 0.
fn number(value: &JsValue) -> f64 {
    value.as_f64().unwrap_or(f64::NAN)
}

fn describe(err: &JsValue) -> String {
    if let Some(error) = err.dyn_ref::<js_sys::Error>() {
        return String::from(error.to_string());
    }
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}
