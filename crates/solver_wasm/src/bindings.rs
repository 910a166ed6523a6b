//! Page globals the front end relies on: KaTeX, the async clipboard and timers.

use js_sys::{Object, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Element;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = katex, js_name = render)]
    fn katex_render(content: &str, element: &Element, options: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["navigator", "clipboard"], js_name = writeText)]
    fn clipboard_write_text(text: &str) -> Result<Promise, JsValue>;
}

/// Best-effort text out of a thrown JS value.
pub(crate) fn js_message(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

fn katex_options() -> Result<JsValue, JsValue> {
    let options = Object::new();
    Reflect::set(&options, &"throwOnError".into(), &JsValue::FALSE)?;
    Reflect::set(&options, &"displayMode".into(), &JsValue::TRUE)?;
    Ok(options.into())
}

/// Typesets `content` into `target`, falling back to plain text when KaTeX is unavailable.
pub(crate) fn typeset(content: &str, target: &Element) {
    let rendered = katex_options().and_then(|options| katex_render(content, target, &options));
    if let Err(err) = rendered {
        log::debug!("katex unavailable, showing raw text: {}", js_message(&err));
        target.set_text_content(Some(content));
    }
}

pub(crate) async fn write_clipboard(text: &str) -> Result<(), JsValue> {
    JsFuture::from(clipboard_write_text(text)?).await?;
    Ok(())
}

/// Runs `callback` once after `delay_ms` milliseconds.
pub(crate) fn set_timeout(callback: impl FnOnce() + 'static, delay_ms: i32) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window available"))?;
    let callback = Closure::once_into_js(callback);
    window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref(),
        delay_ms,
    )?;
    Ok(())
}
