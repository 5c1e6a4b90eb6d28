use crate::constants::TRANSLATE_HOOK;
use panogaze_core::{Definition, LookupFuture, TranslateError, Translator};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

/// Calls the page's `window.panogazeTranslate(word, sentence)`, which resolves
/// to a definition object or its JSON text.
pub struct JsTranslator;

impl Translator for JsTranslator {
    fn lookup(&self, word: &str, context: &str) -> LookupFuture {
        let word = word.to_string();
        let context = context.to_string();
        Box::pin(async move { call_hook(&word, &context).await })
    }
}

async fn call_hook(word: &str, context: &str) -> Result<Definition, TranslateError> {
    let window = web::window().ok_or_else(|| TranslateError::Unavailable("no window".into()))?;
    let hook = js_sys::Reflect::get(&window, &JsValue::from_str(TRANSLATE_HOOK))
        .ok()
        .and_then(|f| f.dyn_into::<js_sys::Function>().ok())
        .ok_or_else(|| TranslateError::Unavailable(format!("window.{} missing", TRANSLATE_HOOK)))?;
    let ret = hook
        .call2(&JsValue::NULL, &JsValue::from_str(word), &JsValue::from_str(context))
        .map_err(|e| TranslateError::Unavailable(format!("{:?}", e)))?;
    let value = match ret.dyn_into::<js_sys::Promise>() {
        Ok(promise) => JsFuture::from(promise)
            .await
            .map_err(|e| TranslateError::Unavailable(format!("{:?}", e)))?,
        Err(v) => v,
    };
    if value.is_null() || value.is_undefined() {
        return Err(TranslateError::NotFound(word.to_string()));
    }
    let text = match value.as_string() {
        Some(s) => s,
        None => js_sys::JSON::stringify(&value)
            .ok()
            .and_then(|s| s.as_string())
            .ok_or_else(|| TranslateError::Malformed("unserializable result".into()))?,
    };
    let mut def: Definition =
        serde_json::from_str(&text).map_err(|e| TranslateError::Malformed(e.to_string()))?;
    // The session matches results to the pending lookup by word.
    def.word = word.to_string();
    Ok(def)
}
