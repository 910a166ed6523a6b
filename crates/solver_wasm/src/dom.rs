//! Small DOM helpers shared by the form and output views.

use crate::bindings::js_message;
use anyhow::{anyhow, Context, Result};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, EventTarget};

pub(crate) fn js_err(err: JsValue) -> anyhow::Error {
    anyhow!(js_message(&err))
}

pub(crate) fn document() -> Result<Document> {
    web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| anyhow!("No document available"))
}

pub(crate) fn element_by_id(document: &Document, id: &str) -> Result<Element> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| anyhow!("No element with id `{id}`"))
}

/// Creates `<tag class="...">` already cast to the requested element type.
pub(crate) fn create<T: JsCast>(document: &Document, tag: &str, class: &str) -> Result<T> {
    let element = document
        .create_element(tag)
        .map_err(js_err)
        .with_context(|| format!("Failed to create <{tag}>"))?;
    if !class.is_empty() {
        element.set_class_name(class);
    }
    element
        .dyn_into::<T>()
        .map_err(|_| anyhow!("<{tag}> has an unexpected element type"))
}

pub(crate) fn create_with_text(
    document: &Document,
    tag: &str,
    class: &str,
    text: &str,
) -> Result<Element> {
    let element: Element = create(document, tag, class)?;
    element.set_text_content(Some(text));
    Ok(element)
}

pub(crate) fn append(parent: &Element, child: &Element) -> Result<()> {
    parent.append_child(child).map_err(js_err)?;
    Ok(())
}

pub(crate) fn set_attrs(element: &Element, attrs: &[(&str, &str)]) -> Result<()> {
    for (name, value) in attrs {
        element
            .set_attribute(name, value)
            .map_err(js_err)
            .with_context(|| format!("Failed to set `{name}`"))?;
    }
    Ok(())
}

fn attach(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<Closure<dyn FnMut(Event)>> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .map_err(js_err)
        .with_context(|| format!("Failed to listen for `{event}`"))?;
    Ok(closure)
}

/// Attaches a listener that lives as long as the page. Only for the fixed form controls.
pub(crate) fn listen(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<()> {
    attach(target, event, handler)?.forget();
    Ok(())
}

/// An attached listener that is detached and freed when dropped.
pub(crate) struct Listener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Drop for Listener {
    fn drop(&mut self) {
        let detached = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
        if let Err(err) = detached {
            log::warn!("failed to detach `{}` listener: {}", self.event, js_message(&err));
        }
    }
}

/// Attaches a listener owned by the returned [`Listener`].
pub(crate) fn listen_scoped(
    target: &EventTarget,
    event: &'static str,
    handler: impl FnMut(Event) + 'static,
) -> Result<Listener> {
    let closure = attach(target, event, handler)?;
    Ok(Listener {
        target: target.clone(),
        event,
        closure,
    })
}

pub(crate) fn clear(element: &Element) {
    element.set_inner_html("");
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use wasm_bindgen_test::*;
    use web_sys::HtmlButtonElement;

    #[wasm_bindgen_test]
    fn dropped_listener_stops_firing() {
        let document = document().expect("document");
        let button: HtmlButtonElement = create(&document, "button", "").expect("button");
        let clicks = Rc::new(Cell::new(0));

        let counter = Rc::clone(&clicks);
        let listener = listen_scoped(&button, "click", move |_| counter.set(counter.get() + 1))
            .expect("listen");
        button.click();
        assert_eq!(clicks.get(), 1);

        drop(listener);
        button.click();
        assert_eq!(clicks.get(), 1);
        assert_eq!(Rc::strong_count(&clicks), 1);
    }
}
