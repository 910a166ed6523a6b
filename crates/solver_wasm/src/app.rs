//! The mounted application: form, dispatch and output panel wired together.

use crate::bindings::{js_message, set_timeout, write_clipboard};
use crate::dom::{self, listen, listen_scoped, Listener};
use crate::form_view::{build_form, build_row, RowInputs};
use crate::logger;
use crate::output_view::{render_view, CopyTarget};
use crate::transport::{release_image, FetchTransport};
use anyhow::{Context, Result};
use serde::Serialize;
use serde_wasm_bindgen::{from_value, Serializer};
use solver_core::config::{BackendConfig, ConfigError, Environment};
use solver_core::copy::{CopyIndicators, COPY_RESET_DELAY};
use solver_core::entries::{EntryId, EntryKind};
use solver_core::envelope::{EnvelopeContent, ResponseEnvelope};
use solver_core::form::{collect, FormState, SubmitMode};
use solver_core::view::render;
use solver_core::Dispatcher;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, spawn_local};
use web_sys::{Document, Element, HtmlInputElement, HtmlTextAreaElement, SubmitEvent};

/// Serializes into plain JS objects (not `Map`s) so host scripts can read fields directly.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Picks the backend: an explicit override wins, then a named environment, then the build
/// profile.
pub(crate) fn resolve_config(
    override_config: Option<BackendConfig>,
    env_name: Option<&str>,
) -> Result<BackendConfig, ConfigError> {
    if let Some(config) = override_config {
        return BackendConfig::new(config.base_url);
    }
    match env_name {
        Some(name) => Ok(BackendConfig::for_environment(name.parse::<Environment>()?)),
        None => Ok(BackendConfig::default()),
    }
}

/// The row id as handed to JS, which only receives `u32` handles.
fn row_handle(id: EntryId) -> Result<u32, String> {
    u32::try_from(id.0).map_err(|_| format!("Row id {id} does not fit a u32 handle"))
}

#[derive(Default)]
struct AppState {
    form: FormState,
    envelope: Option<ResponseEnvelope>,
    copied: CopyIndicators,
}

impl AppState {
    /// Installs a fresh envelope, releasing the previous graph image if there was one.
    fn replace_envelope(&mut self, envelope: ResponseEnvelope) {
        if let Some(ResponseEnvelope {
            content: EnvelopeContent::Image { image },
            ..
        }) = self.envelope.replace(envelope)
        {
            release_image(&image);
        }
        self.copied.reset();
    }
}

struct Ui {
    state: RefCell<AppState>,
    dispatcher: Dispatcher<FetchTransport>,
    document: Document,
    functions_list: Element,
    constants_list: Element,
    output: Element,
    /// Copy-button listeners of the current output panel, replaced on every render.
    output_listeners: RefCell<Vec<Listener>>,
    /// Input and delete listeners of each live row.
    row_listeners: RefCell<HashMap<(EntryKind, EntryId), Vec<Listener>>>,
}

impl Ui {
    fn render_output(self: &Rc<Self>) {
        let (view, copied) = {
            let state = self.state.borrow();
            (render(state.envelope.as_ref()), state.copied.clone())
        };
        let mut fresh = Vec::new();
        match render_view(&self.document, &self.output, &view, &copied) {
            Ok(targets) => {
                for target in targets {
                    match self.wire_copy(target) {
                        Ok(listener) => fresh.push(listener),
                        Err(err) => log::error!("failed to wire copy button: {err:#}"),
                    }
                }
            }
            Err(err) => log::error!("failed to render output: {err:#}"),
        }
        drop(self.output_listeners.replace(fresh));
    }

    fn wire_copy(self: &Rc<Self>, target: CopyTarget) -> Result<Listener> {
        let ui = Rc::clone(self);
        let CopyTarget { button, section } = target;
        listen_scoped(&button, "click", move |_| {
            let ui = Rc::clone(&ui);
            let title = section.title;
            let text = section.copy_text();
            spawn_local(async move {
                if let Err(err) = write_clipboard(&text).await {
                    log::warn!("clipboard write failed: {}", js_message(&err));
                    return;
                }
                ui.show_copied(title);
            });
        })
    }

    /// Flags `title` as copied and schedules the flag's reset.
    fn show_copied(self: &Rc<Self>, title: &'static str) {
        let ticket = self.state.borrow_mut().copied.mark_copied(title);
        self.render_output();

        let later = Rc::clone(self);
        let delay_ms = i32::try_from(COPY_RESET_DELAY.as_millis()).unwrap_or(i32::MAX);
        let scheduled = set_timeout(
            move || {
                if later.state.borrow_mut().copied.clear(&ticket) {
                    later.render_output();
                }
            },
            delay_ms,
        );
        if let Err(err) = scheduled {
            log::warn!("failed to schedule copy reset: {}", js_message(&err));
        }
    }

    fn add_row(self: &Rc<Self>, kind: EntryKind) -> Result<EntryId> {
        let (id, list) = {
            let mut state = self.state.borrow_mut();
            match kind {
                EntryKind::Function => (state.form.add_function_entry(), &self.functions_list),
                EntryKind::Constant => (state.form.add_constant_entry(), &self.constants_list),
            }
        };
        let handles = build_row(&self.document, list, kind, id)?;

        let mut listeners = Vec::with_capacity(3);
        match handles.inputs {
            RowInputs::Function(text) => {
                let ui = Rc::clone(self);
                let input = text.clone();
                listeners.push(listen_scoped(&text, "input", move |_| {
                    ui.state.borrow_mut().form.set_function_text(id, input.value());
                })?);
            }
            RowInputs::Constant { name, value } => {
                let ui = Rc::clone(self);
                let input = name.clone();
                listeners.push(listen_scoped(&name, "input", move |_| {
                    ui.state.borrow_mut().form.set_constant_name(id, input.value());
                })?);
                let ui = Rc::clone(self);
                let input = value.clone();
                listeners.push(listen_scoped(&value, "input", move |_| {
                    ui.state.borrow_mut().form.set_constant_value(id, input.value());
                })?);
            }
        }

        let ui = Rc::clone(self);
        let row = handles.row.clone();
        listeners.push(listen_scoped(&handles.delete, "click", move |_| {
            ui.remove_row(kind, id, &row);
        })?);

        self.row_listeners.borrow_mut().insert((kind, id), listeners);
        log::debug!("added {kind:?} row {id}");
        Ok(id)
    }

    fn remove_row(&self, kind: EntryKind, id: EntryId, row: &Element) {
        self.state.borrow_mut().form.remove_entry(kind, id);
        row.remove();
        let released = self.row_listeners.borrow_mut().remove(&(kind, id));
        // The delete listener is among these and is still running.
        spawn_local(async move { drop(released) });
        log::debug!("removed {kind:?} row {id}");
    }

    fn submit(self: &Rc<Self>, mode: SubmitMode) {
        let request = match collect(&self.state.borrow().form) {
            Ok(request) => request,
            Err(err) => {
                log::warn!("submission blocked: {err}");
                return;
            }
        };
        let ui = Rc::clone(self);
        spawn_local(async move {
            let envelope = ui.dispatcher.submit(&request, mode).await;
            ui.state.borrow_mut().replace_envelope(envelope);
            ui.render_output();
        });
    }
}

fn bind_text(
    ui: &Rc<Ui>,
    input: &HtmlInputElement,
    apply: fn(&mut FormState, String),
) -> Result<()> {
    let ui = Rc::clone(ui);
    let source = input.clone();
    listen(input, "input", move |_| {
        apply(&mut ui.state.borrow_mut().form, source.value());
    })
}

fn bind_equation(ui: &Rc<Ui>, textarea: &HtmlTextAreaElement) -> Result<()> {
    let ui = Rc::clone(ui);
    let source = textarea.clone();
    listen(textarea, "input", move |_| {
        ui.state.borrow_mut().form.set_equation(source.value());
    })
}

fn mount(root_id: &str, config: BackendConfig) -> Result<Rc<Ui>> {
    let document = dom::document()?;
    let root = dom::element_by_id(&document, root_id)?;
    dom::clear(&root);

    let handles = build_form(&document, &root).context("Failed to build the form")?;
    let output: Element = dom::create(&document, "div", "solver-output")?;
    dom::append(&root, &output)?;

    let ui = Rc::new(Ui {
        state: RefCell::new(AppState::default()),
        dispatcher: Dispatcher::new(FetchTransport, config),
        document,
        functions_list: handles.functions_list.clone(),
        constants_list: handles.constants_list.clone(),
        output,
        output_listeners: RefCell::new(Vec::new()),
        row_listeners: RefCell::new(HashMap::new()),
    });

    for (button, kind) in [
        (&handles.add_function, EntryKind::Function),
        (&handles.add_constant, EntryKind::Constant),
    ] {
        let ui_ref = Rc::clone(&ui);
        listen(button, "click", move |_| {
            if let Err(err) = ui_ref.add_row(kind) {
                log::error!("failed to add {kind:?} row: {err:#}");
            }
        })?;
    }

    bind_equation(&ui, &handles.equation)?;
    bind_text(&ui, &handles.domain, |form, text| form.set_domain(text))?;
    bind_text(&ui, &handles.solve_for, |form, text| form.set_solve_for(text))?;

    let ui_ref = Rc::clone(&ui);
    listen(&handles.form, "submit", move |event| {
        event.prevent_default();
        let submitter = event
            .dyn_ref::<SubmitEvent>()
            .and_then(|submit| submit.submitter())
            .and_then(|control| control.get_attribute("value"));
        ui_ref.submit(SubmitMode::from_control_value(submitter.as_deref()));
    })?;

    ui.render_output();
    log::info!("solver mounted on #{root_id} using {}", ui.dispatcher.config().base_url);
    Ok(ui)
}

/// WASM-exported handle to a mounted solver page.
#[wasm_bindgen]
pub struct WasmSolverApp {
    ui: Rc<Ui>,
}

#[wasm_bindgen]
impl WasmSolverApp {
    /// Mounts the form and output panel inside the element with id `root_id`.
    ///
    /// `config` may be `undefined` or an object like `{ base_url: "http://..." }`.
    #[wasm_bindgen(constructor)]
    pub fn new(root_id: &str, config: JsValue) -> Result<WasmSolverApp, JsValue> {
        logger::init();

        let override_config = if config.is_undefined() || config.is_null() {
            None
        } else {
            Some(
                from_value::<BackendConfig>(config)
                    .map_err(|e| JsValue::from_str(&format!("Invalid backend config: {}", e)))?,
            )
        };
        let config = resolve_config(override_config, option_env!("SOLVER_ENV"))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let ui = mount(root_id, config)
            .map_err(|e| JsValue::from_str(&format!("Failed to mount solver: {:#}", e)))?;
        Ok(WasmSolverApp { ui })
    }

    /// The request the current field values would produce.
    pub fn collect(&self) -> Result<JsValue, JsValue> {
        let request =
            collect(&self.ui.state.borrow().form).map_err(|e| JsValue::from_str(&e.to_string()))?;
        to_js(&request)
    }

    /// The last response envelope, or `null` before the first submission.
    pub fn envelope(&self) -> Result<JsValue, JsValue> {
        match &self.ui.state.borrow().envelope {
            Some(envelope) => to_js(envelope),
            None => Ok(JsValue::NULL),
        }
    }

    /// The view model currently shown in the output panel.
    pub fn view(&self) -> Result<JsValue, JsValue> {
        let view = render(self.ui.state.borrow().envelope.as_ref());
        to_js(&view)
    }

    /// Submits the current form and resolves with the resulting envelope.
    pub fn submit(&self, is_graph: bool) -> js_sys::Promise {
        let ui = Rc::clone(&self.ui);
        let mode = if is_graph {
            SubmitMode::Graph
        } else {
            SubmitMode::Solve
        };
        future_to_promise(async move {
            let request =
                collect(&ui.state.borrow().form).map_err(|e| JsValue::from_str(&e.to_string()))?;
            let envelope = ui.dispatcher.submit(&request, mode).await;
            let value = to_js(&envelope)?;
            ui.state.borrow_mut().replace_envelope(envelope);
            ui.render_output();
            Ok(value)
        })
    }

    pub fn add_function_entry(&self) -> Result<u32, JsValue> {
        self.add_row(EntryKind::Function)
    }

    pub fn add_constant_entry(&self) -> Result<u32, JsValue> {
        self.add_row(EntryKind::Constant)
    }
}

impl WasmSolverApp {
    fn add_row(&self, kind: EntryKind) -> Result<u32, JsValue> {
        let id = self
            .ui
            .add_row(kind)
            .map_err(|e| JsValue::from_str(&format!("Failed to add row: {:#}", e)))?;
        row_handle(id).map_err(|e| JsValue::from_str(&e))
    }
}
