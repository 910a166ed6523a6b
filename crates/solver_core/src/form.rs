//! Form state and request collection.

use crate::entries::{ConstantEntry, EntryArena, EntryId, EntryKind, FunctionEntry};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please enter an equation.")]
    MissingEquation,
}

/// Which backend route a submission goes to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitMode {
    #[default]
    Solve,
    Graph,
}

impl SubmitMode {
    /// Reads the `value` of the submit button that fired the form. Anything other than
    /// `graph` (including no submitter at all) solves.
    pub fn from_control_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("graph") => SubmitMode::Graph,
            _ => SubmitMode::Solve,
        }
    }

    pub fn is_graph(self) -> bool {
        matches!(self, SubmitMode::Graph)
    }

    pub fn path(self) -> &'static str {
        match self {
            SubmitMode::Solve => "/solve",
            SubmitMode::Graph => "/graph",
        }
    }
}

/// JSON body posted to `/solve` and `/graph`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveRequest {
    pub equation: String,
    pub domain: Option<String>,
    pub solve_for: Option<String>,
    pub functions: Vec<String>,
    pub constants: Map<String, Value>,
}

/// Everything the user has typed so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormState {
    pub equation: String,
    pub domain: String,
    pub solve_for: String,
    pub functions: EntryArena<FunctionEntry>,
    pub constants: EntryArena<ConstantEntry>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_function_entry(&mut self) -> EntryId {
        self.functions.push_default()
    }

    pub fn add_constant_entry(&mut self) -> EntryId {
        self.constants.push_default()
    }

    /// Drops a row from the list named by `kind`. Returns whether a row was removed.
    pub fn remove_entry(&mut self, kind: EntryKind, id: EntryId) -> bool {
        match kind {
            EntryKind::Function => self.functions.remove(id).is_some(),
            EntryKind::Constant => self.constants.remove(id).is_some(),
        }
    }

    pub fn set_equation(&mut self, text: impl Into<String>) {
        self.equation = text.into();
    }

    pub fn set_domain(&mut self, text: impl Into<String>) {
        self.domain = text.into();
    }

    pub fn set_solve_for(&mut self, text: impl Into<String>) {
        self.solve_for = text.into();
    }

    pub fn set_function_text(&mut self, id: EntryId, text: impl Into<String>) -> bool {
        match self.functions.get_mut(id) {
            Some(entry) => {
                entry.text = text.into();
                true
            }
            None => false,
        }
    }

    pub fn set_constant_name(&mut self, id: EntryId, name: impl Into<String>) -> bool {
        match self.constants.get_mut(id) {
            Some(entry) => {
                entry.name = name.into();
                true
            }
            None => false,
        }
    }

    pub fn set_constant_value(&mut self, id: EntryId, value: impl Into<String>) -> bool {
        match self.constants.get_mut(id) {
            Some(entry) => {
                entry.value = value.into();
                true
            }
            None => false,
        }
    }
}

/// Builds the request payload from the current form state.
///
/// Function rows with no text and constant rows with no name are skipped. An empty
/// equation is rejected before anything is sent.
pub fn collect(form: &FormState) -> Result<SolveRequest, FormError> {
    if form.equation.trim().is_empty() {
        return Err(FormError::MissingEquation);
    }

    let functions = form
        .functions
        .values()
        .filter(|entry| !entry.text.trim().is_empty())
        .map(|entry| entry.text.clone())
        .collect();

    let mut constants = Map::new();
    for entry in form.constants.values() {
        let name = entry.name.trim();
        if name.is_empty() {
            continue;
        }
        constants.insert(name.to_string(), constant_value(&entry.value));
    }

    Ok(SolveRequest {
        equation: form.equation.clone(),
        domain: non_blank(&form.domain),
        solve_for: non_blank(&form.solve_for),
        functions,
        constants,
    })
}

/// Numbers go out as JSON numbers, a blank value as `0`, anything else as text.
fn constant_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Number(Number::from(0));
    }
    match trimmed.parse::<f64>() {
        Ok(parsed) => Number::from_f64(parsed)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(trimmed.to_string())),
        Err(_) => Value::String(trimmed.to_string()),
    }
}

fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
