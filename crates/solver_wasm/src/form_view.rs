//! DOM for the input form and its repeatable rows.

use crate::dom::{append, create, create_with_text, set_attrs};
use anyhow::Result;
use solver_core::entries::{EntryId, EntryKind};
use web_sys::{
    Document, Element, HtmlButtonElement, HtmlFormElement, HtmlInputElement, HtmlTextAreaElement,
};

/// Attributes that keep browsers and extensions from "correcting" math input.
const NO_AUTOCORRECT: &[(&str, &str)] = &[
    ("spellcheck", "false"),
    ("autocorrect", "off"),
    ("autocapitalize", "off"),
    ("data-gramm", "false"),
    ("data-enable-grammarly", "false"),
];

pub(crate) struct FormHandles {
    pub form: HtmlFormElement,
    pub functions_list: Element,
    pub constants_list: Element,
    pub add_function: HtmlButtonElement,
    pub add_constant: HtmlButtonElement,
    pub equation: HtmlTextAreaElement,
    pub domain: HtmlInputElement,
    pub solve_for: HtmlInputElement,
}

pub(crate) enum RowInputs {
    Function(HtmlInputElement),
    Constant {
        name: HtmlInputElement,
        value: HtmlInputElement,
    },
}

pub(crate) struct RowHandles {
    pub row: Element,
    pub inputs: RowInputs,
    pub delete: HtmlButtonElement,
}

fn text_input(document: &Document, class: &str, placeholder: &str) -> Result<HtmlInputElement> {
    let input: HtmlInputElement = create(document, "input", class)?;
    input.set_type("text");
    input.set_placeholder(placeholder);
    set_attrs(&input, NO_AUTOCORRECT)?;
    Ok(input)
}

fn button(document: &Document, class: &str, label: &str) -> Result<HtmlButtonElement> {
    let button: HtmlButtonElement = create(document, "button", class)?;
    button.set_type("button");
    button.set_text_content(Some(label));
    Ok(button)
}

/// A titled list with its "+" button. Rows are appended to the returned list element.
fn entry_list(
    document: &Document,
    parent: &Element,
    title: &str,
    kind: EntryKind,
) -> Result<(Element, HtmlButtonElement)> {
    let wrapper: Element = create(document, "div", "entry-list")?;
    append(&wrapper, &create_with_text(document, "h1", "my-h1", title)?)?;

    let list: Element = create(document, "div", "entry-rows")?;
    set_attrs(&list, &[("data-kind", kind_name(kind))])?;
    append(&wrapper, &list)?;

    let add = button(document, "add-entry", "+")?;
    set_attrs(&add, &[("aria-label", format!("Add {}", kind_name(kind)).as_str())])?;
    append(&wrapper, &add)?;

    append(parent, &wrapper)?;
    Ok((list, add))
}

fn kind_name(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::Function => "function",
        EntryKind::Constant => "constant",
    }
}

pub(crate) fn build_form(document: &Document, root: &Element) -> Result<FormHandles> {
    let form: HtmlFormElement = create(document, "form", "solver-form")?;

    let (functions_list, add_function) =
        entry_list(document, &form, "Functions", EntryKind::Function)?;
    let (constants_list, add_constant) =
        entry_list(document, &form, "Constants", EntryKind::Constant)?;

    let options: Element = create(document, "div", "solver-options")?;
    let solve_for = text_input(document, "solve-for", "Solve for, e.g. x")?;
    solve_for.set_name("solve_for");
    let domain = text_input(document, "domain", "Domain, e.g. [0, 2pi]")?;
    domain.set_name("domain");
    append(&options, &solve_for)?;
    append(&options, &domain)?;
    append(&form, &options)?;

    let equation: HtmlTextAreaElement = create(document, "textarea", "equation my-input")?;
    equation.set_name("equation");
    equation.set_placeholder("Enter an equation...");
    equation.set_required(true);
    set_attrs(&equation, NO_AUTOCORRECT)?;
    append(&form, &equation)?;

    let actions: Element = create(document, "div", "solver-actions")?;
    for (label, value) in [("Solve", "solve"), ("Graph", "graph")] {
        let submit: HtmlButtonElement = create(document, "button", "submit")?;
        submit.set_type("submit");
        submit.set_value(value);
        submit.set_text_content(Some(label));
        append(&actions, &submit)?;
    }
    append(&form, &actions)?;

    append(root, &form)?;

    Ok(FormHandles {
        form,
        functions_list,
        constants_list,
        add_function,
        add_constant,
        equation,
        domain,
        solve_for,
    })
}

/// Builds the row for `id` and appends it to `list`.
pub(crate) fn build_row(
    document: &Document,
    list: &Element,
    kind: EntryKind,
    id: EntryId,
) -> Result<RowHandles> {
    let row: Element = create(document, "div", "entry-row")?;
    set_attrs(&row, &[("data-entry-id", id.to_string().as_str())])?;

    let inputs = match kind {
        EntryKind::Function => {
            let text = text_input(document, "a-function", "E.g. f(x) = 2x ...")?;
            append(&row, &text)?;
            RowInputs::Function(text)
        }
        EntryKind::Constant => {
            let name = text_input(document, "constant-name", "name")?;
            let value = text_input(document, "constant-value", "value")?;
            append(&row, &name)?;
            append(&row, &create_with_text(document, "span", "equals", "=")?)?;
            append(&row, &value)?;
            RowInputs::Constant { name, value }
        }
    };

    let delete = button(document, "delete-entry", "\u{2715}")?;
    set_attrs(&delete, &[("aria-label", format!("Remove {}", kind_name(kind)).as_str())])?;
    append(&row, &delete)?;

    append(list, &row)?;
    Ok(RowHandles {
        row,
        inputs,
        delete,
    })
}
