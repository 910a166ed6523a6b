//! DOM for the result panel.

use crate::bindings::typeset;
use crate::dom::{append, clear, create, create_with_text, set_attrs};
use anyhow::Result;
use solver_core::copy::CopyIndicators;
use solver_core::view::{GraphSection, Section, View};
use web_sys::{Document, Element, HtmlButtonElement, HtmlImageElement};

pub(crate) const COPY_LABEL: &str = "Copy";
pub(crate) const COPIED_LABEL: &str = "Copied!";

/// A rendered copy button and the section whose text it copies.
pub(crate) struct CopyTarget {
    pub button: HtmlButtonElement,
    pub section: Section,
}

pub(crate) fn copy_label(copied: bool) -> &'static str {
    if copied {
        COPIED_LABEL
    } else {
        COPY_LABEL
    }
}

/// Replaces the contents of `container` with `view`.
pub(crate) fn render_view(
    document: &Document,
    container: &Element,
    view: &View,
    copied: &CopyIndicators,
) -> Result<Vec<CopyTarget>> {
    clear(container);

    let mut targets = Vec::new();
    match view {
        View::Prompt { message } => {
            append(container, &create_with_text(document, "p", "prompt", message)?)?;
        }
        View::Graph { section } => {
            append(container, &graph_section(document, section)?)?;
        }
        View::Error { .. } | View::Results { .. } => {
            for section in view.sections() {
                let (element, button) =
                    text_section(document, section, copied.is_copied(section.title))?;
                append(container, &element)?;
                targets.push(CopyTarget {
                    button,
                    section: section.clone(),
                });
            }
        }
    }
    Ok(targets)
}

/// A collapsible `<details>` block titled `title`, open by default.
fn collapsible(document: &Document, title: &str) -> Result<(Element, Element)> {
    let details: Element = create(document, "details", "section")?;
    set_attrs(&details, &[("open", "")])?;
    let summary: Element = create(document, "summary", "section-header")?;
    append(&summary, &create_with_text(document, "h1", "my-h1", title)?)?;
    append(&details, &summary)?;
    Ok((details, summary))
}

fn text_section(
    document: &Document,
    section: &Section,
    copied: bool,
) -> Result<(Element, HtmlButtonElement)> {
    let (details, summary) = collapsible(document, section.title)?;

    let button: HtmlButtonElement = create(document, "button", "copy")?;
    button.set_type("button");
    button.set_text_content(Some(copy_label(copied)));
    append(&summary, &button)?;

    let body: Element = create(document, "div", "section-body")?;
    for line in &section.lines {
        let target: Element = create(document, "div", "latex-line")?;
        typeset(line, &target);
        append(&body, &target)?;
    }
    append(&details, &body)?;

    Ok((details, button))
}

fn graph_section(document: &Document, section: &GraphSection) -> Result<Element> {
    let (details, _) = collapsible(document, section.title)?;
    let image: HtmlImageElement = create(document, "img", "graph")?;
    image.set_src(section.image.as_str());
    image.set_alt("Graph of the equation");
    append(&details, &image)?;
    Ok(details)
}
