//! Pure mapping from an envelope to what the output panel shows.

use crate::envelope::{EnvelopeContent, ImageRef, ResponseEnvelope, SolveResult};
use serde::Serialize;

pub const PROMPT_MESSAGE: &str = "Enter an equation to get started";
const FALLBACK_ERROR: &str = "Something went wrong";

/// A titled block of LaTeX lines with a copy action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub title: &'static str,
    pub lines: Vec<String>,
}

impl Section {
    fn new(title: &'static str, lines: Vec<String>) -> Self {
        Self { title, lines }
    }

    /// Text placed on the clipboard by the section's copy button.
    pub fn copy_text(&self) -> String {
        self.lines.join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphSection {
    pub title: &'static str,
    pub image: ImageRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum View {
    Prompt { message: &'static str },
    Error { section: Section },
    Graph { section: GraphSection },
    Results { sections: Vec<Section> },
}

impl View {
    /// Textual sections in display order. Empty for the prompt and graph views.
    pub fn sections(&self) -> &[Section] {
        match self {
            View::Error { section } => std::slice::from_ref(section),
            View::Results { sections } => sections,
            View::Prompt { .. } | View::Graph { .. } => &[],
        }
    }
}

pub fn render(envelope: Option<&ResponseEnvelope>) -> View {
    let Some(envelope) = envelope else {
        return View::Prompt {
            message: PROMPT_MESSAGE,
        };
    };

    match &envelope.content {
        EnvelopeContent::Error { error } => error_view(error),
        _ if !envelope.ok => error_view(FALLBACK_ERROR),
        EnvelopeContent::Image { image } if envelope.is_graph => View::Graph {
            section: GraphSection {
                title: "Graph",
                image: image.clone(),
            },
        },
        EnvelopeContent::Result(result) if !envelope.is_graph => View::Results {
            sections: result_sections(result),
        },
        _ => error_view(FALLBACK_ERROR),
    }
}

fn error_view(message: &str) -> View {
    View::Error {
        section: Section::new("Error", vec![message.to_string()]),
    }
}

fn result_sections(result: &SolveResult) -> Vec<Section> {
    let candidates = [
        Section::new(
            "Domain & Range",
            labelled(&[
                (r"\mathrm{Domain}", &result.domain),
                (r"\mathrm{Range}", &result.range),
            ]),
        ),
        Section::new("Simplified", simplified_lines(result)),
        Section::new("Solution", present(&[&result.latex_solution])),
        Section::new("Derivative", present(&[&result.derivative])),
        Section::new(
            "Maxima & Minima",
            labelled(&[(r"\max", &result.max), (r"\min", &result.min)]),
        ),
        Section::new(
            "Factored & Expanded",
            present(&[&result.factored, &result.expanded]),
        ),
    ];

    candidates
        .into_iter()
        .filter(|section| !section.lines.is_empty())
        .collect()
}

/// Equation and simplified form, collapsed to one line when they agree. A boolean result
/// such as `True` reads better after the simplified equation that produced it.
fn simplified_lines(result: &SolveResult) -> Vec<String> {
    match (&result.equation, &result.simplified_equation) {
        (Some(equation), Some(simplified)) if equation == simplified => vec![equation.clone()],
        (Some(equation), Some(simplified)) => {
            if is_boolean_literal(equation) || is_boolean_literal(simplified) {
                vec![simplified.clone(), equation.clone()]
            } else {
                vec![equation.clone(), simplified.clone()]
            }
        }
        (Some(only), None) | (None, Some(only)) => vec![only.clone()],
        (None, None) => Vec::new(),
    }
}

fn is_boolean_literal(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.eq_ignore_ascii_case("true") || trimmed.eq_ignore_ascii_case("false")
}

fn present(fields: &[&Option<String>]) -> Vec<String> {
    fields.iter().filter_map(|field| (*field).clone()).collect()
}

fn labelled(fields: &[(&str, &Option<String>)]) -> Vec<String> {
    fields
        .iter()
        .filter_map(|(label, value)| value.as_deref().map(|v| format!("{label}: {v}")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok_result(result: SolveResult) -> ResponseEnvelope {
        ResponseEnvelope {
            is_graph: false,
            status: 200,
            ok: true,
            content: EnvelopeContent::Result(result),
        }
    }

    fn full_result() -> SolveResult {
        SolveResult {
            simplified_equation: Some("x = 1".into()),
            latex_solution: Some(r"\left\{1\right\}".into()),
            derivative: Some("1".into()),
            domain: Some(r"\mathbb{R}".into()),
            range: Some(r"\mathbb{R}".into()),
            max: Some(r"\infty".into()),
            min: Some(r"-\infty".into()),
            factored: Some("x + 1".into()),
            expanded: Some("x + 1".into()),
            equation: Some("x + 1 = 2".into()),
            raw_solution: Some("{1}".into()),
            parsed_solution: Some("{1}".into()),
        }
    }

    fn section<'a>(view: &'a View, title: &str) -> Option<&'a Section> {
        view.sections().iter().find(|section| section.title == title)
    }

    #[test]
    fn no_envelope_shows_prompt() {
        assert_eq!(
            render(None),
            View::Prompt {
                message: PROMPT_MESSAGE
            }
        );
    }

    #[test]
    fn failed_envelope_shows_only_the_error_section() {
        let envelope = ResponseEnvelope {
            is_graph: false,
            status: 400,
            ok: false,
            content: EnvelopeContent::error("Bad input data"),
        };
        let view = render(Some(&envelope));
        assert_eq!(view.sections().len(), 1);
        assert_eq!(view.sections()[0].title, "Error");
        assert_eq!(view.sections()[0].lines, vec!["Bad input data"]);
    }

    #[test]
    fn not_ok_without_error_text_still_shows_error() {
        let mut envelope = ok_result(full_result());
        envelope.ok = false;
        let view = render(Some(&envelope));
        assert!(matches!(view, View::Error { .. }));
        assert_eq!(view.sections()[0].lines, vec![FALLBACK_ERROR]);
    }

    #[test]
    fn full_result_renders_sections_in_fixed_order() {
        let view = render(Some(&ok_result(full_result())));
        let titles: Vec<&str> = view.sections().iter().map(|s| s.title).collect();
        assert_eq!(
            titles,
            vec![
                "Domain & Range",
                "Simplified",
                "Solution",
                "Derivative",
                "Maxima & Minima",
                "Factored & Expanded",
            ]
        );
        assert_eq!(
            section(&view, "Domain & Range").expect("domain").lines,
            vec![r"\mathrm{Domain}: \mathbb{R}", r"\mathrm{Range}: \mathbb{R}"]
        );
    }

    #[test]
    fn identical_equation_collapses_simplified_section() {
        let view = render(Some(&ok_result(SolveResult {
            equation: Some("x+1".into()),
            simplified_equation: Some("x+1".into()),
            ..SolveResult::default()
        })));
        assert_eq!(section(&view, "Simplified").expect("simplified").lines, vec!["x+1"]);
    }

    #[test]
    fn differing_equation_is_shown_first() {
        let view = render(Some(&ok_result(full_result())));
        assert_eq!(
            section(&view, "Simplified").expect("simplified").lines,
            vec!["x + 1 = 2", "x = 1"]
        );
    }

    #[test]
    fn boolean_literal_puts_simplified_first() {
        let view = render(Some(&ok_result(SolveResult {
            equation: Some("True".into()),
            simplified_equation: Some("1=1".into()),
            ..SolveResult::default()
        })));
        assert_eq!(
            section(&view, "Simplified").expect("simplified").lines,
            vec!["1=1", "True"]
        );

        let view = render(Some(&ok_result(SolveResult {
            equation: Some("1 = 2".into()),
            simplified_equation: Some("FALSE".into()),
            ..SolveResult::default()
        })));
        assert_eq!(
            section(&view, "Simplified").expect("simplified").lines,
            vec!["FALSE", "1 = 2"]
        );
    }

    #[test]
    fn absent_fields_drop_lines_and_sections() {
        let view = render(Some(&ok_result(SolveResult {
            derivative: Some("2x".into()),
            max: Some("4".into()),
            expanded: Some("x^2 + 2x".into()),
            ..SolveResult::default()
        })));
        let titles: Vec<&str> = view.sections().iter().map(|s| s.title).collect();
        assert_eq!(titles, vec!["Derivative", "Maxima & Minima", "Factored & Expanded"]);
        assert_eq!(
            section(&view, "Maxima & Minima").expect("extrema").lines,
            vec![r"\max: 4"]
        );
        assert_eq!(
            section(&view, "Factored & Expanded").expect("factored").lines,
            vec!["x^2 + 2x"]
        );
    }

    #[test]
    fn graph_envelope_renders_single_graph_section() {
        let envelope = ResponseEnvelope {
            is_graph: true,
            status: 200,
            ok: true,
            content: EnvelopeContent::Image {
                image: ImageRef("blob:http://localhost/abc".into()),
            },
        };
        let view = render(Some(&envelope));
        match &view {
            View::Graph { section } => {
                assert_eq!(section.title, "Graph");
                assert_eq!(section.image.as_str(), "blob:http://localhost/abc");
            }
            other => panic!("expected graph view, got {other:?}"),
        }
        assert!(view.sections().is_empty());
    }

    #[test]
    fn copy_text_joins_lines_with_newlines() {
        let view = render(Some(&ok_result(full_result())));
        assert_eq!(
            section(&view, "Factored & Expanded").expect("factored").copy_text(),
            "x + 1\nx + 1"
        );
    }
}
