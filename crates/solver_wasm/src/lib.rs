//! Browser front end for the Math Solver.
//!
//! `solver_core` owns the form state, dispatch rules and view model; this crate supplies the
//! pieces that need a browser: the `fetch` transport, DOM construction, KaTeX and clipboard
//! bindings, timers and a console logger.

mod app;
mod bindings;
mod dom;
mod form_view;
mod logger;
mod output_view;
mod transport;

pub use app::WasmSolverApp;
pub use transport::FetchTransport;

#[cfg(all(test, target_arch = "wasm32"))]
wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);
