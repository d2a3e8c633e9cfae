// Library target shared by the binary, integration tests and benchmarks.
// main.rs only wires the terminal, config and logging around `app::App`.

pub mod app;
pub mod config;
pub mod editor;
pub mod event;
pub mod input;
pub mod model;
pub mod store;
pub mod table;
pub mod ui;
pub mod view;
