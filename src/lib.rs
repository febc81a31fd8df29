pub mod my_err;
pub mod utils;
pub mod img;
pub mod filter;
pub mod display;
pub mod processing;
pub mod subwindow;
pub mod project;
pub mod my_ui;

#[macro_use]
extern crate rust_embed;
