pub mod app;
pub mod event;
pub mod input;
pub mod markup;
pub mod render;
pub mod runtime;
pub mod text_input;
pub mod theme;

pub use runtime::run;
