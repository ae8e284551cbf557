pub mod app;
pub mod core;
pub mod discovery;
pub mod extract;
pub mod pipeline;
pub mod reporter;
pub mod scanner;
