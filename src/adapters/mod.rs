pub mod api_handler;
pub mod chaos;
pub mod compiler;
pub mod fixture;
pub mod gemini;
pub mod health_handler;
pub mod metrics_handler;
pub mod prompt_builder;
pub mod registry;
pub mod sanitizer;
pub mod script_api;

#[cfg(test)]
mod compiler_test;
