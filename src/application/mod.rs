//! Use cases wiring the adapters together

pub mod deploy;

pub use deploy::{DeployService, DeployStage};
