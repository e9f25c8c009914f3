use secrecy::SecretString;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::adapters::compiler::{CompiledGenerator, GeneratorCompiler};
use crate::adapters::prompt_builder::PromptBuilder;
use crate::adapters::registry::SimulationRegistry;
use crate::adapters::sanitizer;
use crate::domain::{MirageError, ModelInvoker, DEFAULT_SIMULATION_KEY};

/// Progress of a single deploy request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployStage {
    Received,
    PromptBuilt,
    ModelInvoked,
    Sanitized,
    CompileSucceeded,
    CompileFailed,
}

impl fmt::Display for DeployStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeployStage::Received => "received",
            DeployStage::PromptBuilt => "prompt_built",
            DeployStage::ModelInvoked => "model_invoked",
            DeployStage::Sanitized => "sanitized",
            DeployStage::CompileSucceeded => "compile_succeeded",
            DeployStage::CompileFailed => "compile_failed",
        };
        f.write_str(name)
    }
}

/// Turns a schema into a registered generator:
/// prompt, model call, sanitize, compile, store.
pub struct DeployService {
    prompt_builder: PromptBuilder,
    invoker: Arc<dyn ModelInvoker>,
    compiler: GeneratorCompiler,
    registry: SimulationRegistry,
}

impl DeployService {
    pub fn new(
        prompt_builder: PromptBuilder,
        invoker: Arc<dyn ModelInvoker>,
        compiler: GeneratorCompiler,
        registry: SimulationRegistry,
    ) -> Self {
        Self {
            prompt_builder,
            invoker,
            compiler,
            registry,
        }
    }

    pub fn registry(&self) -> &SimulationRegistry {
        &self.registry
    }

    /// Deploys into the default simulation slot.
    ///
    /// The registry is only written once compilation succeeds.
    pub async fn deploy(
        &self,
        api_key: Option<String>,
        schema: Option<String>,
    ) -> Result<Arc<CompiledGenerator>, MirageError> {
        trace_stage(DeployStage::Received);

        let credential = api_key
            .filter(|key| !key.trim().is_empty())
            .map(SecretString::from)
            .ok_or(MirageError::CredentialMissing)?;
        let schema = schema.unwrap_or_default();

        let prompt = self.prompt_builder.build(&schema)?;
        trace_stage(DeployStage::PromptBuilt);

        let reply = self.invoker.invoke(&credential, &prompt).await;
        trace_stage(DeployStage::ModelInvoked);

        let fragment = sanitizer::sanitize(&reply);
        trace_stage(DeployStage::Sanitized);

        let generator = match self.compiler.compile(&fragment) {
            Ok(generator) => Arc::new(generator),
            Err(e) => {
                trace_stage(DeployStage::CompileFailed);
                warn!("Deploy rejected: {}", e);
                return Err(e);
            }
        };
        trace_stage(DeployStage::CompileSucceeded);

        self.registry
            .set(DEFAULT_SIMULATION_KEY, generator.clone())
            .await;
        info!("Simulation '{}' deployed", DEFAULT_SIMULATION_KEY);

        Ok(generator)
    }
}

fn trace_stage(stage: DeployStage) {
    debug!(stage = %stage, "deploy stage");
}
