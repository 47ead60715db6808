//! Fluent construction of a [`MissionOrchestrator`].
//!
//! Everything is optional: configuration falls back to defaults, the sink to
//! [`TracingSink`], the runtime to the one the caller is running on, and the
//! navigation RNG to entropy.

pub mod error;

pub use error::BuildError;

use crate::config::RoverConfig;
use crate::logging::{LogSink, TracingSink};
use crate::orchestrator::MissionOrchestrator;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tokio::runtime::Handle;

/// Builder for [`MissionOrchestrator`].
#[derive(Default)]
pub struct OrchestratorBuilder {
    config: Option<RoverConfig>,
    sink: Option<Arc<dyn LogSink>>,
    runtime: Option<Handle>,
    seed: Option<u64>,
}

impl OrchestratorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: RoverConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Where domain log events go.
    pub fn sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Runtime that timer tasks are spawned on.
    pub fn runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Seed navigation progress for reproducible runs.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate the configuration and assemble the orchestrator.
    pub fn build(self) -> Result<MissionOrchestrator, BuildError> {
        let config = self.config.unwrap_or_default();
        config.ensure_valid()?;

        let runtime = match self.runtime {
            Some(handle) => handle,
            None => Handle::try_current().map_err(|_| BuildError::NoRuntime)?,
        };
        let sink = self.sink.unwrap_or_else(|| Arc::new(TracingSink));
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(MissionOrchestrator::from_parts(config, sink, runtime, rng))
    }
}
