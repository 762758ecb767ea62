use crate::config::HarnessConfig;
use crate::error::HarnessError;
use crate::fixture::{Provisioner, SeededUser};
use crate::readiness;
use crate::report::RunReport;
use crate::verifier::{scenarios, Scenario, Verifier};

/// What a run does besides verification
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Drop, recreate, migrate and seed the database first
    pub provision: bool,
    /// Probe the service before the first scenario (also needs
    /// `readiness.enabled`)
    pub readiness: bool,
    /// Scenario names; empty falls back to `verifier.scenarios`, then to all
    pub scenarios: Vec<String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            provision: true,
            readiness: true,
            scenarios: Vec::new(),
        }
    }
}

/// Provisioner and verifier wired to one configuration
pub struct Harness {
    config: HarnessConfig,
}

impl Harness {
    pub fn new(config: HarnessConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub async fn provision(&self) -> Result<SeededUser, HarnessError> {
        let provisioner = Provisioner::from_config(&self.config.database)?;

        Ok(provisioner.provision().await?)
    }

    /// Resolves scenario names against the catalogue
    pub fn scenarios(&self, names: &[String]) -> Result<Vec<Box<dyn Scenario>>, HarnessError> {
        let names = if names.is_empty() {
            self.config.verifier.scenarios.as_slice()
        } else {
            names
        };

        scenarios::select(names).map_err(HarnessError::UnknownScenario)
    }

    /// Readiness probe (when enabled) followed by the selected scenarios
    pub async fn verify(&self, names: &[String], readiness: bool) -> Result<RunReport, HarnessError> {
        let scenarios = self.scenarios(names)?;

        self.verify_scenarios(&scenarios, readiness).await
    }

    /// Full run: provisioning, readiness probe, verification
    ///
    /// Scenario names are resolved before anything touches the database, so a
    /// typo never costs a provisioning cycle.
    #[tracing::instrument(skip_all, fields(provision = options.provision, readiness = options.readiness))]
    pub async fn run(&self, options: &RunOptions) -> Result<RunReport, HarnessError> {
        let scenarios = self.scenarios(&options.scenarios)?;

        if options.provision {
            let user = self.provision().await?;
            tracing::info!(email = %user.email, "fixture ready");
        }

        self.verify_scenarios(&scenarios, options.readiness).await
    }

    async fn verify_scenarios(
        &self,
        scenarios: &[Box<dyn Scenario>],
        readiness: bool,
    ) -> Result<RunReport, HarnessError> {
        let verifier = Verifier::from_config(&self.config);

        if readiness && self.config.readiness.enabled {
            readiness::wait_until_ready(verifier.client(), &self.config.readiness).await?;
        }

        Ok(verifier.run(scenarios).await)
    }
}
