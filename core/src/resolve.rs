use tracing::debug;

use crate::error::{ConfigError, NotImplementedError, ResolveError};
use crate::learner::{BaseLearnerChoice, Budget, LearnerChoice, TaskMapping};

/// Everything needed to compose one engine invocation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExperimentConfig {
    learner: LearnerChoice,
    base_learner: BaseLearnerChoice,
    budget: Budget,
}

impl ExperimentConfig {
    /// Assemble a config without validation. Prefer [`resolve`].
    pub fn from_parts(learner: LearnerChoice, base_learner: BaseLearnerChoice, budget: Budget) -> Self {
        Self {
            learner,
            base_learner,
            budget,
        }
    }

    pub fn learner(&self) -> LearnerChoice {
        self.learner
    }

    pub fn base_learner(&self) -> BaseLearnerChoice {
        self.base_learner
    }

    pub fn budget(&self) -> &Budget {
        &self.budget
    }
}

/// Map user-facing option values to an [`ExperimentConfig`].
///
/// Fails on the first unusable field; a config is only returned when the
/// learner has an engine task, the base learner is known, and a budget was
/// given.
pub fn resolve(learner: &str, base_learner: &str, budget: &str) -> Result<ExperimentConfig, ResolveError> {
    let learner = resolve_learner(learner)?;
    let base_learner = resolve_base_learner(base_learner)?;

    if budget.is_empty() {
        return Err(ConfigError::MissingBudget.into());
    }

    let config = ExperimentConfig::from_parts(learner, base_learner, Budget::new(budget));
    debug!(
        learner = %config.learner,
        base_learner = %config.base_learner,
        budget = %config.budget,
        "resolved experiment config"
    );
    Ok(config)
}

fn resolve_learner(value: &str) -> Result<LearnerChoice, ResolveError> {
    if value.is_empty() {
        return Err(ConfigError::MissingValue {
            field: "learner",
            accepted: LearnerChoice::accepted_names(),
        }
        .into());
    }

    let learner = LearnerChoice::from_name(value).ok_or_else(|| ConfigError::UnknownLearner {
        name: value.to_string(),
        accepted: LearnerChoice::accepted_names(),
    })?;

    match learner.mapping() {
        TaskMapping::Implemented { .. } => Ok(learner),
        TaskMapping::Unimplemented => Err(NotImplementedError {
            learner: learner.name(),
        }
        .into()),
    }
}

fn resolve_base_learner(value: &str) -> Result<BaseLearnerChoice, ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::MissingValue {
            field: "base learner",
            accepted: BaseLearnerChoice::accepted_names(),
        });
    }

    BaseLearnerChoice::from_name(value).ok_or_else(|| ConfigError::UnknownBaseLearner {
        name: value.to_string(),
        accepted: BaseLearnerChoice::accepted_names(),
    })
}
