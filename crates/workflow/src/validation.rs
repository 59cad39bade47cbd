//! Request validation, applied before a run reaches the engine.
//!
//! Checks run in a fixed order and the first failure wins, so a request with
//! several problems always reports the same one.

use std::collections::HashSet;

use pipeline::StepId;
use thiserror::Error;

use crate::registry::StepRegistry;

pub const MIN_INPUT_CHARS: usize = 10;
pub const MAX_INPUT_CHARS: usize = 15_000;
pub const MIN_STEPS: usize = 2;
pub const MAX_STEPS: usize = 4;

/// Why a run request was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Input text cannot be empty.")]
    EmptyInput,

    #[error(
        "Input text is too short. Please provide at least {min} characters for meaningful processing."
    )]
    InputTooShort { min: usize },

    #[error("Input text exceeds maximum length of {max} characters.")]
    InputTooLong { max: usize },

    #[error("Please select between {min} and {max} workflow steps.")]
    StepCount { min: usize, max: usize },

    #[error("Unknown step: \"{step}\". Available steps: {}", available.join(", "))]
    UnknownStep { step: String, available: Vec<String> },

    #[error("Duplicate steps are not allowed.")]
    DuplicateSteps,
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowRequest {
    /// Input as supplied; the engine trims it before the first step.
    pub input_text: String,
    /// Known, distinct step ids in execution order.
    pub steps: Vec<StepId>,
}

/// Validates a raw run request against `registry`.
pub fn validate_request<S: AsRef<str>>(
    registry: &StepRegistry,
    input_text: &str,
    selected_steps: &[S],
) -> Result<WorkflowRequest, ValidationError> {
    let trimmed = input_text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyInput);
    }

    let length = trimmed.chars().count();
    if length < MIN_INPUT_CHARS {
        return Err(ValidationError::InputTooShort {
            min: MIN_INPUT_CHARS,
        });
    }
    if length > MAX_INPUT_CHARS {
        return Err(ValidationError::InputTooLong {
            max: MAX_INPUT_CHARS,
        });
    }

    if !(MIN_STEPS..=MAX_STEPS).contains(&selected_steps.len()) {
        return Err(ValidationError::StepCount {
            min: MIN_STEPS,
            max: MAX_STEPS,
        });
    }

    let mut steps = Vec::with_capacity(selected_steps.len());
    for raw in selected_steps {
        let raw = raw.as_ref();
        match registry.resolve(raw) {
            Some(resolved) => steps.push(resolved.descriptor.id.clone()),
            None => {
                return Err(ValidationError::UnknownStep {
                    step: raw.to_string(),
                    available: registry.ids().iter().map(|id| id.to_string()).collect(),
                })
            }
        }
    }

    let distinct: HashSet<&StepId> = steps.iter().collect();
    if distinct.len() != steps.len() {
        return Err(ValidationError::DuplicateSteps);
    }

    Ok(WorkflowRequest {
        input_text: input_text.to_string(),
        steps,
    })
}
