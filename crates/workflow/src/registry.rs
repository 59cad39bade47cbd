//! Step registry: the fixed table from step id to step.
//!
//! Built once at startup from an explicit list and read-only afterwards, so
//! it is shared between concurrent runs behind an `Arc` without locking.

use std::collections::HashMap;
use std::sync::Arc;

use pipeline::{RegistryError, Step, StepDescriptor, StepId};

use crate::steps::BuiltinStep;

struct Entry {
    descriptor: StepDescriptor,
    step: Arc<dyn Step>,
}

/// A step resolved from the registry, with the descriptor it was registered under.
#[derive(Clone, Copy)]
pub struct ResolvedStep<'a> {
    pub descriptor: &'a StepDescriptor,
    pub step: &'a dyn Step,
}

/// Ordered mapping from [`StepId`] to [`Step`].
pub struct StepRegistry {
    entries: Vec<Entry>,
    index: HashMap<StepId, usize>,
}

impl StepRegistry {
    /// Builds a registry from `steps`, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateStep`] if two steps share an id.
    pub fn new(steps: Vec<Arc<dyn Step>>) -> Result<Self, RegistryError> {
        let mut entries = Vec::with_capacity(steps.len());
        let mut index = HashMap::with_capacity(steps.len());

        for step in steps {
            let descriptor = step.descriptor();
            if index.contains_key(&descriptor.id) {
                return Err(RegistryError::DuplicateStep {
                    step_id: descriptor.id,
                });
            }
            index.insert(descriptor.id.clone(), entries.len());
            entries.push(Entry { descriptor, step });
        }

        Ok(Self { entries, index })
    }

    /// The registry of every [`BuiltinStep`], in [`BuiltinStep::ALL`] order.
    pub fn builtin() -> Self {
        let steps = BuiltinStep::ALL
            .map(|step| Arc::new(step) as Arc<dyn Step>)
            .to_vec();
        match Self::new(steps) {
            Ok(registry) => registry,
            Err(err) => unreachable!("built-in step ids are unique: {err}"),
        }
    }

    /// Step descriptors in registration order.
    pub fn list(&self) -> Vec<&StepDescriptor> {
        self.entries.iter().map(|e| &e.descriptor).collect()
    }

    /// Registered ids in registration order.
    pub fn ids(&self) -> Vec<&StepId> {
        self.entries.iter().map(|e| &e.descriptor.id).collect()
    }

    /// Looks up a step; `None` when `id` is not registered.
    pub fn resolve(&self, id: &str) -> Option<ResolvedStep<'_>> {
        self.index.get(id).map(|&i| {
            let entry = &self.entries[i];
            ResolvedStep {
                descriptor: &entry.descriptor,
                step: entry.step.as_ref(),
            }
        })
    }
}

impl std::fmt::Debug for StepRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.ids()).finish()
    }
}
