use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{read_definition, ProcessorRef, Timeout};
use crate::error::DefinitionError;

/// One stage of a [`Sequence`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceStep {
    /// Processor entity or id of a registered processor
    pub processor: ProcessorRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Timeout>,
}

impl SequenceStep {
    pub fn new(processor: impl Into<ProcessorRef>) -> Self {
        Self {
            processor: processor.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: impl Into<Timeout>) -> Self {
        self.timeout = Some(timeout.into());
        self
    }
}

/// Ordered processor pipeline: the output of step `i` is the input of step
/// `i + 1`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sequence {
    #[serde(alias = "processors")]
    pub steps: Vec<SequenceStep>,
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step.
    pub fn step(mut self, step: SequenceStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Append a step addressing `processor` with no timeout.
    pub fn then(self, processor: impl Into<ProcessorRef>) -> Self {
        self.step(SequenceStep::new(processor))
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Load a sequence from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DefinitionError> {
        read_definition(path.as_ref())
    }
}

impl FromIterator<SequenceStep> for Sequence {
    fn from_iter<I: IntoIterator<Item = SequenceStep>>(iter: I) -> Self {
        Self {
            steps: iter.into_iter().collect(),
        }
    }
}
