//! Signal document model and loaders
//!
//! A `Document` is the structured input of the pipeline: constant declarations
//! and signals with their sample points, in document order. Constant values and
//! time expressions are kept as raw text and only resolved by the pipeline.

pub mod xml;

use crate::types::LogicState;

pub use xml::{load_document, parse_document};

/// A parsed signal document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    /// Constant declarations, in declaration order (duplicates included)
    pub constants: Vec<ConstantDecl>,
    /// Signals, in document order
    pub signals: Vec<SignalDecl>,
}

/// A `<Constant name=".." value=".."/>` declaration
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantDecl {
    pub name: String,
    /// Raw numeric literal, optionally suffixed with `ms`
    pub value: String,
}

/// A `<Signal>` node
#[derive(Debug, Clone, PartialEq)]
pub struct SignalDecl {
    pub name: String,
    /// Signal-level remark (tooltip text)
    pub remark: Option<String>,
    pub samples: Vec<SampleDecl>,
}

/// A `<SamplePoint>` node
#[derive(Debug, Clone, PartialEq)]
pub struct SampleDecl {
    /// Symbolic time expression, e.g. `t1+5ms`
    pub time: String,
    pub logic: LogicState,
    pub remark: Option<String>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: declare a constant
    pub fn with_constant(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.constants.push(ConstantDecl {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Builder method: add a signal
    pub fn with_signal(mut self, signal: SignalDecl) -> Self {
        self.signals.push(signal);
        self
    }

    /// Total number of sample points across all signals
    pub fn num_samples(&self) -> usize {
        self.signals.iter().map(|s| s.samples.len()).sum()
    }
}

impl SignalDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            remark: None,
            samples: Vec::new(),
        }
    }

    /// Builder method: set the signal remark
    pub fn with_remark(mut self, remark: impl Into<String>) -> Self {
        self.remark = Some(remark.into());
        self
    }

    /// Builder method: append a sample point without a remark
    pub fn with_sample(self, time: impl Into<String>, logic: LogicState) -> Self {
        self.with_sample_decl(SampleDecl {
            time: time.into(),
            logic,
            remark: None,
        })
    }

    /// Builder method: append a sample point with a remark
    pub fn with_remarked_sample(
        self,
        time: impl Into<String>,
        logic: LogicState,
        remark: impl Into<String>,
    ) -> Self {
        self.with_sample_decl(SampleDecl {
            time: time.into(),
            logic,
            remark: Some(remark.into()),
        })
    }

    pub fn with_sample_decl(mut self, sample: SampleDecl) -> Self {
        self.samples.push(sample);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_builder() {
        let doc = Document::new()
            .with_constant("t1", "10ms")
            .with_signal(
                SignalDecl::new("CLK")
                    .with_remark("clock")
                    .with_sample("0ms", LogicState::False)
                    .with_remarked_sample("t1", LogicState::True, "rise"),
            )
            .with_signal(SignalDecl::new("EN"));

        assert_eq!(doc.constants.len(), 1);
        assert_eq!(doc.signals.len(), 2);
        assert_eq!(doc.num_samples(), 2);
        assert_eq!(doc.signals[0].remark.as_deref(), Some("clock"));
        assert_eq!(doc.signals[0].samples[1].remark.as_deref(), Some("rise"));
    }
}
