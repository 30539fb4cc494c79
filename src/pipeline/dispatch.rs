//! The format dispatcher: a small state machine that walks a conversion from
//! header validation to completion.
//!
//! ```text
//! Start -> VersionChecked -> DriverIdentified -> LogicPipeline  -> MetadataEmitted -> Complete
//!                                            \-> AnalogPipeline -/
//! ```
//!
//! `Failed` is absorbing and reachable from every non-terminal state. Any other
//! move is rejected with `ConvertError::InvalidTransition`.

use serde::Serialize;
use std::fmt;

use crate::error::{ConvertError, Result};
use crate::header::{self, DriverKind, HeaderDocument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionState {
    Start,
    VersionChecked,
    DriverIdentified,
    LogicPipeline,
    AnalogPipeline,
    MetadataEmitted,
    Complete,
    Failed,
}

impl ConversionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, ConversionState::Complete | ConversionState::Failed)
    }

    fn can_advance_to(self, next: ConversionState) -> bool {
        use ConversionState::*;
        match (self, next) {
            (from, Failed) => !from.is_terminal(),
            (Start, VersionChecked)
            | (VersionChecked, DriverIdentified)
            | (DriverIdentified, LogicPipeline)
            | (DriverIdentified, AnalogPipeline)
            | (LogicPipeline, MetadataEmitted)
            | (AnalogPipeline, MetadataEmitted)
            | (MetadataEmitted, Complete) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ConversionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Which data pipeline the dispatcher selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineKind {
    Logic,
    Analog,
}

#[derive(Debug)]
pub struct Dispatcher {
    state: ConversionState,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            state: ConversionState::Start,
        }
    }

    pub fn state(&self) -> ConversionState {
        self.state
    }

    fn advance(&mut self, next: ConversionState) -> Result<()> {
        if !self.state.can_advance_to(next) {
            return Err(ConvertError::InvalidTransition {
                from: self.state.to_string(),
                to: next.to_string(),
            });
        }
        log::debug!("conversion state: {} -> {}", self.state, next);
        self.state = next;
        Ok(())
    }

    /// Runs `step`; on error the dispatcher moves to `Failed` and the error is returned.
    fn guarded<T>(&mut self, step: impl FnOnce() -> Result<T>) -> Result<T> {
        step().map_err(|e| {
            self.fail();
            e
        })
    }

    /// Moves to `Failed`. A no-op once a terminal state has been reached.
    pub fn fail(&mut self) {
        if !self.state.is_terminal() {
            log::debug!("conversion state: {} -> {}", self.state, ConversionState::Failed);
            self.state = ConversionState::Failed;
        }
    }

    pub fn check_version(&mut self, doc: &HeaderDocument) -> Result<u32> {
        let version = self.guarded(|| header::check_version(doc))?;
        self.advance(ConversionState::VersionChecked)?;
        Ok(version)
    }

    pub fn identify_driver(&mut self, doc: &HeaderDocument) -> Result<DriverKind> {
        if self.state != ConversionState::VersionChecked {
            return Err(ConvertError::InvalidTransition {
                from: self.state.to_string(),
                to: ConversionState::DriverIdentified.to_string(),
            });
        }
        let kind = self.guarded(|| header::identify_driver(doc))?;
        self.advance(ConversionState::DriverIdentified)?;
        Ok(kind)
    }

    pub fn select_pipeline(&mut self, kind: DriverKind) -> Result<PipelineKind> {
        let (pipeline, state) = if kind.is_analog() {
            (PipelineKind::Analog, ConversionState::AnalogPipeline)
        } else {
            (PipelineKind::Logic, ConversionState::LogicPipeline)
        };
        self.advance(state)?;
        Ok(pipeline)
    }

    pub fn metadata_emitted(&mut self) -> Result<()> {
        self.advance(ConversionState::MetadataEmitted)
    }

    pub fn complete(&mut self) -> Result<()> {
        self.advance(ConversionState::Complete)
    }
}
