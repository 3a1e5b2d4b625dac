//! Diagnostics for diagram content that was skipped during resolution.

use std::fmt;

use log::warn;
use thiserror::Error;

use crate::model::{ArrowHead, Endpoint};

/// Why an element or endpoint was left out of the resolved graph.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum DropReason {
    #[error("reference '{reference}' does not resolve to any pathway element")]
    DanglingReference { reference: String },

    #[error("merged lines disagree on the interaction type ({})", join_arrows(.kinds))]
    AmbiguousInteractionType { kinds: Vec<ArrowHead> },

    #[error("no data node among the participants ({groups} group(s), {lines} interaction(s))")]
    UnsupportedParticipantShape { groups: usize, lines: usize },

    #[error("complex has {resolved} resolvable member(s), at least two are required")]
    DegenerateComplex { resolved: usize },

    #[error("line '{line}' did not resolve into an interaction")]
    UnresolvedInteraction { line: String },
}

fn join_arrows(kinds: &[ArrowHead]) -> String {
    kinds
        .iter()
        .map(ArrowHead::name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// What part of an element was dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropScope {
    /// The whole line or group.
    Element,
    /// One endpoint; the rest of the interaction was kept.
    Endpoint(Endpoint),
    /// One participant of a resolved interaction.
    Participant,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    pub element_id: String,
    pub scope: DropScope,
    pub reason: DropReason,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scope {
            DropScope::Element => write!(f, "{}: dropped, {}", self.element_id, self.reason),
            DropScope::Endpoint(endpoint) => write!(
                f,
                "{}: {} endpoint dropped, {}",
                self.element_id, endpoint, self.reason
            ),
            DropScope::Participant => {
                write!(f, "{}: participant dropped, {}", self.element_id, self.reason)
            }
        }
    }
}

/// Collects every drop so callers can inspect them after resolution.
#[derive(Debug, Default)]
pub struct Report {
    diagnostics: Vec<Diagnostic>,
}

impl Report {
    pub fn drop_element(&mut self, element_id: &str, reason: DropReason) {
        warn!(element_id, reason:% = reason; "Skipping element");
        self.diagnostics.push(Diagnostic {
            element_id: element_id.to_string(),
            scope: DropScope::Element,
            reason,
        });
    }

    pub fn drop_endpoint(&mut self, element_id: &str, endpoint: Endpoint, reason: DropReason) {
        warn!(element_id, endpoint:% = endpoint, reason:% = reason; "Skipping line endpoint");
        self.diagnostics.push(Diagnostic {
            element_id: element_id.to_string(),
            scope: DropScope::Endpoint(endpoint),
            reason,
        });
    }

    pub fn drop_participant(&mut self, interaction_id: &str, reason: DropReason) {
        warn!(interaction_id, reason:% = reason; "Skipping interaction participant");
        self.diagnostics.push(Diagnostic {
            element_id: interaction_id.to_string(),
            scope: DropScope::Participant,
            reason,
        });
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
