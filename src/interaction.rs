//! Resolved interaction and complex records handed to the emission layer.

use std::fmt;

use indexmap::IndexSet;

use crate::identity::ParticipantIdentity;
use crate::model::ArrowHead;

/// A diagram entity playing a role in an interaction.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Participant {
    /// A data node with a cached identity.
    Node {
        element_id: String,
        identity: ParticipantIdentity,
    },
    /// A group; published through its composite identity when it resolves as a complex.
    Group { element_id: String },
    /// Another interaction, named by its primary line id.
    Interaction { element_id: String },
}

impl Participant {
    pub fn element_id(&self) -> &str {
        match self {
            Self::Node { element_id, .. }
            | Self::Group { element_id }
            | Self::Interaction { element_id } => element_id,
        }
    }

    pub fn is_node(&self) -> bool {
        matches!(self, Self::Node { .. })
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node { element_id, identity } => write!(f, "{element_id} <{identity}>"),
            Self::Group { element_id } => write!(f, "group {element_id}"),
            Self::Interaction { element_id } => write!(f, "interaction {element_id}"),
        }
    }
}

/// Participants in discovery order, duplicates suppressed.
pub type ParticipantSet = IndexSet<Participant>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InteractionKind {
    Catalysis,
    Directed,
    Undirected,
    /// Any other reconciled arrowhead (conversion, inhibition, ...).
    Unsupported(ArrowHead),
}

impl InteractionKind {
    pub fn from_arrow(arrow: &ArrowHead) -> Self {
        match arrow {
            ArrowHead::Catalysis => Self::Catalysis,
            ArrowHead::Directed => Self::Directed,
            ArrowHead::Undirected => Self::Undirected,
            other => Self::Unsupported(other.clone()),
        }
    }

    pub fn is_undirected(&self) -> bool {
        matches!(self, Self::Undirected)
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Catalysis => f.write_str("catalysis"),
            Self::Directed => f.write_str("directed"),
            Self::Undirected => f.write_str("undirected"),
            Self::Unsupported(arrow) => write!(f, "unsupported ({arrow})"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedInteraction {
    /// Element id of the primary line (or of the group, for complex bindings).
    pub id: String,
    pub kind: InteractionKind,
    /// Ids of every line merged into this interaction, primary first.
    pub lines: Vec<String>,
    /// Lines that terminate on one of the merged anchors with a non-undirected head.
    pub regulators: Vec<String>,
    pub sources: ParticipantSet,
    pub targets: ParticipantSet,
    pub others: ParticipantSet,
}

impl ResolvedInteraction {
    pub fn new(id: impl Into<String>, kind: InteractionKind) -> Self {
        Self {
            id: id.into(),
            kind,
            lines: Vec::new(),
            regulators: Vec::new(),
            sources: ParticipantSet::new(),
            targets: ParticipantSet::new(),
            others: ParticipantSet::new(),
        }
    }

    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.sources
            .iter()
            .chain(self.targets.iter())
            .chain(self.others.iter())
    }
}

/// A complex group resolved into a composite identity and its binding interaction.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedComplex {
    pub group_id: String,
    /// The group's own label, then the embedded complex node's label when that node
    /// carries an identifier.
    pub labels: Vec<String>,
    pub identity: ParticipantIdentity,
    /// Member data node of type `Complex` describing the complex as a whole.
    pub embedded_node: Option<String>,
    pub members: ParticipantSet,
    pub binding: ResolvedInteraction,
}
