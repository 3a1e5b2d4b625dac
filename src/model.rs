use std::collections::HashMap;
use std::fmt;

use crate::error::{ConvertError, ConvertResult};

/// Semantic marker drawn at one end of a line.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ArrowHead {
    Undirected,
    Directed,
    Conversion,
    Catalysis,
    Inhibition,
    Stimulation,
    Binding,
    Cleavage,
    Translocation,
    TranscriptionTranslation,
    Other(String),
}

impl ArrowHead {
    /// Map a GPML `arrowHead` value (2021 or 2013 spelling) to an arrowhead kind.
    /// A missing or blank value is an undirected end.
    pub fn from_gpml(name: Option<&str>) -> Self {
        match name.map(str::trim).unwrap_or("") {
            "" | "Undirected" | "Line" => Self::Undirected,
            "Directed" | "Arrow" => Self::Directed,
            "Conversion" | "mim-conversion" => Self::Conversion,
            "Catalysis" | "mim-catalysis" => Self::Catalysis,
            "Inhibition" | "mim-inhibition" | "TBar" => Self::Inhibition,
            "Stimulation" | "mim-stimulation" => Self::Stimulation,
            "Binding" | "mim-binding" => Self::Binding,
            "Cleavage" | "mim-cleavage" => Self::Cleavage,
            "Translocation" | "mim-translocation" => Self::Translocation,
            "TranscriptionTranslation" | "mim-transcription-translation" => {
                Self::TranscriptionTranslation
            }
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_undirected(&self) -> bool {
        matches!(self, Self::Undirected)
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Undirected => "Undirected",
            Self::Directed => "Directed",
            Self::Conversion => "Conversion",
            Self::Catalysis => "Catalysis",
            Self::Inhibition => "Inhibition",
            Self::Stimulation => "Stimulation",
            Self::Binding => "Binding",
            Self::Cleavage => "Cleavage",
            Self::Translocation => "Translocation",
            Self::TranscriptionTranslation => "TranscriptionTranslation",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for ArrowHead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One of the two ends of a line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Start,
    End,
}

impl Endpoint {
    pub const BOTH: [Endpoint; 2] = [Endpoint::Start, Endpoint::End];
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::End => f.write_str("end"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Xref {
    pub identifier: String,
    pub data_source: String,
}

#[derive(Clone, Debug)]
pub struct DataNode {
    pub id: String,
    pub label: String,
    /// GPML node type, e.g. `GeneProduct`, `Metabolite`, `Complex`, `Unknown`.
    pub node_type: String,
    pub group_ref: Option<String>,
    pub xref: Option<Xref>,
}

impl DataNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            node_type: node_type.into(),
            group_ref: None,
            xref: None,
        }
    }

    pub fn with_xref(mut self, data_source: impl Into<String>, identifier: impl Into<String>) -> Self {
        self.xref = Some(Xref {
            identifier: identifier.into(),
            data_source: data_source.into(),
        });
        self
    }

    pub fn in_group(mut self, group_id: impl Into<String>) -> Self {
        self.group_ref = Some(group_id.into());
        self
    }

    pub fn is_complex(&self) -> bool {
        self.node_type == "Complex"
    }
}

/// A named point along a line that other lines may terminate on.
#[derive(Clone, Debug)]
pub struct Anchor {
    pub id: String,
    pub position: f64,
}

#[derive(Clone, Debug)]
pub struct Line {
    pub id: String,
    pub start_ref: Option<String>,
    pub end_ref: Option<String>,
    pub start_arrow: ArrowHead,
    pub end_arrow: ArrowHead,
    pub anchors: Vec<Anchor>,
}

impl Line {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            start_ref: None,
            end_ref: None,
            start_arrow: ArrowHead::Undirected,
            end_arrow: ArrowHead::Undirected,
            anchors: Vec::new(),
        }
    }

    pub fn from_ref(mut self, reference: impl Into<String>, arrow: ArrowHead) -> Self {
        self.start_ref = Some(reference.into());
        self.start_arrow = arrow;
        self
    }

    pub fn to_ref(mut self, reference: impl Into<String>, arrow: ArrowHead) -> Self {
        self.end_ref = Some(reference.into());
        self.end_arrow = arrow;
        self
    }

    pub fn with_anchor(mut self, id: impl Into<String>, position: f64) -> Self {
        self.anchors.push(Anchor {
            id: id.into(),
            position,
        });
        self
    }

    pub fn reference(&self, endpoint: Endpoint) -> Option<&str> {
        match endpoint {
            Endpoint::Start => self.start_ref.as_deref(),
            Endpoint::End => self.end_ref.as_deref(),
        }
        .filter(|reference| !reference.trim().is_empty())
    }

    pub fn arrow(&self, endpoint: Endpoint) -> &ArrowHead {
        match endpoint {
            Endpoint::Start => &self.start_arrow,
            Endpoint::End => &self.end_arrow,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GroupKind {
    Complex,
    Pathway,
    Group,
    Other(String),
}

impl GroupKind {
    pub fn from_gpml(name: Option<&str>) -> Self {
        match name.map(str::trim).unwrap_or("") {
            "Complex" => Self::Complex,
            "Pathway" => Self::Pathway,
            "" | "Group" | "None" => Self::Group,
            other => Self::Other(other.to_string()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Group {
    pub id: String,
    pub kind: GroupKind,
    pub label: String,
    pub group_ref: Option<String>,
}

impl Group {
    pub fn new(id: impl Into<String>, kind: GroupKind) -> Self {
        Self {
            id: id.into(),
            kind,
            label: String::new(),
            group_ref: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

/// What an element id refers to inside a pathway.
#[derive(Clone, Copy, Debug)]
pub enum Element<'p> {
    DataNode(&'p DataNode),
    Group(&'p Group),
    Line(&'p Line),
    Anchor(&'p Anchor),
    /// Labels, shapes and graphical lines: valid reference targets that never participate.
    Decoration,
}

#[derive(Clone, Copy, Debug)]
enum Slot {
    DataNode(usize),
    Group(usize),
    Line(usize),
    Anchor(usize, usize),
    Decoration,
}

/// A loaded pathway diagram, queryable by element id.
#[derive(Clone, Debug, Default)]
pub struct Pathway {
    pub title: String,
    pub organism: Option<String>,
    pub identifier: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    data_nodes: Vec<DataNode>,
    lines: Vec<Line>,
    groups: Vec<Group>,
    index: HashMap<String, Slot>,
}

impl Pathway {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn add_data_node(&mut self, node: DataNode) -> ConvertResult<()> {
        self.claim(&node.id, Slot::DataNode(self.data_nodes.len()))?;
        self.data_nodes.push(node);
        Ok(())
    }

    /// Add an interaction line; its anchors become addressable too.
    pub fn add_line(&mut self, line: Line) -> ConvertResult<()> {
        let mut ids: Vec<&str> = Vec::with_capacity(line.anchors.len() + 1);
        for id in std::iter::once(line.id.as_str()).chain(line.anchors.iter().map(|a| a.id.as_str())) {
            if self.index.contains_key(id) || ids.contains(&id) {
                return Err(ConvertError::DuplicateElementId(id.to_string()));
            }
            ids.push(id);
        }

        let position = self.lines.len();
        self.claim(&line.id, Slot::Line(position))?;
        for (anchor_position, anchor) in line.anchors.iter().enumerate() {
            self.claim(&anchor.id, Slot::Anchor(position, anchor_position))?;
        }
        self.lines.push(line);
        Ok(())
    }

    pub fn add_group(&mut self, group: Group) -> ConvertResult<()> {
        self.claim(&group.id, Slot::Group(self.groups.len()))?;
        self.groups.push(group);
        Ok(())
    }

    pub fn add_decoration(&mut self, id: impl Into<String>) -> ConvertResult<()> {
        self.claim(&id.into(), Slot::Decoration)
    }

    fn claim(&mut self, id: &str, slot: Slot) -> ConvertResult<()> {
        if self.index.contains_key(id) {
            return Err(ConvertError::DuplicateElementId(id.to_string()));
        }
        self.index.insert(id.to_string(), slot);
        Ok(())
    }

    pub fn lookup(&self, id: &str) -> Option<Element<'_>> {
        let element = match *self.index.get(id)? {
            Slot::DataNode(i) => Element::DataNode(&self.data_nodes[i]),
            Slot::Group(i) => Element::Group(&self.groups[i]),
            Slot::Line(i) => Element::Line(&self.lines[i]),
            Slot::Anchor(line, anchor) => Element::Anchor(&self.lines[line].anchors[anchor]),
            Slot::Decoration => Element::Decoration,
        };
        Some(element)
    }

    pub fn data_nodes(&self) -> &[DataNode] {
        &self.data_nodes
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn anchors_of<'a>(&self, line: &'a Line) -> &'a [Anchor] {
        &line.anchors
    }

    /// Data nodes that declare membership of `group_id`, in document order.
    pub fn group_members<'a>(&'a self, group_id: &'a str) -> impl Iterator<Item = &'a DataNode> + 'a {
        self.data_nodes
            .iter()
            .filter(move |node| node.group_ref.as_deref() == Some(group_id))
    }
}
