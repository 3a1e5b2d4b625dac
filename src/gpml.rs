//! GPML 2021 reader.

use log::{debug, warn};
use roxmltree::{Document, Node};

use crate::error::{ConvertError, ConvertResult};
use crate::model::{ArrowHead, DataNode, Group, GroupKind, Line, Pathway, Xref};

/// Parse a GPML document into a [`Pathway`].
///
/// Elements without an `elementId` cannot be referenced and are skipped. Duplicate
/// ids anywhere in the document are fatal.
pub fn parse_gpml(xml: &str) -> ConvertResult<Pathway> {
    let doc = Document::parse(xml)?;
    let root = doc.root_element();
    if !root.has_tag_name("Pathway") {
        return Err(ConvertError::MissingPathway(root.tag_name().name().to_string()));
    }

    let mut pathway = Pathway::new(root.attribute("title").unwrap_or_default());
    pathway.organism = non_blank(root.attribute("organism"));
    pathway.version = non_blank(root.attribute("version"));
    pathway.identifier = root
        .children()
        .find(|node| node.has_tag_name("Xref"))
        .and_then(|xref| non_blank(xref.attribute("identifier")));
    pathway.description = root
        .children()
        .find(|node| node.has_tag_name("Description"))
        .and_then(|description| non_blank(description.text()));

    for node in section(root, "DataNodes", "DataNode") {
        let Some(id) = element_id(&node) else {
            warn!(label = node.attribute("textLabel").unwrap_or_default(); "Skipping data node without elementId");
            continue;
        };
        let mut data_node = DataNode::new(
            id,
            node.attribute("textLabel").unwrap_or_default(),
            node.attribute("type").unwrap_or("Unknown"),
        );
        data_node.group_ref = non_blank(node.attribute("groupRef"));
        data_node.xref = parse_xref(&node);
        pathway.add_data_node(data_node)?;
    }

    for node in section(root, "Groups", "Group") {
        let Some(id) = element_id(&node) else {
            debug!("Skipping group without elementId");
            continue;
        };
        let mut group = Group::new(id, GroupKind::from_gpml(node.attribute("type")))
            .with_label(node.attribute("textLabel").unwrap_or_default());
        group.group_ref = non_blank(node.attribute("groupRef"));
        pathway.add_group(group)?;
    }

    for node in section(root, "Labels", "Label").chain(section(root, "Shapes", "Shape")) {
        if let Some(id) = element_id(&node) {
            pathway.add_decoration(id)?;
        }
    }

    for node in section(root, "Interactions", "Interaction") {
        match parse_line(&node) {
            Some(line) => pathway.add_line(line)?,
            None => warn!("Skipping interaction without elementId"),
        }
    }

    // Graphical lines only need to be addressable, anchors included.
    for node in section(root, "GraphicalLines", "GraphicalLine") {
        if let Some(line) = parse_line(&node) {
            pathway.add_decoration(line.id)?;
            for anchor in line.anchors {
                pathway.add_decoration(anchor.id)?;
            }
        }
    }

    debug!(
        title = pathway.title,
        data_nodes = pathway.data_nodes().len(),
        lines = pathway.lines().len(),
        groups = pathway.groups().len();
        "Parsed GPML"
    );
    Ok(pathway)
}

/// Children named `item` of the root's `container` child.
fn section<'a, 'input: 'a>(
    root: Node<'a, 'input>,
    container: &'static str,
    item: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    root.children()
        .filter(move |node| node.has_tag_name(container))
        .flat_map(|node| node.children())
        .filter(move |node| node.has_tag_name(item))
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn element_id(node: &Node) -> Option<String> {
    non_blank(node.attribute("elementId"))
}

fn parse_f64(value: Option<&str>) -> Option<f64> {
    value.and_then(|v| v.trim().parse::<f64>().ok())
}

fn parse_xref(node: &Node) -> Option<Xref> {
    let xref = node.children().find(|child| child.has_tag_name("Xref"))?;
    Some(Xref {
        identifier: xref.attribute("identifier").unwrap_or_default().trim().to_string(),
        data_source: xref.attribute("dataSource").unwrap_or_default().trim().to_string(),
    })
}

/// Endpoints come from the first and last waypoint; anchors from `Waypoints/Anchor`.
fn parse_line(node: &Node) -> Option<Line> {
    let mut line = Line::new(element_id(node)?);
    let Some(waypoints) = node.children().find(|child| child.has_tag_name("Waypoints")) else {
        return Some(line);
    };

    let points: Vec<Node> = waypoints
        .children()
        .filter(|child| child.has_tag_name("Point"))
        .collect();
    if let Some(start) = points.first() {
        line.start_ref = non_blank(start.attribute("elementRef"));
        line.start_arrow = ArrowHead::from_gpml(start.attribute("arrowHead"));
    }
    if let Some(end) = points.last().filter(|_| points.len() > 1) {
        line.end_ref = non_blank(end.attribute("elementRef"));
        line.end_arrow = ArrowHead::from_gpml(end.attribute("arrowHead"));
    }

    for anchor in waypoints.children().filter(|child| child.has_tag_name("Anchor")) {
        match element_id(&anchor) {
            Some(id) => {
                let position = parse_f64(anchor.attribute("position")).unwrap_or_default();
                line = line.with_anchor(id, position);
            }
            None => debug!(line_id = line.id; "Skipping anchor without elementId"),
        }
    }
    Some(line)
}
