use gpml_interactions::interaction::ParticipantSet;
use gpml_interactions::model::ArrowHead;
use gpml_interactions::{
    convert_gpml, Conversion, ConvertConfig, ConvertError, Diagnostic, DropReason, DropScope,
    InteractionKind, Participant,
};

fn gpml(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Pathway xmlns="http://pathvisio.org/GPML/2021" title="Integration" organism="Homo sapiens" version="1">
  <Xref identifier="WP100" dataSource="WikiPathways"/>
  <DataNodes>
    <DataNode elementId="a" textLabel="A" type="GeneProduct"><Xref identifier="1" dataSource="Entrez Gene"/></DataNode>
    <DataNode elementId="b" textLabel="B" type="GeneProduct"><Xref identifier="2" dataSource="Entrez Gene"/></DataNode>
    <DataNode elementId="c" textLabel="C" type="Metabolite"><Xref identifier="15422" dataSource="ChEBI"/></DataNode>
    <DataNode elementId="d" textLabel="D" type="Protein"><Xref identifier="P04637" dataSource="Uniprot-TrEMBL"/></DataNode>
    <DataNode elementId="m1" textLabel="M1" type="Protein" groupRef="cx"><Xref identifier="Q1" dataSource="Uniprot-TrEMBL"/></DataNode>
    <DataNode elementId="m2" textLabel="M2" type="Protein" groupRef="cx"><Xref identifier="Q2" dataSource="Uniprot-TrEMBL"/></DataNode>
    <DataNode elementId="s1" textLabel="S1" type="Protein" groupRef="single"><Xref identifier="Q3" dataSource="Uniprot-TrEMBL"/></DataNode>
  </DataNodes>
  <Interactions>
{body}
  </Interactions>
  <Groups>
    <Group elementId="cx" type="Complex" textLabel="M complex"/>
    <Group elementId="single" type="Complex"/>
  </Groups>
</Pathway>"#
    )
}

/// Drops other than the deliberately degenerate `single` complex.
fn line_drops(conversion: &Conversion) -> Vec<&Diagnostic> {
    conversion
        .diagnostics()
        .iter()
        .filter(|diagnostic| diagnostic.element_id != "single")
        .collect()
}

fn line(id: &str, start: &str, end: &str, end_arrow: Option<&str>, anchors: &[&str]) -> String {
    let arrow = end_arrow
        .map(|arrow| format!(r#" arrowHead="{arrow}""#))
        .unwrap_or_default();
    let anchors: String = anchors
        .iter()
        .map(|anchor| format!(r#"<Anchor elementId="{anchor}" position="0.5"/>"#))
        .collect();
    format!(
        r#"<Interaction elementId="{id}"><Waypoints><Point elementRef="{start}" x="0" y="0"/><Point elementRef="{end}"{arrow} x="1" y="1"/>{anchors}</Waypoints></Interaction>"#
    )
}

fn ids(participants: &ParticipantSet) -> Vec<&str> {
    participants.iter().map(Participant::element_id).collect()
}

#[test]
fn directed_line_round_trip() {
    let xml = gpml(&line("l1", "a", "b", Some("Directed"), &[]));
    let conversion = convert_gpml(&xml, &ConvertConfig::default()).unwrap();

    let interactions = &conversion.resolution.interactions;
    assert_eq!(interactions.len(), 1);
    assert_eq!(interactions[0].kind, InteractionKind::Directed);
    assert_eq!(ids(&interactions[0].sources), vec!["a"]);
    assert_eq!(ids(&interactions[0].targets), vec!["b"]);
    assert!(interactions[0].others.is_empty());
}

#[test]
fn anchored_undirected_lines_merge_into_one_interaction() {
    let body = [
        line("l1", "a", "b", None, &["x1"]),
        line("l2", "c", "x1", None, &["x2"]),
        line("l3", "d", "x2", None, &[]),
    ]
    .join("\n");
    let conversion = convert_gpml(&gpml(&body), &ConvertConfig::default()).unwrap();

    let interactions = &conversion.resolution.interactions;
    assert_eq!(interactions.len(), 1);
    assert_eq!(interactions[0].kind, InteractionKind::Undirected);
    assert_eq!(interactions[0].lines, vec!["l1", "l2", "l3"]);
    assert_eq!(ids(&interactions[0].others), vec!["a", "b", "c", "d"]);
    assert!(line_drops(&conversion).is_empty());
}

#[test]
fn result_does_not_depend_on_line_order() {
    let forward = [
        line("l1", "a", "b", Some("Directed"), &["x1"]),
        line("l2", "c", "x1", None, &[]),
    ];
    let reversed = [forward[1].clone(), forward[0].clone()];

    let first = convert_gpml(&gpml(&forward.join("\n")), &ConvertConfig::default()).unwrap();
    let second = convert_gpml(&gpml(&reversed.join("\n")), &ConvertConfig::default()).unwrap();

    assert_eq!(first.resolution.interactions, second.resolution.interactions);
    assert_eq!(first.resolution.interactions.len(), 1);
}

#[test]
fn directed_head_on_anchor_regulates_instead_of_merging() {
    let body = [
        line("l1", "a", "b", Some("Conversion"), &["x1"]),
        line("l2", "d", "x1", Some("Catalysis"), &[]),
    ]
    .join("\n");
    let conversion = convert_gpml(&gpml(&body), &ConvertConfig::default()).unwrap();
    let resolution = &conversion.resolution;

    let conversion_line = resolution.interaction("l1").unwrap();
    assert_eq!(
        conversion_line.kind,
        InteractionKind::Unsupported(ArrowHead::Conversion)
    );
    assert_eq!(conversion_line.regulators, vec!["l2"]);

    let catalysis = resolution.interaction("l2").unwrap();
    assert_eq!(catalysis.kind, InteractionKind::Catalysis);
    assert_eq!(ids(&catalysis.sources), vec!["d"]);
    assert_eq!(ids(&catalysis.targets), vec!["l1"]);
}

#[test]
fn regulating_a_continuation_targets_the_merged_interaction() {
    let body = [
        line("l3", "d", "x2", Some("Catalysis"), &[]),
        line("l1", "a", "b", Some("Directed"), &["x1"]),
        line("l2", "c", "x1", None, &["x2"]),
    ]
    .join("\n");
    let conversion = convert_gpml(&gpml(&body), &ConvertConfig::default()).unwrap();

    let catalysis = conversion.resolution.interaction("l3").unwrap();
    assert_eq!(ids(&catalysis.targets), vec!["l1"]);
    assert_eq!(conversion.resolution.interaction("l1").unwrap().lines, vec!["l1", "l2"]);

    let mut out = Vec::new();
    conversion.write_ntriples(&mut out).unwrap();
    let rdf = String::from_utf8(out).unwrap();
    assert!(rdf.contains(
        "<https://rdf.wikipathways.org/Pathway/WP100_r1/WP/Interaction/l3> \
         <http://vocabularies.wikipathways.org/wp#target> \
         <https://rdf.wikipathways.org/Pathway/WP100_r1/WP/Interaction/l1> ."
    ));
}

#[test]
fn conflicting_arrowheads_are_reported_as_ambiguous() {
    let body = [
        line("l1", "a", "b", Some("Directed"), &["x1"]),
        line("l2", "x1", "c", Some("Inhibition"), &[]),
    ]
    .join("\n");
    let conversion = convert_gpml(&gpml(&body), &ConvertConfig::default()).unwrap();

    assert!(conversion.resolution.interactions.is_empty());
    let diagnostics = line_drops(&conversion);
    assert_eq!(diagnostics.len(), 1);
    assert!(matches!(
        diagnostics[0].reason,
        DropReason::AmbiguousInteractionType { .. }
    ));
}

#[test]
fn dangling_start_drops_the_line() {
    let xml = gpml(&line("l1", "nowhere", "b", Some("Directed"), &[]));
    let conversion = convert_gpml(&xml, &ConvertConfig::default()).unwrap();

    assert!(conversion.resolution.interactions.is_empty());
    let diagnostic = line_drops(&conversion)[0];
    assert_eq!(diagnostic.element_id, "l1");
    assert_eq!(diagnostic.scope, DropScope::Element);
    assert_eq!(
        diagnostic.reason,
        DropReason::DanglingReference {
            reference: "nowhere".to_string()
        }
    );
}

#[test]
fn complexes_need_two_resolved_members() {
    let conversion = convert_gpml(&gpml(""), &ConvertConfig::default()).unwrap();
    let resolution = &conversion.resolution;

    assert_eq!(resolution.complexes.len(), 1);
    let complex = resolution.complex("cx").unwrap();
    assert_eq!(complex.labels, vec!["M complex"]);
    assert_eq!(ids(&complex.binding.others), vec!["m1", "m2"]);
    assert_eq!(complex.binding.others, complex.members);

    assert!(resolution.complex("single").is_none());
    assert!(conversion.diagnostics().iter().any(|diagnostic| {
        diagnostic.element_id == "single"
            && diagnostic.reason == DropReason::DegenerateComplex { resolved: 1 }
    }));
}

#[test]
fn line_to_a_complex_publishes_the_complex_identity() {
    let xml = gpml(&line("l1", "a", "cx", Some("Directed"), &[]));
    let conversion = convert_gpml(&xml, &ConvertConfig::default()).unwrap();

    let mut out = Vec::new();
    conversion.write_ntriples(&mut out).unwrap();
    let rdf = String::from_utf8(out).unwrap();

    assert!(rdf.contains(
        "<https://rdf.wikipathways.org/Pathway/WP100_r1/WP/Interaction/l1> \
         <http://vocabularies.wikipathways.org/wp#target> \
         <https://rdf.wikipathways.org/Pathway/WP100_r1/Complex/cx> ."
    ));
}

#[test]
fn malformed_documents_are_fatal() {
    assert!(matches!(
        convert_gpml("<Pathway>", &ConvertConfig::default()),
        Err(ConvertError::Xml(_))
    ));
    assert!(matches!(
        convert_gpml("<Diagram/>", &ConvertConfig::default()),
        Err(ConvertError::MissingPathway(_))
    ));
}
