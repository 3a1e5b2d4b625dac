//! N-Triples emission in the WikiPathways vocabulary.

use std::collections::HashSet;
use std::io::Write;

use log::{debug, info};

use crate::error::ConvertResult;
use crate::identity::{xref_iri, IriScheme, ParticipantCache};
use crate::interaction::{InteractionKind, Participant, ResolvedComplex, ResolvedInteraction};
use crate::model::Pathway;
use crate::resolve::Resolution;

const WP: &str = "http://vocabularies.wikipathways.org/wp#";
const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
const DC: &str = "http://purl.org/dc/elements/1.1/";
const DCTERMS: &str = "http://purl.org/dc/terms/";
const SKOS_COLLECTION: &str = "http://www.w3.org/2004/02/skos/core#Collection";
const FOAF_PAGE: &str = "http://xmlns.com/foaf/0.1/page";
const WIKIPATHWAYS_INSTANCE: &str = "http://www.wikipathways.org/instance";

fn wp(term: &str) -> String {
    format!("{WP}{term}")
}

fn dc(term: &str) -> String {
    format!("{DC}{term}")
}

fn dcterms(term: &str) -> String {
    format!("{DCTERMS}{term}")
}

/// Object position of a triple.
enum Object<'a> {
    Iri(&'a str),
    Literal(&'a str),
    LangLiteral(&'a str, &'a str),
}

/// Writes each distinct triple once.
struct TripleWriter<W: Write> {
    out: W,
    seen: HashSet<String>,
}

impl<W: Write> TripleWriter<W> {
    fn new(out: W) -> Self {
        Self {
            out,
            seen: HashSet::new(),
        }
    }

    fn triple(&mut self, subject: &str, predicate: &str, object: Object<'_>) -> ConvertResult<()> {
        let object = match object {
            Object::Iri(iri) => format!("<{}>", escape_iri(iri)),
            Object::Literal(value) => format!("\"{}\"", escape_literal(value)),
            Object::LangLiteral(value, lang) => format!("\"{}\"@{lang}", escape_literal(value)),
        };
        let line = format!("<{}> <{}> {object} .", escape_iri(subject), escape_iri(predicate));
        if self.seen.insert(line.clone()) {
            writeln!(self.out, "{line}")?;
        }
        Ok(())
    }

    fn iri(&mut self, subject: &str, predicate: &str, object: &str) -> ConvertResult<()> {
        self.triple(subject, predicate, Object::Iri(object))
    }

    fn literal(&mut self, subject: &str, predicate: &str, value: &str) -> ConvertResult<()> {
        self.triple(subject, predicate, Object::Literal(value))
    }

    fn typed(&mut self, subject: &str, classes: &[&str]) -> ConvertResult<()> {
        for class in classes {
            self.iri(subject, RDF_TYPE, &wp(class))?;
        }
        Ok(())
    }

    fn finish(mut self) -> ConvertResult<usize> {
        self.out.flush()?;
        Ok(self.seen.len())
    }
}

fn escape_literal(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Percent-encode the characters N-Triples forbids inside an IRI reference.
fn escape_iri(iri: &str) -> String {
    let mut escaped = String::with_capacity(iri.len());
    for c in iri.chars() {
        match c {
            '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\' | ' ' => {
                escaped.push_str(&format!("%{:02X}", c as u32))
            }
            c if c.is_control() => {
                let mut buf = [0u8; 4];
                for byte in c.encode_utf8(&mut buf).bytes() {
                    escaped.push_str(&format!("%{byte:02X}"));
                }
            }
            c => escaped.push(c),
        }
    }
    escaped
}

fn clean_label(label: &str) -> String {
    label.replace('\n', " ").trim().to_string()
}

/// Per-type class for a data node, if the vocabulary has one.
fn node_class(node_type: &str) -> Option<&'static str> {
    match node_type {
        "GeneProduct" => Some("GeneProduct"),
        "Protein" => Some("Protein"),
        "Metabolite" => Some("Metabolite"),
        "Rna" => Some("Rna"),
        "Pathway" => Some("Pathway"),
        "Complex" => Some("Complex"),
        _ => None,
    }
}

struct Emitter<'a, W: Write> {
    writer: TripleWriter<W>,
    pathway: &'a Pathway,
    cache: &'a ParticipantCache,
    resolution: &'a Resolution,
    scheme: &'a IriScheme,
    pathway_iri: String,
}

impl<W: Write> Emitter<'_, W> {
    fn emit_pathway(&mut self) -> ConvertResult<()> {
        let subject = self.pathway_iri.clone();
        let id = self.scheme.pathway_id().to_string();
        self.writer.typed(&subject, &["Pathway"])?;
        self.writer.iri(&subject, RDF_TYPE, SKOS_COLLECTION)?;
        self.writer
            .iri(&subject, &dc("identifier"), &self.scheme.pathway_identifier())?;
        self.writer.literal(&subject, &dc("source"), "WikiPathways")?;
        self.writer.literal(&subject, &dcterms("identifier"), &id)?;
        self.writer.triple(
            &subject,
            &dc("title"),
            Object::LangLiteral(&self.pathway.title, "en"),
        )?;
        if let Some(description) = &self.pathway.description {
            self.writer
                .literal(&subject, &dcterms("description"), description)?;
        }
        if let Some(organism) = &self.pathway.organism {
            self.writer.literal(&subject, &wp("organismName"), organism)?;
        }
        self.writer
            .iri(&subject, &wp("isAbout"), &self.scheme.gpml_pathway())?;
        let page = format!(
            "{WIKIPATHWAYS_INSTANCE}/{}",
            self.scheme.pathway().rsplit('/').next().unwrap_or(&id)
        );
        self.writer.iri(&subject, FOAF_PAGE, &page)
    }

    fn emit_data_nodes(&mut self) -> ConvertResult<()> {
        let pathway = self.pathway;
        for node in pathway.data_nodes() {
            let (Some(identity), Some(xref)) = (self.cache.get(&node.id), node.xref.as_ref()) else {
                continue;
            };
            let subject = identity.iri();
            self.writer.iri(subject, &dc("identifier"), subject)?;
            self.writer.literal(subject, &dc("source"), &xref.data_source)?;
            self.writer
                .literal(subject, &dcterms("identifier"), &xref.identifier)?;
            self.writer.typed(subject, &["DataNode"])?;
            if let Some(class) = node_class(&node.node_type) {
                self.writer.typed(subject, &[class])?;
            }
            self.writer
                .iri(subject, &wp("isAbout"), &self.scheme.gpml_data_node(&node.id))?;
            self.writer
                .literal(subject, RDFS_LABEL, &clean_label(&node.label))?;
        }
        Ok(())
    }

    /// IRI a participant is published under, if it has one.
    fn participant_iri(&self, participant: &Participant) -> Option<String> {
        match participant {
            Participant::Node { identity, .. } => Some(identity.iri().to_string()),
            Participant::Group { element_id } => {
                let complex = self.resolution.complex(element_id);
                if complex.is_none() {
                    debug!(group_id = element_id; "Group participant has no complex identity, omitted");
                }
                complex.map(|complex| complex.identity.iri().to_string())
            }
            Participant::Interaction { element_id } => {
                let emitted = self
                    .resolution
                    .interaction(element_id)
                    .filter(|interaction| !matches!(interaction.kind, InteractionKind::Unsupported(_)));
                if emitted.is_none() {
                    debug!(line_id = element_id; "Target interaction was not emitted, omitted");
                }
                emitted.map(|interaction| self.scheme.interaction(&interaction.id))
            }
        }
    }

    fn emit_interaction(&mut self, interaction: &ResolvedInteraction) -> ConvertResult<()> {
        let classes: &[&str] = match &interaction.kind {
            InteractionKind::Catalysis => &["Interaction", "DirectedInteraction", "Catalysis"],
            InteractionKind::Directed => &["Interaction", "DirectedInteraction"],
            InteractionKind::Undirected => &["Interaction"],
            InteractionKind::Unsupported(arrow) => {
                debug!(line_id = interaction.id, arrow:% = arrow; "Interaction type is not published");
                return Ok(());
            }
        };

        let subject = self.scheme.interaction(&interaction.id);
        self.writer.typed(&subject, classes)?;
        self.writer
            .iri(&subject, &dcterms("isPartOf"), &self.pathway_iri)?;
        self.writer.iri(
            &subject,
            &wp("isAbout"),
            &self.scheme.gpml_interaction(&interaction.id),
        )?;

        let roles = [
            (Some("source"), &interaction.sources),
            (Some("target"), &interaction.targets),
            (None, &interaction.others),
        ];
        for (role, participants) in roles {
            for participant in participants {
                let Some(object) = self.participant_iri(participant) else {
                    continue;
                };
                if let Some(role) = role {
                    self.writer.iri(&subject, &wp(role), &object)?;
                }
                self.writer.iri(&subject, &wp("participants"), &object)?;
                self.writer.iri(&object, &dcterms("isPartOf"), &subject)?;
            }
        }
        Ok(())
    }

    fn emit_complex(&mut self, complex: &ResolvedComplex) -> ConvertResult<()> {
        let subject = complex.identity.iri();
        let group = self.scheme.gpml_group(&complex.group_id);
        let pathway_iri = self.pathway_iri.clone();

        self.writer.typed(subject, &["DataNode", "Complex"])?;
        self.writer.iri(subject, &wp("isAbout"), &group)?;
        self.writer.iri(subject, &dcterms("isPartOf"), &pathway_iri)?;
        for label in &complex.labels {
            self.writer.literal(subject, RDFS_LABEL, label)?;
        }

        let embedded_xref = complex
            .embedded_node
            .as_deref()
            .and_then(|id| self.pathway.data_nodes().iter().find(|node| node.id == id))
            .and_then(|node| node.xref.as_ref());
        if let Some(xref) = embedded_xref {
            if let Some(iri) = xref_iri(xref) {
                self.writer.iri(subject, &dc("identifier"), &iri)?;
                self.writer.literal(subject, &dc("source"), &xref.data_source)?;
                self.writer
                    .literal(subject, &dcterms("identifier"), &xref.identifier)?;
            }
        }

        let binding = self.scheme.complex_binding(&complex.group_id);
        self.writer
            .typed(&binding, &["Interaction", "Binding", "ComplexBinding"])?;
        self.writer.iri(&binding, &wp("participants"), subject)?;
        self.writer.iri(&binding, &wp("isAbout"), &group)?;
        self.writer.iri(&binding, &dcterms("isPartOf"), &pathway_iri)?;

        for member in &complex.binding.others {
            let Some(object) = self.participant_iri(member) else {
                continue;
            };
            self.writer.iri(subject, &wp("participants"), &object)?;
            self.writer.iri(&binding, &wp("participants"), &object)?;
            self.writer.iri(&object, &dcterms("isPartOf"), subject)?;
        }
        Ok(())
    }
}

/// Write the pathway, its data nodes, interactions and complexes as N-Triples.
///
/// Returns the number of distinct triples written.
pub fn write_ntriples<W: Write>(
    out: W,
    pathway: &Pathway,
    cache: &ParticipantCache,
    resolution: &Resolution,
    scheme: &IriScheme,
) -> ConvertResult<usize> {
    let mut emitter = Emitter {
        writer: TripleWriter::new(out),
        pathway,
        cache,
        resolution,
        scheme,
        pathway_iri: scheme.pathway(),
    };

    emitter.emit_pathway()?;
    emitter.emit_data_nodes()?;
    for interaction in resolution.interactions.values() {
        emitter.emit_interaction(interaction)?;
    }
    for complex in resolution.complexes.values() {
        emitter.emit_complex(complex)?;
    }

    let written = emitter.writer.finish()?;
    info!(triples = written, pathway_id = scheme.pathway_id(); "Wrote N-Triples");
    Ok(written)
}
