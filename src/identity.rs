//! Participant identities, the cache that holds them, and node conversion.

use std::collections::HashMap;
use std::fmt;

use log::{debug, trace};

use crate::error::{ConvertError, ConvertResult};
use crate::model::{DataNode, Pathway, Xref};

const IDENTIFIERS_ORG: &str = "https://identifiers.org";

/// Resolved handle for a diagram entity: the IRI it is published under.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParticipantIdentity(String);

impl ParticipantIdentity {
    pub fn new(iri: impl Into<String>) -> Self {
        Self(iri.into())
    }

    pub fn iri(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Write-once map from element id to participant identity.
#[derive(Debug, Default)]
pub struct ParticipantCache {
    entries: HashMap<String, ParticipantIdentity>,
}

impl ParticipantCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, element_id: &str) -> Option<&ParticipantIdentity> {
        self.entries.get(element_id)
    }

    /// Cache the identity of `element_id`. Writing the same id twice is an error.
    pub fn put(&mut self, element_id: impl Into<String>, identity: ParticipantIdentity) -> ConvertResult<()> {
        let element_id = element_id.into();
        if self.entries.contains_key(&element_id) {
            return Err(ConvertError::ParticipantAlreadyCached(element_id));
        }
        self.entries.insert(element_id, identity);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// IRI layout for everything published about one pathway revision.
#[derive(Clone, Debug)]
pub struct IriScheme {
    base: String,
    pathway_id: String,
    revision: String,
}

impl IriScheme {
    pub fn new(base: &str, pathway_id: &str, revision: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
            pathway_id: pathway_id.trim().to_string(),
            revision: revision.trim().replace(' ', "_"),
        }
    }

    pub fn pathway_id(&self) -> &str {
        &self.pathway_id
    }

    fn revision_path(&self) -> String {
        format!("{}/Pathway/{}_r{}", self.base, self.pathway_id, self.revision)
    }

    pub fn pathway(&self) -> String {
        format!("{IDENTIFIERS_ORG}/wikipathways/{}_r{}", self.pathway_id, self.revision)
    }

    pub fn pathway_identifier(&self) -> String {
        format!("{IDENTIFIERS_ORG}/wikipathways/{}", self.pathway_id)
    }

    pub fn gpml_pathway(&self) -> String {
        self.revision_path()
    }

    pub fn interaction(&self, line_id: &str) -> String {
        format!("{}/WP/Interaction/{line_id}", self.revision_path())
    }

    pub fn gpml_interaction(&self, line_id: &str) -> String {
        format!("{}/Interaction/{line_id}", self.revision_path())
    }

    pub fn gpml_data_node(&self, node_id: &str) -> String {
        format!("{}/DataNode/{node_id}", self.revision_path())
    }

    pub fn gpml_group(&self, group_id: &str) -> String {
        format!("{}/Group/{group_id}", self.revision_path())
    }

    pub fn complex(&self, group_id: &str) -> String {
        format!("{}/Complex/{group_id}", self.revision_path())
    }

    pub fn complex_binding(&self, group_id: &str) -> String {
        format!("{}/ComplexBinding/{group_id}", self.revision_path())
    }
}

/// identifiers.org namespace for the GPML data source names we know about.
fn identifiers_namespace(data_source: &str) -> Option<&'static str> {
    let namespace = match data_source.trim().to_ascii_lowercase().as_str() {
        "entrez gene" | "ncbi gene" => "ncbigene",
        "ensembl" => "ensembl",
        "uniprot-trembl" | "uniprot-swissprot" | "uniprotkb" | "uniprot" => "uniprot",
        "hgnc" => "hgnc.symbol",
        "hgnc accession number" => "hgnc",
        "chebi" => "chebi",
        "hmdb" => "hmdb",
        "kegg compound" => "kegg.compound",
        "kegg genes" => "kegg.genes",
        "pubchem-compound" | "pubchem compound" => "pubchem.compound",
        "wikidata" => "wikidata",
        "chemspider" => "chemspider",
        "lipid maps" | "lipidmaps" => "lipidmaps",
        "cas" => "cas",
        "inchikey" => "inchikey",
        "refseq" => "refseq",
        "mirbase sequence" | "mirbase" => "mirbase",
        "reactome" => "reactome",
        "rhea" => "rhea",
        "complex portal" => "complexportal",
        "wikipathways" => "wikipathways",
        _ => return None,
    };
    Some(namespace)
}

/// Normalize identifiers that identifiers.org expects in a different shape.
fn normalized_identifier(namespace: &str, identifier: &str) -> String {
    let identifier = identifier.trim().replace(' ', "_");
    match namespace {
        "chebi" if !identifier.starts_with("CHEBI:") => format!("CHEBI:{identifier}"),
        // Short HMDB ids (HMDB12345) are padded to the current eleven character form.
        "hmdb" if identifier.len() != 11 && identifier.len() > 4 => match identifier.get(4..) {
            Some(digits) => format!("HMDB00{digits}"),
            None => identifier,
        },
        _ => identifier,
    }
}

/// identifiers.org IRI for an xref, if its data source is known.
pub fn xref_iri(xref: &Xref) -> Option<String> {
    if xref.identifier.trim().is_empty() {
        return None;
    }
    let namespace = identifiers_namespace(&xref.data_source)?;
    Some(format!(
        "{IDENTIFIERS_ORG}/{namespace}/{}",
        normalized_identifier(namespace, &xref.identifier)
    ))
}

/// Identity of a data node, or `None` when the node does not name a molecule.
pub fn node_identity(node: &DataNode) -> Option<ParticipantIdentity> {
    if node.node_type == "Unknown" {
        return None;
    }
    let xref = node.xref.as_ref()?;
    xref_iri(xref).map(ParticipantIdentity::new)
}

/// Populate `cache` with an identity for every data node that has one.
///
/// Must run to completion before lines or groups are resolved.
pub fn convert_data_nodes(pathway: &Pathway, cache: &mut ParticipantCache) -> ConvertResult<usize> {
    let mut converted = 0;
    for node in pathway.data_nodes() {
        match node_identity(node) {
            Some(identity) => {
                trace!(element_id = node.id, iri = identity.iri(); "Resolved data node");
                cache.put(node.id.clone(), identity)?;
                converted += 1;
            }
            None => debug!(element_id = node.id; "Data node has no usable xref, not a participant"),
        }
    }
    Ok(converted)
}
