//! Resolve the interactions drawn in a GPML pathway diagram into a semantic
//! participant graph, and publish it as WikiPathways RDF.
//!
//! Conversion runs in three stages. [`gpml::parse_gpml`] loads the diagram,
//! [`identity::convert_data_nodes`] gives every identifiable data node its IRI, and
//! [`resolve::resolve_pathway`] merges anchored lines, reconciles their types,
//! classifies participants and resolves complex groups. Diagram problems along the
//! way never abort the conversion; they are collected as [`report::Diagnostic`]s.

pub mod anchor;
pub mod classify;
pub mod complex;
pub mod error;
pub mod gpml;
pub mod identity;
pub mod interaction;
pub mod merge;
pub mod model;
pub mod rdf;
pub mod reconcile;
pub mod report;
pub mod resolve;

use std::io::Write;
use std::path::Path;

use log::info;

pub use error::{ConvertError, ConvertResult};
pub use identity::{IriScheme, ParticipantCache, ParticipantIdentity};
pub use interaction::{InteractionKind, Participant, ResolvedComplex, ResolvedInteraction};
pub use model::Pathway;
pub use report::{Diagnostic, DropReason, DropScope};
pub use resolve::{Resolution, Resolver};

pub const DEFAULT_BASE_IRI: &str = "https://rdf.wikipathways.org";
pub const DEFAULT_REVISION: &str = "0";

/// Naming inputs for the published IRIs.
#[derive(Clone, Debug)]
pub struct ConvertConfig {
    pub base_iri: String,
    /// Falls back to the GPML `Pathway/Xref` identifier, then to `default_pathway_id`.
    pub pathway_id: Option<String>,
    /// Used when neither the caller nor the document names the pathway, e.g. an id
    /// taken from the input file name. `WP0` when absent.
    pub default_pathway_id: Option<String>,
    /// Falls back to the GPML `Pathway@version`, then to [`DEFAULT_REVISION`].
    pub revision: Option<String>,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            base_iri: DEFAULT_BASE_IRI.to_string(),
            pathway_id: None,
            default_pathway_id: None,
            revision: None,
        }
    }
}

/// A fully resolved pathway.
#[derive(Debug)]
pub struct Conversion {
    pub pathway: Pathway,
    pub cache: ParticipantCache,
    pub resolution: Resolution,
    pub scheme: IriScheme,
}

impl Conversion {
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.resolution.diagnostics
    }

    /// Write the conversion as N-Triples; returns the number of triples.
    pub fn write_ntriples<W: Write>(&self, out: W) -> ConvertResult<usize> {
        rdf::write_ntriples(out, &self.pathway, &self.cache, &self.resolution, &self.scheme)
    }
}

pub fn convert_gpml(xml: &str, config: &ConvertConfig) -> ConvertResult<Conversion> {
    let pathway = gpml::parse_gpml(xml)?;
    let pathway_id = config
        .pathway_id
        .clone()
        .or_else(|| pathway.identifier.clone())
        .or_else(|| config.default_pathway_id.clone())
        .unwrap_or_else(|| "WP0".to_string());
    let revision = config
        .revision
        .clone()
        .or_else(|| pathway.version.clone())
        .unwrap_or_else(|| DEFAULT_REVISION.to_string());
    let scheme = IriScheme::new(&config.base_iri, &pathway_id, &revision);

    let mut cache = ParticipantCache::new();
    let converted = identity::convert_data_nodes(&pathway, &mut cache)?;
    info!(pathway_id, revision, data_nodes = converted; "Converted data nodes");

    let resolution = resolve::resolve_pathway(&pathway, &cache, &scheme);
    Ok(Conversion {
        pathway,
        cache,
        resolution,
        scheme,
    })
}

/// Pathway id suggested by a file name: the last `WP<digits>` in it, else the file stem.
pub fn pathway_id_from_path(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let from_wp = stem.rmatch_indices("WP").find_map(|(start, _)| {
        let digits: String = stem[start + 2..]
            .chars()
            .take_while(char::is_ascii_digit)
            .collect();
        (!digits.is_empty()).then(|| format!("WP{digits}"))
    });
    from_wp.or_else(|| Some(stem.to_string()).filter(|stem| !stem.is_empty()))
}
