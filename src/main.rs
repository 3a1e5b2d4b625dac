use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{debug, info, LevelFilter};

use gpml_interactions::{
    convert_gpml, pathway_id_from_path, Conversion, ConvertConfig, InteractionKind, Participant,
    DEFAULT_BASE_IRI,
};

const DEFAULT_OUTPUT: &str = "pathway.nt";
const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Parser)]
#[command(author, version, about = "Resolve GPML pathway interactions into WikiPathways RDF", long_about = None)]
struct Cli {
    /// off, error, warn, info, debug or trace.
    #[arg(long, global = true, default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a GPML file to N-Triples.
    #[command(name = "gpml2rdf")]
    Gpml2Rdf {
        #[command(flatten)]
        source: Source,
        #[arg(long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,
    },
    /// Print the resolved interactions, complexes and diagnostics.
    #[command(name = "inspect")]
    Inspect {
        #[command(flatten)]
        source: Source,
    },
}

#[derive(Args, Debug)]
struct Source {
    #[arg(long)]
    input: PathBuf,
    #[arg(long, default_value = DEFAULT_BASE_IRI)]
    base_iri: String,
    /// Defaults to the pathway's own Xref, then to the WP number in the file name.
    #[arg(long)]
    pathway_id: Option<String>,
    /// Defaults to the pathway's version attribute.
    #[arg(long)]
    revision: Option<String>,
}

impl Source {
    fn config(&self) -> ConvertConfig {
        ConvertConfig {
            base_iri: self.base_iri.clone(),
            pathway_id: self.pathway_id.clone(),
            default_pathway_id: pathway_id_from_path(&self.input),
            revision: self.revision.clone(),
        }
    }

    fn convert(&self) -> Result<Conversion> {
        let xml = fs::read_to_string(&self.input)
            .with_context(|| format!("Failed to read {:?}", self.input))?;
        convert_gpml(&xml, &self.config())
            .with_context(|| format!("Failed to convert {:?}", self.input))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = LevelFilter::from_str(&cli.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using 'warn' instead.", cli.log_level);
        LevelFilter::Warn
    });
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    match cli.command {
        Command::Gpml2Rdf { source, output } => {
            debug!(source:?; "Converting");
            gpml2rdf(&source, &output)
        }
        Command::Inspect { source } => {
            let conversion = source.convert()?;
            let stdout = io::stdout();
            inspect(&conversion, &mut stdout.lock())
        }
    }
}

fn gpml2rdf(source: &Source, output: &Path) -> Result<()> {
    let conversion = source.convert()?;
    let file = fs::File::create(output).with_context(|| format!("Failed to create {:?}", output))?;
    let triples = conversion
        .write_ntriples(BufWriter::new(file))
        .with_context(|| format!("Failed to write {:?}", output))?;
    info!(
        triples,
        dropped = conversion.diagnostics().len(),
        output:? = output;
        "Wrote RDF"
    );
    Ok(())
}

fn participant_list(participants: &[&Participant]) -> String {
    if participants.is_empty() {
        return "-".to_string();
    }
    participants
        .iter()
        .map(|participant| participant.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn inspect<W: Write>(conversion: &Conversion, out: &mut W) -> Result<()> {
    let resolution = &conversion.resolution;
    writeln!(
        out,
        "{} ({})",
        conversion.pathway.title,
        conversion.scheme.pathway()
    )?;

    writeln!(out, "\ninteractions: {}", resolution.interactions.len())?;
    for interaction in resolution.interactions.values() {
        let published = !matches!(interaction.kind, InteractionKind::Unsupported(_));
        writeln!(
            out,
            "  {} [{}]{} lines: {}",
            interaction.id,
            interaction.kind,
            if published { "" } else { " (not published)" },
            interaction.lines.join(" ")
        )?;
        writeln!(
            out,
            "    sources: {}",
            participant_list(&interaction.sources.iter().collect::<Vec<_>>())
        )?;
        writeln!(
            out,
            "    targets: {}",
            participant_list(&interaction.targets.iter().collect::<Vec<_>>())
        )?;
        writeln!(
            out,
            "    others: {}",
            participant_list(&interaction.others.iter().collect::<Vec<_>>())
        )?;
        if !interaction.regulators.is_empty() {
            writeln!(out, "    regulated by: {}", interaction.regulators.join(" "))?;
        }
    }

    writeln!(out, "\ncomplexes: {}", resolution.complexes.len())?;
    for complex in resolution.complexes.values() {
        writeln!(
            out,
            "  {} {} <{}>",
            complex.group_id,
            if complex.labels.is_empty() {
                "-".to_string()
            } else {
                complex.labels.join(" / ")
            },
            complex.identity
        )?;
        writeln!(
            out,
            "    members: {}",
            participant_list(&complex.members.iter().collect::<Vec<_>>())
        )?;
    }

    writeln!(out, "\ndiagnostics: {}", conversion.diagnostics().len())?;
    for diagnostic in conversion.diagnostics() {
        writeln!(out, "  {diagnostic}")?;
    }
    out.flush().context("Failed to flush output")?;
    Ok(())
}
