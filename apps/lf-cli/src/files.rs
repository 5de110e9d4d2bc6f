//! Circuit files by extension.

use std::path::Path;

use lf_circuit::{Circuit, CompId, TemplateRegistry};
use lf_codec::{CircuitDoc, decode_save, encode_save};
use tracing::info;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Binary,
    Yaml,
    Json,
}

impl Format {
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("bin") => Ok(Format::Binary),
            Some("yaml" | "yml") => Ok(Format::Yaml),
            Some("json") => Ok(Format::Json),
            _ => Err(AppError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// A circuit read from disk, with its components in file order.
pub struct Loaded {
    pub name: String,
    pub circuit: Circuit,
    pub ids: Vec<CompId>,
}

pub fn load(path: &Path, registry: &TemplateRegistry) -> AppResult<Loaded> {
    let mut circuit = Circuit::new();
    let (name, ids) = match Format::from_path(path)? {
        Format::Binary => {
            let bytes = std::fs::read(path).map_err(|source| AppError::FileRead {
                path: path.to_path_buf(),
                source,
            })?;
            let ids = decode_save(&bytes, registry, &mut circuit)?;
            (file_stem(path), ids)
        }
        Format::Yaml => load_doc(lf_codec::load_yaml(path, registry)?, &mut circuit, registry)?,
        Format::Json => load_doc(lf_codec::load_json(path, registry)?, &mut circuit, registry)?,
    };
    info!(path = %path.display(), components = ids.len(), "circuit loaded");
    Ok(Loaded { name, circuit, ids })
}

pub fn save(
    path: &Path,
    name: &str,
    circuit: &Circuit,
    registry: &TemplateRegistry,
) -> AppResult<()> {
    match Format::from_path(path)? {
        Format::Binary => {
            let bytes = encode_save(circuit)?;
            std::fs::write(path, bytes).map_err(|source| AppError::FileWrite {
                path: path.to_path_buf(),
                source,
            })?;
        }
        Format::Yaml => {
            let doc = CircuitDoc::from_circuit(name, circuit)?;
            lf_codec::save_yaml(path, &doc, registry)?;
        }
        Format::Json => {
            let doc = CircuitDoc::from_circuit(name, circuit)?;
            lf_codec::save_json(path, &doc, registry)?;
        }
    }
    info!(path = %path.display(), "circuit saved");
    Ok(())
}

fn load_doc(
    doc: CircuitDoc,
    circuit: &mut Circuit,
    registry: &TemplateRegistry,
) -> AppResult<(String, Vec<CompId>)> {
    let ids = doc.load_into(circuit, registry)?;
    Ok((doc.name, ids))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("circuit")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_by_extension() {
        assert_eq!(Format::from_path(Path::new("a.bin")).unwrap(), Format::Binary);
        assert_eq!(Format::from_path(Path::new("a.YML")).unwrap(), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("a.json")).unwrap(), Format::Json);
        assert!(Format::from_path(Path::new("a.txt")).is_err());
        assert!(Format::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn binary_and_yaml_files_roundtrip() {
        let registry = TemplateRegistry::standard();
        let mut circuit = Circuit::new();
        let sw = circuit
            .create_from_template(&registry, lf_circuit::TemplateId(4))
            .unwrap();
        let led = circuit
            .create_from_template(&registry, lf_circuit::TemplateId(5))
            .unwrap();
        circuit.wire_components(sw, 0, led, 0).unwrap();

        let dir = std::env::temp_dir();
        for file in ["lf_cli_files.bin", "lf_cli_files.yaml"] {
            let path = dir.join(file);
            save(&path, "demo", &circuit, &registry).unwrap();
            let loaded = load(&path, &registry).unwrap();
            assert_eq!(loaded.ids.len(), 2);
            assert_eq!(loaded.circuit.wires().count(), 1);
        }
    }
}
