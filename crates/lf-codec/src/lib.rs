//! lf-codec: circuit save formats.
//!
//! - tree: full-fidelity per-component description, used for copy and clone
//! - binary: compact positional save format with an optional wiring block
//! - document: YAML/JSON circuit files with validation

pub mod binary;
pub mod document;
pub mod tree;
pub mod validate;
pub mod wiring;

pub use binary::{decode_components, decode_save, encode_components, encode_save};
pub use document::{CircuitDoc, LATEST_VERSION};
pub use tree::{ComponentTree, PinTree, from_tree, to_tree};
pub use validate::{ValidationError, validate_doc};
pub use wiring::{PinRef, WireDoc};

use lf_circuit::{CircuitError, CompId, PinKind, TemplateId, TemplateRegistry};

pub type CodecResult<T> = Result<T, CodecError>;

#[derive(thiserror::Error, Debug)]
pub enum CodecError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Circuit error: {0}")]
    Circuit(#[from] CircuitError),

    #[error("Truncated input: needed {needed} bytes, found {available}")]
    Truncated { needed: usize, available: usize },

    #[error("Block length {length} is smaller than its header")]
    LengthTooSmall { length: usize },

    #[error("Block declares {declared} bytes but {available} remain")]
    LengthMismatch { declared: usize, available: usize },

    #[error("Block body of {body} bytes is not a whole number of {stride}-byte records")]
    PartialRecord { body: usize, stride: usize },

    #[error("Record {record} names unknown template {id}")]
    UnknownTemplate { record: usize, id: TemplateId },

    #[error("Component {id} coordinate {value} does not fit the save format")]
    CoordinateOutOfRange { id: CompId, value: i32 },

    #[error("Too many {what} for a save block: {count}")]
    TooMany { what: &'static str, count: usize },

    #[error("Wire {wire} refers to component {index}, only {count} decoded")]
    WireOutOfRange {
        wire: usize,
        index: usize,
        count: usize,
    },

    #[error("Wire {wire}: component {component} has no {kind:?} pin at index {index}")]
    WirePinOutOfRange {
        wire: usize,
        component: usize,
        kind: PinKind,
        index: usize,
    },

    #[error("Wire {wire}: an input pin cannot drive a wire")]
    WireFromInput { wire: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(
    path: &std::path::Path,
    registry: &TemplateRegistry,
) -> CodecResult<CircuitDoc> {
    let content = std::fs::read_to_string(path)?;
    let doc: CircuitDoc = serde_yaml::from_str(&content)?;
    validate_doc(&doc, registry)?;
    Ok(doc)
}

pub fn save_yaml(
    path: &std::path::Path,
    doc: &CircuitDoc,
    registry: &TemplateRegistry,
) -> CodecResult<()> {
    validate_doc(doc, registry)?;
    let content = serde_yaml::to_string(doc)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(
    path: &std::path::Path,
    registry: &TemplateRegistry,
) -> CodecResult<CircuitDoc> {
    let content = std::fs::read_to_string(path)?;
    let doc: CircuitDoc = serde_json::from_str(&content)?;
    validate_doc(&doc, registry)?;
    Ok(doc)
}

pub fn save_json(
    path: &std::path::Path,
    doc: &CircuitDoc,
    registry: &TemplateRegistry,
) -> CodecResult<()> {
    validate_doc(doc, registry)?;
    let content = serde_json::to_string_pretty(doc)?;
    std::fs::write(path, content)?;
    Ok(())
}
