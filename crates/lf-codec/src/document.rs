//! Circuit documents: a named list of component trees plus wiring.

use lf_circuit::{Circuit, CompId, TemplateRegistry};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::CodecResult;
use crate::tree::{ComponentTree, from_tree, to_tree};
use crate::validate::validate_doc;
use crate::wiring::{WireDoc, collect_wires, restore_wires};

pub const LATEST_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitDoc {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub components: Vec<ComponentTree>,
    #[serde(default)]
    pub wires: Vec<WireDoc>,
}

impl CircuitDoc {
    /// An empty document at the latest version.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: LATEST_VERSION,
            name: name.into(),
            components: Vec::new(),
            wires: Vec::new(),
        }
    }

    /// Describe the live components of `circuit` and the wiring between them.
    pub fn from_circuit(name: impl Into<String>, circuit: &Circuit) -> CodecResult<Self> {
        let order = circuit.list_components();
        let components = order
            .iter()
            .map(|&id| to_tree(circuit, id))
            .collect::<CodecResult<Vec<_>>>()?;
        Ok(Self {
            version: LATEST_VERSION,
            name: name.into(),
            components,
            wires: collect_wires(circuit, &order),
        })
    }

    /// Validate, then add the document's components and wiring to `circuit`.
    /// Returns the new components in document order.
    pub fn load_into(
        &self,
        circuit: &mut Circuit,
        registry: &TemplateRegistry,
    ) -> CodecResult<Vec<CompId>> {
        validate_doc(self, registry)?;
        let ids = self
            .components
            .iter()
            .map(|tree| from_tree(circuit, tree))
            .collect::<CodecResult<Vec<_>>>()?;
        restore_wires(circuit, &ids, &self.wires)?;
        debug!(name = %self.name, components = ids.len(), "document loaded");
        Ok(ids)
    }
}
