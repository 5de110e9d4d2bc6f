//! Evaluation order.
//!
//! Components are ordered by a depth-first post-order over component
//! adjacency, seeded from each live component in `list_components` order and
//! reversed at the end. On acyclic wiring every component comes before the
//! components it feeds. On cyclic wiring the visited guard stops the walk and
//! some cycle edge ends up pointing backwards; that is accepted silently.

use std::collections::HashSet;

use lf_circuit::{Circuit, CompId};
use tracing::debug;

/// Compute the order in which one tick evaluates live components.
///
/// The walk is iterative but visits nodes exactly as the recursive
/// formulation would: a node is finished only after every downstream target
/// in wiring order has been finished.
pub fn evaluation_order(circuit: &Circuit) -> Vec<CompId> {
    let seeds = circuit.list_components();
    let mut visited: HashSet<CompId> = HashSet::with_capacity(seeds.len());
    let mut post_order = Vec::with_capacity(seeds.len());
    // (component, index of the next downstream edge to follow)
    let mut stack: Vec<(CompId, usize)> = Vec::new();

    for seed in seeds {
        if !visited.insert(seed) {
            continue;
        }
        stack.push((seed, 0));

        while let Some(frame) = stack.last_mut() {
            let (id, next) = *frame;
            let downstream = circuit
                .component(id)
                .map(|c| c.downstream())
                .unwrap_or_default();

            if let Some(&target) = downstream.get(next) {
                frame.1 += 1;
                if circuit.is_live(target) && visited.insert(target) {
                    stack.push((target, 0));
                }
            } else {
                stack.pop();
                post_order.push(id);
            }
        }
    }

    post_order.reverse();
    debug!(components = post_order.len(), "evaluation order computed");
    post_order
}

#[cfg(test)]
mod tests {
    use super::*;
    use lf_circuit::{TemplateId, TemplateRegistry};

    #[test]
    fn empty_circuit_has_empty_order() {
        assert!(evaluation_order(&Circuit::new()).is_empty());
    }

    #[test]
    fn chain_is_ordered_source_first() {
        let registry = TemplateRegistry::standard();
        let mut circuit = Circuit::new();
        // Created sink first so creation order alone would be wrong.
        let led = circuit.create_from_template(&registry, TemplateId(5)).unwrap();
        let not = circuit.create_from_template(&registry, TemplateId(1)).unwrap();
        let sw = circuit.create_from_template(&registry, TemplateId(4)).unwrap();
        circuit.wire_components(not, 0, led, 0).unwrap();
        circuit.wire_components(sw, 0, not, 0).unwrap();

        assert_eq!(evaluation_order(&circuit), vec![sw, not, led]);
    }

    #[test]
    fn disabled_components_are_skipped() {
        let registry = TemplateRegistry::standard();
        let mut circuit = Circuit::new();
        let sw = circuit.create_from_template(&registry, TemplateId(4)).unwrap();
        let led = circuit.create_from_template(&registry, TemplateId(5)).unwrap();
        circuit.wire_components(sw, 0, led, 0).unwrap();
        circuit.set_enabled(led, false).unwrap();

        assert_eq!(evaluation_order(&circuit), vec![sw]);
    }

    #[test]
    fn cycle_terminates_and_lists_each_component_once() {
        let registry = TemplateRegistry::standard();
        let mut circuit = Circuit::new();
        let a = circuit.create_from_template(&registry, TemplateId(1)).unwrap();
        let b = circuit.create_from_template(&registry, TemplateId(1)).unwrap();
        circuit.wire_components(a, 0, b, 0).unwrap();
        circuit.wire_components(b, 0, a, 0).unwrap();

        let order = evaluation_order(&circuit);
        assert_eq!(order.len(), 2);
        assert!(order.contains(&a) && order.contains(&b));
    }
}
