//! Gate behaviour.
//!
//! Every component carries a [`GateKind`] that fixes its pin arity and the
//! pure function mapping input values to output values:
//! - **Sources** drive outputs without inputs (the input switch)
//! - **Gates** compute outputs from inputs (NOT, AND, NAND, ...)
//! - **Sinks** only observe inputs (the LED)

use std::fmt;

use serde::{Deserialize, Serialize};

/// Gate kind defines the arity and evaluation function of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateKind {
    Not,
    And,
    Nand,
    Or,
    Nor,
    Xor,
    Xnor,
    /// Manually toggled input source.
    Switch,
    /// Output indicator; lit while its input is high.
    Led,
}

impl GateKind {
    /// Check if this gate is a source (generates signals).
    pub fn is_source(&self) -> bool {
        matches!(self, GateKind::Switch)
    }

    /// Check if this gate is a sink (consumes signals).
    pub fn is_sink(&self) -> bool {
        matches!(self, GateKind::Led)
    }

    /// Number of input pins this gate expects.
    pub fn input_count(&self) -> usize {
        match self {
            GateKind::Switch => 0,
            GateKind::Not | GateKind::Led => 1,
            GateKind::And
            | GateKind::Nand
            | GateKind::Or
            | GateKind::Nor
            | GateKind::Xor
            | GateKind::Xnor => 2,
        }
    }

    /// Number of output pins this gate produces.
    pub fn output_count(&self) -> usize {
        match self {
            GateKind::Led => 0,
            _ => 1,
        }
    }

    /// Whether a simulation step writes this gate's outputs.
    ///
    /// Switches are driven by the user and LEDs have nothing to drive, so a
    /// step leaves both untouched.
    pub fn drives_outputs(&self) -> bool {
        !self.is_source() && !self.is_sink()
    }

    /// Compute output values from input values.
    ///
    /// # Panics
    ///
    /// Panics if the slice lengths do not match the gate's arity. Pin lists
    /// are validated when a component is created, so a mismatch here is a
    /// programming error.
    pub fn evaluate(&self, inputs: &[bool], outputs: &mut [bool]) {
        assert_eq!(
            inputs.len(),
            self.input_count(),
            "{self} evaluated with {} inputs",
            inputs.len()
        );
        assert_eq!(
            outputs.len(),
            self.output_count(),
            "{self} evaluated with {} outputs",
            outputs.len()
        );

        match self {
            GateKind::Not => outputs[0] = !inputs[0],
            GateKind::And => outputs[0] = inputs[0] && inputs[1],
            GateKind::Nand => outputs[0] = !(inputs[0] && inputs[1]),
            GateKind::Or => outputs[0] = inputs[0] || inputs[1],
            GateKind::Nor => outputs[0] = !(inputs[0] || inputs[1]),
            GateKind::Xor => outputs[0] = inputs[0] != inputs[1],
            GateKind::Xnor => outputs[0] = inputs[0] == inputs[1],
            GateKind::Switch | GateKind::Led => {}
        }
    }

    /// Short display name.
    pub fn name(&self) -> &'static str {
        match self {
            GateKind::Not => "NOT",
            GateKind::And => "AND",
            GateKind::Nand => "NAND",
            GateKind::Or => "OR",
            GateKind::Nor => "NOR",
            GateKind::Xor => "XOR",
            GateKind::Xnor => "XNOR",
            GateKind::Switch => "Switch",
            GateKind::Led => "LED",
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval2(kind: GateKind, a: bool, b: bool) -> bool {
        let mut out = [false];
        kind.evaluate(&[a, b], &mut out);
        out[0]
    }

    #[test]
    fn switch_is_source() {
        let kind = GateKind::Switch;
        assert!(kind.is_source());
        assert!(!kind.is_sink());
        assert!(!kind.drives_outputs());
        assert_eq!(kind.input_count(), 0);
        assert_eq!(kind.output_count(), 1);
    }

    #[test]
    fn led_is_sink() {
        let kind = GateKind::Led;
        assert!(kind.is_sink());
        assert!(!kind.drives_outputs());
        assert_eq!(kind.input_count(), 1);
        assert_eq!(kind.output_count(), 0);
    }

    #[test]
    fn not_inverts() {
        let mut out = [false];
        GateKind::Not.evaluate(&[false], &mut out);
        assert!(out[0]);
        GateKind::Not.evaluate(&[true], &mut out);
        assert!(!out[0]);
    }

    #[test]
    fn two_input_truth_tables() {
        let cases = [(false, false), (false, true), (true, false), (true, true)];
        for (a, b) in cases {
            assert_eq!(eval2(GateKind::And, a, b), a && b);
            assert_eq!(eval2(GateKind::Nand, a, b), !(a && b));
            assert_eq!(eval2(GateKind::Or, a, b), a || b);
            assert_eq!(eval2(GateKind::Nor, a, b), !(a || b));
            assert_eq!(eval2(GateKind::Xor, a, b), a ^ b);
            assert_eq!(eval2(GateKind::Xnor, a, b), !(a ^ b));
        }
    }

    #[test]
    #[should_panic(expected = "evaluated with 1 inputs")]
    fn wrong_arity_panics() {
        let mut out = [false];
        GateKind::And.evaluate(&[true], &mut out);
    }
}
