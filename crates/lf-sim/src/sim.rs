//! Tick scheduler and headless driver.

use std::thread;
use std::time::Duration;

use lf_circuit::{Circuit, CircuitError, CompId, PinId};
use lf_core::timing::{TickStats, Timer};
use tracing::{debug, trace};

use crate::error::{SimError, SimResult};
use crate::schedule::evaluation_order;

/// Options for a headless tick run.
#[derive(Clone, Debug, PartialEq)]
pub struct SimOptions {
    /// Wall-clock period between ticks (milliseconds), used when `realtime`.
    pub tick_period_ms: u64,
    /// Number of ticks to run.
    pub max_ticks: usize,
    /// Sleep `tick_period_ms` between ticks.
    pub realtime: bool,
    /// Pins whose values are recorded after every tick.
    pub record_pins: Vec<PinId>,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            tick_period_ms: 15,
            max_ticks: 1,
            realtime: false,
            record_pins: Vec::new(),
        }
    }
}

impl SimOptions {
    pub fn validate(&self) -> SimResult<()> {
        if self.max_ticks == 0 {
            return Err(SimError::InvalidArg {
                what: "max_ticks must be positive",
            });
        }
        Ok(())
    }
}

/// Pin values recorded after each tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickRecord {
    /// The recorded pins, in `SimOptions::record_pins` order.
    pub pins: Vec<PinId>,
    /// One row per tick, one value per recorded pin.
    pub values: Vec<Vec<bool>>,
    /// Per-tick wall time, when timing is enabled (`LF_TIMING`).
    pub timing: Option<TickStats>,
}

impl TickRecord {
    /// Values of the last tick, if any ran.
    pub fn last(&self) -> Option<&[bool]> {
        self.values.last().map(Vec::as_slice)
    }
}

/// Runs ticks over a cached evaluation order.
///
/// The order is computed from the circuit's wiring at construction and
/// remembered together with the circuit revision it came from. Start, stop
/// and the tick timer belong to the caller.
#[derive(Clone, Debug)]
pub struct Scheduler {
    order: Vec<CompId>,
    revision: u64,
}

impl Scheduler {
    /// Compute the evaluation order for `circuit`.
    pub fn compute(circuit: &Circuit) -> Self {
        Self {
            order: evaluation_order(circuit),
            revision: circuit.revision(),
        }
    }

    /// The cached evaluation order.
    pub fn order(&self) -> &[CompId] {
        &self.order
    }

    /// Whether wiring or the live set changed since the order was computed.
    pub fn is_stale(&self, circuit: &Circuit) -> bool {
        self.revision != circuit.revision()
    }

    /// Recompute the order if it is stale. Returns true if it was.
    pub fn refresh(&mut self, circuit: &Circuit) -> bool {
        if !self.is_stale(circuit) {
            return false;
        }
        *self = Self::compute(circuit);
        true
    }

    /// Evaluate every component of the cached order once, in order.
    pub fn run_tick(&self, circuit: &mut Circuit) -> SimResult<()> {
        for &id in &self.order {
            circuit.evaluate(id)?;
        }
        trace!(components = self.order.len(), "tick");
        Ok(())
    }
}

/// Run `opts.max_ticks` ticks, refreshing a stale order first.
pub fn run_ticks(
    circuit: &mut Circuit,
    scheduler: &mut Scheduler,
    opts: &SimOptions,
) -> SimResult<TickRecord> {
    opts.validate()?;
    if scheduler.refresh(circuit) {
        debug!(revision = circuit.revision(), "evaluation order refreshed");
    }

    let mut record = TickRecord {
        pins: opts.record_pins.clone(),
        values: Vec::with_capacity(opts.max_ticks),
        timing: None,
    };
    let mut stats = TickStats::default();

    for tick in 0..opts.max_ticks {
        if opts.realtime && tick > 0 {
            thread::sleep(Duration::from_millis(opts.tick_period_ms));
        }
        let timer = Timer::start("tick");
        scheduler.run_tick(circuit)?;
        if let Some(span) = timer.elapsed() {
            stats.record(span);
        }

        let row = opts
            .record_pins
            .iter()
            .map(|&pin| circuit.value(pin).ok_or(CircuitError::PinNotFound { id: pin }))
            .collect::<Result<Vec<_>, _>>()?;
        record.values.push(row);
    }

    if stats.count() > 0 {
        debug!(
            ticks = stats.count(),
            mean_us = stats.mean().as_micros() as u64,
            max_us = stats.max().as_micros() as u64,
            "tick timing"
        );
        record.timing = Some(stats);
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lf_circuit::{TemplateId, TemplateRegistry};

    #[test]
    fn sim_options_defaults() {
        let opts = SimOptions::default();
        assert_eq!(opts.tick_period_ms, 15);
        assert_eq!(opts.max_ticks, 1);
        assert!(!opts.realtime);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn zero_ticks_is_rejected() {
        let opts = SimOptions {
            max_ticks: 0,
            ..SimOptions::default()
        };
        assert!(matches!(opts.validate(), Err(SimError::InvalidArg { .. })));

        let mut circuit = Circuit::new();
        let mut scheduler = Scheduler::compute(&circuit);
        assert!(run_ticks(&mut circuit, &mut scheduler, &opts).is_err());
    }

    #[test]
    fn refresh_tracks_revision() {
        let registry = TemplateRegistry::standard();
        let mut circuit = Circuit::new();
        let sw = circuit.create_from_template(&registry, TemplateId(4)).unwrap();
        let mut scheduler = Scheduler::compute(&circuit);
        assert!(!scheduler.is_stale(&circuit));
        assert!(!scheduler.refresh(&circuit));

        let not = circuit.create_from_template(&registry, TemplateId(1)).unwrap();
        circuit.wire_components(sw, 0, not, 0).unwrap();
        assert!(scheduler.is_stale(&circuit));
        assert!(scheduler.refresh(&circuit));
        assert_eq!(scheduler.order(), &[sw, not]);

        // Toggling a switch is not structural.
        circuit.toggle_switch(sw).unwrap();
        assert!(!scheduler.is_stale(&circuit));
    }

    #[test]
    fn tick_inverts_through_not() {
        let registry = TemplateRegistry::standard();
        let mut circuit = Circuit::new();
        let sw = circuit.create_from_template(&registry, TemplateId(4)).unwrap();
        let not = circuit.create_from_template(&registry, TemplateId(1)).unwrap();
        let led = circuit.create_from_template(&registry, TemplateId(5)).unwrap();
        circuit.wire_components(sw, 0, not, 0).unwrap();
        circuit.wire_components(not, 0, led, 0).unwrap();

        let scheduler = Scheduler::compute(&circuit);
        scheduler.run_tick(&mut circuit).unwrap();
        assert_eq!(circuit.led_lit(led), Some(true));

        circuit.toggle_switch(sw).unwrap();
        scheduler.run_tick(&mut circuit).unwrap();
        assert_eq!(circuit.led_lit(led), Some(false));
    }

    #[test]
    fn run_ticks_records_each_tick() {
        let registry = TemplateRegistry::standard();
        let mut circuit = Circuit::new();
        let sw = circuit.create_from_template(&registry, TemplateId(4)).unwrap();
        let led = circuit.create_from_template(&registry, TemplateId(5)).unwrap();
        let mut scheduler = Scheduler::compute(&circuit);
        // Wired after the scheduler was built, so the first run must refresh.
        circuit.wire_components(sw, 0, led, 0).unwrap();
        circuit.set_switch(sw, true).unwrap();

        let led_in = circuit.component(led).unwrap().input(0).unwrap();
        let opts = SimOptions {
            max_ticks: 3,
            record_pins: vec![led_in],
            ..SimOptions::default()
        };
        let record = run_ticks(&mut circuit, &mut scheduler, &opts).unwrap();
        assert_eq!(record.values.len(), 3);
        assert_eq!(record.last(), Some(&[true][..]));
        assert!(!scheduler.is_stale(&circuit));
    }
}
