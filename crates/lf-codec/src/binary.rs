//! Compact binary save format.
//!
//! A component block is `[length:u16][record]*` where `length` counts the
//! whole block including its own header and each 5-byte record is
//! `[template:u8][x:u16][y:u16]`. Coordinates are stored with a bias of
//! 32768 so the signed range -32768..=32767 fits the unsigned field. All
//! integers are big-endian. Records follow `Circuit::list_components` order.
//!
//! A save file may append a wiring block `[length:u16][wire]*`, each 6-byte
//! wire being `[src:u16][src_slot:u8][dst:u16][dst_slot:u8]`. `src` and
//! `dst` index the component records; a slot is the pin index with bit 7 set
//! for output pins.

use lf_circuit::{Circuit, CircuitError, CompId, PinKind, Point, TemplateId, TemplateRegistry};
use tracing::debug;

use crate::wiring::{PinRef, WireDoc, collect_wires, restore_wires};
use crate::{CodecError, CodecResult};

const HEADER_LEN: usize = 2;
const RECORD_LEN: usize = 5;
const WIRE_LEN: usize = 6;
const COORD_BIAS: i32 = 32768;
const OUTPUT_SLOT: u8 = 0x80;

fn encode_coord(id: CompId, value: i32) -> CodecResult<u16> {
    value
        .checked_add(COORD_BIAS)
        .and_then(|biased| u16::try_from(biased).ok())
        .ok_or(CodecError::CoordinateOutOfRange { id, value })
}

fn decode_coord(hi: u8, lo: u8) -> i32 {
    i32::from(u16::from_be_bytes([hi, lo])) - COORD_BIAS
}

/// Write a length-prefixed block.
fn write_block(
    out: &mut Vec<u8>,
    what: &'static str,
    count: usize,
    body: &[u8],
) -> CodecResult<()> {
    let length =
        u16::try_from(HEADER_LEN + body.len()).map_err(|_| CodecError::TooMany { what, count })?;
    out.extend_from_slice(&length.to_be_bytes());
    out.extend_from_slice(body);
    Ok(())
}

/// Split one length-prefixed block off the front of `bytes`, returning its
/// body and whatever follows it.
fn read_block(bytes: &[u8], stride: usize) -> CodecResult<(&[u8], &[u8])> {
    if bytes.len() < HEADER_LEN {
        return Err(CodecError::Truncated {
            needed: HEADER_LEN,
            available: bytes.len(),
        });
    }
    let length = usize::from(u16::from_be_bytes([bytes[0], bytes[1]]));
    if length < HEADER_LEN {
        return Err(CodecError::LengthTooSmall { length });
    }
    if length > bytes.len() {
        return Err(CodecError::Truncated {
            needed: length,
            available: bytes.len(),
        });
    }
    let body = &bytes[HEADER_LEN..length];
    if body.len() % stride != 0 {
        return Err(CodecError::PartialRecord {
            body: body.len(),
            stride,
        });
    }
    Ok((body, &bytes[length..]))
}

fn encode_slot(pin: PinRef) -> CodecResult<u8> {
    let index = u8::try_from(pin.index)
        .ok()
        .filter(|&i| i & OUTPUT_SLOT == 0)
        .ok_or(CodecError::TooMany {
            what: "pins",
            count: pin.index,
        })?;
    Ok(match pin.kind {
        PinKind::Input => index,
        PinKind::Output => index | OUTPUT_SLOT,
    })
}

fn decode_slot(component: usize, slot: u8) -> PinRef {
    let kind = if slot & OUTPUT_SLOT != 0 {
        PinKind::Output
    } else {
        PinKind::Input
    };
    PinRef {
        component,
        kind,
        index: usize::from(slot & !OUTPUT_SLOT),
    }
}

fn component_block(circuit: &Circuit, order: &[CompId]) -> CodecResult<Vec<u8>> {
    let mut body = Vec::with_capacity(order.len() * RECORD_LEN);
    for &id in order {
        let comp = circuit
            .component(id)
            .ok_or(CircuitError::ComponentNotFound { id })?;
        let position = comp.position();
        body.push(comp.template.get());
        body.extend_from_slice(&encode_coord(id, position.x)?.to_be_bytes());
        body.extend_from_slice(&encode_coord(id, position.y)?.to_be_bytes());
    }

    let mut out = Vec::with_capacity(HEADER_LEN + body.len());
    write_block(&mut out, "components", order.len(), &body)?;
    Ok(out)
}

/// Encode the live components: template and position only.
pub fn encode_components(circuit: &Circuit) -> CodecResult<Vec<u8>> {
    component_block(circuit, &circuit.list_components())
}

/// Encode the live components followed by the wiring between them.
pub fn encode_save(circuit: &Circuit) -> CodecResult<Vec<u8>> {
    let order = circuit.list_components();
    let mut out = component_block(circuit, &order)?;

    let wires = collect_wires(circuit, &order);
    let mut body = Vec::with_capacity(wires.len() * WIRE_LEN);
    for wire in &wires {
        for (pin, what) in [(wire.from, "source"), (wire.to, "target")] {
            let index = u16::try_from(pin.component).map_err(|_| CodecError::TooMany {
                what,
                count: pin.component,
            })?;
            body.extend_from_slice(&index.to_be_bytes());
            body.push(encode_slot(pin)?);
        }
    }
    write_block(&mut out, "wires", wires.len(), &body)?;
    debug!(
        components = order.len(),
        wires = wires.len(),
        bytes = out.len(),
        "circuit encoded"
    );
    Ok(out)
}

/// Parse every record before touching the circuit, so a bad record leaves
/// it unchanged.
fn parse_records(
    body: &[u8],
    registry: &TemplateRegistry,
) -> CodecResult<Vec<(TemplateId, Point)>> {
    body.chunks_exact(RECORD_LEN)
        .enumerate()
        .map(|(record, chunk)| {
            let id = TemplateId(chunk[0]);
            if registry.get(id).is_none() {
                return Err(CodecError::UnknownTemplate { record, id });
            }
            let position = Point::new(
                decode_coord(chunk[1], chunk[2]),
                decode_coord(chunk[3], chunk[4]),
            );
            Ok((id, position))
        })
        .collect()
}

/// Check every wire against the arity of its records' templates, so a bad
/// wire is reported before any component is created.
fn check_wires(
    records: &[(TemplateId, Point)],
    wires: &[WireDoc],
    registry: &TemplateRegistry,
) -> CodecResult<()> {
    for (wire, doc) in wires.iter().enumerate() {
        if doc.from.kind == PinKind::Input {
            return Err(CodecError::WireFromInput { wire });
        }
        for pin in [doc.from, doc.to] {
            let (template, _) = records[pin.component];
            let template = registry.lookup(template)?;
            let count = match pin.kind {
                PinKind::Input => template.inputs.len(),
                PinKind::Output => template.outputs.len(),
            };
            if pin.index >= count {
                return Err(CodecError::WirePinOutOfRange {
                    wire,
                    component: pin.component,
                    kind: pin.kind,
                    index: pin.index,
                });
            }
        }
    }
    Ok(())
}

fn instantiate_records(
    circuit: &mut Circuit,
    registry: &TemplateRegistry,
    records: &[(TemplateId, Point)],
) -> CodecResult<Vec<CompId>> {
    let mut ids = Vec::with_capacity(records.len());
    for &(template, position) in records {
        let id = circuit.create_from_template(registry, template)?;
        circuit.place(id, position)?;
        ids.push(id);
    }
    Ok(ids)
}

/// Decode a component block into `circuit`.
///
/// The buffer must hold exactly one block; trailing bytes are an error.
/// Returns the new components in record order.
pub fn decode_components(
    bytes: &[u8],
    registry: &TemplateRegistry,
    circuit: &mut Circuit,
) -> CodecResult<Vec<CompId>> {
    let (body, rest) = read_block(bytes, RECORD_LEN)?;
    if !rest.is_empty() {
        return Err(CodecError::LengthMismatch {
            declared: bytes.len() - rest.len(),
            available: bytes.len(),
        });
    }
    let records = parse_records(body, registry)?;
    let ids = instantiate_records(circuit, registry, &records)?;
    debug!(components = ids.len(), "components decoded");
    Ok(ids)
}

/// Decode a save file: a component block, optionally followed by a wiring
/// block. Returns the new components in record order.
///
/// Records and wires are checked first; on error `circuit` is unchanged.
pub fn decode_save(
    bytes: &[u8],
    registry: &TemplateRegistry,
    circuit: &mut Circuit,
) -> CodecResult<Vec<CompId>> {
    let (body, rest) = read_block(bytes, RECORD_LEN)?;
    let records = parse_records(body, registry)?;

    let mut wires = Vec::new();
    if !rest.is_empty() {
        let (wire_body, trailing) = read_block(rest, WIRE_LEN)?;
        if !trailing.is_empty() {
            return Err(CodecError::LengthMismatch {
                declared: rest.len() - trailing.len(),
                available: rest.len(),
            });
        }
        for (i, chunk) in wire_body.chunks_exact(WIRE_LEN).enumerate() {
            let src = usize::from(u16::from_be_bytes([chunk[0], chunk[1]]));
            let dst = usize::from(u16::from_be_bytes([chunk[3], chunk[4]]));
            for index in [src, dst] {
                if index >= records.len() {
                    return Err(CodecError::WireOutOfRange {
                        wire: i,
                        index,
                        count: records.len(),
                    });
                }
            }
            wires.push(WireDoc {
                from: decode_slot(src, chunk[2]),
                to: decode_slot(dst, chunk[5]),
            });
        }
    }
    check_wires(&records, &wires, registry)?;

    let ids = instantiate_records(circuit, registry, &records)?;
    restore_wires(circuit, &ids, &wires)?;
    debug!(
        components = ids.len(),
        wires = wires.len(),
        "save file decoded"
    );
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_bias() {
        let id = CompId::from_index(0);
        assert_eq!(encode_coord(id, 0).unwrap(), 0x8000);
        assert_eq!(encode_coord(id, -32768).unwrap(), 0);
        assert_eq!(encode_coord(id, 32767).unwrap(), 0xFFFF);
        assert!(encode_coord(id, 32768).is_err());
        assert!(encode_coord(id, -32769).is_err());
        assert!(encode_coord(id, i32::MAX).is_err());
        assert_eq!(decode_coord(0x80, 0x10), 16);
        assert_eq!(decode_coord(0x7F, 0xF0), -16);
    }

    #[test]
    fn slot_flag_marks_outputs() {
        let out = PinRef {
            component: 3,
            kind: PinKind::Output,
            index: 0,
        };
        assert_eq!(encode_slot(out).unwrap(), 0x80);
        assert_eq!(decode_slot(3, 0x80), out);
        assert_eq!(decode_slot(1, 0x01).kind, PinKind::Input);
        assert_eq!(decode_slot(1, 0x01).index, 1);

        let wide = PinRef {
            component: 0,
            kind: PinKind::Input,
            index: 128,
        };
        assert!(matches!(
            encode_slot(wide),
            Err(CodecError::TooMany { what: "pins", count: 128 })
        ));
    }

    #[test]
    fn single_wire_layout() {
        let registry = TemplateRegistry::standard();
        let mut circuit = Circuit::new();
        let switch = circuit
            .create_from_template(&registry, TemplateId(4))
            .unwrap();
        let led = circuit
            .create_from_template(&registry, TemplateId(5))
            .unwrap();
        circuit.wire_components(switch, 0, led, 0).unwrap();

        let bytes = encode_save(&circuit).unwrap();
        assert_eq!(
            bytes,
            vec![
                0x00, 0x0C, 0x04, 0x80, 0x00, 0x80, 0x00, 0x05, 0x80, 0x00, 0x80, 0x00, // components
                0x00, 0x08, 0x00, 0x00, 0x80, 0x00, 0x01, 0x00, // one wire
            ]
        );

        let mut decoded = Circuit::new();
        let ids = decode_save(&bytes, &registry, &mut decoded).unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(decoded.wires().count(), 1);
    }

    #[test]
    fn single_record_layout() {
        let registry = TemplateRegistry::standard();
        let mut circuit = Circuit::new();
        let not = circuit
            .create_from_template(&registry, TemplateId(1))
            .unwrap();
        circuit.place(not, Point::new(16, -16)).unwrap();

        let bytes = encode_components(&circuit).unwrap();
        assert_eq!(bytes, vec![0x00, 0x07, 0x01, 0x80, 0x10, 0x7F, 0xF0]);
    }

    #[test]
    fn read_block_errors() {
        assert!(matches!(
            read_block(&[0x00], RECORD_LEN),
            Err(CodecError::Truncated { needed: 2, .. })
        ));
        assert!(matches!(
            read_block(&[0x00, 0x01], RECORD_LEN),
            Err(CodecError::LengthTooSmall { length: 1 })
        ));
        assert!(matches!(
            read_block(&[0x00, 0x07, 0x01], RECORD_LEN),
            Err(CodecError::Truncated { needed: 7, .. })
        ));
        assert!(matches!(
            read_block(&[0x00, 0x04, 0x01, 0x02], RECORD_LEN),
            Err(CodecError::PartialRecord { body: 2, stride: 5 })
        ));
    }
}
