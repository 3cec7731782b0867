//! Configuration expander: enumerates the Cartesian product of basis
//! preparations and Pauli measurements at a fragment's cut endpoints,
//! emitting one tape per configuration with a rewritten terminal observable.

use itertools::Itertools;

use crate::error::CutError;
use crate::operator::{
    MeasureNode, Observable, Operator, Pauli, PrepareNode, ReturnType, Wire,
};
use crate::tape::Tape;

/// Expands a fragment tape into a tape for each configuration. Prepare-tuples
/// are iterated outermost, then measure-tuples; within each tuple, nodes
/// iterate in the order they appear in `tape.operations`. This order is
/// load-bearing — the tensor assembler's reshape depends on it.
pub fn expand_fragment(
    tape: &Tape,
) -> Result<(Vec<Tape>, Vec<PrepareNode>, Vec<MeasureNode>), CutError> {
    let prepare_slots: Vec<(PrepareNode, Wire)> = tape
        .operations
        .iter()
        .filter_map(|op| match op {
            Operator::Prepare(n, w) => Some((n.clone(), *w)),
            _ => None,
        })
        .collect();
    let measure_slots: Vec<(MeasureNode, Wire)> = tape
        .operations
        .iter()
        .filter_map(|op| match op {
            Operator::Measure(n, w) => Some((n.clone(), *w)),
            _ => None,
        })
        .collect();

    if tape.measurements.len() > 1 {
        return Err(CutError::MultipleMeasurements {
            count: tape.measurements.len(),
        });
    }
    for m in &tape.measurements {
        if m.return_type != ReturnType::Expectation {
            return Err(CutError::UnsupportedReturnType);
        }
    }

    let prepare_choice_lists: Vec<Vec<usize>> = prepare_slots
        .iter()
        .map(|(n, _)| (0..n.0.terms.len()).collect())
        .collect();
    let measure_choice_lists: Vec<Vec<usize>> = measure_slots
        .iter()
        .map(|(n, _)| (0..n.0.terms.len()).collect())
        .collect();

    let prepare_combinations: Vec<Vec<usize>> = cartesian_product(&prepare_choice_lists);
    let measure_combinations: Vec<Vec<usize>> = cartesian_product(&measure_choice_lists);

    let mut tapes = Vec::with_capacity(prepare_combinations.len() * measure_combinations.len());

    for prepare_choice in &prepare_combinations {
        for measure_choice in &measure_combinations {
            tapes.push(build_configuration_tape(
                tape,
                &prepare_slots,
                &measure_slots,
                prepare_choice,
                measure_choice,
            )?);
        }
    }

    tracing::trace!(
        configurations = tapes.len(),
        prepares = prepare_slots.len(),
        measures = measure_slots.len(),
        "expanded fragment into configurations"
    );

    Ok((
        tapes,
        prepare_slots.into_iter().map(|(n, _)| n).collect(),
        measure_slots.into_iter().map(|(n, _)| n).collect(),
    ))
}

fn cartesian_product(lists: &[Vec<usize>]) -> Vec<Vec<usize>> {
    if lists.is_empty() {
        return vec![Vec::new()];
    }
    lists
        .iter()
        .map(|l| l.iter().copied())
        .multi_cartesian_product()
        .collect()
}

fn build_configuration_tape(
    tape: &Tape,
    prepare_slots: &[(PrepareNode, Wire)],
    measure_slots: &[(MeasureNode, Wire)],
    prepare_choice: &[usize],
    measure_choice: &[usize],
) -> Result<Tape, CutError> {
    let mut out = Tape::new();
    let mut cut_factors: Vec<(Wire, Pauli)> = Vec::new();

    let mut prepare_iter = prepare_slots.iter().zip(prepare_choice.iter());
    let mut measure_iter = measure_slots.iter().zip(measure_choice.iter());

    for op in &tape.operations {
        match op {
            Operator::Prepare(node, wire) => {
                let ((expected_node, expected_wire), &choice) =
                    prepare_iter.next().expect("one prepare slot per node encountered");
                debug_assert!(expected_node == node && expected_wire == wire);
                let term = &node.0.terms[choice];
                for gate in (term.apply)(*wire) {
                    out.operations.push(Operator::Gate(gate));
                }
            }
            Operator::Measure(node, wire) => {
                let ((expected_node, expected_wire), &choice) =
                    measure_iter.next().expect("one measure slot per node encountered");
                debug_assert!(expected_node == node && expected_wire == wire);
                let pauli = node.0.terms[choice];
                cut_factors.push((*wire, pauli));
            }
            other => out.operations.push(other.clone()),
        }
    }

    let cut_observable = Observable::from_factors(cut_factors);

    let final_observable = match tape.measurements.first() {
        Some(m) => {
            let mut factors = m.observable.factors();
            for f in non_identity_factors(&cut_observable) {
                factors.push(f);
            }
            Observable::from_factors(factors).expect("user measurement has at least one factor")
        }
        None => match &cut_observable {
            Some(obs) if !obs.is_identity_only() => obs.clone(),
            _ => {
                let wire = tape
                    .wires()
                    .into_iter()
                    .next()
                    .or_else(|| cut_factors_wire(&cut_observable))
                    .unwrap_or(Wire::new(0));
                Observable::Single {
                    wire,
                    pauli: Pauli::I,
                }
            }
        },
    };

    out.measurements.push(crate::operator::Measurement::expval(final_observable));
    Ok(out)
}

fn non_identity_factors(obs: &Option<Observable>) -> Vec<(Wire, Pauli)> {
    match obs {
        Some(o) => o.factors(),
        None => Vec::new(),
    }
}

fn cut_factors_wire(obs: &Option<Observable>) -> Option<Wire> {
    obs.as_ref().and_then(|o| o.wires().into_iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gates::core::Gate;
    use crate::operator::{simple_expansion, Measurement, PrepareTerm};

    #[test]
    fn no_cut_no_measurement_fragment_yields_one_configuration() {
        let w0 = Wire::new(0);
        let tape = Tape::capture(|rec| {
            rec.apply(Operator::Gate(Gate::H(w0)));
        });
        let (tapes, prepares, measures) = expand_fragment(&tape).unwrap();
        assert_eq!(tapes.len(), 1);
        assert!(prepares.is_empty());
        assert!(measures.is_empty());
        // identity fallback: measures <I> on wire 0.
        assert_eq!(tapes[0].measurements.len(), 1);
    }

    #[test]
    fn one_prepare_and_one_measure_yields_sixteen_configurations() {
        let w0 = Wire::new(0);
        let (measure, prepare) = simple_expansion(w0);
        let tape = Tape {
            operations: vec![
                Operator::Prepare(prepare, w0),
                Operator::Gate(Gate::H(w0)),
                Operator::Measure(measure, w0),
            ],
            measurements: vec![],
        };
        let (tapes, prepares, measures) = expand_fragment(&tape).unwrap();
        assert_eq!(tapes.len(), 16);
        assert_eq!(prepares.len(), 1);
        assert_eq!(measures.len(), 1);
    }

    #[test]
    fn custom_two_term_expansion_yields_four_configurations() {
        // A caller-supplied expansion with cardinality 2 on each side: the
        // assembler must read the count from the nodes, not hard-code 4.
        let w0 = Wire::new(0);
        let measure = MeasureNode::new(vec![Pauli::I, Pauli::Z]);
        let prepare = PrepareNode::new(
            vec![
                PrepareTerm::new("|0>", |_w| Vec::new()),
                PrepareTerm::new("|1>", |w| vec![Gate::X(w)]),
            ],
            vec![vec![1.0, 1.0], vec![1.0, -1.0]],
        );
        let tape = Tape {
            operations: vec![
                Operator::Prepare(prepare, w0),
                Operator::Gate(Gate::H(w0)),
                Operator::Measure(measure, w0),
            ],
            measurements: vec![],
        };
        let (tapes, prepares, measures) = expand_fragment(&tape).unwrap();
        assert_eq!(tapes.len(), 4);
        assert_eq!(prepares[0].0.terms.len(), 2);
        assert_eq!(measures[0].0.terms.len(), 2);
    }

    #[test]
    fn multiple_user_measurements_is_an_error() {
        let w0 = Wire::new(0);
        let tape = Tape {
            operations: vec![Operator::Gate(Gate::H(w0))],
            measurements: vec![
                Measurement::expval(Observable::Single {
                    wire: w0,
                    pauli: Pauli::Z,
                }),
                Measurement::expval(Observable::Single {
                    wire: w0,
                    pauli: Pauli::X,
                }),
            ],
        };
        assert!(matches!(
            expand_fragment(&tape),
            Err(CutError::MultipleMeasurements { count: 2 })
        ));
    }
}
