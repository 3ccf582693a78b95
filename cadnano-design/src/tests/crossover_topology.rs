/*
cadnano, a design engine for DNA nanostructures.
    Copyright (C) 2021  Nicolas Levy <nicolaspierrelevy@gmail.com> and Nicolas Schabanel <nicolas.schabanel@ens-lyon.fr>

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU General Public License as published by
    the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU General Public License for more details.

    You should have received a copy of the GNU General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use super::*;

fn indices(hits: &[XoverHit]) -> Vec<isize> {
    hits.iter().map(|h| h.index).collect()
}

#[test]
fn honeycomb_potential_crossovers() {
    init_logger();
    let parameters = Parameters {
        helix_radius: 1.,
        inter_helix_gap: 0.,
        ..Parameters::DEFAULT
    };
    let mut design = Design::with_parameters(LatticeType::Honeycomb, parameters);
    assert_eq!(design.create_virtual_helix(LatticeCoord::new(0, 0)), Ok(0));
    assert_eq!(design.create_virtual_helix(LatticeCoord::new(0, 1)), Ok(1));
    design.set_insertion(0, 5, 2).unwrap();

    let xovers = design.potential_crossovers(0, 5).unwrap();
    assert_eq!(xovers.keys().cloned().collect::<Vec<_>>(), vec![1]);
    let to_1 = &xovers[&1];
    assert_eq!(indices(&to_1.forward), vec![1, 2, 11, 12]);
    assert_eq!(indices(&to_1.reverse), vec![6, 7]);
    assert_eq!(
        to_1.forward.iter().map(|h| h.side).collect::<Vec<_>>(),
        vec![XoverSide::Low, XoverSide::High, XoverSide::Low, XoverSide::High]
    );
    for hit in to_1.forward.iter() {
        assert!(hit.forward_targets.is_empty());
        assert_eq!(hit.reverse_targets, vec![hit.index]);
    }
    for hit in to_1.reverse.iter() {
        assert_eq!(hit.forward_targets, vec![hit.index]);
        assert!(hit.reverse_targets.is_empty());
    }
}

#[test]
fn crossovers_of_the_second_repeat() {
    let design = honeycomb_pair();
    let xovers = design.potential_crossovers(0, 30).unwrap();
    assert_eq!(indices(&xovers[&1].forward), vec![22, 23, 32, 33]);
    assert_eq!(indices(&xovers[&1].reverse), vec![27, 28]);
}

#[test]
fn crossovers_seen_from_the_odd_helix() {
    let design = honeycomb_pair();
    let xovers = design.potential_crossovers(1, 0).unwrap();
    // On odd helices the scaffold runs on the reverse strand.
    assert_eq!(indices(&xovers[&0].reverse), vec![1, 2, 11, 12]);
    assert_eq!(indices(&xovers[&0].forward), vec![6, 7]);
}

#[test]
fn every_live_neighbour_is_reported() {
    let mut design = honeycomb_pair();
    let h2 = design.create_virtual_helix(LatticeCoord::new(1, 0)).unwrap();
    let h3 = design.create_virtual_helix(LatticeCoord::new(0, -1)).unwrap();
    let xovers = design.potential_crossovers(0, 0).unwrap();
    assert_eq!(xovers.keys().cloned().collect::<Vec<_>>(), vec![1, h2, h3]);
    assert_eq!(indices(&xovers[&h2].forward), vec![8, 9, 18, 19]);
    assert_eq!(indices(&xovers[&h2].reverse), vec![13, 14]);
    assert_eq!(indices(&xovers[&h3].forward), vec![4, 5, 15, 16]);
    assert_eq!(indices(&xovers[&h3].reverse), vec![0, 20]);
}

#[test]
fn isolated_helix_has_no_crossovers() {
    let mut design = honeycomb_pair();
    let h_id = design.create_virtual_helix(LatticeCoord::new(5, 5)).unwrap();
    assert!(design.potential_crossovers(h_id, 3).unwrap().is_empty());
}

#[test]
fn square_potential_crossovers() {
    let mut design = Design::new(LatticeType::Square);
    design.create_virtual_helix(LatticeCoord::new(0, 0)).unwrap();
    design.create_virtual_helix(LatticeCoord::new(0, 1)).unwrap();
    let h2 = design.create_virtual_helix(LatticeCoord::new(-1, 0)).unwrap();
    let xovers = design.potential_crossovers(0, 40).unwrap();
    assert_eq!(
        indices(&xovers[&1].forward),
        vec![36, 37, 47, 48, 58, 59]
    );
    assert_eq!(indices(&xovers[&1].reverse), vec![32, 63]);
    assert_eq!(indices(&xovers[&h2].forward), vec![34, 35, 44, 45, 55, 56]);
    assert_eq!(indices(&xovers[&h2].reverse), vec![39, 40]);
}

#[test]
fn crossovers_stay_in_range_of_shorter_neighbour() {
    let mut design = Design::new(LatticeType::Honeycomb);
    design.create_virtual_helix(LatticeCoord::new(0, 0)).unwrap();
    design
        .create_virtual_helix_with_length(LatticeCoord::new(0, 1), 10)
        .unwrap();
    design
        .create_virtual_helix_with_length(LatticeCoord::new(1, 0), 30)
        .unwrap();

    let xovers = design.potential_crossovers(0, 5).unwrap();
    assert_eq!(indices(&xovers[&1].forward), vec![1, 2]);
    assert_eq!(indices(&xovers[&1].reverse), vec![6, 7]);

    for base_idx in 0..42 {
        let xovers = design.potential_crossovers(0, base_idx).unwrap();
        for (n_id, potential) in xovers.iter() {
            let length = design.helix(*n_id).unwrap().length as isize;
            for hit in potential.forward.iter().chain(potential.reverse.iter()) {
                assert!(hit.index >= 0 && hit.index < length);
                for target in hit.forward_targets.iter().chain(hit.reverse_targets.iter()) {
                    assert!(*target >= 0 && *target < length);
                }
            }
        }
    }
}

#[test]
fn skipped_bases_cannot_hold_crossovers() {
    let mut design = honeycomb_pair();
    design.set_insertion(1, 11, -1).unwrap();
    design.set_insertion(0, 7, -1).unwrap();
    let xovers = design.potential_crossovers(0, 0).unwrap();
    assert_eq!(indices(&xovers[&1].forward), vec![1, 2, 12]);
    assert_eq!(indices(&xovers[&1].reverse), vec![6]);
}

#[test]
fn potential_crossovers_of_invalid_base() {
    let design = honeycomb_pair();
    assert_eq!(
        design.potential_crossovers(9, 0).unwrap_err(),
        ErrOperation::HelixDoesNotExist(9)
    );
    assert_eq!(
        design.potential_crossovers(0, 42).unwrap_err(),
        ErrOperation::IndexOutOfRange {
            helix: 0,
            index: 42,
            length: 42
        }
    );
}

#[test]
fn reachability() {
    let design = honeycomb_pair();
    // Scaffold, at the high end of the strands.
    assert!(design.is_xover_reachable(Nucl::new(0, 11, true), Nucl::new(1, 11, false)));
    assert!(!design.is_xover_reachable(Nucl::new(1, 1, false), Nucl::new(0, 1, true)));
    // Scaffold, at the low end of the strands.
    assert!(design.is_xover_reachable(Nucl::new(1, 12, false), Nucl::new(0, 12, true)));
    // Staples.
    assert!(design.is_xover_reachable(Nucl::new(0, 7, false), Nucl::new(1, 7, true)));
    assert!(design.is_xover_reachable(Nucl::new(1, 27, true), Nucl::new(0, 27, false)));

    assert!(!design.is_xover_reachable(Nucl::new(0, 10, true), Nucl::new(1, 10, false)));
    assert!(!design.is_xover_reachable(Nucl::new(0, 11, true), Nucl::new(1, 12, false)));
    assert!(!design.is_xover_reachable(Nucl::new(0, 11, true), Nucl::new(1, 11, true)));
    assert!(!design.is_xover_reachable(Nucl::new(0, 11, true), Nucl::new(0, 11, false)));
    assert!(!design.is_xover_reachable(Nucl::new(0, 11, true), Nucl::new(4, 11, false)));
}

#[test]
fn reachability_needs_neighbours() {
    let mut design = honeycomb_pair();
    let far = design.create_virtual_helix(LatticeCoord::new(0, 3)).unwrap();
    assert!(!design.is_xover_reachable(Nucl::new(0, 11, true), Nucl::new(far, 11, false)));
}

#[test]
fn create_and_remove_xover() {
    let mut design = honeycomb_pair();
    let a = design.create_strand(0, true, 0, 11).unwrap();
    let b = design.create_strand(1, false, 0, 11).unwrap();
    design.take_notifications();

    let xover = design.create_xover(b, 11, a, 11).unwrap();
    assert_eq!(xover.from, Nucl::new(0, 11, true));
    assert_eq!(xover.to, Nucl::new(1, 11, false));
    assert!(design.has_xover_at(a, 11).unwrap());
    assert!(design.has_xover_at(b, 11).unwrap());
    assert!(!design.has_xover_at(a, 0).unwrap());
    assert!(!design.has_xover_at(a, 5).unwrap());
    assert_eq!(design.xovers(), vec![xover]);
    assert_eq!(
        design.take_notifications(),
        vec![DesignNotification::XoverAdded(xover)]
    );

    assert_eq!(design.remove_xover(b, 11), Ok(xover));
    assert!(!design.has_xover_at(a, 11).unwrap());
    assert!(!design.has_xover_at(b, 11).unwrap());
    assert!(design.xovers().is_empty());
    assert_rejected(
        &mut design,
        |d| d.remove_xover(a, 11),
        ErrOperation::XoverDoesNotExist {
            strand: a,
            index: 11,
        },
    );
    assert_rejected(
        &mut design,
        |d| d.remove_xover(a, 4),
        ErrOperation::NotStrandEnd {
            strand: a,
            index: 4,
        },
    );
}

#[test]
fn staple_crossover() {
    let mut design = honeycomb_pair();
    let a = design.create_strand(0, false, 7, 15).unwrap();
    let b = design.create_strand(1, true, 7, 15).unwrap();
    let xover = design.create_xover(a, 7, b, 7).unwrap();
    assert_eq!(xover.from, Nucl::new(0, 7, false));
    assert_eq!(xover.to, Nucl::new(1, 7, true));
    assert_eq!(design.oligo_of(a).unwrap().strands, vec![a, b]);
}

#[test]
fn rejected_crossovers_leave_strands_untouched() {
    let mut design = honeycomb_pair();
    let h2 = design.create_virtual_helix(LatticeCoord::new(1, 0)).unwrap();
    let a = design.create_strand(0, true, 0, 11).unwrap();
    let b = design.create_strand(1, false, 0, 11).unwrap();
    let other = design.create_strand(h2, false, 0, 11).unwrap();
    let short = design.create_strand(0, true, 20, 30).unwrap();
    let short_partner = design.create_strand(1, false, 20, 30).unwrap();

    assert_rejected(
        &mut design,
        |d| d.create_xover(a, 5, b, 11),
        ErrOperation::NotStrandEnd {
            strand: a,
            index: 5,
        },
    );
    assert_rejected(
        &mut design,
        |d| d.create_xover(a, 11, a, 11),
        ErrOperation::SelfLoop(a),
    );
    assert_rejected(
        &mut design,
        |d| d.create_xover(a, 11, b, 0),
        ErrOperation::XoverPolarityMismatch,
    );
    assert_rejected(
        &mut design,
        |d| d.create_xover(short, 30, short_partner, 30),
        ErrOperation::UnreachableXover {
            from: Nucl::new(0, 30, true),
            to: Nucl::new(1, 30, false),
        },
    );
    assert_rejected(
        &mut design,
        |d| d.create_xover(a, 11, StrandId(42), 11),
        ErrOperation::StrandDoesNotExist(StrandId(42)),
    );

    design.create_xover(a, 11, b, 11).unwrap();
    assert_rejected(
        &mut design,
        |d| d.create_xover(a, 11, other, 11),
        ErrOperation::EndpointOccupied {
            strand: a,
            index: 11,
        },
    );
    assert!(!design.has_xover_at(other, 11).unwrap());
    assert_eq!(
        design.strand(b).unwrap().prime5_xover(),
        Some(Nucl::new(0, 11, true))
    );

    // The forced version ignores the crossover rules but not the end rules.
    let forced = design
        .force_create_xover(short, 30, short_partner, 30)
        .unwrap();
    assert_eq!(forced.from, Nucl::new(0, 30, true));
    assert_rejected(
        &mut design,
        |d| d.force_create_xover(b, 11, other, 11),
        ErrOperation::EndpointOccupied {
            strand: b,
            index: 11,
        },
    );
}
