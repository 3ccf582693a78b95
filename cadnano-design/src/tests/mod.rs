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

mod crossover_topology;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn snapshot(design: &Design) -> String {
    serde_json::to_string(design).unwrap()
}

/// Two neighbouring helices of the default length on a honeycomb lattice. Helix 0 is at (0, 0)
/// and helix 1 at (0, 1).
fn honeycomb_pair() -> Design {
    let mut design = Design::new(LatticeType::Honeycomb);
    design.create_virtual_helix(LatticeCoord::new(0, 0)).unwrap();
    design.create_virtual_helix(LatticeCoord::new(0, 1)).unwrap();
    design.take_notifications();
    design
}

/// Run an operation that must fail with `expected`, and check that it left no trace on the
/// design.
fn assert_rejected<T, F>(design: &mut Design, operation: F, expected: ErrOperation)
where
    T: std::fmt::Debug,
    F: FnOnce(&mut Design) -> Result<T, ErrOperation>,
{
    design.take_notifications();
    let before = snapshot(design);
    let result = operation(design);
    assert_eq!(result.unwrap_err(), expected);
    assert_eq!(snapshot(design), before);
    assert!(design.take_notifications().is_empty());
}

fn assert_good_strand<S: std::ops::Deref<Target = str>>(strand: &Strand, objective: S) {
    use regex::Regex;
    let re = Regex::new(r#"\[[^\]]*\]"#).unwrap();
    let formated_strand = strand.to_string();
    let left: Vec<_> = re.find_iter(&formated_strand).map(|m| m.as_str()).collect();
    let right: Vec<_> = re.find_iter(&objective).map(|m| m.as_str()).collect();
    assert_eq!(left, right);
}

fn coords_around_origin() -> impl Iterator<Item = LatticeCoord> {
    (-6..6).flat_map(|row| (-6..6).map(move |col| LatticeCoord::new(row, col)))
}

#[test]
fn lattice_round_trip() {
    for lattice_type in [LatticeType::Honeycomb, LatticeType::Square].iter() {
        let lattice = Lattice::new(*lattice_type, 1.125);
        for coord in coords_around_origin() {
            let position = lattice.lattice_to_position(coord);
            assert_eq!(
                lattice.position_to_lattice_coord(position),
                coord,
                "{} lattice",
                lattice_type
            );
        }
    }
}

#[test]
fn slightly_moved_points_snap_back() {
    let lattice = Lattice::new(LatticeType::Honeycomb, 1.);
    for coord in coords_around_origin() {
        let position = lattice.lattice_to_position(coord) + ultraviolet::Vec2::new(0.3, -0.2);
        assert_eq!(lattice.position_to_lattice_coord(position), coord);
    }
}

#[test]
fn honeycomb_positions() {
    let lattice = Lattice::new(LatticeType::Honeycomb, 1.);
    let odd = lattice.lattice_to_position(LatticeCoord::new(0, 1));
    assert!((odd.x - 3f32.sqrt()).abs() < 1e-5);
    assert!((odd.y - 1.).abs() < 1e-5);
    let even = lattice.lattice_to_position(LatticeCoord::new(2, 0));
    assert!(even.x.abs() < 1e-5);
    assert!((even.y + 6.).abs() < 1e-5);
}

#[test]
fn square_positions() {
    let lattice = Lattice::new(LatticeType::Square, 1.);
    let position = lattice.lattice_to_position(LatticeCoord::new(1, 2));
    assert!((position.x - 4.).abs() < 1e-5);
    assert!((position.y + 2.).abs() < 1e-5);
}

#[test]
fn parity_only_depends_on_coordinates_mod_2() {
    for coord in coords_around_origin() {
        let parity = coord.is_even_parity();
        assert_eq!(LatticeCoord::new(coord.row + 2, coord.col).is_even_parity(), parity);
        assert_eq!(LatticeCoord::new(coord.row, coord.col - 2).is_even_parity(), parity);
        assert_ne!(LatticeCoord::new(coord.row + 1, coord.col).is_even_parity(), parity);
    }
    assert!(LatticeCoord::new(0, 0).is_even_parity());
    assert!(!LatticeCoord::new(0, 1).is_even_parity());
    assert!(LatticeCoord::new(-1, 1).is_even_parity());
}

#[test]
fn honeycomb_neighbours_depend_on_parity() {
    use std::collections::BTreeSet;
    let lattice = Lattice::new(LatticeType::Honeycomb, 1.);
    let even: BTreeSet<_> = lattice
        .neighbour_coords(LatticeCoord::new(0, 0))
        .into_iter()
        .collect();
    let expected: BTreeSet<_> = vec![(0, -1), (0, 1), (1, 0)]
        .into_iter()
        .map(LatticeCoord::from)
        .collect();
    assert_eq!(even, expected);

    let odd: BTreeSet<_> = lattice
        .neighbour_coords(LatticeCoord::new(0, 1))
        .into_iter()
        .collect();
    let expected: BTreeSet<_> = vec![(0, 0), (0, 2), (-1, 1)]
        .into_iter()
        .map(LatticeCoord::from)
        .collect();
    assert_eq!(odd, expected);
}

#[test]
fn neighbours_are_two_radii_apart() {
    for lattice_type in [LatticeType::Honeycomb, LatticeType::Square].iter() {
        let lattice = Lattice::new(*lattice_type, 1.125);
        for coord in coords_around_origin() {
            let neighbours = lattice.neighbour_coords(coord);
            assert_eq!(neighbours.len(), lattice_type.nb_neighbour_slots());
            let position = lattice.lattice_to_position(coord);
            for n in neighbours {
                let dist = (lattice.lattice_to_position(n) - position).mag();
                assert!((dist - 2.25).abs() < 1e-4, "{} -> {}: {}", coord, n, dist);
            }
        }
    }
}

#[test]
fn neighbour_slots_are_symmetric() {
    for lattice_type in [LatticeType::Honeycomb, LatticeType::Square].iter() {
        let lattice = Lattice::new(*lattice_type, 1.);
        for coord in coords_around_origin() {
            for (slot, n) in lattice.neighbour_coords(coord).into_iter().enumerate() {
                assert_eq!(lattice.neighbour_slot(n, coord), Some(slot));
            }
        }
    }
}

#[test]
fn helices_get_fresh_ids_and_default_length() {
    let design = honeycomb_pair();
    assert_eq!(design.helix_ids(), vec![0, 1]);
    assert_eq!(design.helix(0).unwrap().length, 42);
    assert_eq!(design.helix_at(LatticeCoord::new(0, 1)), Some(1));
    assert_eq!(design.helix_at(LatticeCoord::new(1, 1)), None);

    let mut square = Design::new(LatticeType::Square);
    let h_id = square.create_virtual_helix(LatticeCoord::new(3, -2)).unwrap();
    assert_eq!(square.helix(h_id).unwrap().length, 64);
}

#[test]
fn duplicate_coordinate_is_rejected() {
    let mut design = honeycomb_pair();
    assert_rejected(
        &mut design,
        |d| d.create_virtual_helix(LatticeCoord::new(0, 0)),
        ErrOperation::DuplicateCoordinate {
            coord: LatticeCoord::new(0, 0),
            helix: 0,
        },
    );
    assert_eq!(design.helices().len(), 2);
}

#[test]
fn remove_helix() {
    let mut design = honeycomb_pair();
    let s_id = design.create_strand(1, true, 0, 10).unwrap();
    assert_rejected(
        &mut design,
        |d| d.remove_virtual_helix(1),
        ErrOperation::HasActiveStrands(1),
    );
    assert_rejected(
        &mut design,
        |d| d.remove_virtual_helix(7),
        ErrOperation::HelixDoesNotExist(7),
    );

    design.remove_strand(s_id).unwrap();
    design.remove_virtual_helix(1).unwrap();
    assert_eq!(design.helix_ids(), vec![0]);
    assert_eq!(design.helix_at(LatticeCoord::new(0, 1)), None);
    assert_eq!(design.neighbours_of(0).unwrap().len(), 0);
    // The coordinate is free again.
    assert!(design.create_virtual_helix(LatticeCoord::new(0, 1)).is_ok());
}

#[test]
fn neighbours_are_live_helices() {
    let mut design = honeycomb_pair();
    let h2 = design.create_virtual_helix(LatticeCoord::new(1, 0)).unwrap();
    design.create_virtual_helix(LatticeCoord::new(1, 1)).unwrap();
    let neighbours: Vec<usize> = design.neighbours_of(0).unwrap().into_iter().collect();
    assert_eq!(neighbours, vec![1, h2]);
    assert_eq!(
        design.neighbours_of(12).unwrap_err(),
        ErrOperation::HelixDoesNotExist(12)
    );
}

#[test]
fn insertions_and_skips() {
    let mut design = honeycomb_pair();
    design.set_insertion(0, 5, 2).unwrap();
    design.set_insertion(0, 9, -1).unwrap();
    assert_eq!(design.helix(0).unwrap().insertion_at(5), Some(Insertion::Loop(2)));
    assert!(design.helix(0).unwrap().is_skip(9));
    assert_eq!(design.helix(0).unwrap().nb_bases(), 43);
    assert_eq!(design.insertions(0).unwrap().len(), 2);

    design.set_insertion(0, 5, 0).unwrap();
    assert_eq!(design.insertions(0).unwrap().len(), 1);
    assert_eq!(
        design.take_notifications().last(),
        Some(&DesignNotification::InsertionChanged {
            helix: 0,
            base_idx: 5
        })
    );

    assert_rejected(
        &mut design,
        |d| d.set_insertion(0, 42, 1),
        ErrOperation::IndexOutOfRange {
            helix: 0,
            index: 42,
            length: 42,
        },
    );
    assert_rejected(
        &mut design,
        |d| d.set_insertion(0, -1, 1),
        ErrOperation::IndexOutOfRange {
            helix: 0,
            index: -1,
            length: 42,
        },
    );
}

#[test]
fn shrinking_helix_requires_force() {
    init_logger();
    let mut design = honeycomb_pair();
    let kept = design.create_strand(0, true, 0, 10).unwrap();
    let cut = design.create_strand(0, true, 15, 30).unwrap();
    design.set_insertion(0, 3, 1).unwrap();
    design.set_insertion(0, 25, -1).unwrap();

    assert_rejected(
        &mut design,
        |d| d.resize_virtual_helix(0, 21, false),
        ErrOperation::WouldOrphanData {
            helix: 0,
            length: 21,
        },
    );

    design.take_notifications();
    design.resize_virtual_helix(0, 21, true).unwrap();
    assert_eq!(design.helix(0).unwrap().length, 21);
    assert!(design.strand(kept).is_some());
    assert!(design.strand(cut).is_none());
    assert_eq!(
        design.insertions(0).unwrap().keys().cloned().collect::<Vec<_>>(),
        vec![3]
    );
    let notifications = design.take_notifications();
    assert!(notifications.contains(&DesignNotification::StrandRemoved(cut)));
    assert_eq!(
        notifications.last(),
        Some(&DesignNotification::HelixResized {
            helix: 0,
            length: 21
        })
    );
}

#[test]
fn resizing_without_orphans() {
    let mut design = honeycomb_pair();
    design.create_strand(0, false, 0, 10).unwrap();
    design.resize_virtual_helix(0, 11, false).unwrap();
    design.resize_virtual_helix(0, 100, false).unwrap();
    assert_eq!(design.helix(0).unwrap().length, 100);
    assert_eq!(design.max_base_idx(), Some(99));
}

#[test]
fn max_base_idx() {
    let mut design = Design::new(LatticeType::Square);
    assert_eq!(design.max_base_idx(), None);
    design
        .create_virtual_helix_with_length(LatticeCoord::new(0, 0), 0)
        .unwrap();
    assert_eq!(design.max_base_idx(), None);
    design.create_virtual_helix(LatticeCoord::new(0, 1)).unwrap();
    assert_eq!(design.max_base_idx(), Some(63));
}

#[test]
fn helix_properties() {
    let mut design = honeycomb_pair();
    design.set_helix_visibility(1, false).unwrap();
    design.set_helix_placement(1, 3.4, 90.).unwrap();
    let helix = design.helix(1).unwrap();
    assert!(!helix.visible);
    assert_eq!(helix.z_offset, 3.4);
    assert_eq!(helix.euler_z, 90.);
    assert_eq!(
        design.take_notifications(),
        vec![
            DesignNotification::HelixPropertyChanged(1),
            DesignNotification::HelixPropertyChanged(1)
        ]
    );
    assert_rejected(
        &mut design,
        |d| d.set_helix_visibility(4, true),
        ErrOperation::HelixDoesNotExist(4),
    );
}

#[test]
fn helix_position_uses_lattice_radius() {
    let design = honeycomb_pair();
    let position = design.helix_position(1).unwrap();
    assert!((position.x - 1.125 * 3f32.sqrt()).abs() < 1e-5);
    assert!((position.y - 1.125).abs() < 1e-5);
    assert!(design.helix_position(2).is_none());
}

#[test]
fn failed_operations_do_not_notify() {
    let mut design = Design::new(LatticeType::Honeycomb);
    design.create_virtual_helix(LatticeCoord::new(0, 0)).unwrap();
    assert!(design.create_virtual_helix(LatticeCoord::new(0, 0)).is_err());
    assert_eq!(
        design.take_notifications(),
        vec![DesignNotification::HelixAdded(0)]
    );
    assert!(design.take_notifications().is_empty());
}

#[test]
fn design_survives_serialization() {
    let mut design = honeycomb_pair();
    let a = design.create_strand(0, true, 0, 11).unwrap();
    let b = design.create_strand(1, false, 0, 11).unwrap();
    design.create_xover(a, 11, b, 11).unwrap();
    design.set_insertion(1, 4, -1).unwrap();
    design.set_helix_visibility(0, false).unwrap();

    let json = snapshot(&design);
    let loaded: Design = serde_json::from_str(&json).unwrap();
    assert_eq!(snapshot(&loaded), json);
    assert_eq!(loaded.helix_at(LatticeCoord::new(0, 1)), Some(1));
    assert_eq!(loaded.strand_at(&Nucl::new(1, 5, false)), Some(b));
    assert_eq!(loaded.xovers(), design.xovers());
    assert!(loaded.helix(1).unwrap().is_skip(4));
    assert!(!loaded.helix(0).unwrap().visible);
}

#[test]
fn legacy_arrays() {
    let mut design = honeycomb_pair();
    let a = design.create_strand(0, true, 0, 11).unwrap();
    let b = design.create_strand(1, false, 0, 11).unwrap();
    design.create_xover(a, 11, b, 11).unwrap();

    let forward = design.legacy_strand_set_array(0, true).unwrap();
    assert_eq!(forward.len(), 42);
    assert_eq!(forward[0], [-1, -1, 0, 1]);
    assert_eq!(forward[5], [0, 4, 0, 6]);
    assert_eq!(forward[11], [0, 10, 1, 11]);
    assert_eq!(forward[12], LEGACY_EMPTY_BASE);

    let reverse = design.legacy_strand_set_array(1, false).unwrap();
    assert_eq!(reverse[11], [0, 11, 1, 10]);
    assert_eq!(reverse[5], [1, 6, 1, 4]);
    assert_eq!(reverse[0], [1, 1, -1, -1]);

    let empty = design.legacy_strand_set_array(1, true).unwrap();
    assert!(empty.iter().all(|base| *base == LEGACY_EMPTY_BASE));

    design.set_insertion(0, 3, 2).unwrap();
    design.set_insertion(0, 7, -1).unwrap();
    let (loops, skips) = design.legacy_insertion_arrays(0).unwrap();
    assert_eq!(loops.len(), 42);
    assert_eq!(loops[3], 2);
    assert_eq!(skips[7], -1);
    assert_eq!(loops.iter().sum::<isize>(), 2);
    assert_eq!(skips.iter().sum::<isize>(), -1);
}
