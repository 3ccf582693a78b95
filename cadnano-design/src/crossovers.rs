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
//! Crossover rules of the cadnano lattices.
//!
//! A cross-over joins the same base index on two antiparallel strands of neighbouring helices.
//! Whether a cross-over is possible at a given index depends only on the position of the index
//! in the helical repeat. The tables below list, for each neighbour slot, the repeat-relative
//! indices at which a cross-over can be made.
//!
//! "Low" cross-overs sit at the high end of the two joined strands, "high" cross-overs at their
//! low end. Scaffold tables apply to the strand direction that carries the scaffold on the helix
//! (forward on even helices, reverse on odd helices), staple tables to the other direction.

use super::{Design, ErrOperation, LatticeType, Nucl, VirtualHelix};
use std::collections::BTreeMap;

const HONEYCOMB_SCAF_LOW: &[&[isize]] = &[&[1, 11], &[8, 18], &[4, 15]];
const HONEYCOMB_SCAF_HIGH: &[&[isize]] = &[&[2, 12], &[9, 19], &[5, 16]];
const HONEYCOMB_STAP_LOW: &[&[isize]] = &[&[6], &[13], &[20]];
const HONEYCOMB_STAP_HIGH: &[&[isize]] = &[&[7], &[14], &[0]];

const SQUARE_SCAF_LOW: &[&[isize]] = &[&[4, 26, 15], &[18, 28, 7], &[10, 20, 31], &[2, 12, 23]];
const SQUARE_SCAF_HIGH: &[&[isize]] = &[&[5, 27, 16], &[19, 29, 8], &[11, 21, 0], &[3, 13, 24]];
const SQUARE_STAP_LOW: &[&[isize]] = &[&[31], &[23], &[15], &[7]];
const SQUARE_STAP_HIGH: &[&[isize]] = &[&[0], &[24], &[16], &[8]];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum XoverSide {
    /// At the high end of the joined strands.
    Low,
    /// At the low end of the joined strands.
    High,
}

impl XoverSide {
    /// The side of a cross-over leaving the 3' end of a strand of direction `forward`.
    pub fn of_prime3_end(forward: bool) -> Self {
        if forward {
            Self::Low
        } else {
            Self::High
        }
    }
}

/// The repeat-relative indices at which a cross-over to the neighbour in slot `slot` is possible.
pub fn rule_offsets(
    lattice_type: LatticeType,
    scaffold: bool,
    side: XoverSide,
    slot: usize,
) -> &'static [isize] {
    let table = match (lattice_type, scaffold, side) {
        (LatticeType::Honeycomb, true, XoverSide::Low) => HONEYCOMB_SCAF_LOW,
        (LatticeType::Honeycomb, true, XoverSide::High) => HONEYCOMB_SCAF_HIGH,
        (LatticeType::Honeycomb, false, XoverSide::Low) => HONEYCOMB_STAP_LOW,
        (LatticeType::Honeycomb, false, XoverSide::High) => HONEYCOMB_STAP_HIGH,
        (LatticeType::Square, true, XoverSide::Low) => SQUARE_SCAF_LOW,
        (LatticeType::Square, true, XoverSide::High) => SQUARE_SCAF_HIGH,
        (LatticeType::Square, false, XoverSide::Low) => SQUARE_STAP_LOW,
        (LatticeType::Square, false, XoverSide::High) => SQUARE_STAP_HIGH,
    };
    table.get(slot).cloned().unwrap_or(&[])
}

/// A cross-over from the 3' end `from` to the 5' end `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Crossover {
    pub from: Nucl,
    pub to: Nucl,
}

/// A base index of the active helix at which a cross-over to a neighbour is possible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct XoverHit {
    pub index: isize,
    pub side: XoverSide,
    /// Reachable indices on the forward strand of the neighbour.
    pub forward_targets: Vec<isize>,
    /// Reachable indices on the reverse strand of the neighbour.
    pub reverse_targets: Vec<isize>,
}

/// The potential cross-overs between an active helix and one of its neighbours, sorted by index.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PotentialXovers {
    /// Hits on the forward strand of the active helix.
    pub forward: Vec<XoverHit>,
    /// Hits on the reverse strand of the active helix.
    pub reverse: Vec<XoverHit>,
}

impl PotentialXovers {
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty() && self.reverse.is_empty()
    }
}

impl Design {
    /// Compute the cross-overs that can be made between helix `h_id` and each of its live
    /// neighbours, inside the helical repeat that contains `base_idx`.
    ///
    /// Indices that are out of the range of either helix, or that are skipped on either helix,
    /// are not reported. Every live neighbour has an entry in the returned map, possibly empty.
    pub fn potential_crossovers(
        &self,
        h_id: usize,
        base_idx: isize,
    ) -> Result<BTreeMap<usize, PotentialXovers>, ErrOperation> {
        let helix = self.try_get_helix(h_id)?;
        if !helix.contains_index(base_idx) {
            return Err(ErrOperation::IndexOutOfRange {
                helix: h_id,
                index: base_idx,
                length: helix.length,
            });
        }
        let period = self.bases_per_repeat() as isize;
        let repeat_start = base_idx - base_idx.rem_euclid(period);
        log::trace!(
            "potential crossovers of helix {} around {}, repeat starts at {}",
            h_id,
            base_idx,
            repeat_start
        );

        let mut ret = BTreeMap::new();
        for (slot, n_id) in self.neighbours_with_slots(h_id)? {
            let neighbour = self.try_get_helix(n_id)?;
            let xovers = PotentialXovers {
                forward: self.hits(helix, neighbour, slot, true, repeat_start),
                reverse: self.hits(helix, neighbour, slot, false, repeat_start),
            };
            ret.insert(n_id, xovers);
        }
        Ok(ret)
    }

    fn hits(
        &self,
        helix: &VirtualHelix,
        neighbour: &VirtualHelix,
        slot: usize,
        forward: bool,
        repeat_start: isize,
    ) -> Vec<XoverHit> {
        let scaffold = forward == helix.scaffold_is_forward();
        let mut ret = Vec::new();
        for side in [XoverSide::Low, XoverSide::High].iter() {
            for offset in rule_offsets(self.lattice_type, scaffold, *side, slot) {
                let index = repeat_start + offset;
                if !joinable_at(helix, neighbour, index) {
                    continue;
                }
                let (forward_targets, reverse_targets) = if forward {
                    (vec![], vec![index])
                } else {
                    (vec![index], vec![])
                };
                ret.push(XoverHit {
                    index,
                    side: *side,
                    forward_targets,
                    reverse_targets,
                });
            }
        }
        ret.sort_by_key(|hit| hit.index);
        ret
    }

    /// Return true if a cross-over from the 3' end `from` to the 5' end `to` is allowed by the
    /// crossover rules of the lattice.
    pub fn is_xover_reachable(&self, from: Nucl, to: Nucl) -> bool {
        if from.position != to.position || from.forward == to.forward || from.helix == to.helix {
            return false;
        }
        let (h_from, h_to) = match (self.helix(from.helix), self.helix(to.helix)) {
            (Some(h_from), Some(h_to)) => (h_from, h_to),
            _ => return false,
        };
        if !joinable_at(h_from, h_to, from.position) {
            return false;
        }
        let slot = match self.lattice().neighbour_slot(h_from.coord, h_to.coord) {
            Some(slot) => slot,
            None => return false,
        };
        let scaffold = from.forward == h_from.scaffold_is_forward();
        let side = XoverSide::of_prime3_end(from.forward);
        let offset = from.position.rem_euclid(self.bases_per_repeat() as isize);
        rule_offsets(self.lattice_type, scaffold, side, slot).contains(&offset)
    }
}

fn joinable_at(helix: &VirtualHelix, neighbour: &VirtualHelix, index: isize) -> bool {
    helix.contains_index(index)
        && neighbour.contains_index(index)
        && !helix.is_skip(index)
        && !neighbour.is_skip(index)
}
