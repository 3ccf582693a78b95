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
//! Per-base views of a helix in the layout of the legacy cadnano `vstrands` format.

use super::{Design, ErrOperation, Extremity, Insertion};

/// The connectivity of one base: `[prev_helix, prev_idx, next_helix, next_idx]`, where "prev"
/// is the 5' neighbour of the base and "next" its 3' neighbour. `-1` means "none".
pub type LegacyBase = [isize; 4];

pub const LEGACY_EMPTY_BASE: LegacyBase = [-1, -1, -1, -1];

impl Design {
    /// The connectivity of every base of one strand set of helix `h_id`, ordered by base index.
    pub fn legacy_strand_set_array(
        &self,
        h_id: usize,
        forward: bool,
    ) -> Result<Vec<LegacyBase>, ErrOperation> {
        let helix = self.try_get_helix(h_id)?;
        let mut ret = vec![LEGACY_EMPTY_BASE; helix.length];
        let strand_set = match self.strand_set(h_id, forward) {
            Some(set) => set,
            None => return Ok(ret),
        };
        let h = h_id as isize;
        for s_id in strand_set.strand_ids() {
            let strand = self.try_get_strand(s_id)?;
            for nucl in strand.nucls() {
                let (prev_helix, prev_idx) = match strand.extremity(nucl.position) {
                    Extremity::Prime5 => strand
                        .prime5_xover()
                        .map(|n| (n.helix as isize, n.position))
                        .unwrap_or((-1, -1)),
                    _ => (h, nucl.prime5().position),
                };
                let (next_helix, next_idx) = match strand.extremity(nucl.position) {
                    Extremity::Prime3 => strand
                        .prime3_xover()
                        .map(|n| (n.helix as isize, n.position))
                        .unwrap_or((-1, -1)),
                    _ => (h, nucl.prime3().position),
                };
                if let Some(base) = ret.get_mut(nucl.position as usize) {
                    *base = [prev_helix, prev_idx, next_helix, next_idx];
                }
            }
        }
        Ok(ret)
    }

    /// The legacy `loop` and `skip` arrays of helix `h_id`: the length of the loop at each base
    /// and `-1` at each skipped base.
    pub fn legacy_insertion_arrays(
        &self,
        h_id: usize,
    ) -> Result<(Vec<isize>, Vec<isize>), ErrOperation> {
        let helix = self.try_get_helix(h_id)?;
        let mut loops = vec![0; helix.length];
        let mut skips = vec![0; helix.length];
        for (idx, insertion) in helix.insertions().iter() {
            let (array, value) = match insertion {
                Insertion::Loop(n) => (&mut loops, *n as isize),
                Insertion::Skip => (&mut skips, -1),
            };
            if let Some(slot) = array.get_mut(*idx as usize) {
                *slot = value;
            }
        }
        Ok((loops, skips))
    }
}
