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

//! Oligos are maximal chains of strands linked by cross-overs.

use super::{StrandId, Strands};
use crate::Collection;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Oligo {
    /// The strands of the oligo, from 5' to 3'. For a cyclic oligo, the first strand is the one
    /// with the smallest identifier.
    pub strands: Vec<StrandId>,
    pub cyclic: bool,
}

impl Oligo {
    /// Number of bases of the oligo, insertions not taken into account.
    pub fn length(&self, strands: &Strands) -> usize {
        self.strands
            .iter()
            .filter_map(|id| strands.get(id))
            .map(|s| s.length())
            .sum()
    }
}

impl Strands {
    /// The strand connected to the 5' end of `s_id`.
    pub fn upstream(&self, s_id: &StrandId) -> Option<StrandId> {
        let nucl = self.get(s_id)?.prime5_xover?;
        self.strand_at(&nucl)
    }

    /// The strand connected to the 3' end of `s_id`.
    pub fn downstream(&self, s_id: &StrandId) -> Option<StrandId> {
        let nucl = self.get(s_id)?.prime3_xover?;
        self.strand_at(&nucl)
    }

    /// Return the 5' most strand of the oligo of `s_id`, and whether that oligo is cyclic.
    fn find_5_end(&self, s_id: StrandId) -> (StrandId, bool) {
        let mut current = s_id;
        let mut smallest = s_id;
        for _ in 0..=self.len() {
            match self.upstream(&current) {
                None => return (current, false),
                Some(prev) if prev == s_id => return (smallest, true),
                Some(prev) => {
                    smallest = smallest.min(prev);
                    current = prev;
                }
            }
        }
        log::error!("Could not find the 5' end of the oligo of {}", s_id);
        (current, false)
    }

    /// The oligo that contains strand `s_id`.
    pub fn oligo_of(&self, s_id: StrandId) -> Option<Oligo> {
        if !self.contains_key(&s_id) {
            return None;
        }
        let (start, cyclic) = self.find_5_end(s_id);
        let mut strands = vec![start];
        let mut current = start;
        while let Some(next) = self.downstream(&current) {
            if next == start || strands.len() > self.len() {
                break;
            }
            strands.push(next);
            current = next;
        }
        Some(Oligo { strands, cyclic })
    }

    /// Partition of the strands into oligos, ordered by their first strand.
    pub fn oligos(&self) -> Vec<Oligo> {
        let mut seen = BTreeSet::new();
        let mut ret = Vec::new();
        for id in self.keys() {
            if seen.contains(id) {
                continue;
            }
            if let Some(oligo) = self.oligo_of(*id) {
                seen.extend(oligo.strands.iter().cloned());
                ret.push(oligo);
            }
        }
        ret.sort_by_key(|o| o.strands.first().cloned());
        ret
    }
}
