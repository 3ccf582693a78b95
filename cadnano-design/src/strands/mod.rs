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

use super::collection::{next_key, DesignKey, HasMap};
use super::crossovers::Crossover;
use super::{Collection, Nucl};
use std::collections::BTreeMap;
use std::sync::Arc;
mod formating;
mod oligo;
pub use oligo::Oligo;

/// Identifier of a strand.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct StrandId(pub(super) usize);

impl StrandId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl DesignKey for StrandId {
    const FIRST: Self = Self(0);
    fn successor(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Scaffold/staple tag of a strand. It has no structural meaning: it only records on which
/// strand direction of its helix the strand was drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrandType {
    Scaffold,
    Staple,
}

impl StrandType {
    pub fn on_strand(scaffold_is_forward: bool, forward: bool) -> Self {
        if scaffold_is_forward == forward {
            Self::Scaffold
        } else {
            Self::Staple
        }
    }
}

/// A contiguous run of bases `[low, high]` on one direction of one helix.
///
/// Each end of the strand may be connected by a cross-over to the end of another strand. The
/// connection is stored on both sides, as the nucleotide of the partner end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strand {
    pub helix: usize,
    /// If true, the 5' to 3' direction of the strand is the direction of increasing indices.
    pub forward: bool,
    pub low: isize,
    pub high: isize,
    pub strand_type: StrandType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(super) prime5_xover: Option<Nucl>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(super) prime3_xover: Option<Nucl>,
}

impl Strand {
    pub fn new(helix: usize, forward: bool, low: isize, high: isize, strand_type: StrandType) -> Self {
        Self {
            helix,
            forward,
            low,
            high,
            strand_type,
            prime5_xover: None,
            prime3_xover: None,
        }
    }

    pub fn prime5(&self) -> Nucl {
        let position = if self.forward { self.low } else { self.high };
        Nucl::new(self.helix, position, self.forward)
    }

    pub fn prime3(&self) -> Nucl {
        let position = if self.forward { self.high } else { self.low };
        Nucl::new(self.helix, position, self.forward)
    }

    pub fn length(&self) -> usize {
        (self.high - self.low + 1).max(0) as usize
    }

    pub fn has_nucl(&self, nucl: &Nucl) -> bool {
        nucl.helix == self.helix
            && nucl.forward == self.forward
            && nucl.position >= self.low
            && nucl.position <= self.high
    }

    /// Return the strand end status of the base at `index`.
    pub fn extremity(&self, index: isize) -> Extremity {
        if index == self.prime5().position {
            Extremity::Prime5
        } else if index == self.prime3().position {
            Extremity::Prime3
        } else {
            Extremity::No
        }
    }

    /// The extremity lying at the low end of the strand.
    pub fn low_extremity(&self) -> Extremity {
        if self.forward {
            Extremity::Prime5
        } else {
            Extremity::Prime3
        }
    }

    /// The extremity lying at the high end of the strand.
    pub fn high_extremity(&self) -> Extremity {
        if self.forward {
            Extremity::Prime3
        } else {
            Extremity::Prime5
        }
    }

    pub fn prime5_xover(&self) -> Option<Nucl> {
        self.prime5_xover
    }

    pub fn prime3_xover(&self) -> Option<Nucl> {
        self.prime3_xover
    }

    /// The partner of the end `extremity` if that end is connected.
    pub fn xover_at(&self, extremity: Extremity) -> Option<Nucl> {
        match extremity {
            Extremity::Prime5 => self.prime5_xover,
            Extremity::Prime3 => self.prime3_xover,
            Extremity::No => None,
        }
    }

    /// True iff `index` is one of the strand's ends and that end is connected by a cross-over.
    pub fn has_xover_at(&self, index: isize) -> bool {
        self.xover_at(self.extremity(index)).is_some()
    }

    pub(super) fn set_xover(&mut self, extremity: Extremity, partner: Option<Nucl>) {
        match extremity {
            Extremity::Prime5 => self.prime5_xover = partner,
            Extremity::Prime3 => self.prime3_xover = partner,
            Extremity::No => (),
        }
    }

    /// Iterate over the nucleotides of the strand, from 5' to 3'.
    pub fn nucls(&self) -> impl Iterator<Item = Nucl> + '_ {
        let len = self.length() as isize;
        (0..len).map(move |i| {
            let position = if self.forward {
                self.low + i
            } else {
                self.high - i
            };
            Nucl::new(self.helix, position, self.forward)
        })
    }
}

/// The strands lying on one direction of one helix, ordered by their lowest index.
///
/// Intervals of a strand set never overlap.
#[derive(Debug, Clone, Default)]
pub struct StrandSet(BTreeMap<isize, (isize, StrandId)>);

impl StrandSet {
    pub fn strand_ids(&self) -> impl Iterator<Item = StrandId> + '_ {
        self.0.values().map(|(_, id)| *id)
    }

    /// The `[low, high]` intervals of the set, in increasing order.
    pub fn intervals(&self) -> impl Iterator<Item = (isize, isize)> + '_ {
        self.0.iter().map(|(low, (high, _))| (*low, *high))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The strand occupying the base at `index`, if any.
    pub fn strand_at(&self, index: isize) -> Option<StrandId> {
        self.0
            .range(..=index)
            .next_back()
            .filter(|(_, (high, _))| *high >= index)
            .map(|(_, (_, id))| *id)
    }

    /// Return a strand, other than `ignored`, that occupies at least one base of `[low, high]`.
    pub fn first_overlap(
        &self,
        low: isize,
        high: isize,
        ignored: Option<StrandId>,
    ) -> Option<StrandId> {
        // Intervals are disjoint, so only the last interval starting before `high` can reach
        // `low`.
        self.0
            .range(..=high)
            .rev()
            .find(|(_, (_, id))| Some(*id) != ignored)
            .filter(|(_, (other_high, _))| *other_high >= low)
            .map(|(_, (_, id))| *id)
    }

    fn insert(&mut self, strand: &Strand, id: StrandId) {
        self.0.insert(strand.low, (strand.high, id));
    }
}

/// A collection of strands, that maps strand identifier to strands.
///
/// It contains all the information about the "topology of the design". Information about
/// cross-over or strand occupancy are obtained via this structure.
#[derive(Clone, Serialize)]
#[serde(into = "BTreeMap<usize, Arc<Strand>>")]
pub struct Strands {
    map: Arc<BTreeMap<StrandId, Arc<Strand>>>,
    sets: Arc<BTreeMap<(usize, bool), StrandSet>>,
}

impl HasMap for Strands {
    type Key = StrandId;
    type Item = Strand;
    fn get_map(&self) -> &BTreeMap<Self::Key, Arc<Self::Item>> {
        &self.map
    }
}

impl Default for Strands {
    fn default() -> Self {
        Self::from_map(BTreeMap::new())
    }
}

impl From<BTreeMap<usize, Arc<Strand>>> for Strands {
    fn from(map: BTreeMap<usize, Arc<Strand>>) -> Self {
        Self::from_map(map.into_iter().map(|(k, s)| (StrandId(k), s)).collect())
    }
}

impl From<Strands> for BTreeMap<usize, Arc<Strand>> {
    fn from(strands: Strands) -> Self {
        strands
            .map
            .iter()
            .map(|(k, s)| (k.0, s.clone()))
            .collect()
    }
}

impl Strands {
    fn from_map(map: BTreeMap<StrandId, Arc<Strand>>) -> Self {
        let mut sets: BTreeMap<(usize, bool), StrandSet> = BTreeMap::new();
        for (id, strand) in map.iter() {
            sets.entry((strand.helix, strand.forward))
                .or_default()
                .insert(strand, *id);
        }
        Self {
            map: Arc::new(map),
            sets: Arc::new(sets),
        }
    }

    pub fn make_mut(&mut self) -> StrandsMut {
        StrandsMut {
            new_map: BTreeMap::clone(&self.map),
            source: self,
        }
    }

    pub fn strand_set(&self, helix: usize, forward: bool) -> Option<&StrandSet> {
        self.sets.get(&(helix, forward))
    }

    /// The strand containing `nucl`, if any.
    pub fn strand_at(&self, nucl: &Nucl) -> Option<StrandId> {
        self.strand_set(nucl.helix, nucl.forward)?
            .strand_at(nucl.position)
    }

    /// Return true if at least one strand goes through helix h_id
    pub fn uses_helix(&self, h_id: usize) -> bool {
        [true, false]
            .iter()
            .any(|forward| self.strand_set(h_id, *forward).map_or(false, |s| !s.is_empty()))
    }

    /// The strands lying on helix `h_id`, forward strands first.
    pub fn strands_on_helix(&self, h_id: usize) -> Vec<StrandId> {
        let mut ret = Vec::new();
        for forward in [true, false].iter() {
            if let Some(set) = self.strand_set(h_id, *forward) {
                ret.extend(set.strand_ids());
            }
        }
        ret
    }

    /// All the cross-overs of the design, each one reported once, from its 3' side.
    pub fn get_xovers(&self) -> Vec<Crossover> {
        let mut ret = vec![];
        for s in self.values() {
            if let Some(to) = s.prime3_xover {
                ret.push(Crossover {
                    from: s.prime3(),
                    to,
                })
            }
        }
        ret
    }
}

pub struct StrandsMut<'a> {
    source: &'a mut Strands,
    new_map: BTreeMap<StrandId, Arc<Strand>>,
}

impl<'a> StrandsMut<'a> {
    pub fn push(&mut self, strand: Strand) -> StrandId {
        let new_key = next_key(&self.new_map);
        self.new_map.insert(new_key, Arc::new(strand));
        new_key
    }

    pub fn get_mut(&mut self, id: &StrandId) -> Option<&mut Strand> {
        self.new_map.get_mut(id).map(Arc::make_mut)
    }

    pub fn remove(&mut self, id: &StrandId) -> Option<Arc<Strand>> {
        self.new_map.remove(id)
    }
}

impl<'a> Drop for StrandsMut<'a> {
    fn drop(&mut self) {
        *self.source = Strands::from_map(std::mem::take(&mut self.new_map))
    }
}

/// The return type for methods that ask if a nucleotide is the end of a strand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extremity {
    No,
    Prime3,
    Prime5,
}

impl Extremity {
    pub fn is_3prime(&self) -> bool {
        matches!(self, Extremity::Prime3)
    }

    pub fn is_5prime(&self) -> bool {
        matches!(self, Extremity::Prime5)
    }

    pub fn is_end(&self) -> bool {
        !matches!(self, Extremity::No)
    }
}
