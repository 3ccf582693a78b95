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

use super::collection::{next_key, HasMap};
use super::lattice::LatticeCoord;
use super::utils::*;
use ahash::AHashMap;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A per-base overlay of a virtual helix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Insertion {
    /// Extra bases inserted after the base.
    Loop(usize),
    /// The base is removed.
    Skip,
}

impl Insertion {
    /// Read a signed insertion length: positive values are loops, negative values are skips and
    /// `0` means no insertion.
    pub fn from_length(length: isize) -> Option<Self> {
        if length > 0 {
            Some(Self::Loop(length as usize))
        } else if length < 0 {
            Some(Self::Skip)
        } else {
            None
        }
    }

    /// The signed length of the insertion, `-1` for a skip.
    pub fn length(&self) -> isize {
        match self {
            Self::Loop(n) => *n as isize,
            Self::Skip => -1,
        }
    }
}

/// One double helix axis placed on the design's lattice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VirtualHelix {
    /// Identifier of the helix. It is never reused while the helix exists.
    pub id_num: usize,
    /// Lattice cell occupied by the helix.
    pub coord: LatticeCoord,
    /// Number of base positions on the helix.
    pub length: usize,
    /// Axial placement of the helix, in nanometers.
    #[serde(default, skip_serializing_if = "f32_is_zero")]
    pub z_offset: f32,
    /// Rotation of the helix around its own axis, in degrees.
    #[serde(default, skip_serializing_if = "f32_is_zero")]
    pub euler_z: f32,
    #[serde(default = "default_visibility", skip_serializing_if = "bool::clone")]
    pub visible: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub(super) insertions: BTreeMap<isize, Insertion>,
}

impl VirtualHelix {
    pub fn new(id_num: usize, coord: LatticeCoord, length: usize) -> Self {
        Self {
            id_num,
            coord,
            length,
            z_offset: 0.,
            euler_z: 0.,
            visible: true,
            insertions: BTreeMap::new(),
        }
    }

    pub fn is_even_parity(&self) -> bool {
        self.coord.is_even_parity()
    }

    /// The scaffold runs on the forward strand of even helices and on the reverse strand of odd
    /// ones.
    pub fn scaffold_is_forward(&self) -> bool {
        self.is_even_parity()
    }

    pub fn contains_index(&self, base_idx: isize) -> bool {
        base_idx >= 0 && base_idx < self.length as isize
    }

    pub fn insertions(&self) -> &BTreeMap<isize, Insertion> {
        &self.insertions
    }

    pub fn insertion_at(&self, base_idx: isize) -> Option<Insertion> {
        self.insertions.get(&base_idx).cloned()
    }

    pub fn is_skip(&self, base_idx: isize) -> bool {
        self.insertion_at(base_idx) == Some(Insertion::Skip)
    }

    /// Number of bases actually present on one strand of the helix, taking loops and skips into
    /// account.
    pub fn nb_bases(&self) -> isize {
        self.length as isize + self.insertions.values().map(Insertion::length).sum::<isize>()
    }
}

/// A structure maping helices identifier to `VirtualHelix` objects.
///
/// The lattice cell of every helix is indexed so that neighbour lookups do not need to scan the
/// collection.
#[derive(Clone, Serialize)]
#[serde(into = "BTreeMap<usize, Arc<VirtualHelix>>")]
pub struct Helices {
    map: Arc<BTreeMap<usize, Arc<VirtualHelix>>>,
    coords: Arc<AHashMap<LatticeCoord, usize>>,
}

impl HasMap for Helices {
    type Key = usize;
    type Item = VirtualHelix;
    fn get_map(&self) -> &BTreeMap<Self::Key, Arc<Self::Item>> {
        &self.map
    }
}

impl Default for Helices {
    fn default() -> Self {
        Self::from(BTreeMap::new())
    }
}

impl From<BTreeMap<usize, Arc<VirtualHelix>>> for Helices {
    fn from(map: BTreeMap<usize, Arc<VirtualHelix>>) -> Self {
        let coords = index_coords(&map);
        Self {
            map: Arc::new(map),
            coords: Arc::new(coords),
        }
    }
}

impl From<Helices> for BTreeMap<usize, Arc<VirtualHelix>> {
    fn from(helices: Helices) -> Self {
        BTreeMap::clone(&helices.map)
    }
}

fn index_coords(map: &BTreeMap<usize, Arc<VirtualHelix>>) -> AHashMap<LatticeCoord, usize> {
    let mut ret = AHashMap::new();
    for (id, helix) in map.iter() {
        ret.insert(helix.coord, *id);
    }
    ret
}

impl Helices {
    pub fn make_mut(&mut self) -> HelicesMut {
        HelicesMut {
            new_map: BTreeMap::clone(&self.map),
            source: self,
        }
    }

    /// The identifier of the helix occupying `coord`, if any.
    pub fn helix_at(&self, coord: LatticeCoord) -> Option<usize> {
        self.coords.get(&coord).cloned()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.map, &other.map)
    }
}

pub struct HelicesMut<'a> {
    source: &'a mut Helices,
    new_map: BTreeMap<usize, Arc<VirtualHelix>>,
}

impl<'a> HelicesMut<'a> {
    /// Add a new helix to the collection and return its identifier.
    pub fn push(&mut self, coord: LatticeCoord, length: usize) -> usize {
        let new_key = next_key(&self.new_map);
        self.new_map
            .insert(new_key, Arc::new(VirtualHelix::new(new_key, coord, length)));
        new_key
    }

    pub fn get_mut(&mut self, id: &usize) -> Option<&mut VirtualHelix> {
        self.new_map.get_mut(id).map(Arc::make_mut)
    }

    pub fn remove(&mut self, id: &usize) -> Option<Arc<VirtualHelix>> {
        self.new_map.remove(id)
    }
}

impl<'a> Drop for HelicesMut<'a> {
    fn drop(&mut self) {
        *self.source = Helices::from(std::mem::take(&mut self.new_map))
    }
}
