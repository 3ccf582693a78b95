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
//! The geometry and topology core of a cadnano design.
//!
//! A `Design` holds virtual helices placed on a honeycomb or square lattice and the strands that
//! run along them. Queries are performed directly on the design; every modification goes through
//! one of the mutating methods of `Design`, which either succeed completely or leave the design
//! untouched.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[macro_use]
extern crate serde_derive;
extern crate serde;

/// Re-export ultraviolet for linear algebra
pub use ultraviolet;
use ultraviolet::Vec2;

mod collection;
pub use collection::{Collection, DesignKey, HasMap};
mod lattice;
pub use lattice::*;
mod parameters;
pub use parameters::*;
mod helices;
pub use helices::*;
mod strands;
pub use strands::*;
mod crossovers;
pub use crossovers::*;
pub mod design_operations;
pub use design_operations::ErrOperation;
mod legacy;
mod loading;
pub use legacy::*;
mod notifications;
pub use notifications::DesignNotification;
mod utils;

#[cfg(test)]
mod tests;

/// A structure that identifies a nucleotide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Nucl {
    pub helix: usize,
    pub position: isize,
    pub forward: bool,
}

impl std::cmp::PartialOrd for Nucl {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::cmp::Ord for Nucl {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        if self.helix != other.helix {
            self.helix.cmp(&other.helix)
        } else if self.forward != other.forward {
            self.forward.cmp(&other.forward)
        } else if self.forward {
            self.position.cmp(&other.position)
        } else {
            self.position.cmp(&other.position).reverse()
        }
    }
}

impl Nucl {
    pub fn new(helix: usize, position: isize, forward: bool) -> Self {
        Self {
            helix,
            position,
            forward,
        }
    }

    /// The nucleotide that follows `self` in the 5' to 3' direction.
    pub fn prime3(&self) -> Self {
        Self {
            position: if self.forward {
                self.position + 1
            } else {
                self.position - 1
            },
            ..*self
        }
    }

    /// The nucleotide that precedes `self` in the 5' to 3' direction.
    pub fn prime5(&self) -> Self {
        Self {
            position: if self.forward {
                self.position - 1
            } else {
                self.position + 1
            },
            ..*self
        }
    }

    /// The nucleotide paired with `self`.
    pub fn compl(&self) -> Self {
        Self {
            forward: !self.forward,
            ..*self
        }
    }
}

impl fmt::Display for Nucl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = if self.forward { "fwd" } else { "rev" };
        write!(f, "(H{}, {}, {})", self.helix, self.position, direction)
    }
}

/// A cadnano design.
///
/// Helices and strands are stored in `Arc`-shared collections: cloning a design is cheap, which
/// is how mutating operations are made atomic.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "loading::RawDesign")]
pub struct Design {
    lattice_type: LatticeType,
    parameters: Parameters,
    helices: Helices,
    strands: Strands,
    #[serde(skip)]
    notifications: Vec<DesignNotification>,
}

impl Design {
    /// An empty design on a lattice of type `lattice_type`, with default parameters.
    pub fn new(lattice_type: LatticeType) -> Self {
        Self::with_parameters(lattice_type, Parameters::DEFAULT)
    }

    pub fn with_parameters(lattice_type: LatticeType, parameters: Parameters) -> Self {
        Self {
            lattice_type,
            parameters,
            helices: Default::default(),
            strands: Default::default(),
            notifications: Vec::new(),
        }
    }

    /// Run `operation` on a copy of the design. The copy replaces the design only if the
    /// operation succeeds.
    fn apply_operation<T, F>(&mut self, operation: F) -> Result<T, ErrOperation>
    where
        F: FnOnce(&mut Design) -> Result<T, ErrOperation>,
    {
        let mut new_design = self.clone();
        let ret = operation(&mut new_design)?;
        *self = new_design;
        Ok(ret)
    }

    pub fn lattice_type(&self) -> LatticeType {
        self.lattice_type
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn lattice(&self) -> Lattice {
        Lattice::new(self.lattice_type, self.parameters.lattice_radius())
    }

    pub fn bases_per_repeat(&self) -> usize {
        self.lattice_type.bases_per_repeat()
    }

    pub fn helices(&self) -> &Helices {
        &self.helices
    }

    pub fn strands(&self) -> &Strands {
        &self.strands
    }

    pub fn helix(&self, h_id: usize) -> Option<&VirtualHelix> {
        self.helices.get(&h_id)
    }

    pub(crate) fn try_get_helix(&self, h_id: usize) -> Result<&VirtualHelix, ErrOperation> {
        self.helices
            .get(&h_id)
            .ok_or(ErrOperation::HelixDoesNotExist(h_id))
    }

    pub(crate) fn try_get_strand(&self, s_id: StrandId) -> Result<&Strand, ErrOperation> {
        self.strands
            .get(&s_id)
            .ok_or(ErrOperation::StrandDoesNotExist(s_id))
    }

    /// The identifier of the helix occupying `coord`, if any.
    pub fn helix_at(&self, coord: LatticeCoord) -> Option<usize> {
        self.helices.helix_at(coord)
    }

    pub fn helix_ids(&self) -> Vec<usize> {
        self.helices.keys().cloned().collect()
    }

    /// The position of the axis of helix `h_id` in the lattice plane.
    pub fn helix_position(&self, h_id: usize) -> Option<Vec2> {
        self.helix(h_id)
            .map(|h| self.lattice().lattice_to_position(h.coord))
    }

    /// The live helices adjacent to `h_id` on the lattice, paired with their neighbour slot.
    pub(crate) fn neighbours_with_slots(
        &self,
        h_id: usize,
    ) -> Result<Vec<(usize, usize)>, ErrOperation> {
        let helix = self.try_get_helix(h_id)?;
        Ok(self
            .lattice()
            .neighbour_coords(helix.coord)
            .into_iter()
            .enumerate()
            .filter_map(|(slot, coord)| self.helix_at(coord).map(|n_id| (slot, n_id)))
            .collect())
    }

    /// The identifiers of the live helices adjacent to `h_id` on the lattice.
    pub fn neighbours_of(&self, h_id: usize) -> Result<BTreeSet<usize>, ErrOperation> {
        Ok(self
            .neighbours_with_slots(h_id)?
            .into_iter()
            .map(|(_, n_id)| n_id)
            .collect())
    }

    pub fn insertions(&self, h_id: usize) -> Result<&BTreeMap<isize, Insertion>, ErrOperation> {
        Ok(self.try_get_helix(h_id)?.insertions())
    }

    /// The largest base index valid on at least one helix.
    pub fn max_base_idx(&self) -> Option<isize> {
        self.helices
            .values()
            .filter(|h| h.length > 0)
            .map(|h| h.length as isize - 1)
            .max()
    }

    pub fn strand(&self, s_id: StrandId) -> Option<&Strand> {
        self.strands.get(&s_id)
    }

    /// The strand that contains `nucl`, if any.
    pub fn strand_at(&self, nucl: &Nucl) -> Option<StrandId> {
        self.strands.strand_at(nucl)
    }

    pub fn strand_set(&self, helix: usize, forward: bool) -> Option<&StrandSet> {
        self.strands.strand_set(helix, forward)
    }

    /// True iff `index` is an end of strand `s_id` and that end is connected by a cross-over.
    pub fn has_xover_at(&self, s_id: StrandId, index: isize) -> Result<bool, ErrOperation> {
        Ok(self.try_get_strand(s_id)?.has_xover_at(index))
    }

    pub fn xovers(&self) -> Vec<Crossover> {
        self.strands.get_xovers()
    }

    pub fn oligo_of(&self, s_id: StrandId) -> Option<Oligo> {
        self.strands.oligo_of(s_id)
    }

    pub fn oligos(&self) -> Vec<Oligo> {
        self.strands.oligos()
    }

    /// Return the modifications applied to the design since the last call to this method.
    pub fn take_notifications(&mut self) -> Vec<DesignNotification> {
        std::mem::take(&mut self.notifications)
    }

    pub(crate) fn notify(&mut self, notification: DesignNotification) {
        self.notifications.push(notification)
    }
}

/// Mutations of the design.
impl Design {
    /// Create a helix of default length at `coord` and return its identifier.
    pub fn create_virtual_helix(&mut self, coord: LatticeCoord) -> Result<usize, ErrOperation> {
        let length = self.parameters.default_length(self.lattice_type);
        self.create_virtual_helix_with_length(coord, length)
    }

    pub fn create_virtual_helix_with_length(
        &mut self,
        coord: LatticeCoord,
        length: usize,
    ) -> Result<usize, ErrOperation> {
        self.apply_operation(|d| design_operations::create_virtual_helix(d, coord, length))
    }

    /// Remove helix `h_id`. Fails if strands still lie on the helix.
    pub fn remove_virtual_helix(&mut self, h_id: usize) -> Result<(), ErrOperation> {
        self.apply_operation(|d| design_operations::remove_virtual_helix(d, h_id))
    }

    /// Change the number of bases of helix `h_id`.
    ///
    /// If strands or insertions lie beyond the new length, the operation fails unless `force` is
    /// true, in which case those strands and insertions are removed.
    pub fn resize_virtual_helix(
        &mut self,
        h_id: usize,
        new_length: usize,
        force: bool,
    ) -> Result<(), ErrOperation> {
        self.apply_operation(|d| design_operations::resize_virtual_helix(d, h_id, new_length, force))
    }

    /// Set the insertion at `base_idx` of helix `h_id`. A positive `length` adds a loop of that
    /// many bases, a negative one a skip, and `0` clears the base.
    pub fn set_insertion(
        &mut self,
        h_id: usize,
        base_idx: isize,
        length: isize,
    ) -> Result<(), ErrOperation> {
        self.apply_operation(|d| design_operations::set_insertion(d, h_id, base_idx, length))
    }

    pub fn set_helix_visibility(&mut self, h_id: usize, visible: bool) -> Result<(), ErrOperation> {
        self.apply_operation(|d| design_operations::set_helix_visibility(d, h_id, visible))
    }

    pub fn set_helix_placement(
        &mut self,
        h_id: usize,
        z_offset: f32,
        euler_z: f32,
    ) -> Result<(), ErrOperation> {
        self.apply_operation(|d| {
            design_operations::set_helix_placement(d, h_id, z_offset, euler_z)
        })
    }

    /// Create a strand covering `[low, high]` on one direction of helix `h_id`.
    pub fn create_strand(
        &mut self,
        h_id: usize,
        forward: bool,
        low: isize,
        high: isize,
    ) -> Result<StrandId, ErrOperation> {
        self.apply_operation(|d| design_operations::create_strand(d, h_id, forward, low, high))
    }

    /// Remove a strand, and the cross-overs attached to its ends.
    pub fn remove_strand(&mut self, s_id: StrandId) -> Result<(), ErrOperation> {
        self.apply_operation(|d| design_operations::remove_strand(d, s_id))
    }

    /// Split a strand into `[low, index]` and `[index + 1, high]`.
    pub fn split_strand(
        &mut self,
        s_id: StrandId,
        index: isize,
    ) -> Result<(StrandId, StrandId), ErrOperation> {
        self.apply_operation(|d| design_operations::split_strand(d, s_id, index))
    }

    /// Merge two strands that touch each other on the same strand set.
    pub fn merge_strands(&mut self, a: StrandId, b: StrandId) -> Result<StrandId, ErrOperation> {
        self.apply_operation(|d| design_operations::merge_strands(d, a, b))
    }

    pub fn resize_strand(
        &mut self,
        s_id: StrandId,
        low: isize,
        high: isize,
    ) -> Result<(), ErrOperation> {
        self.apply_operation(|d| design_operations::resize_strand(d, s_id, low, high))
    }

    /// Connect an end of `strand_a` to an end of `strand_b` by a cross-over.
    ///
    /// One of the ends must be a 3' end and the other one a 5' end, both must be free and the
    /// cross-over must be allowed by the crossover rules of the lattice.
    pub fn create_xover(
        &mut self,
        strand_a: StrandId,
        idx_a: isize,
        strand_b: StrandId,
        idx_b: isize,
    ) -> Result<Crossover, ErrOperation> {
        self.apply_operation(|d| {
            design_operations::create_xover(d, strand_a, idx_a, strand_b, idx_b, true)
        })
    }

    /// Same as `create_xover`, without checking the crossover rules of the lattice.
    pub fn force_create_xover(
        &mut self,
        strand_a: StrandId,
        idx_a: isize,
        strand_b: StrandId,
        idx_b: isize,
    ) -> Result<Crossover, ErrOperation> {
        self.apply_operation(|d| {
            design_operations::create_xover(d, strand_a, idx_a, strand_b, idx_b, false)
        })
    }

    /// Break the cross-over attached to the end of `s_id` at `index`.
    pub fn remove_xover(&mut self, s_id: StrandId, index: isize) -> Result<Crossover, ErrOperation> {
        self.apply_operation(|d| design_operations::remove_xover(d, s_id, index))
    }
}
