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

use super::{Crossover, StrandId};

/// A modification that was applied to a design.
///
/// Committed operations append their notifications to the design's journal, which is drained
/// with `Design::take_notifications`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DesignNotification {
    HelixAdded(usize),
    HelixRemoved(usize),
    HelixResized { helix: usize, length: usize },
    /// The visibility or the placement of a helix changed.
    HelixPropertyChanged(usize),
    InsertionChanged { helix: usize, base_idx: isize },
    StrandAdded(StrandId),
    StrandRemoved(StrandId),
    StrandResized(StrandId),
    XoverAdded(Crossover),
    XoverRemoved(Crossover),
}
