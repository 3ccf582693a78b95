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
//! Coordinate math of the two cadnano lattices.
//!
//! A lattice maps integer `(row, col)` coordinates to positions in the plane orthogonal to the
//! helices' axes. Rows grow downward, so the `y` component of a position decreases with the row.

use std::fmt;
use ultraviolet::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LatticeType {
    Honeycomb,
    Square,
}

impl LatticeType {
    /// Number of bases after which the crossover pattern of the lattice repeats itself.
    pub fn bases_per_repeat(&self) -> usize {
        match self {
            Self::Honeycomb => 21,
            Self::Square => 32,
        }
    }

    /// Number of geometric neighbours that a lattice cell has.
    pub fn nb_neighbour_slots(&self) -> usize {
        match self {
            Self::Honeycomb => 3,
            Self::Square => 4,
        }
    }

    fn division(&self) -> &'static dyn LatticeDivision {
        match self {
            Self::Honeycomb => &HoneyComb,
            Self::Square => &SquareGrid,
        }
    }
}

impl fmt::Display for LatticeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Honeycomb => write!(f, "Honeycomb"),
            Self::Square => write!(f, "Square"),
        }
    }
}

/// A cell of a lattice.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct LatticeCoord {
    pub row: isize,
    pub col: isize,
}

impl LatticeCoord {
    pub fn new(row: isize, col: isize) -> Self {
        Self { row, col }
    }

    /// True iff `row` and `col` have the same parity.
    ///
    /// On a honeycomb lattice the parity decides on which side the vertical neighbour lies. On
    /// both lattices it decides which strand direction carries the scaffold, and therefore which
    /// crossover rules apply.
    pub fn is_even_parity(&self) -> bool {
        self.row.rem_euclid(2) == self.col.rem_euclid(2)
    }

    fn shifted(&self, d_row: isize, d_col: isize) -> Self {
        Self {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }
}

impl From<(isize, isize)> for LatticeCoord {
    fn from((row, col): (isize, isize)) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for LatticeCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The geometry of a design's lattice: its type and the half distance between two neighbouring
/// helix axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lattice {
    pub lattice_type: LatticeType,
    pub radius: f32,
}

impl Lattice {
    pub fn new(lattice_type: LatticeType, radius: f32) -> Self {
        Self {
            lattice_type,
            radius,
        }
    }

    pub fn lattice_to_position(&self, coord: LatticeCoord) -> Vec2 {
        self.lattice_type
            .division()
            .origin_helix(self.radius, coord)
    }

    /// Return the lattice cell whose center is the closest to `position`.
    pub fn position_to_lattice_coord(&self, position: Vec2) -> LatticeCoord {
        self.lattice_type
            .division()
            .interpolate(self.radius, position)
    }

    pub fn is_even_parity(&self, coord: LatticeCoord) -> bool {
        coord.is_even_parity()
    }

    /// The geometric neighbours of `coord`. The index of a neighbour in the returned vector is
    /// its slot, used to look up crossover rules.
    pub fn neighbour_coords(&self, coord: LatticeCoord) -> Vec<LatticeCoord> {
        self.lattice_type.division().neighbour_slots(coord)
    }

    /// If `other` is a neighbour of `coord`, return its slot.
    pub fn neighbour_slot(&self, coord: LatticeCoord, other: LatticeCoord) -> Option<usize> {
        self.neighbour_coords(coord)
            .iter()
            .position(|neighbour| *neighbour == other)
    }

    pub fn bases_per_repeat(&self) -> usize {
        self.lattice_type.bases_per_repeat()
    }
}

pub trait LatticeDivision {
    /// Maps a vertex of the lattice to a coordinate in the plane.
    fn origin_helix(&self, radius: f32, coord: LatticeCoord) -> Vec2;
    /// Find the vertex in the lattice that is the closest to a point in the plane.
    fn interpolate(&self, radius: f32, position: Vec2) -> LatticeCoord;
    /// The neighbours of a vertex, in slot order.
    fn neighbour_slots(&self, coord: LatticeCoord) -> Vec<LatticeCoord>;
}

#[derive(Debug, Clone, Copy)]
pub struct SquareGrid;

impl LatticeDivision for SquareGrid {
    fn origin_helix(&self, radius: f32, coord: LatticeCoord) -> Vec2 {
        Vec2::new(
            coord.col as f32 * radius * 2.,
            -coord.row as f32 * radius * 2.,
        )
    }

    fn interpolate(&self, radius: f32, position: Vec2) -> LatticeCoord {
        LatticeCoord {
            row: (position.y / -(radius * 2.)).round() as isize,
            col: (position.x / (radius * 2.)).round() as isize,
        }
    }

    fn neighbour_slots(&self, coord: LatticeCoord) -> Vec<LatticeCoord> {
        if coord.is_even_parity() {
            vec![
                coord.shifted(0, 1),
                coord.shifted(1, 0),
                coord.shifted(0, -1),
                coord.shifted(-1, 0),
            ]
        } else {
            vec![
                coord.shifted(0, -1),
                coord.shifted(-1, 0),
                coord.shifted(0, 1),
                coord.shifted(1, 0),
            ]
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HoneyComb;

impl LatticeDivision for HoneyComb {
    /// Rows grow downward (`y = -3r * row`, plus `r` on odd cells) so every neighbour is `2r` away.
    fn origin_helix(&self, radius: f32, coord: LatticeCoord) -> Vec2 {
        let upper = -3. * radius * coord.row as f32;
        let lower = upper + radius;
        Vec2::new(
            coord.col as f32 * radius * 3f32.sqrt(),
            if coord.is_even_parity() { upper } else { lower },
        )
    }

    fn interpolate(&self, radius: f32, position: Vec2) -> LatticeCoord {
        let first_guess = LatticeCoord {
            row: (position.y / (-3. * radius)).round() as isize,
            col: (position.x / (radius * 3f32.sqrt())).round() as isize,
        };

        let mut ret = first_guess;
        let mut best_dist = (self.origin_helix(radius, first_guess) - position).mag_sq();
        for d_row in [-2, -1, 0, 1, 2].iter() {
            for d_col in [-2, -1, 0, 1, 2].iter() {
                let guess = first_guess.shifted(*d_row, *d_col);
                let dist = (self.origin_helix(radius, guess) - position).mag_sq();
                if dist < best_dist {
                    ret = guess;
                    best_dist = dist;
                }
            }
        }
        ret
    }

    fn neighbour_slots(&self, coord: LatticeCoord) -> Vec<LatticeCoord> {
        if coord.is_even_parity() {
            vec![
                coord.shifted(0, 1),
                coord.shifted(1, 0),
                coord.shifted(0, -1),
            ]
        } else {
            vec![
                coord.shifted(0, -1),
                coord.shifted(-1, 0),
                coord.shifted(0, 1),
            ]
        }
    }
}
