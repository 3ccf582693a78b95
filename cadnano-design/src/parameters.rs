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
//! Geometric parameters of a design.

use super::lattice::LatticeType;

/// Geometric parameters of a design.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    /// Distance between two consecutive bases along the axis of a
    /// helix, in nanometers.
    pub z_step: f32,
    /// Radius of a helix, in nanometers.
    pub helix_radius: f32,
    /// Gap between two neighbouring helices.
    pub inter_helix_gap: f32,
    /// Number of crossover repeats that a freshly created virtual helix spans.
    pub default_repeats: usize,
}

impl Parameters {
    /// Default values for the parameters, matching the dimensions used by the cadnano lattices
    /// (2.25 nm between the axes of two neighbouring helices).
    pub const DEFAULT: Parameters = Parameters {
        z_step: 0.34,
        helix_radius: 1.,
        inter_helix_gap: 0.25,
        default_repeats: 2,
    };

    /// Half of the distance between the axes of two neighbouring helices.
    pub fn lattice_radius(&self) -> f32 {
        self.inter_helix_gap / 2. + self.helix_radius
    }

    /// The length given to a virtual helix that is created without an explicit length.
    pub fn default_length(&self, lattice_type: LatticeType) -> usize {
        self.default_repeats * lattice_type.bases_per_repeat()
    }

    pub fn formated_string(&self) -> String {
        use std::fmt::Write;
        let mut ret = String::new();
        writeln!(&mut ret, "  Z step: {:.3} nm", self.z_step).unwrap_or_default();
        writeln!(&mut ret, "  Helix radius: {:.2} nm", self.helix_radius).unwrap_or_default();
        writeln!(
            &mut ret,
            "  Inter helix gap: {:.2} nm",
            self.inter_helix_gap
        )
        .unwrap_or_default();
        writeln!(&mut ret, "  Default repeats: {}", self.default_repeats).unwrap_or_default();
        ret
    }
}

impl std::default::Default for Parameters {
    fn default() -> Self {
        Self::DEFAULT
    }
}
