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

use super::{Oligo, Strand, StrandId, Strands};
use crate::Collection;
use std::fmt;

impl fmt::Display for StrandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = if self.forward { "->" } else { "<-" };
        write!(f, "[H{}: {} {} {}]", self.helix, self.low, arrow, self.high)
    }
}

impl Strands {
    /// A one line description of an oligo, its strands listed from 5' to 3'.
    pub fn formated_oligo(&self, oligo: &Oligo) -> String {
        let mut ret: Vec<String> = oligo
            .strands
            .iter()
            .filter_map(|id| self.get(id))
            .map(|s| s.to_string())
            .collect();
        if oligo.cyclic {
            ret.push(String::from("(cyclic)"));
        }
        ret.join(" ")
    }
}
