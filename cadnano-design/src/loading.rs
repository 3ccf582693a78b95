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
//! Checked deserialization of designs.
//!
//! A design read from a file is first deserialized as a `RawDesign`, and only becomes a `Design`
//! if its helices and strands satisfy the invariants that the mutating operations maintain.

use super::{
    Collection, Design, ErrOperation, Extremity, Helices, LatticeCoord, LatticeType, Parameters, Strand,
    StrandId, Strands, VirtualHelix,
};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Deserialize)]
pub(super) struct RawDesign {
    lattice_type: LatticeType,
    #[serde(default)]
    parameters: Parameters,
    #[serde(default)]
    helices: BTreeMap<usize, VirtualHelix>,
    #[serde(default)]
    strands: BTreeMap<usize, Strand>,
}

impl TryFrom<RawDesign> for Design {
    type Error = ErrOperation;

    fn try_from(raw: RawDesign) -> Result<Self, Self::Error> {
        check_helices(&raw.helices)?;
        check_strands(&raw.helices, &raw.strands)?;
        let helices = Helices::from(
            raw.helices
                .into_iter()
                .map(|(k, h)| (k, Arc::new(h)))
                .collect::<BTreeMap<_, _>>(),
        );
        let strands = Strands::from(
            raw.strands
                .into_iter()
                .map(|(k, s)| (k, Arc::new(s)))
                .collect::<BTreeMap<_, _>>(),
        );
        check_xovers(&strands)?;
        let mut design = Design::with_parameters(raw.lattice_type, raw.parameters);
        design.helices = helices;
        design.strands = strands;
        log::debug!(
            "Loaded design with {} helices and {} strands",
            design.helices.len(),
            design.strands.len()
        );
        Ok(design)
    }
}

fn check_helices(helices: &BTreeMap<usize, VirtualHelix>) -> Result<(), ErrOperation> {
    let mut coords: BTreeMap<LatticeCoord, usize> = BTreeMap::new();
    for (key, helix) in helices.iter() {
        if helix.id_num != *key {
            return Err(ErrOperation::HelixIdMismatch {
                key: *key,
                id_num: helix.id_num,
            });
        }
        if let Some(other) = coords.insert(helix.coord, *key) {
            return Err(ErrOperation::DuplicateCoordinate {
                coord: helix.coord,
                helix: other,
            });
        }
        if let Some(index) = helix.insertions().keys().find(|i| !helix.contains_index(**i)) {
            return Err(ErrOperation::IndexOutOfRange {
                helix: *key,
                index: *index,
                length: helix.length,
            });
        }
    }
    Ok(())
}

fn check_strands(
    helices: &BTreeMap<usize, VirtualHelix>,
    strands: &BTreeMap<usize, Strand>,
) -> Result<(), ErrOperation> {
    let mut sets: BTreeMap<(usize, bool), Vec<(isize, isize, StrandId)>> = BTreeMap::new();
    for (key, strand) in strands.iter() {
        let helix = helices
            .get(&strand.helix)
            .ok_or(ErrOperation::HelixDoesNotExist(strand.helix))?;
        if strand.low >= strand.high {
            return Err(ErrOperation::InvalidStrandRange {
                low: strand.low,
                high: strand.high,
            });
        }
        for index in [strand.low, strand.high].iter() {
            if !helix.contains_index(*index) {
                return Err(ErrOperation::IndexOutOfRange {
                    helix: strand.helix,
                    index: *index,
                    length: helix.length,
                });
            }
        }
        sets.entry((strand.helix, strand.forward))
            .or_default()
            .push((strand.low, strand.high, StrandId(*key)));
    }
    for intervals in sets.values_mut() {
        intervals.sort();
        for pair in intervals.windows(2) {
            let (_, prev_high, prev_id) = pair[0];
            let (low, high, _) = pair[1];
            if low <= prev_high {
                return Err(ErrOperation::OverlappingStrand {
                    low,
                    high,
                    other: prev_id,
                });
            }
        }
    }
    Ok(())
}

/// Every cross-over must be recorded on both of its ends, from a 3' end to a 5' end.
fn check_xovers(strands: &Strands) -> Result<(), ErrOperation> {
    for (s_id, strand) in strands.iter() {
        let ends = [
            (strand.prime5(), Extremity::Prime5),
            (strand.prime3(), Extremity::Prime3),
        ];
        for (end, extremity) in ends.iter() {
            let partner = match strand.xover_at(*extremity) {
                Some(partner) => partner,
                None => continue,
            };
            let reciprocal = strands
                .strand_at(&partner)
                .and_then(|p_id| strands.get(&p_id))
                .filter(|p| {
                    let p_extremity = p.extremity(partner.position);
                    p_extremity.is_end()
                        && p_extremity.is_3prime() != extremity.is_3prime()
                        && p.xover_at(p_extremity) == Some(*end)
                })
                .is_some();
            if !reciprocal {
                return Err(ErrOperation::XoverDoesNotExist {
                    strand: *s_id,
                    index: end.position,
                });
            }
        }
    }
    Ok(())
}
