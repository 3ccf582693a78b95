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
//! This modules defines operations that can be performed on a design to modify it.
//! The functions that apply these operations take a mutable reference to the design that they are
//! modifying and may return an `ErrOperation` if the operation could not be applied.
//!
//! They are only called through the methods of `Design`, which run them on a copy of the design
//! and discard that copy on error. An operation may therefore return early after having
//! partially modified its argument.

use super::{
    Collection, Crossover, Design, DesignNotification, Extremity, Insertion, LatticeCoord, Nucl,
    Strand, StrandId, StrandType, VirtualHelix,
};
use thiserror::Error;

/// An error that occured when trying to apply an operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrOperation {
    #[error("lattice coordinate {coord} is already occupied by helix {helix}")]
    DuplicateCoordinate { coord: LatticeCoord, helix: usize },
    #[error("helix {0} does not exist")]
    HelixDoesNotExist(usize),
    #[error("helix {id_num} is stored under identifier {key}")]
    HelixIdMismatch { key: usize, id_num: usize },
    #[error("strand {0} does not exist")]
    StrandDoesNotExist(StrandId),
    #[error("index {index} is out of the range [0, {length}) of helix {helix}")]
    IndexOutOfRange {
        helix: usize,
        index: isize,
        length: usize,
    },
    #[error("helix {0} still carries strands")]
    HasActiveStrands(usize),
    #[error("resizing helix {helix} to {length} bases would orphan strands or insertions")]
    WouldOrphanData { helix: usize, length: usize },
    #[error("the end of strand {strand} at index {index} is already connected")]
    EndpointOccupied { strand: StrandId, index: isize },
    #[error("index {index} is not an end of strand {strand}")]
    NotStrandEnd { strand: StrandId, index: isize },
    #[error("cannot connect the end of strand {0} to itself")]
    SelfLoop(StrandId),
    #[error("the interval [{low}, {high}] overlaps strand {other}")]
    OverlappingStrand {
        low: isize,
        high: isize,
        other: StrandId,
    },
    #[error("[{low}, {high}] is not a valid strand interval")]
    InvalidStrandRange { low: isize, high: isize },
    #[error("a cross-over must join a 3' end to a 5' end")]
    XoverPolarityMismatch,
    #[error("the crossover rules do not allow a cross-over from {from} to {to}")]
    UnreachableXover { from: Nucl, to: Nucl },
    #[error("there is no cross-over at index {index} of strand {strand}")]
    XoverDoesNotExist { strand: StrandId, index: isize },
    #[error("strands {0} and {1} are not adjacent")]
    StrandsNotAdjacent(StrandId, StrandId),
}

pub(super) fn create_virtual_helix(
    design: &mut Design,
    coord: LatticeCoord,
    length: usize,
) -> Result<usize, ErrOperation> {
    if let Some(helix) = design.helices.helix_at(coord) {
        return Err(ErrOperation::DuplicateCoordinate { coord, helix });
    }
    let h_id = design.helices.make_mut().push(coord, length);
    log::debug!("Created helix {} at {} with {} bases", h_id, coord, length);
    design.notify(DesignNotification::HelixAdded(h_id));
    Ok(h_id)
}

pub(super) fn remove_virtual_helix(design: &mut Design, h_id: usize) -> Result<(), ErrOperation> {
    design.try_get_helix(h_id)?;
    if design.strands.uses_helix(h_id) {
        return Err(ErrOperation::HasActiveStrands(h_id));
    }
    design.helices.make_mut().remove(&h_id);
    log::debug!("Removed helix {}", h_id);
    design.notify(DesignNotification::HelixRemoved(h_id));
    Ok(())
}

pub(super) fn resize_virtual_helix(
    design: &mut Design,
    h_id: usize,
    new_length: usize,
    force: bool,
) -> Result<(), ErrOperation> {
    let bound = new_length as isize;
    let orphan_insertions: Vec<isize> = design
        .try_get_helix(h_id)?
        .insertions()
        .keys()
        .filter(|idx| **idx >= bound)
        .cloned()
        .collect();
    let orphan_strands: Vec<StrandId> = design
        .strands
        .strands_on_helix(h_id)
        .into_iter()
        .filter(|s_id| design.strands.get(s_id).map_or(false, |s| s.high >= bound))
        .collect();

    if !orphan_strands.is_empty() || !orphan_insertions.is_empty() {
        if !force {
            return Err(ErrOperation::WouldOrphanData {
                helix: h_id,
                length: new_length,
            });
        }
        log::warn!(
            "Resizing helix {} to {} bases removes strands {:?} and insertions at {:?}",
            h_id,
            new_length,
            orphan_strands,
            orphan_insertions
        );
    }
    for s_id in orphan_strands {
        remove_strand(design, s_id)?;
    }

    {
        let mut helices = design.helices.make_mut();
        let helix = helices
            .get_mut(&h_id)
            .ok_or(ErrOperation::HelixDoesNotExist(h_id))?;
        helix.length = new_length;
        helix.insertions.retain(|idx, _| *idx < bound);
    }
    for base_idx in orphan_insertions {
        design.notify(DesignNotification::InsertionChanged {
            helix: h_id,
            base_idx,
        });
    }
    log::debug!("Resized helix {} to {} bases", h_id, new_length);
    design.notify(DesignNotification::HelixResized {
        helix: h_id,
        length: new_length,
    });
    Ok(())
}

pub(super) fn set_insertion(
    design: &mut Design,
    h_id: usize,
    base_idx: isize,
    length: isize,
) -> Result<(), ErrOperation> {
    check_index(design.try_get_helix(h_id)?, base_idx)?;
    {
        let mut helices = design.helices.make_mut();
        let helix = helices
            .get_mut(&h_id)
            .ok_or(ErrOperation::HelixDoesNotExist(h_id))?;
        match Insertion::from_length(length) {
            Some(insertion) => {
                helix.insertions.insert(base_idx, insertion);
            }
            None => {
                helix.insertions.remove(&base_idx);
            }
        }
    }
    log::debug!("Insertion of length {} at {} on helix {}", length, base_idx, h_id);
    design.notify(DesignNotification::InsertionChanged {
        helix: h_id,
        base_idx,
    });
    Ok(())
}

pub(super) fn set_helix_visibility(
    design: &mut Design,
    h_id: usize,
    visible: bool,
) -> Result<(), ErrOperation> {
    mutate_helix(design, h_id, |h| h.visible = visible)
}

pub(super) fn set_helix_placement(
    design: &mut Design,
    h_id: usize,
    z_offset: f32,
    euler_z: f32,
) -> Result<(), ErrOperation> {
    mutate_helix(design, h_id, |h| {
        h.z_offset = z_offset;
        h.euler_z = euler_z;
    })
}

fn mutate_helix<F>(design: &mut Design, h_id: usize, mutation: F) -> Result<(), ErrOperation>
where
    F: FnOnce(&mut VirtualHelix),
{
    {
        let mut helices = design.helices.make_mut();
        let helix = helices
            .get_mut(&h_id)
            .ok_or(ErrOperation::HelixDoesNotExist(h_id))?;
        mutation(helix);
    }
    design.notify(DesignNotification::HelixPropertyChanged(h_id));
    Ok(())
}

fn check_index(helix: &VirtualHelix, index: isize) -> Result<(), ErrOperation> {
    if helix.contains_index(index) {
        Ok(())
    } else {
        Err(ErrOperation::IndexOutOfRange {
            helix: helix.id_num,
            index,
            length: helix.length,
        })
    }
}

/// Check that `[low, high]` is a valid interval of `helix`.
fn check_interval(helix: &VirtualHelix, low: isize, high: isize) -> Result<(), ErrOperation> {
    if low >= high {
        return Err(ErrOperation::InvalidStrandRange { low, high });
    }
    check_index(helix, low)?;
    check_index(helix, high)
}

fn check_overlap(
    design: &Design,
    helix: usize,
    forward: bool,
    low: isize,
    high: isize,
    ignored: Option<StrandId>,
) -> Result<(), ErrOperation> {
    let other = design
        .strands
        .strand_set(helix, forward)
        .and_then(|set| set.first_overlap(low, high, ignored));
    if let Some(other) = other {
        Err(ErrOperation::OverlappingStrand { low, high, other })
    } else {
        Ok(())
    }
}

pub(super) fn create_strand(
    design: &mut Design,
    h_id: usize,
    forward: bool,
    low: isize,
    high: isize,
) -> Result<StrandId, ErrOperation> {
    let helix = design.try_get_helix(h_id)?;
    check_interval(helix, low, high)?;
    let strand_type = StrandType::on_strand(helix.scaffold_is_forward(), forward);
    check_overlap(design, h_id, forward, low, high, None)?;
    let strand = Strand::new(h_id, forward, low, high, strand_type);
    log::debug!("Creating strand {}", strand);
    let s_id = design.strands.make_mut().push(strand);
    design.notify(DesignNotification::StrandAdded(s_id));
    Ok(s_id)
}

pub(super) fn remove_strand(design: &mut Design, s_id: StrandId) -> Result<(), ErrOperation> {
    let strand = design.try_get_strand(s_id)?.clone();
    for end in [strand.prime5(), strand.prime3()].iter() {
        // A strand linked to itself has both ends freed by the first detach.
        if design.try_get_strand(s_id)?.has_xover_at(end.position) {
            let xover = detach_xover(design, s_id, end.position)?;
            design.notify(DesignNotification::XoverRemoved(xover));
        }
    }
    design.strands.make_mut().remove(&s_id);
    log::debug!("Removed strand {} {}", s_id, strand);
    design.notify(DesignNotification::StrandRemoved(s_id));
    Ok(())
}

pub(super) fn split_strand(
    design: &mut Design,
    s_id: StrandId,
    index: isize,
) -> Result<(StrandId, StrandId), ErrOperation> {
    let strand = design.try_get_strand(s_id)?.clone();
    if !strand.has_nucl(&Nucl::new(strand.helix, index, strand.forward)) {
        let helix = design.try_get_helix(strand.helix)?;
        check_index(helix, index)?;
        return Err(ErrOperation::InvalidStrandRange {
            low: strand.low,
            high: index,
        });
    }
    if index <= strand.low {
        return Err(ErrOperation::InvalidStrandRange {
            low: strand.low,
            high: index,
        });
    }
    if index + 1 >= strand.high {
        return Err(ErrOperation::InvalidStrandRange {
            low: index + 1,
            high: strand.high,
        });
    }

    let mut low_part = Strand::new(
        strand.helix,
        strand.forward,
        strand.low,
        index,
        strand.strand_type,
    );
    low_part.set_xover(
        low_part.low_extremity(),
        strand.xover_at(strand.low_extremity()),
    );
    let mut high_part = Strand::new(
        strand.helix,
        strand.forward,
        index + 1,
        strand.high,
        strand.strand_type,
    );
    high_part.set_xover(
        high_part.high_extremity(),
        strand.xover_at(strand.high_extremity()),
    );

    let (low_id, high_id) = {
        let mut strands = design.strands.make_mut();
        let low_id = strands.push(low_part);
        let high_id = strands.push(high_part);
        strands.remove(&s_id);
        (low_id, high_id)
    };
    log::debug!("Split strand {} {} at {}", s_id, strand, index);
    design.notify(DesignNotification::StrandRemoved(s_id));
    design.notify(DesignNotification::StrandAdded(low_id));
    design.notify(DesignNotification::StrandAdded(high_id));
    Ok((low_id, high_id))
}

pub(super) fn merge_strands(
    design: &mut Design,
    a: StrandId,
    b: StrandId,
) -> Result<StrandId, ErrOperation> {
    let strand_a = design.try_get_strand(a)?.clone();
    let strand_b = design.try_get_strand(b)?.clone();
    if a == b || strand_a.helix != strand_b.helix || strand_a.forward != strand_b.forward {
        return Err(ErrOperation::StrandsNotAdjacent(a, b));
    }
    let ((first_id, first), (second_id, second)) = if strand_a.high + 1 == strand_b.low {
        ((a, strand_a), (b, strand_b))
    } else if strand_b.high + 1 == strand_a.low {
        ((b, strand_b), (a, strand_a))
    } else {
        return Err(ErrOperation::StrandsNotAdjacent(a, b));
    };
    if first.xover_at(first.high_extremity()).is_some() {
        return Err(ErrOperation::EndpointOccupied {
            strand: first_id,
            index: first.high,
        });
    }
    if second.xover_at(second.low_extremity()).is_some() {
        return Err(ErrOperation::EndpointOccupied {
            strand: second_id,
            index: second.low,
        });
    }

    let mut merged = Strand::new(
        first.helix,
        first.forward,
        first.low,
        second.high,
        first.strand_type,
    );
    merged.set_xover(merged.low_extremity(), first.xover_at(first.low_extremity()));
    merged.set_xover(
        merged.high_extremity(),
        second.xover_at(second.high_extremity()),
    );
    let merged_id = {
        let mut strands = design.strands.make_mut();
        let merged_id = strands.push(merged);
        strands.remove(&a);
        strands.remove(&b);
        merged_id
    };
    log::debug!("Merged strands {} and {} into {}", a, b, merged_id);
    design.notify(DesignNotification::StrandRemoved(a));
    design.notify(DesignNotification::StrandRemoved(b));
    design.notify(DesignNotification::StrandAdded(merged_id));
    Ok(merged_id)
}

pub(super) fn resize_strand(
    design: &mut Design,
    s_id: StrandId,
    low: isize,
    high: isize,
) -> Result<(), ErrOperation> {
    let strand = design.try_get_strand(s_id)?.clone();
    check_interval(design.try_get_helix(strand.helix)?, low, high)?;
    if low != strand.low && strand.xover_at(strand.low_extremity()).is_some() {
        return Err(ErrOperation::EndpointOccupied {
            strand: s_id,
            index: strand.low,
        });
    }
    if high != strand.high && strand.xover_at(strand.high_extremity()).is_some() {
        return Err(ErrOperation::EndpointOccupied {
            strand: s_id,
            index: strand.high,
        });
    }
    check_overlap(design, strand.helix, strand.forward, low, high, Some(s_id))?;
    {
        let mut strands = design.strands.make_mut();
        if let Some(s) = strands.get_mut(&s_id) {
            s.low = low;
            s.high = high;
        }
    }
    log::debug!("Resized strand {} from {} to [{}, {}]", s_id, strand, low, high);
    design.notify(DesignNotification::StrandResized(s_id));
    Ok(())
}

/// Connect the ends of two strands. If `check_rules` is false, the crossover rules of the
/// lattice are ignored.
pub(super) fn create_xover(
    design: &mut Design,
    strand_a: StrandId,
    idx_a: isize,
    strand_b: StrandId,
    idx_b: isize,
    check_rules: bool,
) -> Result<Crossover, ErrOperation> {
    let s_a = design.try_get_strand(strand_a)?;
    let s_b = design.try_get_strand(strand_b)?;
    if strand_a == strand_b && idx_a == idx_b {
        return Err(ErrOperation::SelfLoop(strand_a));
    }
    let ext_a = end_at(s_a, strand_a, idx_a)?;
    let ext_b = end_at(s_b, strand_b, idx_b)?;
    if s_a.xover_at(ext_a).is_some() {
        return Err(ErrOperation::EndpointOccupied {
            strand: strand_a,
            index: idx_a,
        });
    }
    if s_b.xover_at(ext_b).is_some() {
        return Err(ErrOperation::EndpointOccupied {
            strand: strand_b,
            index: idx_b,
        });
    }
    let xover = match (ext_a, ext_b) {
        (Extremity::Prime3, Extremity::Prime5) => Crossover {
            from: s_a.prime3(),
            to: s_b.prime5(),
        },
        (Extremity::Prime5, Extremity::Prime3) => Crossover {
            from: s_b.prime3(),
            to: s_a.prime5(),
        },
        _ => return Err(ErrOperation::XoverPolarityMismatch),
    };
    if check_rules && !design.is_xover_reachable(xover.from, xover.to) {
        return Err(ErrOperation::UnreachableXover {
            from: xover.from,
            to: xover.to,
        });
    }

    let partner = |ext: Extremity| {
        if ext.is_3prime() {
            xover.to
        } else {
            xover.from
        }
    };
    {
        let mut strands = design.strands.make_mut();
        if let Some(s) = strands.get_mut(&strand_a) {
            s.set_xover(ext_a, Some(partner(ext_a)));
        }
        if let Some(s) = strands.get_mut(&strand_b) {
            s.set_xover(ext_b, Some(partner(ext_b)));
        }
    }
    log::debug!("Created cross-over from {} to {}", xover.from, xover.to);
    design.notify(DesignNotification::XoverAdded(xover));
    Ok(xover)
}

fn end_at(strand: &Strand, s_id: StrandId, index: isize) -> Result<Extremity, ErrOperation> {
    let extremity = strand.extremity(index);
    if extremity.is_end() {
        Ok(extremity)
    } else {
        Err(ErrOperation::NotStrandEnd {
            strand: s_id,
            index,
        })
    }
}

pub(super) fn remove_xover(
    design: &mut Design,
    s_id: StrandId,
    index: isize,
) -> Result<Crossover, ErrOperation> {
    let xover = detach_xover(design, s_id, index)?;
    log::debug!("Removed cross-over from {} to {}", xover.from, xover.to);
    design.notify(DesignNotification::XoverRemoved(xover));
    Ok(xover)
}

/// Free the end of strand `s_id` at `index` and the end it is connected to.
fn detach_xover(
    design: &mut Design,
    s_id: StrandId,
    index: isize,
) -> Result<Crossover, ErrOperation> {
    let strand = design.try_get_strand(s_id)?;
    let extremity = end_at(strand, s_id, index)?;
    let end = Nucl::new(strand.helix, index, strand.forward);
    let partner = strand
        .xover_at(extremity)
        .ok_or(ErrOperation::XoverDoesNotExist {
            strand: s_id,
            index,
        })?;
    let xover = if extremity.is_3prime() {
        Crossover {
            from: end,
            to: partner,
        }
    } else {
        Crossover {
            from: partner,
            to: end,
        }
    };
    let partner_id = design.strands.strand_at(&partner);

    let mut strands = design.strands.make_mut();
    if let Some(s) = strands.get_mut(&s_id) {
        s.set_xover(extremity, None);
    }
    if let Some(p_id) = partner_id {
        if let Some(p) = strands.get_mut(&p_id) {
            let partner_extremity = p.extremity(partner.position);
            p.set_xover(partner_extremity, None);
        }
    }
    Ok(xover)
}
