//! Bitfield map of instruction start offsets.
//!
//! The decoder marks the offset of every instruction it decodes and afterwards checks each
//! branch target against the map, so a jump into the middle of an instruction is detected
//! without searching the instruction list.

/// One bit per byte of a code array, set where an instruction starts.
pub struct VisitedMap {
    data: Vec<usize>,
    elements: usize,
    bitfield_size: usize,
}

impl VisitedMap {
    /// Create a map for a code array of `elements` bytes, with no offsets marked.
    pub fn new(elements: usize) -> VisitedMap {
        let bitfield_size = std::mem::size_of::<usize>() * 8;

        VisitedMap {
            data: vec![0_usize; elements.div_ceil(bitfield_size)],
            elements,
            bitfield_size,
        }
    }

    /// Returns the number of offsets this map tracks.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.elements
    }

    /// Returns `true` if the map tracks no offsets.
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.elements == 0
    }

    /// Check whether `element` has been marked. Offsets past the end are never marked.
    pub fn get(&self, element: usize) -> bool {
        if element >= self.elements {
            return false;
        }

        if let Some(bitfield) = self.data.get(element / self.bitfield_size) {
            let shift_amount = u32::try_from(element % self.bitfield_size).unwrap_or(0);
            return (bitfield.wrapping_shr(shift_amount) & 1_usize) != 0;
        }

        false
    }

    /// Mark `element`. Offsets past the end are ignored.
    pub fn set(&mut self, element: usize) {
        if element >= self.elements {
            return;
        }

        if let Some(bitfield) = self.data.get_mut(element / self.bitfield_size) {
            let shift_amount = u32::try_from(element % self.bitfield_size).unwrap_or(0);
            *bitfield |= 1_usize.wrapping_shl(shift_amount);
        }
    }

    /// Number of marked offsets.
    #[cfg(test)]
    pub fn count(&self) -> usize {
        self.data
            .iter()
            .map(|bitfield| bitfield.count_ones() as usize)
            .sum()
    }
}
