//! Generation-tagged handles into the scene.
//!
//! Every layout pass opens a new generation. A `PoseHandle` names one member
//! slot *within* a generation; once the scene moves on, writes through old
//! handles are rejected instead of landing on whatever now occupies the slot.

use std::fmt;

/// Layout generation counter. Generation 0 means "nothing laid out yet".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(pub u32);

impl Generation {
    /// The generation that follows this one.
    #[inline]
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// Handle to one member pose in one generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoseHandle {
    generation: Generation,
    slot: u32,
}

impl PoseHandle {
    #[inline]
    pub(crate) fn new(generation: Generation, slot: usize) -> Self {
        Self {
            generation,
            slot: slot as u32,
        }
    }

    #[inline]
    pub fn generation(self) -> Generation {
        self.generation
    }

    /// Index into the scene's SoA buffers.
    #[inline]
    pub fn slot(self) -> usize {
        self.slot as usize
    }
}

impl fmt::Display for PoseHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pose({}#{})", self.generation, self.slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_next() {
        let g = Generation::default();
        assert_eq!(g.raw(), 0);
        assert_eq!(g.next(), Generation(1));
        assert_eq!(Generation(u32::MAX).next(), Generation(0));
    }

    #[test]
    fn test_handle_display() {
        let handle = PoseHandle::new(Generation(3), 5);
        assert_eq!(format!("{}", handle), "Pose(g3#5)");
        assert_eq!(handle.slot(), 5);
        assert_eq!(handle.generation(), Generation(3));
    }
}
