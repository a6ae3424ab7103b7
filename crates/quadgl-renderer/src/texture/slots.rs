use std::collections::BTreeSet;

use tracing::trace;

use crate::error::RenderError;

/// Texture unit a texture is bound to when drawn, and the index the fragment
/// shader uses to pick its sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureSlot(u32);

impl TextureSlot {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    pub const fn index(self) -> u32 {
        self.0
    }

    /// Value written into the per-vertex texture index attribute.
    pub fn as_vertex_index(self) -> f32 {
        self.0 as f32
    }
}

/// Hands out texture slots in `[0, max)`.
///
/// Automatic allocation counts upward and skips slots that were claimed
/// explicitly.
#[derive(Debug, Clone)]
pub struct SlotAllocator {
    max: u32,
    next: u32,
    in_use: BTreeSet<u32>,
}

impl SlotAllocator {
    pub fn new(max: u32) -> Self {
        Self {
            max,
            next: 0,
            in_use: BTreeSet::new(),
        }
    }

    /// Take the lowest slot at or after the allocation cursor that is free.
    pub fn allocate(&mut self) -> Result<TextureSlot, RenderError> {
        while self.in_use.contains(&self.next) {
            self.next += 1;
        }
        if self.next >= self.max {
            return Err(RenderError::TextureUnitsExhausted { max: self.max });
        }
        let slot = self.next;
        self.next += 1;
        self.in_use.insert(slot);
        trace!(slot, "texture slot allocated");
        Ok(TextureSlot(slot))
    }

    /// Claim a specific slot.
    pub fn claim(&mut self, slot: u32) -> Result<TextureSlot, RenderError> {
        if slot >= self.max {
            return Err(RenderError::TextureSlotOutOfRange {
                slot,
                max: self.max,
            });
        }
        if !self.in_use.insert(slot) {
            return Err(RenderError::TextureSlotInUse(slot));
        }
        trace!(slot, "texture slot claimed");
        Ok(TextureSlot(slot))
    }

    /// Return a slot so it can be claimed or allocated again.
    pub fn release(&mut self, slot: TextureSlot) {
        if self.in_use.remove(&slot.0) && slot.0 < self.next {
            self.next = slot.0;
        }
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn in_use(&self) -> usize {
        self.in_use.len()
    }
}
