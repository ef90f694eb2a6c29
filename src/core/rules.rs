// src/core/rules.rs
//
// Which miners fit which slots. Two-slot miners need a container slot,
// one-slot miners need a leaf slot. Child slots are always leaves.

use super::catalog::SlotSize;

pub fn can_place(size: SlotSize, target_is_container: bool) -> bool {
    match size {
        SlotSize::TwoSlot => target_is_container,
        SlotSize::OneSlot => !target_is_container,
    }
}
