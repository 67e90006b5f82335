use serde::{Deserialize, Serialize};

use super::domain::{RecommendationSet, School, SelectionType};
use super::engine::COMBINATIONS_PER_PATHWAY;

/// Slots in a complete selection.
pub const GRID_SIZE: usize = 12;

/// Slots per combination block.
pub const BLOCK_SIZE: usize = 4;

/// One position in the 3×4 school selection grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSlot {
    pub slot_id: usize,
    pub combination_index: usize,
    pub selection_type: SelectionType,
    pub school: Option<School>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety_score: Option<u8>,
}

/// Fixed 12-slot layout: per combination two out-of-county boarding, one in-county boarding,
/// and one sub-county day slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionGrid {
    slots: Vec<SelectionSlot>,
}

impl Default for SelectionGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionGrid {
    pub fn new() -> Self {
        let mut slots = Vec::with_capacity(GRID_SIZE);
        for combination_index in 0..COMBINATIONS_PER_PATHWAY {
            for selection_type in SelectionType::BLOCK_ORDER {
                for _ in 0..selection_type.slots_per_block() {
                    slots.push(SelectionSlot {
                        slot_id: slots.len(),
                        combination_index,
                        selection_type,
                        school: None,
                        safety_score: None,
                    });
                }
            }
        }
        Self { slots }
    }

    /// Place each recommendation in the first empty slot of its combination and kind.
    /// Recommendations without a free matching slot are left out.
    pub fn from_recommendations(set: &RecommendationSet) -> Self {
        let mut grid = Self::new();
        for recommendation in &set.recommendations {
            if let Some(slot) = grid.slots.iter_mut().find(|slot| {
                slot.school.is_none()
                    && slot.combination_index == recommendation.combination_index
                    && slot.selection_type == recommendation.selection_type
            }) {
                slot.school = Some(recommendation.school.clone());
                slot.safety_score = Some(recommendation.safety_score);
            }
        }
        grid
    }

    pub fn slots(&self) -> &[SelectionSlot] {
        &self.slots
    }

    pub fn slot(&self, slot_id: usize) -> Option<&SelectionSlot> {
        self.slots.get(slot_id)
    }

    /// Replace the school in a slot, returning whatever was there before.
    pub fn select(&mut self, slot_id: usize, school: School) -> Result<Option<School>, GridError> {
        let slot = self
            .slots
            .get_mut(slot_id)
            .ok_or(GridError::UnknownSlot(slot_id))?;
        slot.safety_score = None;
        Ok(slot.school.replace(school))
    }

    pub fn remove(&mut self, slot_id: usize) -> Result<Option<School>, GridError> {
        let slot = self
            .slots
            .get_mut(slot_id)
            .ok_or(GridError::UnknownSlot(slot_id))?;
        slot.safety_score = None;
        Ok(slot.school.take())
    }

    pub fn filled(&self) -> usize {
        self.slots.iter().filter(|slot| slot.school.is_some()).count()
    }

    pub fn filled_for(&self, combination_index: usize) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.combination_index == combination_index && slot.school.is_some())
            .count()
    }

    pub fn is_complete(&self) -> bool {
        self.filled() == GRID_SIZE
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("slot {0} does not exist (grid has {} slots)", GRID_SIZE)]
    UnknownSlot(usize),
}
