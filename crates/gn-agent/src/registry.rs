//! `AgentRegistry`: activate / deactivate and iterate active agents.

use gn_core::{AgentId, UnitCategory};

/// Static facts about one active agent.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentRecord {
    pub id:       AgentId,
    pub category: UnitCategory,
    /// Movement speed in cell sizes per second.
    pub speed:    f32,
}

/// Dense slot table indexed by `AgentId`.
///
/// Slots of deactivated agents stay `None`; ids are not recycled.
#[derive(Clone, Debug, Default)]
pub struct AgentRegistry {
    slots:  Vec<Option<AgentRecord>>,
    active: usize,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new agent and return its id.
    ///
    /// Non-finite or negative speeds fall back to the category default.
    pub fn activate(&mut self, category: UnitCategory, speed: f32) -> AgentId {
        let id = AgentId(self.slots.len() as u32);
        let speed = if speed.is_finite() && speed >= 0.0 { speed } else { category.default_speed() };
        self.slots.push(Some(AgentRecord { id, category, speed }));
        self.active += 1;
        id
    }

    /// Remove an agent.  Returns its record, or `None` if it was not active.
    pub fn deactivate(&mut self, id: AgentId) -> Option<AgentRecord> {
        let record = self.slots.get_mut(id.index())?.take()?;
        self.active -= 1;
        Some(record)
    }

    #[inline]
    pub fn is_active(&self, id: AgentId) -> bool {
        self.get(id).is_some()
    }

    #[inline]
    pub fn get(&self, id: AgentId) -> Option<&AgentRecord> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    /// Change an active agent's speed.  Returns `false` for unknown ids.
    pub fn set_speed(&mut self, id: AgentId, speed: f32) -> bool {
        match self.slots.get_mut(id.index()).and_then(Option::as_mut) {
            Some(record) if speed.is_finite() && speed >= 0.0 => {
                record.speed = speed;
                true
            }
            _ => false,
        }
    }

    /// Active agents in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &AgentRecord> {
        self.slots.iter().filter_map(Option::as_ref)
    }

    /// Active ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.iter().map(|r| r.id)
    }

    /// Number of active agents.
    #[inline]
    pub fn len(&self) -> usize {
        self.active
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.active == 0
    }

    /// Total ids ever issued (active or not).
    #[inline]
    pub fn issued(&self) -> usize {
        self.slots.len()
    }
}
