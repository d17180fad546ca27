//! The `MobilityStore`: movement state for every tracked agent.

use gn_core::{AgentId, AgentRng, WorldPoint};
use gn_reserve::AgentPositions;

use crate::{MobilityError, MobilityResult, MovementState};

/// Dense per-agent tables indexed by `AgentId`.
///
/// `states[i]` is `None` for ids that were never added or were removed.
/// RNGs live in a parallel table so the tick pass can borrow an agent's state
/// and its RNG mutably at the same time.
#[derive(Default)]
pub struct MobilityStore {
    pub(crate) states: Vec<Option<MovementState>>,
    pub(crate) rngs:   Vec<Option<AgentRng>>,
    seed:              u64,
}

impl MobilityStore {
    pub fn new(seed: u64) -> Self {
        Self { states: Vec::new(), rngs: Vec::new(), seed }
    }

    /// Start tracking `agent`.
    pub fn insert(&mut self, agent: AgentId, state: MovementState) -> MobilityResult<()> {
        let i = agent.index();
        if agent == AgentId::INVALID {
            return Err(MobilityError::UnknownAgent(agent));
        }
        if self.states.get(i).is_some_and(Option::is_some) {
            return Err(MobilityError::DuplicateAgent(agent));
        }
        if i >= self.states.len() {
            self.states.resize_with(i + 1, || None);
            self.rngs.resize_with(i + 1, || None);
        }
        self.states[i] = Some(state);
        self.rngs[i] = Some(AgentRng::new(self.seed, agent));
        Ok(())
    }

    /// Stop tracking `agent`.
    pub fn remove(&mut self, agent: AgentId) -> Option<MovementState> {
        let state = self.states.get_mut(agent.index())?.take()?;
        self.rngs[agent.index()] = None;
        Some(state)
    }

    #[inline]
    pub fn get(&self, agent: AgentId) -> Option<&MovementState> {
        self.states.get(agent.index()).and_then(Option::as_ref)
    }

    #[inline]
    pub fn get_mut(&mut self, agent: AgentId) -> Option<&mut MovementState> {
        self.states.get_mut(agent.index()).and_then(Option::as_mut)
    }

    pub(crate) fn require_mut(&mut self, agent: AgentId) -> MobilityResult<&mut MovementState> {
        self.get_mut(agent).ok_or(MobilityError::UnknownAgent(agent))
    }

    #[inline]
    pub fn contains(&self, agent: AgentId) -> bool {
        self.get(agent).is_some()
    }

    /// Tracked agents in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (AgentId, &MovementState)> {
        self.states
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|s| (AgentId(i as u32), s)))
    }

    pub fn ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.iter().map(|(id, _)| id)
    }

    pub fn len(&self) -> usize {
        self.states.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Interpolated position for display.  `alpha` is the fraction of the
    /// tick interval elapsed since the last tick.
    pub fn render_position(&self, agent: AgentId, alpha: f32) -> Option<WorldPoint> {
        self.get(agent).map(|s| s.render_position(alpha))
    }

    /// Agents currently following a path or snapping.
    pub fn moving_count(&self) -> usize {
        self.iter().filter(|(_, s)| !s.is_idle()).count()
    }
}

impl AgentPositions for MobilityStore {
    fn visit_positions(&self, f: &mut dyn FnMut(AgentId, WorldPoint)) {
        for (id, state) in self.iter() {
            f(id, state.sim_pos);
        }
    }

    fn position_of(&self, agent: AgentId) -> Option<WorldPoint> {
        self.get(agent).map(|s| s.sim_pos)
    }
}
