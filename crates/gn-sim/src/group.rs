//! Group orders: formation slots and completion tracking.
//!
//! A group order gives every member its own cell near a shared target and
//! keeps those cells held until the whole group has arrived.  The tracker
//! only does bookkeeping; [`NavSim`](crate::NavSim) feeds it arrival and
//! abandonment events after each movement pass.

use std::collections::BTreeMap;
use std::fmt;

use gn_core::{AgentId, CellCoord};
use serde::{Deserialize, Serialize};

use crate::OrderOutcome;

/// Handle of one group order.  Never reused within a simulation.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct GroupId(pub u32);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G{}", self.0)
    }
}

/// What [`NavSim::issue_group_order`](crate::NavSim::issue_group_order)
/// did for each member, in allocation order.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupOrder {
    /// `None` when every member was rejected.
    pub group:       Option<GroupId>,
    pub assignments: Vec<(AgentId, OrderOutcome)>,
}

impl GroupOrder {
    /// Members that were given a cell, reserved or not.
    pub fn accepted(&self) -> impl Iterator<Item = (AgentId, CellCoord)> + '_ {
        self.assignments.iter().filter_map(|(agent, outcome)| outcome.cell().map(|c| (*agent, c)))
    }
}

/// A group whose members have all arrived.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct CompletedGroup {
    pub id:            GroupId,
    pub members:       Vec<AgentId>,
    pub release_holds: bool,
}

#[derive(Clone, Debug)]
struct Group {
    /// Member → assigned formation cell.
    slots:         BTreeMap<AgentId, CellCoord>,
    /// Members that have not yet arrived at their slot.
    pending:       BTreeMap<AgentId, CellCoord>,
    release_holds: bool,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct GroupTracker {
    next:      u32,
    groups:    BTreeMap<GroupId, Group>,
    member_of: BTreeMap<AgentId, GroupId>,
}

impl GroupTracker {
    /// Register a new group.  Members are removed from any group they were
    /// in before.
    pub fn open(&mut self, slots: Vec<(AgentId, CellCoord)>, release_holds: bool) -> GroupId {
        let id = GroupId(self.next);
        self.next += 1;
        for &(agent, _) in &slots {
            self.leave(agent);
            self.member_of.insert(agent, id);
        }
        let slots: BTreeMap<_, _> = slots.into_iter().collect();
        self.groups.insert(id, Group { pending: slots.clone(), slots, release_holds });
        id
    }

    pub fn group_of(&self, agent: AgentId) -> Option<GroupId> {
        self.member_of.get(&agent).copied()
    }

    /// Members of `group` in ascending id order.
    pub fn members(&self, group: GroupId) -> Option<Vec<AgentId>> {
        self.groups.get(&group).map(|g| g.slots.keys().copied().collect())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Drop `agent` from its group.  A group left with no members vanishes
    /// without completing.
    pub fn leave(&mut self, agent: AgentId) -> Option<GroupId> {
        let id = self.member_of.remove(&agent)?;
        if let Some(group) = self.groups.get_mut(&id) {
            group.slots.remove(&agent);
            group.pending.remove(&agent);
            if group.slots.is_empty() {
                self.groups.remove(&id);
            }
        }
        Some(id)
    }

    /// Record an arrival.  Only an arrival at the member's own slot counts.
    pub fn mark_arrived(&mut self, agent: AgentId, cell: CellCoord) {
        let Some(id) = self.member_of.get(&agent) else { return };
        if let Some(group) = self.groups.get_mut(id) {
            if group.pending.get(&agent) == Some(&cell) {
                group.pending.remove(&agent);
            }
        }
    }

    /// Remove and return every group with no pending members, in id order.
    pub fn take_completed(&mut self) -> Vec<CompletedGroup> {
        let done: Vec<GroupId> = self
            .groups
            .iter()
            .filter(|(_, g)| g.pending.is_empty())
            .map(|(&id, _)| id)
            .collect();
        let mut completed = Vec::with_capacity(done.len());
        for id in done {
            if let Some(group) = self.groups.remove(&id) {
                let members: Vec<AgentId> = group.slots.into_keys().collect();
                for m in &members {
                    self.member_of.remove(m);
                }
                completed.push(CompletedGroup { id, members, release_holds: group.release_holds });
            }
        }
        completed
    }
}
