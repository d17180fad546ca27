//! Unit categories shared by the registry, formation allocation and arrival
//! handling.
//!
//! Categories are a tagged enum with static lookup tables rather than a type
//! hierarchy.  Behaviour that only some categories have is expressed through
//! the [`CategoryHooks`] capability trait.

/// The kind of unit an agent represents.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum UnitCategory {
    Leader,
    #[default]
    Infantry,
    Cavalry,
    Villager,
    Siege,
}

impl UnitCategory {
    pub const ALL: [UnitCategory; 5] = [
        UnitCategory::Leader,
        UnitCategory::Infantry,
        UnitCategory::Cavalry,
        UnitCategory::Villager,
        UnitCategory::Siege,
    ];

    /// Formation priority: lower values are allocated cells closest to the
    /// order's target first.
    ///
    /// | Category | Priority |
    /// |----------|----------|
    /// | Leader   | 0        |
    /// | Cavalry  | 1        |
    /// | Infantry | 2        |
    /// | Siege    | 3        |
    /// | Villager | 4        |
    #[inline]
    pub fn priority(self) -> u8 {
        match self {
            UnitCategory::Leader   => 0,
            UnitCategory::Cavalry  => 1,
            UnitCategory::Infantry => 2,
            UnitCategory::Siege    => 3,
            UnitCategory::Villager => 4,
        }
    }

    /// Default movement speed in cell sizes per second.
    #[inline]
    pub fn default_speed(self) -> f32 {
        match self {
            UnitCategory::Leader   => 3.0,
            UnitCategory::Infantry => 2.5,
            UnitCategory::Cavalry  => 4.5,
            UnitCategory::Villager => 2.2,
            UnitCategory::Siege    => 1.2,
        }
    }

    /// Lowercase label, useful for log fields and CSV values.
    pub fn as_str(self) -> &'static str {
        match self {
            UnitCategory::Leader   => "leader",
            UnitCategory::Infantry => "infantry",
            UnitCategory::Cavalry  => "cavalry",
            UnitCategory::Villager => "villager",
            UnitCategory::Siege    => "siege",
        }
    }
}

impl std::fmt::Display for UnitCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Capabilities ──────────────────────────────────────────────────────────────

/// Secondary behaviour an external system should start after a unit arrives.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ArrivalReaction {
    /// Nothing beyond standing still.
    None,
    /// Begin harvesting at the arrival cell.
    BeginHarvest,
}

/// Category-specific hooks.  Every category gets the default (no reaction);
/// only the ones that need it override.
pub trait CategoryHooks {
    fn arrival_reaction(&self) -> ArrivalReaction {
        ArrivalReaction::None
    }
}

impl CategoryHooks for UnitCategory {
    fn arrival_reaction(&self) -> ArrivalReaction {
        match self {
            UnitCategory::Villager => ArrivalReaction::BeginHarvest,
            _ => ArrivalReaction::None,
        }
    }
}
