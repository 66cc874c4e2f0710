//! One-shot stat effects shared by upgrades, item drops, shop purchases and
//! synergy bonuses.  The simulation owns the single dispatch point
//! (`Simulation::apply_effect`).

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    IncreaseAttack,
    ImproveFireRate,
    IncreaseSpeed,
    IncreaseProjectileCount,
    IncreasePickupRadius,
    IncreaseMagnetRadius,
    IncreaseExpDrop,
    IncreaseMaxHealth,
    /// Enables the drone at level 1, or levels up an existing one.
    UpgradeDrone,
    EnableBarrier,
    UpgradeBarrierRange,
}
