//! Game layer for Space Colony Defense.
//!
//! Implements the game rules:
//! - Resource ledger and colony
//! - Turret and projectiles
//! - Deterministic enemy waves
//! - Buildings, production and special effects
//! - Tech tree
//! - Combat resolution

mod buildings;
mod colony;
mod combat;
mod invariants;
mod resources;
mod state;
mod tech;
mod turret;
mod wave;

pub use buildings::{Building, BuildingKind, BuildingLevel, SpecialEffect};
pub use colony::{Colony, COLONY_REPAIR_COST};
pub use combat::{Battle, TickOutcome, ARMORED_SHIP_DAMAGE, SWARMER_DAMAGE};
pub use invariants::{assert_invariants, check_invariants, InvariantViolation};
pub use resources::{ResourceDrop, ResourceKind, Resources};
pub use state::GameState;
pub use tech::{PlayerTechTree, TechBonus, TechCategory, TechId, TechUpgrade, CATALOG};
pub use turret::{Projectile, Turret};
pub use wave::{composition, generate_wave, Enemy, EnemyKind, SCREEN_WIDTH};
