//! Zero-sized marker components for entity classification.
//!
//! Tags carry no data; an entity "is" a player, enemy, tile, or projectile
//! purely by presence in the corresponding pool.

use serde::{Deserialize, Serialize};

/// Marks the player-controlled entity.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerTag;

/// Marks a hostile entity.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyTag;

/// Marks a static collision tile.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileTag;

/// Marks a projectile that detonates on contact.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileTag;
