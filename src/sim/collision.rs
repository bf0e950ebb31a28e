//! Hit testing
//!
//! Every test is an axis-aligned box overlap on centre distance, never circular.
//! The extents below are half-widths: target half size plus half the bullet.

use glam::Vec2;

use crate::box_overlap;
use crate::consts::*;

/// Player bullet against the boss hurt box
pub const BOSS_HIT_EXTENT: f32 = BOSS_HALF_SIZE + BULLET_SIZE / 2.0;
/// Player bullet against an enemy
pub const ENEMY_HIT_EXTENT: f32 = ENEMY_SIZE / 2.0 + BULLET_SIZE / 2.0;
/// Enemy bullet against the player's (small) hitbox
pub const PLAYER_HIT_EXTENT: f32 = PLAYER_HITBOX_SIZE / 2.0 + BULLET_SIZE / 2.0;
/// Power-up pickup reach, deliberately forgiving
pub const PICKUP_EXTENT: f32 = PLAYER_SIZE / 2.0 + PICKUP_REACH;
/// Outer edge of the graze band
pub const GRAZE_EXTENT: f32 = PLAYER_SIZE / 2.0 + GRAZE_DISTANCE;

#[inline]
pub fn bullet_hits_boss(bullet: Vec2, boss: Vec2) -> bool {
    box_overlap(bullet, boss, Vec2::splat(BOSS_HIT_EXTENT))
}

#[inline]
pub fn bullet_hits_enemy(bullet: Vec2, enemy: Vec2) -> bool {
    box_overlap(bullet, enemy, Vec2::splat(ENEMY_HIT_EXTENT))
}

#[inline]
pub fn bullet_hits_player(bullet: Vec2, player: Vec2) -> bool {
    box_overlap(bullet, player, Vec2::splat(PLAYER_HIT_EXTENT))
}

#[inline]
pub fn pickup_reaches_player(pickup: Vec2, player: Vec2) -> bool {
    box_overlap(pickup, player, Vec2::splat(PICKUP_EXTENT))
}

/// Inside the graze box but outside the hit box
pub fn in_graze_band(bullet: Vec2, player: Vec2) -> bool {
    box_overlap(bullet, player, Vec2::splat(GRAZE_EXTENT)) && !bullet_hits_player(bullet, player)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAYER: Vec2 = Vec2::new(200.0, 540.0);

    #[test]
    fn test_extents() {
        assert_eq!(BOSS_HIT_EXTENT, 52.0);
        assert_eq!(ENEMY_HIT_EXTENT, 20.0);
        assert_eq!(PLAYER_HIT_EXTENT, 12.0);
        assert_eq!(PICKUP_EXTENT, 36.0);
        assert_eq!(GRAZE_EXTENT, 56.0);
    }

    #[test]
    fn test_box_not_circle() {
        // Corner of the box is still a hit even though it's outside the inscribed circle
        let corner = PLAYER + Vec2::new(11.0, 11.0);
        assert!(bullet_hits_player(corner, PLAYER));
        // Boundary is exclusive
        assert!(!bullet_hits_player(PLAYER + Vec2::new(12.0, 0.0), PLAYER));
    }

    #[test]
    fn test_graze_band_excludes_hits() {
        assert!(!in_graze_band(PLAYER, PLAYER));
        assert!(in_graze_band(PLAYER + Vec2::new(30.0, 0.0), PLAYER));
        assert!(in_graze_band(PLAYER + Vec2::new(12.0, 5.0), PLAYER));
        assert!(!in_graze_band(PLAYER + Vec2::new(56.0, 0.0), PLAYER));
        assert!(!in_graze_band(PLAYER + Vec2::new(0.0, -80.0), PLAYER));
    }

    #[test]
    fn test_boss_and_enemy_boxes() {
        let boss = Vec2::new(200.0, 80.0);
        assert!(bullet_hits_boss(boss + Vec2::new(51.0, -51.0), boss));
        assert!(!bullet_hits_boss(boss + Vec2::new(52.0, 0.0), boss));

        let enemy = Vec2::new(40.0, 30.0);
        assert!(bullet_hits_enemy(enemy + Vec2::new(0.0, 19.5), enemy));
        assert!(!bullet_hits_enemy(enemy + Vec2::new(0.0, 20.0), enemy));
    }

    #[test]
    fn test_pickup_reach() {
        assert!(pickup_reaches_player(PLAYER + Vec2::new(35.0, -35.0), PLAYER));
        assert!(!pickup_reaches_player(PLAYER + Vec2::new(36.0, 0.0), PLAYER));
    }
}
