//! Player/obstacle collision detection and response
//!
//! Runs once per frame after the physics step. Each obstacle kind has its own
//! hitbox and its own outcome:
//! - Spike: inset player corners against the spike triangle, any hit kills
//! - Orb: circle/box, one-shot boost per attempt
//! - Block: box/box, landing on top is safe, every other contact kills
//! - Portal: decorative, never collides

use glam::DVec2;

use super::geometry::{Rect, box_overlap, circle_box_distance_squared, point_in_triangle};
use super::level::{Level, ObstacleKind};
use super::player::{Camera, PlayerBody};
use crate::consts::*;
use crate::tuning::Tuning;

/// Something that happened between the player and an obstacle this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Interaction {
    /// Orb consumed, with its screen-space center
    OrbTaken { index: usize, center: DVec2 },
    /// Player came to rest on top of a block
    Landed { index: usize },
    /// Lethal contact; nothing after this is processed
    Died { index: usize, kind: ObstacleKind },
}

/// How a block contact resolves
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlockContact {
    /// Falling onto the top face: stand at this y
    Land { top_y: f64 },
    Lethal,
}

/// Screen-space origin (top-left) of an obstacle
#[inline]
pub fn obstacle_screen_pos(world_x: f64, height: f64, camera: &Camera, ground_y: f64) -> DVec2 {
    DVec2::new(camera.to_screen_x(world_x), ground_y - height)
}

/// Broad phase: only obstacles within the band around the player are tested
#[inline]
pub fn in_broad_phase(screen_x: f64, player_x: f64) -> bool {
    screen_x > player_x - BROAD_PHASE_RANGE && screen_x < player_x + BROAD_PHASE_RANGE
}

/// Spike hitbox: tip and base corners of the 40x40 cell's triangle
pub fn spike_triangle(origin: DVec2) -> [DVec2; 3] {
    [
        origin + DVec2::new(20.0, 5.0),
        origin + DVec2::new(5.0, 35.0),
        origin + DVec2::new(35.0, 35.0),
    ]
}

/// Any corner of the inset player box inside the spike triangle
pub fn spike_hit(player: &Rect, spike_origin: DVec2) -> bool {
    let [tip, left, right] = spike_triangle(spike_origin);
    player
        .inset(SPIKE_HITBOX_INSET)
        .corners()
        .into_iter()
        .any(|corner| point_in_triangle(corner, tip, left, right))
}

/// Orb center for an obstacle origin
#[inline]
pub fn orb_center(origin: DVec2) -> DVec2 {
    origin + DVec2::splat(ORB_OFFSET)
}

pub fn orb_hit(player: &Rect, orb_origin: DVec2) -> bool {
    circle_box_distance_squared(player, orb_center(orb_origin)) < ORB_RADIUS * ORB_RADIUS
}

/// Resolve a block contact by its minimum penetration axis.
///
/// Returns `None` when the boxes don't overlap. A top-face minimum only lands
/// while falling; moving up into a top-face minimum, or any side or bottom
/// minimum, is lethal.
pub fn block_contact(player: &Rect, velocity_y: f64, block: &Rect) -> Option<BlockContact> {
    if !box_overlap(player, block, BLOCK_MARGIN) {
        return None;
    }

    let overlap_left = player.right() - block.x;
    let overlap_right = block.right() - player.x;
    let overlap_top = player.bottom() - block.y;
    let overlap_bottom = block.bottom() - player.y;

    let min_overlap = overlap_left
        .min(overlap_right)
        .min(overlap_top)
        .min(overlap_bottom);

    if min_overlap == overlap_top && velocity_y > 0.0 {
        Some(BlockContact::Land { top_y: block.y })
    } else {
        Some(BlockContact::Lethal)
    }
}

/// Test the player against every nearby obstacle, in level order.
///
/// Orb and landing responses are applied to `player` and `level` immediately,
/// so later obstacles in the same frame see the updated player. Stops at the
/// first lethal contact.
pub fn resolve_collisions(
    player: &mut PlayerBody,
    level: &mut Level,
    camera: &Camera,
    ground_y: f64,
    tuning: &Tuning,
) -> Vec<Interaction> {
    let mut interactions = Vec::new();

    for (index, obstacle) in level.obstacles.iter_mut().enumerate() {
        let origin = obstacle_screen_pos(obstacle.world_x, obstacle.height, camera, ground_y);
        if !in_broad_phase(origin.x, player.x) {
            continue;
        }

        match obstacle.kind {
            ObstacleKind::Spike => {
                if spike_hit(&player.bounds(), origin) {
                    interactions.push(Interaction::Died {
                        index,
                        kind: ObstacleKind::Spike,
                    });
                    return interactions;
                }
            }
            ObstacleKind::Orb => {
                if !obstacle.used && orb_hit(&player.bounds(), origin) {
                    obstacle.used = true;
                    player.orb_boost(tuning);
                    log::debug!("Orb {} consumed at camera x={}", index, camera.x);
                    interactions.push(Interaction::OrbTaken {
                        index,
                        center: orb_center(origin),
                    });
                }
            }
            ObstacleKind::Block => {
                let block = Rect::new(origin.x, origin.y, BLOCK_SIZE, BLOCK_SIZE);
                match block_contact(&player.bounds(), player.velocity_y, &block) {
                    Some(BlockContact::Land { top_y }) => {
                        player.land_on(top_y);
                        interactions.push(Interaction::Landed { index });
                    }
                    Some(BlockContact::Lethal) => {
                        interactions.push(Interaction::Died {
                            index,
                            kind: ObstacleKind::Block,
                        });
                        return interactions;
                    }
                    None => {}
                }
            }
            ObstacleKind::Portal => {}
        }
    }

    interactions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::Obstacle;

    const GROUND: f64 = 620.0;

    fn level_with(obstacles: Vec<Obstacle>) -> Level {
        Level {
            length_units: 10_000.0,
            obstacles,
            ..Default::default()
        }
    }

    fn died(interactions: &[Interaction]) -> bool {
        interactions
            .iter()
            .any(|i| matches!(i, Interaction::Died { .. }))
    }

    #[test]
    fn test_broad_phase_band_is_exclusive() {
        assert!(in_broad_phase(150.0, 150.0));
        assert!(!in_broad_phase(250.0, 150.0));
        assert!(!in_broad_phase(50.0, 150.0));
        assert!(in_broad_phase(249.9, 150.0));
    }

    #[test]
    fn test_landing_on_block_from_above() {
        // Block top at y=400, player falling into it
        let block = Rect::new(150.0, 400.0, BLOCK_SIZE, BLOCK_SIZE);
        let player = Rect::new(150.0, 370.0, 40.0, 40.0);
        assert_eq!(
            block_contact(&player, 5.0, &block),
            Some(BlockContact::Land { top_y: 400.0 })
        );
    }

    #[test]
    fn test_top_contact_moving_up_is_lethal() {
        let block = Rect::new(150.0, 400.0, BLOCK_SIZE, BLOCK_SIZE);
        let player = Rect::new(150.0, 370.0, 40.0, 40.0);
        assert_eq!(
            block_contact(&player, -5.0, &block),
            Some(BlockContact::Lethal)
        );
    }

    #[test]
    fn test_hitting_block_underside_is_lethal() {
        let block = Rect::new(150.0, 400.0, BLOCK_SIZE, BLOCK_SIZE);
        let player = Rect::new(150.0, 430.0, 40.0, 40.0);
        assert_eq!(
            block_contact(&player, -10.0, &block),
            Some(BlockContact::Lethal)
        );
    }

    #[test]
    fn test_shallow_overlap_within_margin_is_ignored() {
        let block = Rect::new(150.0, 400.0, BLOCK_SIZE, BLOCK_SIZE);
        // 6 units of overlap: exactly eaten by a margin of 3 on both boxes
        let player = Rect::new(150.0, 366.0, 40.0, 40.0);
        assert_eq!(block_contact(&player, 5.0, &block), None);
    }

    #[test]
    fn test_player_lands_on_block_in_resolver() {
        let top = 400.0;
        let mut level = level_with(vec![Obstacle::new(ObstacleKind::Block, 150.0, GROUND - top)]);
        let mut player = PlayerBody::new(GROUND);
        player.y = 370.0;
        player.velocity_y = 5.0;
        player.on_ground = false;

        let out = resolve_collisions(
            &mut player,
            &mut level,
            &Camera::default(),
            GROUND,
            &Tuning::default(),
        );
        assert_eq!(out, vec![Interaction::Landed { index: 0 }]);
        assert!(player.on_ground);
        assert_eq!(player.y, top - player.height);
        assert_eq!(player.velocity_y, 0.0);
    }

    #[test]
    fn test_running_into_block_face_kills() {
        // Block on the ground, its left face 10 units inside the player
        let mut level = level_with(vec![Obstacle::new(ObstacleKind::Block, 180.0, 40.0)]);
        let mut player = PlayerBody::new(GROUND);

        let out = resolve_collisions(
            &mut player,
            &mut level,
            &Camera::default(),
            GROUND,
            &Tuning::default(),
        );
        assert_eq!(
            out,
            vec![Interaction::Died {
                index: 0,
                kind: ObstacleKind::Block
            }]
        );
    }

    #[test]
    fn test_spike_corner_on_left_edge_kills() {
        // Inset bottom-right corner (182, 332) sits exactly on the spike's left
        // edge, one third of the way down from the tip
        let mut player = PlayerBody::new(GROUND);
        player.y = 300.0;
        let spike_y = 317.0;
        let mut level = level_with(vec![Obstacle::new(
            ObstacleKind::Spike,
            167.0,
            GROUND - spike_y,
        )]);

        let out = resolve_collisions(
            &mut player,
            &mut level,
            &Camera::default(),
            GROUND,
            &Tuning::default(),
        );
        assert!(died(&out));
    }

    #[test]
    fn test_spike_one_unit_right_of_corner_misses() {
        let mut player = PlayerBody::new(GROUND);
        player.y = 300.0;
        let mut level = level_with(vec![Obstacle::new(ObstacleKind::Spike, 168.0, GROUND - 317.0)]);

        let out = resolve_collisions(
            &mut player,
            &mut level,
            &Camera::default(),
            GROUND,
            &Tuning::default(),
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_spike_uses_camera_offset() {
        // Spike at world 600 sits right on the player once the camera reaches 425
        let mut player = PlayerBody::new(GROUND);
        let mut level = level_with(vec![Obstacle::new(ObstacleKind::Spike, 600.0, 40.0)]);
        let camera = Camera { x: 425.0 };
        let out = resolve_collisions(&mut player, &mut level, &camera, GROUND, &Tuning::default());
        assert!(died(&out));

        let camera = Camera { x: 420.0 };
        let out = resolve_collisions(&mut player, &mut level, &camera, GROUND, &Tuning::default());
        assert!(out.is_empty());
    }

    #[test]
    fn test_orb_consumed_once() {
        let tuning = Tuning::default();
        let mut player = PlayerBody::new(GROUND);
        // Orb center lands inside the player box
        let mut level = level_with(vec![Obstacle::new(
            ObstacleKind::Orb,
            150.0,
            GROUND - player.y,
        )]);

        let out = resolve_collisions(&mut player, &mut level, &Camera::default(), GROUND, &tuning);
        assert!(matches!(out[..], [Interaction::OrbTaken { index: 0, .. }]));
        assert!(level.obstacles[0].used);
        assert_eq!(player.velocity_y, tuning.jump_force * tuning.orb_boost);

        // Second touch does nothing
        player.velocity_y = 2.0;
        let out = resolve_collisions(&mut player, &mut level, &Camera::default(), GROUND, &tuning);
        assert!(out.is_empty());
        assert_eq!(player.velocity_y, 2.0);
    }

    #[test]
    fn test_portal_never_collides() {
        let mut player = PlayerBody::new(GROUND);
        let mut level = level_with(vec![Obstacle::new(ObstacleKind::Portal, 150.0, 40.0)]);
        let out = resolve_collisions(
            &mut player,
            &mut level,
            &Camera::default(),
            GROUND,
            &Tuning::default(),
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_distant_obstacles_skipped() {
        let mut player = PlayerBody::new(GROUND);
        // Would be lethal if it were tested
        let mut level = level_with(vec![Obstacle::new(ObstacleKind::Block, 150.0, 40.0)]);
        let camera = Camera { x: -200.0 };
        let out = resolve_collisions(&mut player, &mut level, &camera, GROUND, &Tuning::default());
        assert!(out.is_empty());
    }

    #[test]
    fn test_death_stops_processing() {
        let tuning = Tuning::default();
        let mut player = PlayerBody::new(GROUND);
        let orb_height = GROUND - player.y;
        let mut level = level_with(vec![
            Obstacle::new(ObstacleKind::Block, 180.0, 40.0),
            Obstacle::new(ObstacleKind::Orb, 150.0, orb_height),
        ]);
        let out = resolve_collisions(&mut player, &mut level, &Camera::default(), GROUND, &tuning);
        assert_eq!(out.len(), 1);
        assert!(!level.obstacles[1].used);
    }
}
