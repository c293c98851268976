//! Per-tick kinematics for a single actor.

use crate::{ActorBounds, CollisionResolver, Resolution};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use terra2d_world::WorldGrid;

/// Movement tuning shared by every actor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Tile edge length in pixels.
    pub tile_size: f32,
    /// Added to vertical velocity every tick (positive is down).
    pub gravity: f32,
    /// Vertical velocity applied by a jump.
    pub jump_velocity: f32,
    /// Horizontal speed while a direction is held.
    pub move_speed: f32,
    /// Horizontal velocity multiplier while no direction is held.
    pub friction: f32,
    /// Fastest fall, in pixels per tick.
    pub max_fall_speed: f32,
    /// Actor box width in pixels.
    pub actor_width: f32,
    /// Actor box height in pixels.
    pub actor_height: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            tile_size: 32.0,
            gravity: 0.8,
            jump_velocity: -15.0,
            move_speed: 5.0,
            friction: 0.8,
            max_fall_speed: 24.0,
            actor_width: 32.0,
            actor_height: 64.0,
        }
    }
}

impl PhysicsConfig {
    /// Resolver matching this tile size.
    pub fn resolver(&self) -> CollisionResolver {
        CollisionResolver::new(self.tile_size)
    }
}

/// What the actor wants to do this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntent {
    /// Hold left.
    pub left: bool,
    /// Hold right.
    pub right: bool,
    /// Jump if standing on something.
    pub jump: bool,
}

impl MoveIntent {
    /// No input.
    pub const IDLE: Self = Self {
        left: false,
        right: false,
        jump: false,
    };

    /// Walk left.
    pub const fn left() -> Self {
        Self { left: true, ..Self::IDLE }
    }

    /// Walk right.
    pub const fn right() -> Self {
        Self { right: true, ..Self::IDLE }
    }

    /// Jump in place.
    pub const fn jump() -> Self {
        Self { jump: true, ..Self::IDLE }
    }

    /// -1, 0 or 1; opposite directions cancel.
    pub fn axis(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// A moving actor: its box, velocity and ground state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// Current bounding box.
    pub bounds: ActorBounds,
    /// Pixels per tick.
    pub velocity: Vec2,
    /// Standing on a solid tile after the last step.
    pub on_ground: bool,
}

impl Body {
    /// Body at rest with its top-left corner at `(x, y)`, sized from `config`.
    pub fn new(x: f32, y: f32, config: &PhysicsConfig) -> Self {
        Self {
            bounds: ActorBounds::new(x, y, config.actor_width, config.actor_height),
            velocity: Vec2::ZERO,
            on_ground: false,
        }
    }

    /// Top-left corner.
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.bounds.x, self.bounds.y)
    }

    /// Centre of the box.
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.bounds.x + self.bounds.width * 0.5,
            self.bounds.y + self.bounds.height * 0.5,
        )
    }

    /// Tile containing the box centre.
    pub fn tile(&self, tile_size: f32) -> (i32, i32) {
        let c = self.center() / tile_size;
        (c.x.floor() as i32, c.y.floor() as i32)
    }

    /// Whether the body overlaps tile `(x, y)`.
    pub fn overlaps_tile(&self, x: i32, y: i32, tile_size: f32) -> bool {
        let tile = ActorBounds::new(x as f32 * tile_size, y as f32 * tile_size, tile_size, tile_size);
        self.bounds.intersects(&tile)
    }

    /// Advance one tick.
    ///
    /// The resolved position is clamped to the world's pixel extent, and any
    /// axis that was blocked or clamped loses its velocity.
    pub fn step(&mut self, intent: MoveIntent, grid: &WorldGrid, config: &PhysicsConfig) -> Resolution {
        let axis = intent.axis();
        if axis != 0.0 {
            self.velocity.x = axis * config.move_speed;
        } else {
            self.velocity.x *= config.friction;
            if self.velocity.x.abs() < 0.01 {
                self.velocity.x = 0.0;
            }
        }

        if intent.jump && self.on_ground {
            self.velocity.y = config.jump_velocity;
            self.on_ground = false;
        }
        self.velocity.y = (self.velocity.y + config.gravity).min(config.max_fall_speed);

        let mut res = config
            .resolver()
            .resolve(&self.bounds, self.velocity.x, self.velocity.y, grid);

        let max_x = (grid.width() as f32 * config.tile_size - self.bounds.width).max(0.0);
        let max_y = (grid.height() as f32 * config.tile_size - self.bounds.height).max(0.0);
        let clamped_x = res.x.clamp(0.0, max_x);
        let clamped_y = res.y.clamp(0.0, max_y);
        if clamped_x != res.x {
            res.blocked_x = true;
            res.x = clamped_x;
        }
        if clamped_y != res.y {
            res.blocked_y = true;
            // Bottom of the world counts as ground.
            res.landed_on_ground |= res.y > clamped_y;
            res.y = clamped_y;
        }

        if res.blocked_x {
            self.velocity.x = 0.0;
        }
        if res.blocked_y {
            self.velocity.y = 0.0;
        }
        self.bounds.x = res.x;
        self.bounds.y = res.y;
        self.on_ground = res.landed_on_ground;
        res
    }
}
