//! Projectile physics and hit geometry
//!
//! Per-tick integration is explicit Euler with the velocity updated first.
//! Nothing here touches an RNG, so identical inputs always produce identical
//! trajectories.

use glam::Vec2;

use super::state::Wind;
use crate::consts::*;
use crate::tuning::Tuning;

/// Advance an attack projectile one tick under gravity and wind
#[inline]
pub fn integrate_attack(position: Vec2, velocity: Vec2, wind: &Wind, tuning: &Tuning) -> (Vec2, Vec2) {
    let velocity = Vec2::new(
        velocity.x + wind.force(tuning.wind_factor),
        velocity.y + tuning.gravity,
    );
    (position + velocity, velocity)
}

/// Advance an interceptor one tick (straight line, no forces)
#[inline]
pub fn integrate_interceptor(position: Vec2, velocity: Vec2) -> (Vec2, Vec2) {
    (position + velocity, velocity)
}

#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Below the ground line or past either horizontal edge
#[inline]
pub fn out_of_bounds(p: Vec2) -> bool {
    p.y > GROUND_HEIGHT || p.x < 0.0 || p.x > GAME_WIDTH
}

/// Strictly inside the flag rectangle anchored at its bottom-centre
pub fn in_flag_hitbox(p: Vec2, flag: Vec2) -> bool {
    let left = flag.x - FLAG_WIDTH / 2.0;
    let top = flag.y - FLAG_HEIGHT;
    p.x > left && p.x < left + FLAG_WIDTH && p.y > top && p.y < flag.y
}

/// Distance from where a balloon left the field to the foot of a flag
///
/// Ground impacts are measured along the ground line. Side exits keep their
/// height, so a balloon sailing high over an edge never splashes.
pub fn splash_distance(impact: Vec2, flag: Vec2) -> f32 {
    let landing = Vec2::new(impact.x, impact.y.min(GROUND_HEIGHT));
    distance(landing, Vec2::new(flag.x, GROUND_HEIGHT))
}

/// Splash damage for a ground impact `dist` away from the flag
///
/// Linear falloff from `max_splash_damage` at the flag down to
/// `min_splash_damage` at the edge of the radius; `None` outside it.
pub fn splash_damage(dist: f32, tuning: &Tuning) -> Option<f32> {
    if !(0.0..tuning.splash_radius).contains(&dist) {
        return None;
    }
    let falloff = dist / tuning.splash_radius;
    Some(tuning.max_splash_damage - falloff * (tuning.max_splash_damage - tuning.min_splash_damage))
}

/// Launch velocity for a drag gesture from `start` to `end`
///
/// The balloon flies opposite to the drag, with power proportional to the
/// drag length up to `max_aim_distance`.
pub fn launch_velocity(start: Vec2, end: Vec2, tuning: &Tuning) -> Vec2 {
    let drag = end - start;
    let length = drag.length().min(tuning.max_aim_distance);
    let angle = drag.y.atan2(drag.x);
    -Vec2::new(angle.cos(), angle.sin()) * length * tuning.aim_power_factor
}

/// Drag end point that makes `launch_velocity(start, end)` produce `velocity`
///
/// Velocities beyond the gesture cap come out capped.
pub fn drag_for_velocity(start: Vec2, velocity: Vec2, tuning: &Tuning) -> Vec2 {
    start - velocity / tuning.aim_power_factor
}

/// Velocity of `speed` pointing from `from` toward `to`
pub fn velocity_toward(from: Vec2, to: Vec2, speed: f32) -> Vec2 {
    let d = to - from;
    let angle = d.y.atan2(d.x);
    Vec2::new(angle.cos(), angle.sin()) * speed
}

/// Forward-simulate an attack projectile `ticks` steps and return where it ends up
pub fn predict_position(position: Vec2, velocity: Vec2, wind: &Wind, ticks: u32, tuning: &Tuning) -> Vec2 {
    let (mut pos, mut vel) = (position, velocity);
    for _ in 0..ticks {
        (pos, vel) = integrate_attack(pos, vel, wind, tuning);
    }
    pos
}

/// Dotted preview arc for an aim, sampling every `PREVIEW_STRIDE`th tick
pub fn preview_trajectory(origin: Vec2, velocity: Vec2, wind: &Wind, tuning: &Tuning) -> Vec<Vec2> {
    let (mut pos, mut vel) = (origin, velocity);
    let mut points = Vec::with_capacity(PREVIEW_TICKS / PREVIEW_STRIDE);
    for i in 0..PREVIEW_TICKS {
        (pos, vel) = integrate_attack(pos, vel, wind, tuning);
        if i % PREVIEW_STRIDE == 0 {
            points.push(pos);
        }
    }
    points
}
