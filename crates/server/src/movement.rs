//! Input-driven player movement.
//!
//! Each axis moves only when exactly one of its two keys is held. The new
//! coordinate is clamped so the whole outline, stroke included, stays on
//! the board.

use crate::entity::Player;
use crate::geometry::advance_bounded;
use crate::world::Board;
use protocol::packets::Controls;

/// Direction along one axis: `-1`, `0` or `1`.
#[inline]
fn axis_direction(negative: bool, positive: bool) -> f64 {
    match (negative, positive) {
        (true, false) => -1.0,
        (false, true) => 1.0,
        _ => 0.0,
    }
}

/// Move `player` according to `controls` held for `elapsed` milliseconds.
///
/// Non-positive (or NaN) `elapsed` leaves the player where it is. Very
/// large values are absorbed by the wall clamp.
pub fn apply_controls(player: &mut Player, controls: &Controls, elapsed: f64, speed: f64, board: Board) {
    if !(elapsed > 0.0) {
        return;
    }

    let distance = elapsed * speed;
    let clearance = player.wall_clearance();
    let mut position = player.position();

    let dy = axis_direction(controls.up_pressed, controls.down_pressed);
    if dy != 0.0 {
        position.y = advance_bounded(position.y, dy * distance, clearance, board.height - clearance);
    }

    let dx = axis_direction(controls.left_pressed, controls.right_pressed);
    if dx != 0.0 {
        position.x = advance_bounded(position.x, dx * distance, clearance, board.width - clearance);
    }

    player.set_position(position);
}
