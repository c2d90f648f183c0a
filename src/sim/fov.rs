/// Field of view: fractional-coordinate line of sight for aggro checks,
/// and a recursive shadowcasting pass that reveals lit tiles.
///
/// Tile centers sit at (x + 0.5, y + 0.5); the line walker probes corners
/// offset by 0.55 so that grazing a wall corner does not block.

use crate::domain::coords::{coords, Coords, DIAGONALS};

use super::world::{Board, World};

fn is_opaque(world: &World, x: i32, y: i32) -> bool {
    let pos = coords(x as i8, y as i8);
    if x < 0 || y < 0 || !Board::in_bounds(pos) {
        return true;
    }
    world.tile(pos).kind.is_wall()
}

/// Walk the straight line from (x, y) to the player's tile center one
/// integer step at a time. When the x- and y-errors are within 0.001 of
/// each other the line passes a corner and both neighbours must be clear;
/// otherwise the axis with the smaller error advances. Any wall on the
/// path blocks.
fn los(world: &World, x: f64, y: f64) -> bool {
    let px = world.player().pos.x;
    let py = world.player().pos.y;
    let dx = px as f64 - x;
    let dy = py as f64 - y;
    let mut cx = (x + 0.5) as i32;
    let mut cy = (y + 0.5) as i32;
    let sx = if dx > 0.0 { 1 } else if dx < 0.0 { -1 } else { 0 };
    let sy = if dy > 0.0 { 1 } else if dy < 0.0 { -1 } else { 0 };

    if (f64::from(px) > x || x > cx as f64)
        && dy * (cy as f64 - y) > 0.0
        && is_opaque(world, cx, cy)
    {
        return false;
    }

    while cx != i32::from(px) || cy != i32::from(py) {
        let err_x = (((cx + sx) as f64 - x) * dy - (cy as f64 - y) * dx).abs();
        let err_y = ((cx as f64 - x) * dy - ((cy + sy) as f64 - y) * dx).abs();
        if (err_x - err_y).abs() < 0.001 && is_opaque(world, cx, cy + sy) {
            return false;
        }
        if err_x < err_y + 0.001 {
            cx += sx;
            if is_opaque(world, cx, cy) {
                return false;
            }
        }
        if err_y < err_x + 0.001 {
            cy += sy;
            if is_opaque(world, cx, cy) {
                return false;
            }
        }
    }
    true
}

/// Whether the player can see the tile at `dest`: inside the view box
/// (±10 columns, ±5 rows — one column short on the right, as the original
/// has it) and with an unblocked line to a corner or the center.
pub fn can_see(world: &World, dest: Coords) -> bool {
    let pos = world.player().pos;
    if dest.x < pos.x - 10 || dest.x > pos.x + 9 || dest.y < pos.y - 5 || dest.y > pos.y + 5 {
        return false;
    }
    let (x, y) = (f64::from(dest.x), f64::from(dest.y));
    los(world, x - 0.55, y - 0.55)
        || los(world, x + 0.55, y - 0.55)
        || los(world, x - 0.55, y + 0.55)
        || los(world, x + 0.55, y + 0.55)
        || los(world, x, y)
}

/// One octant of recursive shadowcasting. `xv`/`yv` are the rows of the
/// transform matrix mapping scan coordinates into board offsets. Scanned
/// tiles become revealed iff their light clears the torch threshold.
fn cast_light(world: &mut World, row: i8, start: f64, end: f64, xv: Coords, yv: Coords) {
    let mut row = row;
    let mut start = start;
    loop {
        if start > end || row > 10 {
            return;
        }
        let mut blocked = false;
        for dy in 0..=row {
            let delta = coords(row, dy);
            let offset = coords(
                delta.x.wrapping_mul(xv.x).wrapping_add(delta.y.wrapping_mul(xv.y)),
                delta.x.wrapping_mul(yv.x).wrapping_add(delta.y.wrapping_mul(yv.y)),
            );
            if (i32::from(offset.y)).abs() > 5 {
                continue;
            }
            let current = world.player().pos + offset;
            let left_slope = (f64::from(dy) - 0.51) / (f64::from(row) + 0.51);
            let right_slope = (f64::from(dy) + 0.51) / (f64::from(row) - 0.51);

            if !Board::in_bounds(current) || right_slope < start {
                continue;
            }
            if left_slope > end {
                break;
            }

            let lit = world.tile(current).light >= 102;
            world.tile_mut(current).revealed = lit;

            let was_blocked = blocked;
            blocked = world.tile(current).kind.is_wall();
            if !was_blocked && blocked {
                cast_light(world, row + 1, start, left_slope, xv, yv);
            }
            if blocked {
                start = right_slope;
            }
        }
        row += 1;
    }
}

/// The per-beat reveal pass: the player's own tile plus all eight octants.
pub fn update_fov(world: &mut World) {
    let pos = world.player().pos;
    world.tile_mut(pos).revealed = true;
    for d in DIAGONALS {
        cast_light(world, 1, 0.0, 1.0, coords(0, d.x), coords(d.y, 0));
        cast_light(world, 1, 0.0, 1.0, coords(d.x, 0), coords(0, d.y));
    }
}
