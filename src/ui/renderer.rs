/// Rendering: a pure function from world to text.
///
/// Nothing here touches the terminal; the interactive driver prints the
/// result, and tests can assert on it directly. Walls pick a box-drawing
/// glyph from their diggable neighbours, the way the original does.

use crate::domain::class::class_info;
use crate::domain::coords::{coords, Coords, PLUS_SHAPE};
use crate::domain::tile::TileKind;
use crate::domain::trap::TrapKind;
use crate::sim::world::{World, BOARD_SIZE, PLAYER};

/// Indexed by a 4-bit mask of diggable neighbours:
/// bit 0 = left, bit 1 = up, bit 2 = down, bit 3 = right.
const WALL_GLYPHS: [&str; 16] = [
    "╳", "─", "│", "┘", "│", "┐", "│", "┤", "─", "─", "└", "┴", "┌", "┬", "├", "┼",
];

const ARROWS: [&str; 9] = ["↖", "↑", "↗", "←", " ", "→", "↙", "↓", "↘"];

fn dir_to_arrow(dir: Coords) -> &'static str {
    ARROWS[(3 * (dir.y + 1) + dir.x + 1) as usize]
}

fn trap_glyph(kind: TrapKind, dir: Coords) -> &'static str {
    match kind {
        TrapKind::Bounce => dir_to_arrow(dir),
        TrapKind::OmniBounce => "■",
        TrapKind::Spike => "◭",
        TrapKind::Trapdoor => "▫",
        TrapKind::Confuse => "◆",
        TrapKind::Teleport => "▫",
        TrapKind::TempoDown => "⇐",
        TrapKind::TempoUp => "⇒",
        TrapKind::BombTrap => "●",
        TrapKind::Firepig => "■",
    }
}

fn floor_glyph(kind: TileKind) -> &'static str {
    match kind {
        TileKind::Stairs => ">",
        TileKind::Wall | TileKind::Floor | TileKind::Shop => ".",
        TileKind::Water => "~",
        TileKind::Tar => ",",
        TileKind::Fire => "§",
        TileKind::Ice => "_",
        TileKind::Ooze => "%",
    }
}

fn wall_glyph(world: &World, pos: Coords) -> &'static str {
    let mut mask = 0usize;
    for (i, d) in PLUS_SHAPE[..4].iter().enumerate() {
        mask |= usize::from(world.tile(pos + *d).is_diggable()) << i;
    }
    WALL_GLYPHS[mask]
}

fn tile_glyph(world: &World, pos: Coords) -> &'static str {
    let tile = world.tile(pos);
    if !tile.revealed {
        return " ";
    }
    if let Some(idx) = tile.monster {
        return class_info(world.monsters[idx as usize].kind).glyph;
    }
    if let Some(trap) = world
        .traps
        .iter()
        .find(|t| t.pos == pos && !world.tile(t.pos).traps_destroyed)
    {
        return trap_glyph(trap.kind, trap.dir);
    }
    if tile.is_door() {
        return "+";
    }
    if tile.is_diggable() {
        return wall_glyph(world, pos);
    }
    if tile.kind.is_wall() {
        return " ";
    }
    // Around a nightmare, the floor itself goes dark.
    if let Some(n) = world.nightmare {
        let nightmare = &world.monsters[n as usize];
        if nightmare.alive() && (pos - nightmare.pos).l2() < 8 {
            return " ";
        }
    }
    floor_glyph(tile.kind)
}

/// The board, then the status block. Stable layout, fit for asserting on.
pub fn render(world: &World) -> String {
    let mut out = String::new();
    for y in 1..BOARD_SIZE as i8 - 1 {
        for x in 1..BOARD_SIZE as i8 - 1 {
            out.push_str(tile_glyph(world, coords(x, y)));
        }
        while out.ends_with(' ') {
            out.pop();
        }
        out.push('\n');
    }

    let p = world.player();
    out.push('\n');
    out.push_str(&format!(
        "beat {}  hp {}  pos ({}, {})\n",
        world.current_beat, p.hp, p.pos.x, p.pos.y
    ));
    let mut flags = Vec::new();
    if p.confusion > 0 {
        flags.push("confused");
    }
    if p.freeze > 0 {
        flags.push("frozen");
    }
    if world.sliding_on_ice {
        flags.push("sliding");
    }
    if world.miniboss_killed && world.sarcophagus_killed {
        flags.push("stairs unlocked");
    }
    if !flags.is_empty() {
        out.push_str(&flags.join("  "));
        out.push('\n');
    }
    out.push_str(&format!(
        "boots {}  cap {}  scrolls {}\n",
        if world.boots_on { "on" } else { "off" },
        if world.miners_cap { "on" } else { "off" },
        world.scrolls
    ));

    for m in world.monsters.iter().skip(PLAYER + 1) {
        if m.alive() && (m.aggro || world.tile(m.pos).revealed) {
            out.push_str(&format!(
                "{} {}{} hp {} at ({}, {})\n",
                class_info(m.kind).glyph,
                if m.aggro { "!" } else { " " },
                if m.delay > 0 { "◔" } else { " " },
                m.hp,
                m.pos.x,
                m.pos.y
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::monster::MonsterKind;
    use crate::sim::world::diagram::{spawn, world_from};

    #[test]
    fn renders_the_player_and_the_stairs() {
        let world = world_from(&[
            "@..>", //
        ]);
        let text = render(&world);
        let board_line = text.lines().next().unwrap();
        assert_eq!(board_line, "@..>");
        assert!(text.contains("beat 0"));
        assert!(text.contains("pos (1, 1)"));
    }

    #[test]
    fn walls_pick_box_glyphs_from_neighbours() {
        let world = world_from(&[
            "@...", //
            "###.",
        ]);
        let text = render(&world);
        let row = text.lines().nth(1).unwrap();
        assert_eq!(row, "───.");
    }

    #[test]
    fn unrevealed_tiles_are_blank() {
        let mut world = world_from(&["@.."]);
        world.tile_mut(coords(3, 1)).revealed = false;
        let line = render(&world).lines().next().unwrap().to_string();
        assert_eq!(line, "@.");
    }

    #[test]
    fn visible_enemies_are_listed() {
        let mut world = world_from(&["@...."]);
        let idx = spawn(&mut world, MonsterKind::Skeleton1, coords(4, 1));
        world.monsters[idx].aggro = true;
        let text = render(&world);
        assert!(text.contains("Z !"));
        assert!(text.contains("at (4, 1)"));
    }
}
