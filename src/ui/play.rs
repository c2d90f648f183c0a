/// Interactive driver: raw-mode terminal, one key per beat.
///
/// This is the only module that touches the terminal. It prints whatever
/// `renderer::render` returns and maps keys to simulator inputs; the
/// simulator itself never knows a terminal exists.

use std::io::{stdout, Write};

use anyhow::Result;
use crossterm::event::{read, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{cursor, execute};

use crate::sim::step::{do_beat, player_won, BeatOutcome, Input};
use crate::sim::world::World;

use super::renderer::render;

/// Exit codes shared with the original tooling.
pub const EXIT_VICTORY: i32 = 0;
pub const EXIT_DEATH: i32 = 254;

fn key_to_input(key: KeyEvent) -> Option<Input> {
    match key.code {
        KeyCode::Left => Some(Input::Left),
        KeyCode::Right => Some(Input::Right),
        KeyCode::Up => Some(Input::Up),
        KeyCode::Down => Some(Input::Down),
        KeyCode::Char(c) => Input::from_byte(c as u8),
        _ => None,
    }
}

fn draw(world: &World) -> Result<()> {
    let mut out = stdout();
    execute!(out, cursor::MoveTo(0, 0), Clear(ClearType::All))?;
    // Raw mode needs explicit carriage returns.
    for line in render(world).lines() {
        write!(out, "{line}\r\n")?;
    }
    out.flush()?;
    Ok(())
}

/// Play a loaded world until victory, death or quit. Returns the process
/// exit code.
pub fn run(mut world: World) -> Result<i32> {
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    let result = game_loop(&mut world);
    execute!(stdout(), LeaveAlternateScreen)?;
    disable_raw_mode()?;

    match &result {
        Ok(EXIT_VICTORY) if player_won(&world) => println!("You won!"),
        Ok(EXIT_DEATH) => println!("See you soon!"),
        _ => {}
    }
    result
}

fn game_loop(world: &mut World) -> Result<i32> {
    loop {
        draw(world)?;
        let key = match read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => key,
            _ => continue,
        };
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
            return Ok(EXIT_VICTORY);
        }
        match do_beat(world, key_to_input(key)) {
            BeatOutcome::Victory => return Ok(EXIT_VICTORY),
            BeatOutcome::Death => return Ok(EXIT_DEATH),
            BeatOutcome::Ongoing => {}
        }
    }
}
