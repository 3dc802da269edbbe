use anyhow::Context as _;
use gridpop_engine::{Action, Game, KeyConfigUpdate};

use crate::{storage::FileStorage, util::key_label};

#[derive(Debug, Clone, clap::Args)]
pub struct KeysArg {
    /// Key that rotates clockwise
    #[arg(long, value_name = "KEY", value_parser = parse_key)]
    rotate: Option<String>,
    /// Key that rotates counterclockwise
    #[arg(long, value_name = "KEY", value_parser = parse_key)]
    rotate_counter: Option<String>,
    /// Key that places the piece
    #[arg(long, value_name = "KEY", value_parser = parse_key)]
    drop: Option<String>,
    /// Key that holds the piece
    #[arg(long, value_name = "KEY", value_parser = parse_key)]
    hold: Option<String>,
    #[arg(long, value_name = "KEY", value_parser = parse_key)]
    move_left: Option<String>,
    #[arg(long, value_name = "KEY", value_parser = parse_key)]
    move_right: Option<String>,
    #[arg(long, value_name = "KEY", value_parser = parse_key)]
    move_up: Option<String>,
    #[arg(long, value_name = "KEY", value_parser = parse_key)]
    move_down: Option<String>,
}

impl KeysArg {
    pub fn update(&self) -> KeyConfigUpdate {
        KeyConfigUpdate {
            move_up: self.move_up.clone(),
            move_down: self.move_down.clone(),
            move_left: self.move_left.clone(),
            move_right: self.move_right.clone(),
            rotate: self.rotate.clone(),
            rotate_counter: self.rotate_counter.clone(),
            drop: self.drop.clone(),
            hold: self.hold.clone(),
        }
    }
}

/// Accepts a single character, `Space`, or an arrow key (`Left` or
/// `ArrowLeft`), and returns the name the key is stored under.
fn parse_key(s: &str) -> Result<String, String> {
    let mut chars = s.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(c.to_string());
    }
    let name = match s.to_ascii_lowercase().trim_start_matches("arrow") {
        "space" => " ",
        "up" => "ArrowUp",
        "down" => "ArrowDown",
        "left" => "ArrowLeft",
        "right" => "ArrowRight",
        _ => return Err(format!("expected a single character, Space or an arrow key, got `{s}`")),
    };
    Ok(name.to_owned())
}

pub fn run(arg: &KeysArg, storage: FileStorage) -> anyhow::Result<()> {
    let mut game = Game::new(storage);

    let update = arg.update();
    if !update.is_empty() {
        game.dispatch(Action::UpdateKeyConfig(update));
        if let Some(e) = game.storage_mut().take_error() {
            return Err(e).context("Failed to save key bindings");
        }
        eprintln!("Saved key bindings to {}", game.storage().dir().display());
    }

    for (command, key) in game.state().key_config().bindings() {
        println!("{command:<14} {}", key_label(key));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key() {
        assert_eq!(parse_key("w").unwrap(), "w");
        assert_eq!(parse_key(" ").unwrap(), " ");
        assert_eq!(parse_key("Space").unwrap(), " ");
        assert_eq!(parse_key("left").unwrap(), "ArrowLeft");
        assert_eq!(parse_key("ArrowDown").unwrap(), "ArrowDown");
        assert!(parse_key("F1").is_err());
        assert!(parse_key("").is_err());
    }
}
