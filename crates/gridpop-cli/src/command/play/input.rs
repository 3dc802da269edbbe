use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use gridpop_engine::{Action, GameState, GridSize, KeyConfig, Position, RotationDirection};

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Rotate,
    RotateCounter,
    Drop,
    Hold,
    Start,
    ToggleOptions,
    SetGridSize(GridSize),
    ToggleTimed,
    Quit,
}

/// Name a key is stored under in the key configuration.
fn key_name(code: KeyCode) -> Option<String> {
    let name = match code {
        KeyCode::Up => "ArrowUp".to_owned(),
        KeyCode::Down => "ArrowDown".to_owned(),
        KeyCode::Left => "ArrowLeft".to_owned(),
        KeyCode::Right => "ArrowRight".to_owned(),
        KeyCode::Char(c) => c.to_string(),
        _ => return None,
    };
    Some(name)
}

fn bound_command(config: &KeyConfig, name: &str) -> Option<Command> {
    [
        (&config.move_up, Command::MoveUp),
        (&config.move_down, Command::MoveDown),
        (&config.move_left, Command::MoveLeft),
        (&config.move_right, Command::MoveRight),
        (&config.rotate, Command::Rotate),
        (&config.rotate_counter, Command::RotateCounter),
        (&config.drop, Command::Drop),
        (&config.hold, Command::Hold),
    ]
    .into_iter()
    .find(|(key, _)| key.eq_ignore_ascii_case(name))
    .map(|(_, command)| command)
}

/// Resolves a key press against the fixed keys, then the configured bindings.
///
/// While the options menu is open only the option keys respond.
pub fn resolve(key: KeyEvent, state: &GameState) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return (key.code == KeyCode::Char('c')).then_some(Command::Quit);
    }

    if state.is_options_menu_open() {
        return match key.code {
            KeyCode::Char('4') => Some(Command::SetGridSize(GridSize::Four)),
            KeyCode::Char('5') => Some(Command::SetGridSize(GridSize::Five)),
            KeyCode::Char('t' | 'T') => Some(Command::ToggleTimed),
            KeyCode::Char('o' | 'O') | KeyCode::Esc => Some(Command::ToggleOptions),
            KeyCode::Char('q') => Some(Command::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Enter => return Some(Command::Start),
        KeyCode::Esc | KeyCode::Char('q') => return Some(Command::Quit),
        KeyCode::Char('o' | 'O') => return Some(Command::ToggleOptions),
        _ => {}
    }

    bound_command(state.key_config(), &key_name(key.code)?)
}

/// Translates `command` into the action it dispatches in `state`, if any.
///
/// `Quit` has no action; the host handles it.
pub fn to_action(command: Command, state: &GameState) -> Option<Action> {
    let moved = |step: fn(Position) -> Position| {
        state
            .current_piece()
            .map(|piece| Action::Move(step(piece.position())))
    };
    match command {
        Command::MoveUp => moved(Position::up),
        Command::MoveDown => moved(Position::down),
        Command::MoveLeft => moved(Position::left),
        Command::MoveRight => moved(Position::right),
        Command::Rotate => Some(Action::Rotate(RotationDirection::Clockwise)),
        Command::RotateCounter => Some(Action::Rotate(RotationDirection::Counterclockwise)),
        Command::Drop => Some(Action::Place),
        Command::Hold => Some(Action::Hold),
        // Enter only starts or restarts when no game is in progress.
        Command::Start => (!state.is_playing()).then_some(Action::Start),
        Command::ToggleOptions => Some(Action::SetOptionsMenu(!state.is_options_menu_open())),
        Command::SetGridSize(size) => Some(Action::ChangeGridSize(size)),
        Command::ToggleTimed => Some(Action::ToggleTimed(!state.is_timed())),
        Command::Quit => None,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use gridpop_engine::{KeyConfigUpdate, MemoryStorage, PieceGenerator, PieceSeed};

    use super::*;

    fn state(actions: &[Action]) -> GameState {
        let mut storage = MemoryStorage::new();
        let mut state = GameState::load(
            &storage,
            PieceGenerator::with_seed(PieceSeed::from_u64(3)),
            Utc::now(),
        );
        for action in actions {
            state = state.reduce(action.clone(), &mut storage, Utc::now());
        }
        state
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_default_bindings() {
        let state = state(&[Action::Start]);
        assert_eq!(resolve(press(KeyCode::Left), &state), Some(Command::MoveLeft));
        assert_eq!(resolve(press(KeyCode::Up), &state), Some(Command::MoveUp));
        assert_eq!(resolve(press(KeyCode::Char('d')), &state), Some(Command::Rotate));
        assert_eq!(resolve(press(KeyCode::Char('A')), &state), Some(Command::RotateCounter));
        assert_eq!(resolve(press(KeyCode::Char(' ')), &state), Some(Command::Drop));
        assert_eq!(resolve(press(KeyCode::Char('s')), &state), Some(Command::Hold));
        assert_eq!(resolve(press(KeyCode::Char('x')), &state), None);
    }

    #[test]
    fn test_fixed_keys() {
        let state = state(&[]);
        assert_eq!(resolve(press(KeyCode::Enter), &state), Some(Command::Start));
        assert_eq!(resolve(press(KeyCode::Esc), &state), Some(Command::Quit));
        assert_eq!(resolve(press(KeyCode::Char('o')), &state), Some(Command::ToggleOptions));
        assert_eq!(
            resolve(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), &state),
            Some(Command::Quit)
        );
    }

    #[test]
    fn test_custom_bindings() {
        let update = KeyConfigUpdate {
            drop: Some("Enter".to_owned()),
            move_left: Some("h".to_owned()),
            ..KeyConfigUpdate::default()
        };
        let state = state(&[Action::UpdateKeyConfig(update), Action::Start]);
        assert_eq!(resolve(press(KeyCode::Char('h')), &state), Some(Command::MoveLeft));
        assert_eq!(resolve(press(KeyCode::Left), &state), None);
        // Enter stays the start key.
        assert_eq!(resolve(press(KeyCode::Enter), &state), Some(Command::Start));
    }

    #[test]
    fn test_options_menu_keys() {
        let state = state(&[Action::SetOptionsMenu(true)]);
        assert_eq!(
            resolve(press(KeyCode::Char('5')), &state),
            Some(Command::SetGridSize(GridSize::Five))
        );
        assert_eq!(resolve(press(KeyCode::Char('t')), &state), Some(Command::ToggleTimed));
        assert_eq!(resolve(press(KeyCode::Esc), &state), Some(Command::ToggleOptions));
        assert_eq!(resolve(press(KeyCode::Left), &state), None);
        assert_eq!(resolve(press(KeyCode::Enter), &state), None);
    }

    #[test]
    fn test_to_action() {
        let idle = state(&[]);
        assert_eq!(to_action(Command::Start, &idle), Some(Action::Start));
        assert_eq!(to_action(Command::MoveLeft, &idle), None);
        assert_eq!(to_action(Command::ToggleTimed, &idle), Some(Action::ToggleTimed(false)));
        assert_eq!(to_action(Command::Quit, &idle), None);

        let playing = state(&[Action::Start]);
        let position = playing.current_piece().unwrap().position();
        assert_eq!(
            to_action(Command::MoveRight, &playing),
            Some(Action::Move(position.right()))
        );
        assert_eq!(to_action(Command::Start, &playing), None);
        assert_eq!(
            to_action(Command::ToggleOptions, &playing),
            Some(Action::SetOptionsMenu(true))
        );
    }
}
