/// Keyboard bindings for the terminal viewer
use crossterm::event::KeyCode;
use softrast_core::{CullMode, RenderMode};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Quit,
    SetRenderMode(RenderMode),
    SetCullMode(CullMode),
    ToggleGrid,
    /// Move along the view direction; the sign selects forward or back.
    Move(f32),
    /// Change yaw; the sign selects the direction.
    Turn(f32),
}

pub fn action_for(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char(c @ '1'..='6') => {
            RenderMode::from_digit(c as u8 - b'0').map(Action::SetRenderMode)
        }
        KeyCode::Char('c') => Some(Action::SetCullMode(CullMode::Backface)),
        KeyCode::Char('d') => Some(Action::SetCullMode(CullMode::None)),
        KeyCode::Char('g') => Some(Action::ToggleGrid),
        KeyCode::Up => Some(Action::Move(1.0)),
        KeyCode::Down => Some(Action::Move(-1.0)),
        KeyCode::Left => Some(Action::Turn(-1.0)),
        KeyCode::Right => Some(Action::Turn(1.0)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_keys() {
        let modes: Vec<_> = ('1'..='6')
            .map(|c| action_for(KeyCode::Char(c)))
            .collect();
        assert_eq!(
            modes,
            vec![
                Some(Action::SetRenderMode(RenderMode::WireframeVertices)),
                Some(Action::SetRenderMode(RenderMode::Wireframe)),
                Some(Action::SetRenderMode(RenderMode::Filled)),
                Some(Action::SetRenderMode(RenderMode::FilledWireframe)),
                Some(Action::SetRenderMode(RenderMode::Textured)),
                Some(Action::SetRenderMode(RenderMode::TexturedWireframe)),
            ]
        );
        assert_eq!(action_for(KeyCode::Char('7')), None);
    }

    #[test]
    fn test_control_keys() {
        assert_eq!(action_for(KeyCode::Esc), Some(Action::Quit));
        assert_eq!(action_for(KeyCode::Char('q')), Some(Action::Quit));
        assert_eq!(
            action_for(KeyCode::Char('c')),
            Some(Action::SetCullMode(CullMode::Backface))
        );
        assert_eq!(action_for(KeyCode::Char('d')), Some(Action::SetCullMode(CullMode::None)));
        assert_eq!(action_for(KeyCode::Char('g')), Some(Action::ToggleGrid));
        assert_eq!(action_for(KeyCode::Up), Some(Action::Move(1.0)));
        assert_eq!(action_for(KeyCode::Left), Some(Action::Turn(-1.0)));
        assert_eq!(action_for(KeyCode::Tab), None);
    }
}
