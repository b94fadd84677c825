use crossterm::event::KeyEvent;
use ratatui::text::Line;

use super::{Pane, PaneKind, PaneState, render_list};
use crate::list::{ItemKind, ListItem};
use crate::message::{Cmd, Message};
use crate::theme::Palette;

pub struct GreetingPane {
    state: PaneState,
}

impl GreetingPane {
    pub fn new() -> Self {
        let mut state = PaneState::new("Greeting", PaneKind::Greeting, "greeting");
        state.list.push(ListItem::new("Hi", "Hi", ItemKind::Greeting));
        Self { state }
    }
}

impl Default for GreetingPane {
    fn default() -> Self {
        Self::new()
    }
}

impl Pane for GreetingPane {
    fn state(&self) -> &PaneState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut PaneState {
        &mut self.state
    }

    fn handle_key(&mut self, _key: KeyEvent) -> Option<Cmd> {
        None
    }

    fn handle_message(&mut self, _msg: &Message) -> Option<Cmd> {
        None
    }

    fn view(&self, theme: &Palette) -> Vec<Line<'static>> {
        render_list(&self.state, theme, |item| {
            vec![ratatui::text::Span::styled(item.display.clone(), theme.title(true))]
        })
    }

    fn refresh(&mut self) -> Option<Cmd> {
        None
    }

    fn handle_action(&mut self, _action: &str) -> Option<Cmd> {
        None
    }

    fn available_actions(&self) -> &'static [&'static str] {
        &[]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_single_item() {
        let mut p = GreetingPane::new();
        assert!(p.init().is_none());
        assert!(!p.state.is_loading());
        assert_eq!(p.state.list.items()[0].display, "Hi");
    }
}
