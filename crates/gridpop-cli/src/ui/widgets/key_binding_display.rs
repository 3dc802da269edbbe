use ratatui::{
    prelude::{Buffer, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// Keys and what they do, e.g. `(vec!["←", "→"], "move")`.
pub type KeyBinding<'a> = (Vec<&'a str>, &'a str);

/// Single-line help bar.
#[derive(Debug)]
pub struct KeyBindingDisplay<'a> {
    bindings: Vec<KeyBinding<'a>>,
}

impl<'a> KeyBindingDisplay<'a> {
    pub fn new(bindings: Vec<KeyBinding<'a>>) -> Self {
        Self { bindings }
    }
}

const KEY_STYLE: Style = Style::new().fg(Color::Cyan);
const KEY_SEPARATOR_STYLE: Style = Style::new().fg(Color::DarkGray);
const DESCRIPTION_STYLE: Style = Style::new().fg(Color::White);
const ITEM_SEPARATOR_STYLE: Style = Style::new().fg(Color::DarkGray);

impl Widget for KeyBindingDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![];

        for (i, (keys, desc)) in self.bindings.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", ITEM_SEPARATOR_STYLE));
            }
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    spans.push(Span::styled("/", KEY_SEPARATOR_STYLE));
                }
                spans.push(Span::styled(key, KEY_STYLE));
            }
            spans.push(Span::from(" "));
            spans.push(Span::styled(desc, DESCRIPTION_STYLE));
        }

        Line::from(spans).centered().render(area, buf);
    }
}
