use ratatui::{
    Frame,
    crossterm::event::{KeyCode, KeyEvent, KeyModifiers},
    layout::{Position, Rect},
    style::Style,
    widgets::{Block, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

/// Editable text field. The cursor is a char index into `value`.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    value: String,
    cursor: usize,
    max_chars: Option<usize>,
    multiline: bool,
    masked: bool,
}

impl TextInput {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            cursor: value.chars().count(),
            value,
            ..Self::default()
        }
    }

    pub fn max_chars(mut self, max: usize) -> Self {
        self.max_chars = Some(max);
        self
    }

    pub fn multiline(mut self) -> Self {
        self.multiline = true;
        self
    }

    pub fn masked(mut self) -> Self {
        self.masked = true;
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Applies an editing key. Returns false for keys the field does not use.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return false;
        }

        match key.code {
            KeyCode::Char(c) => self.insert(c),
            KeyCode::Enter if self.multiline => self.insert('\n'),
            KeyCode::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                let at = self.byte_index();
                self.value.remove(at);
            }
            KeyCode::Delete if self.cursor < self.char_count() => {
                let at = self.byte_index();
                self.value.remove(at);
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.char_count()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.char_count(),
            KeyCode::Backspace | KeyCode::Delete => {}
            _ => return false,
        }
        true
    }

    /// Inserts pasted text at the cursor. Single-line fields drop line
    /// breaks. Returns false if nothing fitted.
    pub fn paste(&mut self, text: &str) -> bool {
        let before = self.char_count();
        for c in text.chars() {
            match c {
                '\r' => {}
                '\n' if !self.multiline => {}
                c if c.is_control() && c != '\n' => {}
                c => self.insert(c),
            }
        }
        self.char_count() != before
    }

    fn insert(&mut self, c: char) {
        if self.max_chars.is_some_and(|max| self.char_count() >= max) {
            return;
        }
        let at = self.byte_index();
        self.value.insert(at, c);
        self.cursor += 1;
    }

    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map_or(self.value.len(), |(i, _)| i)
    }

    fn display(&self) -> String {
        if self.masked {
            "•".repeat(self.char_count())
        } else {
            self.value.clone()
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect, block: Block, style: Style, focused: bool) {
        let inner = block.inner(area);
        let before: String = self.display().chars().take(self.cursor).collect();
        let line = before.matches('\n').count() as u16;
        let column = before.rsplit('\n').next().unwrap_or_default().width() as u16;

        let scroll_y = line.saturating_sub(inner.height.saturating_sub(1));
        let scroll_x = if self.multiline {
            0
        } else {
            column.saturating_sub(inner.width.saturating_sub(1))
        };

        let mut paragraph = Paragraph::new(self.display())
            .style(style)
            .block(block)
            .scroll((scroll_y, scroll_x));
        if self.multiline {
            paragraph = paragraph.wrap(Wrap { trim: false });
        }
        f.render_widget(paragraph, area);

        if focused && inner.width > 0 && inner.height > 0 {
            f.set_cursor_position(Position::new(
                inner.x + (column - scroll_x).min(inner.width - 1),
                inner.y + (line - scroll_y).min(inner.height - 1),
            ));
        }
    }
}
