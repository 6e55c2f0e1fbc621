use std::collections::HashMap;

use super::lines::Lines;

/// Arrow drawn over a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrow {
    /// `▷`
    Right,
    /// `◁`
    Left,
}

impl Arrow {
    pub fn glyph(self) -> char {
        match self {
            Arrow::Right => '▷',
            Arrow::Left => '◁',
        }
    }
}

/// Everything drawn into one terminal cell during a frame.
///
/// Line segments accumulate; a placed character or arrow overrides them.
/// Rendering priority is arrow, then character, then lines, regardless of
/// the order the directives arrived in.
#[derive(Debug, Clone, Default)]
pub struct CellStack {
    lines: Lines,
    ch: Option<char>,
    arrow: Option<Arrow>,
    tags: HashMap<String, String>,
}

impl CellStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_lines(&mut self, lines: Lines) {
        self.lines |= lines;
    }

    pub fn place_char(&mut self, ch: char) {
        self.ch = Some(ch);
    }

    /// Place an arrow pointing right, or left when `inverted`.
    pub fn place_arrow(&mut self, inverted: bool) {
        self.arrow = Some(if inverted { Arrow::Left } else { Arrow::Right });
    }

    pub fn tag(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.tags.insert(key.into(), value.into());
    }

    pub fn is(&self, key: &str, value: &str) -> bool {
        self.tags.get(key).is_some_and(|v| v == value)
    }

    pub fn lines(&self) -> Lines {
        self.lines
    }

    pub fn render(&self) -> char {
        if let Some(arrow) = self.arrow {
            arrow.glyph()
        } else if let Some(ch) = self.ch {
            ch
        } else {
            self.lines.glyph()
        }
    }
}
