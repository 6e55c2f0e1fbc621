use std::ops::{BitOr, BitOrAssign};

/// Line segments leaving the center of a cell.
///
/// `top` is the stub that starts a vertical run and leaves the cell
/// downwards (`╷`), `bottom` the stub that ends one (`╵`). `left` and
/// `right` are the horizontal halves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Lines {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

/// Glyph for every flag combination, indexed by [`Lines::index`].
pub const GLYPHS: [char; 16] = [
    ' ', // none
    '╷', // top
    '╵', // bottom
    '╷', // top + bottom
    '╴', // left
    '┐', // top + left
    '┘', // bottom + left
    '┤', // top + bottom + left
    '╶', // right
    '┌', // top + right
    '└', // bottom + right
    '├', // top + bottom + right
    '─', // left + right
    '┬', // top + left + right
    '┴', // bottom + left + right
    '┼', // all
];

impl Lines {
    pub const NONE: Lines = Lines { top: false, bottom: false, left: false, right: false };
    pub const TOP: Lines = Lines { top: true, ..Lines::NONE };
    pub const BOTTOM: Lines = Lines { bottom: true, ..Lines::NONE };
    pub const LEFT: Lines = Lines { left: true, ..Lines::NONE };
    pub const RIGHT: Lines = Lines { right: true, ..Lines::NONE };
    pub const HORIZONTAL: Lines = Lines { left: true, right: true, ..Lines::NONE };

    pub fn is_empty(self) -> bool {
        self == Lines::NONE
    }

    /// Bit index into [`GLYPHS`]: top=1, bottom=2, left=4, right=8.
    pub fn index(self) -> usize {
        (self.top as usize)
            | ((self.bottom as usize) << 1)
            | ((self.left as usize) << 2)
            | ((self.right as usize) << 3)
    }

    pub fn glyph(self) -> char {
        GLYPHS[self.index()]
    }
}

impl BitOr for Lines {
    type Output = Lines;

    fn bitor(self, other: Lines) -> Lines {
        Lines {
            top: self.top || other.top,
            bottom: self.bottom || other.bottom,
            left: self.left || other.left,
            right: self.right || other.right,
        }
    }
}

impl BitOrAssign for Lines {
    fn bitor_assign(&mut self, other: Lines) {
        *self = *self | other;
    }
}
