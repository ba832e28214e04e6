//! Screen rectangles

/// Axis-aligned rectangle in output line/column coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Half-open containment: the right and bottom edges are outside
    pub const fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x
            && (x as u32) < self.x as u32 + self.width as u32
            && y >= self.y
            && (y as u32) < self.y as u32 + self.height as u32
    }

    /// True if `line` falls within the rectangle's vertical span
    pub const fn spans_line(&self, line: u16) -> bool {
        line >= self.y && (line as u32) < self.y as u32 + self.height as u32
    }

    /// Rectangle of the given size centered inside `outer`
    ///
    /// Coordinates are relative to `outer`'s origin.
    pub const fn centered_in(width: u16, height: u16, outer: &Rect) -> Self {
        Self {
            x: outer.width.saturating_sub(width) / 2,
            y: outer.height.saturating_sub(height) / 2,
            width,
            height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_half_open() {
        let r = Rect::new(146, 70, 10, 20);
        assert!(r.contains(146, 70));
        assert!(r.contains(155, 89));
        assert!(!r.contains(156, 70));
        assert!(!r.contains(146, 90));
        assert!(!r.contains(145, 75));
    }

    #[test]
    fn test_centered_in() {
        let game = Rect::new(0, 0, 144, 160);
        let osd = Rect::centered_in(32, 126, &game);
        assert_eq!(osd, Rect::new(56, 17, 32, 126));
    }

    #[test]
    fn test_contains_near_u16_max() {
        let r = Rect::new(u16::MAX - 1, 0, 10, 1);
        assert!(r.contains(u16::MAX, 0));
    }
}
