//! Touch point tracking and the virtual gamepad
//!
//! The touch controller reports up to five points per poll, each tagged
//! with a track id. [`TouchTracker`] keeps one slot per track id and turns
//! consecutive reports into touch-down and touch-up events. Touch-up is
//! reported at the last position seen while the finger was down.

use lcdbridge_protocol::gt911::{TouchReport, MAX_POINTS};

use super::buttons::{Button, ButtonStates};
use super::glyphs::GlyphMap;
use crate::geometry::Rect;

/// Receiver of touch edge events, in panel coordinates
pub trait TouchHandler {
    fn touch_down(&mut self, x: u16, y: u16);
    fn touch_up(&mut self, x: u16, y: u16);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TrackedPoint {
    pub x: u16,
    pub y: u16,
    pub valid: bool,
}

/// Per-track-id touch state across polls
#[derive(Debug, Default)]
pub struct TouchTracker {
    current: [TrackedPoint; MAX_POINTS],
    previous: [TrackedPoint; MAX_POINTS],
}

impl TouchTracker {
    pub const fn new() -> Self {
        const EMPTY: TrackedPoint = TrackedPoint {
            x: 0,
            y: 0,
            valid: false,
        };
        Self {
            current: [EMPTY; MAX_POINTS],
            previous: [EMPTY; MAX_POINTS],
        }
    }

    /// Apply one successfully read report and emit edge events
    ///
    /// Points with a track id outside `0..MAX_POINTS` are ignored.
    pub fn update<H: TouchHandler + ?Sized>(&mut self, report: &TouchReport, handler: &mut H) {
        for (id, slot) in self.current.iter_mut().enumerate() {
            slot.valid = false;
            if let Some(p) = report.points.iter().find(|p| p.track_id as usize == id) {
                *slot = TrackedPoint {
                    x: p.x,
                    y: p.y,
                    valid: true,
                };
            }

            let prev = &self.previous[id];
            match (prev.valid, slot.valid) {
                (false, true) => handler.touch_down(slot.x, slot.y),
                (true, false) => handler.touch_up(prev.x, prev.y),
                _ => {}
            }
        }
        self.previous = self.current;
    }

    pub fn point(&self, id: usize) -> Option<&TrackedPoint> {
        self.current.get(id)
    }
}

/// Touch zones in descaled panel coordinates, in priority order
pub const HIT_ZONES: [(Button, Rect); Button::COUNT] = [
    (Button::Home, Rect::new(146, 70, 10, 20)),
    (Button::Start, Rect::new(146, 10, 10, 20)),
    (Button::Select, Rect::new(146, 130, 10, 20)),
    (Button::A, Rect::new(186, 10, 20, 20)),
    (Button::B, Rect::new(206, 40, 20, 20)),
    (Button::Up, Rect::new(186, 110, 20, 20)),
    (Button::Down, Rect::new(226, 110, 20, 20)),
    (Button::Left, Rect::new(206, 130, 20, 20)),
    (Button::Right, Rect::new(206, 90, 20, 20)),
];

/// First zone containing a descaled point
pub fn hit_test(x: u16, y: u16) -> Option<Button> {
    HIT_ZONES
        .iter()
        .find(|(_, zone)| zone.contains(x, y))
        .map(|&(button, _)| button)
}

/// Maps touches on the border gamepad to logical buttons
pub struct VirtualGamepad<'a> {
    buttons: &'a ButtonStates,
    glyphs: &'a GlyphMap,
    scale: u16,
}

impl<'a> VirtualGamepad<'a> {
    pub fn new(buttons: &'a ButtonStates, glyphs: &'a GlyphMap, scale: u16) -> Self {
        Self {
            buttons,
            glyphs,
            scale: scale.max(1),
        }
    }

    /// Press or release whatever button sits under (`x`, `y`)
    ///
    /// Returns the button hit, if any.
    pub fn apply(&self, x: u16, y: u16, pressed: bool) -> Option<Button> {
        let button = hit_test(x / self.scale, y / self.scale)?;
        self.buttons.set(button, pressed);
        self.glyphs.set_button(button, pressed);
        Some(button)
    }
}

impl TouchHandler for VirtualGamepad<'_> {
    fn touch_down(&mut self, x: u16, y: u16) {
        self.apply(x, y, true);
    }

    fn touch_up(&mut self, x: u16, y: u16) {
        self.apply(x, y, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::Vec;
    use lcdbridge_protocol::gt911::TouchPoint;

    #[derive(Default)]
    struct Recorder {
        downs: Vec<(u16, u16), 8>,
        ups: Vec<(u16, u16), 8>,
    }

    impl TouchHandler for Recorder {
        fn touch_down(&mut self, x: u16, y: u16) {
            self.downs.push((x, y)).unwrap();
        }

        fn touch_up(&mut self, x: u16, y: u16) {
            self.ups.push((x, y)).unwrap();
        }
    }

    fn report(points: &[(u8, u16, u16)]) -> TouchReport {
        let mut r = TouchReport::default();
        for &(track_id, x, y) in points {
            r.points
                .push(TouchPoint {
                    track_id,
                    x,
                    y,
                    size: 10,
                })
                .unwrap();
        }
        r
    }

    #[test]
    fn test_touch_up_uses_last_position() {
        let mut t = TouchTracker::new();
        let mut rec = Recorder::default();

        t.update(&report(&[(2, 50, 60)]), &mut rec);
        assert_eq!(rec.downs.as_slice(), &[(50, 60)]);

        t.update(&report(&[]), &mut rec);
        assert_eq!(rec.ups.as_slice(), &[(50, 60)]);
        assert_eq!(rec.downs.len(), 1);
    }

    #[test]
    fn test_held_point_emits_nothing() {
        let mut t = TouchTracker::new();
        let mut rec = Recorder::default();
        t.update(&report(&[(0, 10, 10)]), &mut rec);
        t.update(&report(&[(0, 12, 11)]), &mut rec);
        t.update(&report(&[(0, 15, 11)]), &mut rec);
        assert_eq!(rec.downs.len(), 1);
        assert!(rec.ups.is_empty());

        t.update(&report(&[]), &mut rec);
        assert_eq!(rec.ups.as_slice(), &[(15, 11)]);
    }

    #[test]
    fn test_independent_tracks() {
        let mut t = TouchTracker::new();
        let mut rec = Recorder::default();
        t.update(&report(&[(0, 1, 1), (3, 300, 200)]), &mut rec);
        t.update(&report(&[(3, 300, 200)]), &mut rec);
        assert_eq!(rec.downs.len(), 2);
        assert_eq!(rec.ups.as_slice(), &[(1, 1)]);
        assert!(t.point(3).unwrap().valid);
    }

    #[test]
    fn test_out_of_range_track_ignored() {
        let mut t = TouchTracker::new();
        let mut rec = Recorder::default();
        t.update(&report(&[(7, 1, 1)]), &mut rec);
        assert!(rec.downs.is_empty());
    }

    #[test]
    fn test_hit_zone_priority_and_edges() {
        assert_eq!(hit_test(150, 75), Some(Button::Home));
        assert_eq!(hit_test(190, 15), Some(Button::A));
        assert_eq!(hit_test(206, 90), Some(Button::Right));
        assert_eq!(hit_test(226, 90), None);
        assert_eq!(hit_test(0, 0), None);
    }

    #[test]
    fn test_virtual_gamepad_presses_and_draws() {
        let buttons = ButtonStates::new();
        let glyphs = GlyphMap::new();
        let mut pad = VirtualGamepad::new(&buttons, &glyphs, 3);

        // (570, 45) / 3 = (190, 15) -> A
        pad.touch_down(570, 45);
        assert!(buttons.is_pressed(Button::A));
        assert_eq!(glyphs.cell(4 * 16 + 13), Some(3));

        pad.touch_up(570, 45);
        assert!(!buttons.is_pressed(Button::A));
        assert_eq!(glyphs.cell(4 * 16 + 13), Some(2));

        assert_eq!(pad.apply(10, 10, true), None);
    }
}
