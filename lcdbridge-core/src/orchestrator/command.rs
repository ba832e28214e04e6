//! Menu command processing
//!
//! Runs once per command tick on the input context. Work happens only when
//! the button vector differs from the one seen on the previous tick, so a
//! held button fires once, on release.

use core::fmt::Write;

use heapless::String;

use super::backlight::{MAX_LEVEL, MIN_LEVEL};
use crate::input::{Button, ButtonSnapshot};
use crate::traits::{Backlight, MenuControl};
use crate::video::PaletteSelect;

/// Widest menu line in characters
pub const LINE_CHARS: usize = 18;

/// Button gesture that shows or hides the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ToggleGesture {
    /// Release the virtual Home button
    HomeRelease,
    /// Release Start while holding Select
    SelectStart,
}

/// One line of the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuItem {
    ColorScheme,
    /// Control palette used by the virtual gamepad border
    BackColor,
    Backlight,
    Exit,
}

impl MenuItem {
    pub const WITH_TOUCH: [MenuItem; 4] = [
        MenuItem::ColorScheme,
        MenuItem::BackColor,
        MenuItem::Backlight,
        MenuItem::Exit,
    ];

    pub const WITHOUT_TOUCH: [MenuItem; 3] =
        [MenuItem::ColorScheme, MenuItem::Backlight, MenuItem::Exit];
}

/// What a tick did, for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandOutcome {
    /// Button vector unchanged or no gesture matched
    Idle,
    MenuToggled { open: bool },
    LineChanged(u8),
    SchemeChanged(u8),
    ControlChanged(u8),
    BacklightChanged(u8),
}

pub struct CommandProcessor {
    previous: ButtonSnapshot,
    gesture: ToggleGesture,
    items: &'static [MenuItem],
    backlight_level: u8,
}

impl CommandProcessor {
    /// Start with every button released, so a button held at boot does not
    /// fire on its first release.
    pub fn new(gesture: ToggleGesture, items: &'static [MenuItem], backlight_level: u8) -> Self {
        Self {
            previous: ButtonSnapshot::released(),
            gesture,
            items,
            backlight_level: backlight_level.clamp(MIN_LEVEL, MAX_LEVEL),
        }
    }

    pub fn items(&self) -> &'static [MenuItem] {
        self.items
    }

    pub fn backlight_level(&self) -> u8 {
        self.backlight_level
    }

    /// Fixed-width text for one menu line
    pub fn line_text(&self, item: MenuItem, palettes: &PaletteSelect) -> String<LINE_CHARS> {
        let mut text = String::new();
        // All formats fit LINE_CHARS for u8 values
        let _ = match item {
            MenuItem::ColorScheme => write!(text, "COLOR SCHEME:{:>5}", palettes.scheme_index()),
            MenuItem::BackColor => write!(text, "BACK COLOR:{:>7}", palettes.control_index()),
            MenuItem::Backlight => write!(text, "BACKLIGHT:{:>8}", self.backlight_level),
            MenuItem::Exit => text.push_str("EXIT").map_err(|_| core::fmt::Error),
        };
        text
    }

    /// Rewrite every menu line and redraw
    pub fn refresh<M: MenuControl>(&self, menu: &mut M, palettes: &PaletteSelect) {
        for (line, &item) in self.items.iter().enumerate() {
            menu.set_line_text(line as u8, &self.line_text(item, palettes));
        }
        menu.refresh();
    }

    /// Process one tick with the current button vector
    pub fn tick<M, B>(
        &mut self,
        current: ButtonSnapshot,
        menu: &mut M,
        palettes: &PaletteSelect,
        backlight: &mut B,
    ) -> CommandOutcome
    where
        M: MenuControl,
        B: Backlight,
    {
        if current == self.previous {
            return CommandOutcome::Idle;
        }

        let outcome = self.dispatch(&current, menu, palettes, backlight);
        self.previous = current;
        outcome
    }

    fn dispatch<M, B>(
        &mut self,
        current: &ButtonSnapshot,
        menu: &mut M,
        palettes: &PaletteSelect,
        backlight: &mut B,
    ) -> CommandOutcome
    where
        M: MenuControl,
        B: Backlight,
    {
        let previous = self.previous;
        let released = |button| current.was_released(&previous, button);

        match self.gesture {
            ToggleGesture::HomeRelease => {
                if released(Button::Home) {
                    menu.toggle();
                    return CommandOutcome::MenuToggled {
                        open: menu.is_open(),
                    };
                }
            }
            ToggleGesture::SelectStart => {
                // Select is the modifier; nothing else reaches the menu while held
                if current.is_pressed(Button::Select) {
                    if released(Button::Start) {
                        menu.toggle();
                        return CommandOutcome::MenuToggled {
                            open: menu.is_open(),
                        };
                    }
                    return CommandOutcome::Idle;
                }
            }
        }

        if !menu.is_open() {
            return CommandOutcome::Idle;
        }

        if released(Button::Down) {
            menu.change_line(1);
            return CommandOutcome::LineChanged(menu.active_line());
        }
        if released(Button::Up) {
            menu.change_line(-1);
            return CommandOutcome::LineChanged(menu.active_line());
        }

        let direction: i8 = if released(Button::Left) {
            -1
        } else if released(Button::Right) || released(Button::A) {
            1
        } else {
            return CommandOutcome::Idle;
        };

        let Some(&item) = self.items.get(menu.active_line() as usize) else {
            return CommandOutcome::Idle;
        };

        let outcome = match item {
            MenuItem::ColorScheme => CommandOutcome::SchemeChanged(palettes.step_scheme(direction)),
            MenuItem::BackColor => CommandOutcome::ControlChanged(palettes.step_control(direction)),
            MenuItem::Backlight => {
                let level = (self.backlight_level as i8 + direction)
                    .clamp(MIN_LEVEL as i8, MAX_LEVEL as i8) as u8;
                self.backlight_level = level;
                backlight.set_level(level);
                CommandOutcome::BacklightChanged(level)
            }
            MenuItem::Exit => {
                menu.toggle();
                return CommandOutcome::MenuToggled {
                    open: menu.is_open(),
                };
            }
        };

        self.refresh(menu, palettes);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct MockMenu {
        open: bool,
        line: u8,
        lines: u8,
        texts: [String<LINE_CHARS>; 4],
        refreshes: u32,
    }

    impl MockMenu {
        fn with_lines(lines: u8) -> Self {
            Self {
                lines,
                ..Default::default()
            }
        }
    }

    impl MenuControl for MockMenu {
        fn is_open(&self) -> bool {
            self.open
        }

        fn toggle(&mut self) {
            self.open = !self.open;
        }

        fn change_line(&mut self, direction: i8) {
            self.line = (self.line as i8 + direction).rem_euclid(self.lines as i8) as u8;
        }

        fn active_line(&self) -> u8 {
            self.line
        }

        fn set_line_text(&mut self, line: u8, text: &str) {
            self.texts[line as usize].clear();
            let _ = self.texts[line as usize].push_str(text);
        }

        fn refresh(&mut self) {
            self.refreshes += 1;
        }
    }

    #[derive(Default)]
    struct MockBacklight(Option<u8>);

    impl Backlight for MockBacklight {
        fn set_level(&mut self, level: u8) {
            self.0 = Some(level);
        }
    }

    struct Rig {
        processor: CommandProcessor,
        menu: MockMenu,
        palettes: PaletteSelect,
        backlight: MockBacklight,
    }

    impl Rig {
        fn touch() -> Self {
            Self {
                processor: CommandProcessor::new(
                    ToggleGesture::HomeRelease,
                    &MenuItem::WITH_TOUCH,
                    10,
                ),
                menu: MockMenu::with_lines(4),
                palettes: PaletteSelect::new(0, 0),
                backlight: MockBacklight::default(),
            }
        }

        fn buttons_only() -> Self {
            Self {
                processor: CommandProcessor::new(
                    ToggleGesture::SelectStart,
                    &MenuItem::WITHOUT_TOUCH,
                    10,
                ),
                menu: MockMenu::with_lines(3),
                palettes: PaletteSelect::new(0, 0),
                backlight: MockBacklight::default(),
            }
        }

        fn tick(&mut self, pressed: &[Button]) -> CommandOutcome {
            let mut snap = ButtonSnapshot::released();
            for &b in pressed {
                snap.set(b, true);
            }
            self.processor
                .tick(snap, &mut self.menu, &self.palettes, &mut self.backlight)
        }

        /// Press then release one button
        fn click(&mut self, button: Button) -> CommandOutcome {
            self.tick(&[button]);
            self.tick(&[])
        }
    }

    #[test]
    fn test_unchanged_vector_is_idle() {
        let mut rig = Rig::touch();
        assert_eq!(rig.tick(&[]), CommandOutcome::Idle);
        assert_eq!(rig.tick(&[Button::Home]), CommandOutcome::Idle);
        assert_eq!(rig.tick(&[Button::Home]), CommandOutcome::Idle);
    }

    #[test]
    fn test_home_release_toggles() {
        let mut rig = Rig::touch();
        assert_eq!(rig.click(Button::Home), CommandOutcome::MenuToggled { open: true });
        assert_eq!(rig.click(Button::Home), CommandOutcome::MenuToggled { open: false });
    }

    #[test]
    fn test_navigation_ignored_while_closed() {
        let mut rig = Rig::touch();
        assert_eq!(rig.click(Button::Down), CommandOutcome::Idle);
        assert_eq!(rig.click(Button::Right), CommandOutcome::Idle);
        assert_eq!(rig.palettes.scheme_index(), 0);
    }

    #[test]
    fn test_line_navigation_wraps() {
        let mut rig = Rig::touch();
        rig.click(Button::Home);
        assert_eq!(rig.click(Button::Up), CommandOutcome::LineChanged(3));
        assert_eq!(rig.click(Button::Down), CommandOutcome::LineChanged(0));
    }

    #[test]
    fn test_color_scheme_steps_and_wraps() {
        let mut rig = Rig::touch();
        rig.click(Button::Home);
        assert_eq!(rig.click(Button::Right), CommandOutcome::SchemeChanged(1));
        assert_eq!(rig.click(Button::A), CommandOutcome::SchemeChanged(2));
        rig.click(Button::Left);
        rig.click(Button::Left);
        assert_eq!(rig.click(Button::Left), CommandOutcome::SchemeChanged(36));
        assert_eq!(rig.menu.texts[0].as_str(), "COLOR SCHEME:   36");
        assert!(rig.menu.refreshes > 0);
    }

    #[test]
    fn test_back_color_steps() {
        let mut rig = Rig::touch();
        rig.click(Button::Home);
        rig.click(Button::Down);
        assert_eq!(rig.click(Button::Left), CommandOutcome::ControlChanged(2));
        assert_eq!(rig.palettes.control_index(), 2);
        assert_eq!(rig.menu.texts[1].as_str(), "BACK COLOR:      2");
    }

    #[test]
    fn test_backlight_clamps() {
        let mut rig = Rig::touch();
        rig.click(Button::Home);
        rig.click(Button::Down);
        rig.click(Button::Down);
        assert_eq!(rig.click(Button::Right), CommandOutcome::BacklightChanged(10));
        assert_eq!(rig.backlight.0, Some(10));
        assert_eq!(rig.click(Button::Left), CommandOutcome::BacklightChanged(9));
        assert_eq!(rig.menu.texts[2].as_str(), "BACKLIGHT:       9");
        for _ in 0..12 {
            rig.click(Button::Left);
        }
        assert_eq!(rig.processor.backlight_level(), 1);
        assert_eq!(rig.backlight.0, Some(1));
    }

    #[test]
    fn test_exit_closes_menu() {
        let mut rig = Rig::touch();
        rig.click(Button::Home);
        rig.click(Button::Up);
        assert_eq!(rig.click(Button::A), CommandOutcome::MenuToggled { open: false });
        assert!(!rig.menu.is_open());
    }

    #[test]
    fn test_select_start_toggles() {
        let mut rig = Rig::buttons_only();
        rig.tick(&[Button::Select]);
        rig.tick(&[Button::Select, Button::Start]);
        assert_eq!(
            rig.tick(&[Button::Select]),
            CommandOutcome::MenuToggled { open: true }
        );
        // Start alone does nothing
        assert_eq!(rig.click(Button::Start), CommandOutcome::Idle);
        assert!(rig.menu.is_open());
    }

    #[test]
    fn test_select_held_blocks_navigation() {
        let mut rig = Rig::buttons_only();
        rig.tick(&[Button::Select, Button::Start]);
        rig.tick(&[Button::Select]);
        assert!(rig.menu.is_open());
        rig.tick(&[Button::Select, Button::Down]);
        assert_eq!(rig.tick(&[Button::Select]), CommandOutcome::Idle);
        assert_eq!(rig.menu.active_line(), 0);
    }

    #[test]
    fn test_buttons_only_menu_has_no_back_color() {
        let mut rig = Rig::buttons_only();
        rig.tick(&[Button::Select, Button::Start]);
        rig.tick(&[Button::Select]);
        rig.tick(&[]);
        rig.click(Button::Down);
        assert_eq!(rig.click(Button::Left), CommandOutcome::BacklightChanged(9));
        assert_eq!(rig.palettes.control_index(), 0);
    }

    #[test]
    fn test_home_ignored_without_touch() {
        let mut rig = Rig::buttons_only();
        assert_eq!(rig.click(Button::Home), CommandOutcome::Idle);
        assert!(!rig.menu.is_open());
    }

    #[test]
    fn test_line_texts() {
        let processor = CommandProcessor::new(ToggleGesture::HomeRelease, &MenuItem::WITH_TOUCH, 7);
        let palettes = PaletteSelect::new(12, 1);
        assert_eq!(
            processor.line_text(MenuItem::ColorScheme, &palettes).as_str(),
            "COLOR SCHEME:   12"
        );
        assert_eq!(
            processor.line_text(MenuItem::BackColor, &palettes).as_str(),
            "BACK COLOR:      1"
        );
        assert_eq!(
            processor.line_text(MenuItem::Backlight, &palettes).as_str(),
            "BACKLIGHT:       7"
        );
        assert_eq!(processor.line_text(MenuItem::Exit, &palettes).as_str(), "EXIT");
    }
}
