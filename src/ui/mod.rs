//! Overlay and HUD state
//!
//! Which panel is up, whether the game is frozen behind it, and whether the
//! player may steer. Panels the host does not provide are reported once and
//! then silently skipped.

pub mod hud;

pub use hud::{Hud, ThresholdMark};

/// Panels the game can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    Gameplay,
    Settings,
    Win,
    Fail,
}

impl Panel {
    pub const ALL: [Panel; 4] = [Panel::Gameplay, Panel::Settings, Panel::Win, Panel::Fail];
}

/// Which panels the host actually has
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelSet {
    pub gameplay: bool,
    pub settings: bool,
    pub win: bool,
    pub fail: bool,
}

impl Default for PanelSet {
    fn default() -> Self {
        Self {
            gameplay: true,
            settings: true,
            win: true,
            fail: true,
        }
    }
}

impl PanelSet {
    pub fn has(&self, panel: Panel) -> bool {
        match panel {
            Panel::Gameplay => self.gameplay,
            Panel::Settings => self.settings,
            Panel::Win => self.win,
            Panel::Fail => self.fail,
        }
    }
}

/// What the overlays want from the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayEffect {
    pub paused: bool,
    pub control_enabled: bool,
}

#[derive(Debug, Clone)]
pub struct Overlays {
    available: PanelSet,
    visible: Vec<Panel>,
    paused: bool,
    control_enabled: bool,
}

impl Overlays {
    pub fn new(available: PanelSet) -> Self {
        for panel in Panel::ALL {
            if !available.has(panel) {
                log::error!("{:?} panel is missing!", panel);
            }
        }
        Self {
            available,
            visible: Vec::new(),
            paused: false,
            control_enabled: true,
        }
    }

    pub fn is_visible(&self, panel: Panel) -> bool {
        self.visible.contains(&panel)
    }

    pub fn effect(&self) -> OverlayEffect {
        OverlayEffect {
            paused: self.paused,
            control_enabled: self.control_enabled && !self.paused,
        }
    }

    fn show(&mut self, panel: Panel) -> bool {
        if !self.available.has(panel) {
            return false;
        }
        if !self.visible.contains(&panel) {
            self.visible.push(panel);
        }
        true
    }

    fn hide(&mut self, panel: Panel) {
        self.visible.retain(|&p| p != panel);
    }

    /// Hide everything, then show the gameplay HUD (level start)
    pub fn reset_for_level(&mut self) {
        self.visible.clear();
        self.paused = false;
        self.control_enabled = true;
        self.show(Panel::Gameplay);
    }

    pub fn show_settings(&mut self) {
        if self.show(Panel::Settings) {
            self.paused = true;
            self.control_enabled = false;
        }
    }

    pub fn hide_settings(&mut self) {
        if self.available.has(Panel::Settings) {
            self.hide(Panel::Settings);
            self.paused = false;
            self.control_enabled = true;
        }
    }

    pub fn show_win(&mut self) {
        if self.show(Panel::Win) {
            self.control_enabled = false;
        }
    }

    pub fn show_fail(&mut self) {
        if self.show(Panel::Fail) {
            self.control_enabled = false;
        }
    }
}

impl Default for Overlays {
    fn default() -> Self {
        Self::new(PanelSet::default())
    }
}
