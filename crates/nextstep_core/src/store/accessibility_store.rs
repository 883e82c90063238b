//! Accessibility display preferences.
//!
//! # Responsibility
//! - Seed six observable settings from prefs (or defaults) at construction.
//! - Write each change through to prefs, then publish it.
//!
//! # Invariants
//! - Settings are independent: one setter touches exactly one key.
//! - A failed write leaves the observable unchanged.
//! - The text size multiplier is stored as given; clamping is the caller's
//!   choice (see [`snap_text_size`]).

use crate::observable::{Observable, SubscriptionId};
use crate::repo::prefs_repo::KeyValueStore;
use crate::store::StoreResult;
use log::debug;
use serde::{Deserialize, Serialize};

pub const ACCESSIBILITY_NAMESPACE: &str = "accessibility_prefs";
pub const TEXT_SIZE_KEY: &str = "text_size_multiplier";
pub const TEXT_SIZE_DEFAULT: f32 = 1.0;
pub const TEXT_SIZE_MIN: f32 = 0.8;
pub const TEXT_SIZE_MAX: f32 = 2.0;
/// Intermediate slider stops between min and max.
pub const TEXT_SIZE_STEPS: u32 = 4;

/// The five boolean settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessibilityToggle {
    HighContrast,
    ReducedMotion,
    ScreenReader,
    DyslexicFont,
    ColorBlindMode,
}

impl AccessibilityToggle {
    pub const ALL: [AccessibilityToggle; 5] = [
        Self::HighContrast,
        Self::ReducedMotion,
        Self::ScreenReader,
        Self::DyslexicFont,
        Self::ColorBlindMode,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::HighContrast => "high_contrast_enabled",
            Self::ReducedMotion => "reduced_motion_enabled",
            Self::ScreenReader => "screen_reader_enabled",
            Self::DyslexicFont => "dyslexic_font_enabled",
            Self::ColorBlindMode => "color_blind_mode_enabled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "high_contrast" => Some(Self::HighContrast),
            "reduced_motion" => Some(Self::ReducedMotion),
            "screen_reader" => Some(Self::ScreenReader),
            "dyslexic_font" => Some(Self::DyslexicFont),
            "color_blind_mode" => Some(Self::ColorBlindMode),
            _ => None,
        }
    }

    fn index(self) -> usize {
        match self {
            Self::HighContrast => 0,
            Self::ReducedMotion => 1,
            Self::ScreenReader => 2,
            Self::DyslexicFont => 3,
            Self::ColorBlindMode => 4,
        }
    }
}

/// Plain snapshot of all six settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccessibilityPreferences {
    pub text_size_multiplier: f32,
    pub high_contrast: bool,
    pub reduced_motion: bool,
    pub screen_reader: bool,
    pub dyslexic_font: bool,
    pub color_blind_mode: bool,
}

impl Default for AccessibilityPreferences {
    fn default() -> Self {
        Self {
            text_size_multiplier: TEXT_SIZE_DEFAULT,
            high_contrast: false,
            reduced_motion: false,
            screen_reader: false,
            dyslexic_font: false,
            color_blind_mode: false,
        }
    }
}

pub struct AccessibilityStore<S: KeyValueStore> {
    prefs: S,
    text_size: Observable<f32>,
    toggles: [Observable<bool>; 5],
}

impl<S: KeyValueStore> AccessibilityStore<S> {
    /// Reads every setting once; absent keys take their defaults.
    pub fn open(prefs: S) -> StoreResult<Self> {
        let text_size = prefs.get_float(TEXT_SIZE_KEY, TEXT_SIZE_DEFAULT)?;
        let mut flags = [false; 5];
        for toggle in AccessibilityToggle::ALL {
            flags[toggle.index()] = prefs.get_bool(toggle.key(), false)?;
        }

        Ok(Self {
            prefs,
            text_size: Observable::new(text_size),
            toggles: flags.map(Observable::new),
        })
    }

    pub fn text_size_multiplier(&self) -> f32 {
        *self.text_size.get()
    }

    pub fn is_enabled(&self, toggle: AccessibilityToggle) -> bool {
        *self.toggles[toggle.index()].get()
    }

    pub fn preferences(&self) -> AccessibilityPreferences {
        AccessibilityPreferences {
            text_size_multiplier: self.text_size_multiplier(),
            high_contrast: self.is_enabled(AccessibilityToggle::HighContrast),
            reduced_motion: self.is_enabled(AccessibilityToggle::ReducedMotion),
            screen_reader: self.is_enabled(AccessibilityToggle::ScreenReader),
            dyslexic_font: self.is_enabled(AccessibilityToggle::DyslexicFont),
            color_blind_mode: self.is_enabled(AccessibilityToggle::ColorBlindMode),
        }
    }

    pub fn set_text_size_multiplier(&mut self, multiplier: f32) -> StoreResult<()> {
        self.prefs.put_float(TEXT_SIZE_KEY, multiplier)?;
        debug!("event=accessibility_set module=accessibility_store status=ok key={TEXT_SIZE_KEY}");
        self.text_size.set(multiplier);
        Ok(())
    }

    pub fn set_enabled(&mut self, toggle: AccessibilityToggle, enabled: bool) -> StoreResult<()> {
        self.prefs.put_bool(toggle.key(), enabled)?;
        debug!(
            "event=accessibility_set module=accessibility_store status=ok key={}",
            toggle.key()
        );
        self.toggles[toggle.index()].set(enabled);
        Ok(())
    }

    pub fn set_high_contrast(&mut self, enabled: bool) -> StoreResult<()> {
        self.set_enabled(AccessibilityToggle::HighContrast, enabled)
    }

    pub fn set_reduced_motion(&mut self, enabled: bool) -> StoreResult<()> {
        self.set_enabled(AccessibilityToggle::ReducedMotion, enabled)
    }

    pub fn set_screen_reader(&mut self, enabled: bool) -> StoreResult<()> {
        self.set_enabled(AccessibilityToggle::ScreenReader, enabled)
    }

    pub fn set_dyslexic_font(&mut self, enabled: bool) -> StoreResult<()> {
        self.set_enabled(AccessibilityToggle::DyslexicFont, enabled)
    }

    pub fn set_color_blind_mode(&mut self, enabled: bool) -> StoreResult<()> {
        self.set_enabled(AccessibilityToggle::ColorBlindMode, enabled)
    }

    pub fn subscribe_text_size(
        &mut self,
        callback: impl Fn(&f32) + Send + 'static,
    ) -> SubscriptionId {
        self.text_size.subscribe(callback)
    }

    pub fn subscribe_toggle(
        &mut self,
        toggle: AccessibilityToggle,
        callback: impl Fn(&bool) + Send + 'static,
    ) -> SubscriptionId {
        self.toggles[toggle.index()].subscribe(callback)
    }

    pub fn unsubscribe_text_size(&mut self, id: SubscriptionId) -> bool {
        self.text_size.unsubscribe(id)
    }

    pub fn unsubscribe_toggle(&mut self, toggle: AccessibilityToggle, id: SubscriptionId) -> bool {
        self.toggles[toggle.index()].unsubscribe(id)
    }
}

/// Clamps to `0.8..=2.0` and snaps to the nearest of the six slider stops.
pub fn snap_text_size(value: f32) -> f32 {
    if value.is_nan() {
        return TEXT_SIZE_DEFAULT;
    }
    let intervals = (TEXT_SIZE_STEPS + 1) as f32;
    let step = (TEXT_SIZE_MAX - TEXT_SIZE_MIN) / intervals;
    let stop = ((value.clamp(TEXT_SIZE_MIN, TEXT_SIZE_MAX) - TEXT_SIZE_MIN) / step).round();
    if stop >= intervals {
        TEXT_SIZE_MAX
    } else {
        TEXT_SIZE_MIN + stop * step
    }
}
