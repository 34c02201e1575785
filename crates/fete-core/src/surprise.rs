//! One-shot surprise reveal on the surprise section.

use std::time::Duration;

/// Timed stages that follow a surprise trigger, with their delays from the
/// moment the surprise button is pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurpriseStage {
    HideButton,
    Fireworks,
    ShowMessage,
    AutoAdvance,
}

impl SurpriseStage {
    pub const ALL: [SurpriseStage; 4] = [
        SurpriseStage::HideButton,
        SurpriseStage::Fireworks,
        SurpriseStage::ShowMessage,
        SurpriseStage::AutoAdvance,
    ];

    pub fn delay(self) -> Duration {
        match self {
            SurpriseStage::HideButton => Duration::from_millis(200),
            SurpriseStage::Fireworks => Duration::from_millis(500),
            SurpriseStage::ShowMessage => Duration::from_millis(1000),
            SurpriseStage::AutoAdvance => Duration::from_millis(7000),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurprisePhase {
    #[default]
    Waiting,
    Revealing,
    Revealed,
}

#[derive(Debug, Clone, Default)]
pub struct Surprise {
    phase: SurprisePhase,
    button_hidden: bool,
    message_shown: bool,
}

impl Surprise {
    /// Marks the surprise as triggered. Returns false if it already was.
    pub fn trigger(&mut self) -> bool {
        if self.phase != SurprisePhase::Waiting {
            return false;
        }
        self.phase = SurprisePhase::Revealing;
        true
    }

    /// Applies the visible part of a stage.
    pub fn apply(&mut self, stage: SurpriseStage) {
        match stage {
            SurpriseStage::HideButton => self.button_hidden = true,
            SurpriseStage::ShowMessage => {
                self.message_shown = true;
                self.phase = SurprisePhase::Revealed;
            }
            SurpriseStage::Fireworks | SurpriseStage::AutoAdvance => {}
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn phase(&self) -> SurprisePhase {
        self.phase
    }

    pub fn button_visible(&self) -> bool {
        !self.button_hidden
    }

    /// True while the button is being pressed but not yet hidden.
    pub fn button_pressed(&self) -> bool {
        self.phase != SurprisePhase::Waiting && !self.button_hidden
    }

    pub fn message_visible(&self) -> bool {
        self.message_shown
    }
}
