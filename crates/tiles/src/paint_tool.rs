//! Paint / erase state machine.
//!
//! `Idle` moves to `Painting` on a plain press and to `Erasing` on a press
//! with the modifier held. A release always returns to `Idle`. While active,
//! every press or move yields one brush stroke at the aligned cursor cell.

use bevy::prelude::*;

use crate::config::GridConfig;
use crate::grid_mapper::GridMapper;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PaintToolState {
    #[default]
    Idle,
    Painting,
    Erasing,
}

/// Pointer input already projected onto the scene.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum PaintInput {
    /// Button down over `point`. `modifier` selects erasing.
    Pressed { point: Vec3, modifier: bool },
    Moved { point: Vec3 },
    Released,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeMode {
    Paint,
    Erase,
}

/// One brush cycle to apply at `center` (already grid aligned).
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct BrushStroke {
    pub center: Vec3,
    pub mode: StrokeMode,
}

#[derive(Resource, Debug, Default)]
pub struct PaintTool {
    state: PaintToolState,
}

impl PaintTool {
    pub fn state(&self) -> PaintToolState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != PaintToolState::Idle
    }

    /// Drop any stroke in progress.
    pub fn reset(&mut self) {
        self.state = PaintToolState::Idle;
    }

    fn mode(&self) -> Option<StrokeMode> {
        match self.state {
            PaintToolState::Idle => None,
            PaintToolState::Painting => Some(StrokeMode::Paint),
            PaintToolState::Erasing => Some(StrokeMode::Erase),
        }
    }

    /// Advance the machine by one input, returning the stroke it produces.
    pub fn handle(&mut self, input: PaintInput, config: &GridConfig) -> Option<BrushStroke> {
        let point = match input {
            PaintInput::Pressed { point, modifier } => {
                // A second press mid-stroke keeps the current mode.
                if self.state == PaintToolState::Idle {
                    self.state = if modifier {
                        PaintToolState::Erasing
                    } else {
                        PaintToolState::Painting
                    };
                }
                point
            }
            PaintInput::Moved { point } => point,
            PaintInput::Released => {
                self.state = PaintToolState::Idle;
                return None;
            }
        };
        let mode = self.mode()?;
        Some(BrushStroke {
            center: GridMapper::new(config).align(point),
            mode,
        })
    }
}
