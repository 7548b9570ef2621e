//! Mode registry - exactly one mode active at a time

use std::collections::HashMap;

use tracing::{info, warn};

use super::mode::{Mode, ModeKind};
use super::scene::ModeOutput;
use crate::error::GameError;

#[derive(Default)]
pub struct ModeRegistry {
    modes: HashMap<ModeKind, Box<dyn Mode>>,
    active: Option<ModeKind>,
}

impl ModeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the implementation for its kind
    ///
    /// A replaced implementation is disposed into `out`.
    pub fn register(&mut self, mode: Box<dyn Mode>, out: &mut ModeOutput) {
        let kind = mode.kind();
        if let Some(mut previous) = self.modes.insert(kind, mode) {
            previous.dispose(out);
            if self.active == Some(kind) {
                self.active = None;
            }
        }
    }

    pub fn contains(&self, kind: ModeKind) -> bool {
        self.modes.contains_key(&kind)
    }

    pub fn active_kind(&self) -> Option<ModeKind> {
        self.active
    }

    pub fn get(&self, kind: ModeKind) -> Option<&dyn Mode> {
        self.modes.get(&kind).map(|m| m.as_ref())
    }

    pub fn active_mut(&mut self) -> Option<&mut (dyn Mode + 'static)> {
        let kind = self.active?;
        self.modes.get_mut(&kind).map(|m| m.as_mut())
    }

    /// Deactivate the current mode, then activate `kind`
    ///
    /// An unregistered `kind` leaves no mode active.
    pub fn switch_to(&mut self, kind: ModeKind, out: &mut ModeOutput) -> Result<(), GameError> {
        if let Some(current) = self.active.take() {
            if let Some(mode) = self.modes.get_mut(&current) {
                mode.deactivate(out);
            }
        }

        let Some(mode) = self.modes.get_mut(&kind) else {
            warn!(mode = %kind, "mode not registered");
            return Err(GameError::ModeNotRegistered(kind));
        };
        mode.activate(out);
        self.active = Some(kind);
        info!(mode = %kind, "switched mode");
        Ok(())
    }

    /// Dispose every mode; nothing is active afterwards
    pub fn dispose_all(&mut self, out: &mut ModeOutput) {
        for mode in self.modes.values_mut() {
            mode.dispose(out);
        }
        self.active = None;
    }
}
