use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use winit::window::Window;

use crate::error::FolioError;
use crate::theme::mode::ThemeMode;
use crate::theme::storage::PreferenceStore;

const THEME_KEY: &str = "theme";

/// Frames during which transition effects stay off after a theme switch.
const SUPPRESSED_FRAMES: u8 = 2;

/// Receives the active mode so native styling (title bar, decorations) follows it.
pub trait ThemeRoot {
    fn mirror(&mut self, mode: ThemeMode);
}

/// Mirrors the mode onto the winit window theme.
pub struct WindowRoot {
    window: Arc<Window>,
}

impl WindowRoot {
    pub fn new(window: Arc<Window>) -> Self {
        Self { window }
    }
}

impl ThemeRoot for WindowRoot {
    fn mirror(&mut self, mode: ThemeMode) {
        self.window.set_theme(Some(mode.into()));
    }
}

struct ThemeState {
    mode: ThemeMode,
    storage: Box<dyn PreferenceStore>,
    root: Option<Box<dyn ThemeRoot>>,
    suppressed_frames: u8,
}

impl ThemeState {
    fn apply(&mut self) {
        self.suppressed_frames = SUPPRESSED_FRAMES;
        if let Some(root) = self.root.as_mut() {
            root.mirror(self.mode);
        }
    }

    fn set(&mut self, mode: ThemeMode) {
        if self.mode != mode {
            self.mode = mode;
            self.apply();
            log::info!("Theme switched to {mode}");
        }
        if let Err(error) = self.storage.set(THEME_KEY, mode.as_str()) {
            log::warn!("Failed to persist theme preference: {error}");
        }
    }

    fn toggle(&mut self) -> ThemeMode {
        let next = self.mode.opposite();
        self.set(next);
        next
    }
}

/// Owns the active theme for the lifetime of the application root.
///
/// Components never hold the store itself; they get a [`ThemeHandle`] which
/// fails with [`FolioError::ThemeOutOfScope`] once the store is dropped.
pub struct ThemeStore {
    state: Rc<RefCell<ThemeState>>,
}

impl ThemeStore {
    /// Resolves the persisted mode (falling back to dark) and applies it.
    pub fn initialize(storage: Box<dyn PreferenceStore>) -> Self {
        let mode = match storage.get(THEME_KEY) {
            Ok(Some(value)) => value.parse().unwrap_or_else(|error| {
                log::warn!("Ignoring persisted theme: {error}");
                ThemeMode::default()
            }),
            Ok(None) => ThemeMode::default(),
            Err(error) => {
                log::warn!("Could not read theme preference: {error}");
                ThemeMode::default()
            }
        };
        log::info!("Theme initialised as {mode}");

        let mut state = ThemeState {
            mode,
            storage,
            root: None,
            suppressed_frames: 0,
        };
        state.apply();

        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }

    /// Binds the rendering root and mirrors the current mode onto it.
    pub fn attach_root(&self, mut root: Box<dyn ThemeRoot>) {
        let mut state = self.state.borrow_mut();
        root.mirror(state.mode);
        state.root = Some(root);
    }

    /// Unbinds the rendering root, e.g. when the window goes away.
    pub fn detach_root(&self) {
        self.state.borrow_mut().root = None;
    }

    pub fn handle(&self) -> ThemeHandle {
        ThemeHandle {
            state: Rc::downgrade(&self.state),
        }
    }

    pub fn current(&self) -> ThemeMode {
        self.state.borrow().mode
    }

    pub fn set(&self, mode: ThemeMode) {
        self.state.borrow_mut().set(mode);
    }

    pub fn toggle(&self) -> ThemeMode {
        self.state.borrow_mut().toggle()
    }

    /// True while a freshly applied theme should render without transitions.
    pub fn transitions_suppressed(&self) -> bool {
        self.state.borrow().suppressed_frames > 0
    }

    /// Marks one rendered frame; re-enables transitions after the frame pair.
    pub fn end_frame(&self) {
        let mut state = self.state.borrow_mut();
        state.suppressed_frames = state.suppressed_frames.saturating_sub(1);
    }
}

/// Non-owning access to a [`ThemeStore`].
#[derive(Clone)]
pub struct ThemeHandle {
    state: Weak<RefCell<ThemeState>>,
}

impl ThemeHandle {
    fn with_state<T>(&self, f: impl FnOnce(&mut ThemeState) -> T) -> Result<T, FolioError> {
        let state = self.state.upgrade().ok_or(FolioError::ThemeOutOfScope)?;
        let result = f(&mut *state.borrow_mut());
        Ok(result)
    }

    pub fn current(&self) -> Result<ThemeMode, FolioError> {
        self.with_state(|state| state.mode)
    }

    pub fn set(&self, mode: ThemeMode) -> Result<(), FolioError> {
        self.with_state(|state| state.set(mode))
    }

    pub fn toggle(&self) -> Result<ThemeMode, FolioError> {
        self.with_state(ThemeState::toggle)
    }

    pub fn transitions_suppressed(&self) -> Result<bool, FolioError> {
        self.with_state(|state| state.suppressed_frames > 0)
    }
}
