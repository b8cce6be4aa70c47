mod mode;
mod storage;
mod store;

pub use mode::ThemeMode;
pub use storage::{FilePreferences, MemoryPreferences, PreferenceStore};
pub use store::{ThemeHandle, ThemeStore, WindowRoot};
