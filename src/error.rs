use std::fmt;

/// All fallible operations in Holofolio funnel through this type.
#[derive(Debug)]
pub enum FolioError {
    Io(std::io::Error),
    TomlDeserialize(toml::de::Error),
    TomlSerialize(toml::ser::Error),
    Layout(taffy::TaffyError),
    NoConfigDir,
    Surface(String),
    Renderer(String),
    InvalidThemeMode(String),
    /// A theme handle outlived the store that issued it.
    ThemeOutOfScope,
}

impl fmt::Display for FolioError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(error) => write!(formatter, "IO error: {error}"),
            Self::TomlDeserialize(error) => write!(formatter, "TOML parse error: {error}"),
            Self::TomlSerialize(error) => write!(formatter, "TOML serialize error: {error}"),
            Self::Layout(error) => write!(formatter, "layout error: {error}"),
            Self::NoConfigDir => write!(formatter, "could not determine config directory"),
            Self::Surface(message) => write!(formatter, "surface error: {message}"),
            Self::Renderer(message) => write!(formatter, "renderer error: {message}"),
            Self::InvalidThemeMode(value) => {
                write!(formatter, "unknown theme mode {value:?} (expected \"dark\" or \"light\")")
            }
            Self::ThemeOutOfScope => write!(
                formatter,
                "theme handle used outside the lifetime of its ThemeStore"
            ),
        }
    }
}

impl std::error::Error for FolioError {}

impl From<std::io::Error> for FolioError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}

impl From<toml::de::Error> for FolioError {
    fn from(error: toml::de::Error) -> Self {
        Self::TomlDeserialize(error)
    }
}

impl From<toml::ser::Error> for FolioError {
    fn from(error: toml::ser::Error) -> Self {
        Self::TomlSerialize(error)
    }
}

impl From<taffy::TaffyError> for FolioError {
    fn from(error: taffy::TaffyError) -> Self {
        Self::Layout(error)
    }
}
