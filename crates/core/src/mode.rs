//! Output modes requested by the caller.

use std::fmt;
use std::str::FromStr;

/// A single output kind the loader can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Rendered HTML, exported as `html`.
    Html,
    /// Raw markdown body, exported as `body`.
    Body,
    /// File metadata, exported as `meta`.
    Meta,
    /// Vue component wrapper, exported as `vue`.
    Vue,
    /// React component wrapper, exported as `react`.
    React,
}

impl Mode {
    /// Every mode, in emission order.
    pub const ALL: [Mode; 5] = [Mode::Html, Mode::Body, Mode::Meta, Mode::Vue, Mode::React];

    /// Configuration token for this mode.
    pub const fn as_str(self) -> &'static str {
        match self {
            Mode::Html => "html",
            Mode::Body => "body",
            Mode::Meta => "meta",
            Mode::Vue => "vue-component",
            Mode::React => "react-component",
        }
    }

    /// Whether this mode wraps the document as a UI framework component.
    pub const fn is_framework(self) -> bool {
        matches!(self, Mode::Vue | Mode::React)
    }

    const fn bit(self) -> u8 {
        match self {
            Mode::Html => 1,
            Mode::Body => 1 << 1,
            Mode::Meta => 1 << 2,
            Mode::Vue => 1 << 3,
            Mode::React => 1 << 4,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a mode token is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMode(pub String);

impl fmt::Display for UnknownMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown mode `{}`", self.0)
    }
}

impl std::error::Error for UnknownMode {}

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let token = token.trim();
        Mode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(token))
            .ok_or_else(|| UnknownMode(token.to_string()))
    }
}

/// Set of requested modes, stored as a bitset.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct ModeSet(u8);

impl ModeSet {
    /// A set with no modes.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// The set used when the caller asks for nothing valid: HTML only.
    pub const fn default_modes() -> Self {
        Self(Mode::Html.bit())
    }

    /// Normalizes raw caller tokens into a mode set.
    ///
    /// Unknown tokens are skipped. When nothing valid remains, the default
    /// set is returned.
    pub fn resolve<I, S>(tokens: Option<I>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let Some(tokens) = tokens else {
            return Self::default_modes();
        };

        let mut set = Self::empty();
        for token in tokens {
            match token.as_ref().parse::<Mode>() {
                Ok(mode) => set.insert(mode),
                Err(err) => log::warn!("ignoring {err}"),
            }
        }

        if set.is_empty() {
            Self::default_modes()
        } else {
            set
        }
    }

    /// Adds a mode. Adding a mode twice has no effect.
    pub fn insert(&mut self, mode: Mode) {
        self.0 |= mode.bit();
    }

    /// Membership query.
    pub const fn contains(self, mode: Mode) -> bool {
        self.0 & mode.bit() != 0
    }

    /// Returns true when no mode is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether the markdown body has to be rendered to HTML.
    pub const fn needs_html(self) -> bool {
        self.contains(Mode::Html) || self.contains(Mode::Vue) || self.contains(Mode::React)
    }

    /// Active modes, in emission order.
    pub fn iter(self) -> impl Iterator<Item = Mode> {
        Mode::ALL.into_iter().filter(move |mode| self.contains(*mode))
    }

    /// Active framework modes.
    pub fn frameworks(self) -> impl Iterator<Item = Mode> {
        self.iter().filter(|mode| mode.is_framework())
    }
}

impl FromIterator<Mode> for ModeSet {
    fn from_iter<I: IntoIterator<Item = Mode>>(iter: I) -> Self {
        let mut set = Self::empty();
        for mode in iter {
            set.insert(mode);
        }
        set
    }
}

impl fmt::Debug for ModeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
