//! Assembly identity for multi-assembly translation runs.
//!
//! An assembly is identified by its simple name, a four-part version, an optional culture
//! and an optional public key token. The display-name form
//! (`Name, Version=1.0.0.0, Culture=neutral, PublicKeyToken=null`) is what references carry
//! and what [`crate::project::AssemblyResolver`] caches resolved assemblies by.
//!
//! # Examples
//!
//! ```rust
//! use dotscript::metadata::identity::{AssemblyIdentity, AssemblyVersion};
//!
//! let mscorlib = AssemblyIdentity::parse(
//!     "mscorlib, Version=4.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089",
//! )?;
//! assert_eq!(mscorlib.name, "mscorlib");
//! assert_eq!(mscorlib.version, AssemblyVersion::new(4, 0, 0, 0));
//! assert!(mscorlib.is_culture_neutral());
//! # Ok::<(), dotscript::Error>(())
//! ```

use std::{fmt, str::FromStr};

use crate::{Error, Result};

/// Complete identity of an assembly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssemblyIdentity {
    /// Simple assembly name (e.g. `mscorlib`, `System.Core`)
    pub name: String,

    /// Four-part version number
    pub version: AssemblyVersion,

    /// Culture, `None` for culture-neutral assemblies
    pub culture: Option<String>,

    /// Public key token as lowercase hex, `None` for assemblies without a strong name
    pub public_key_token: Option<String>,
}

/// Four-part assembly version (`major.minor.build.revision`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AssemblyVersion {
    /// Major version
    pub major: u16,
    /// Minor version
    pub minor: u16,
    /// Build number
    pub build: u16,
    /// Revision number
    pub revision: u16,
}

impl AssemblyIdentity {
    /// Creates a culture-neutral identity without a strong name.
    pub fn new(name: impl Into<String>, version: AssemblyVersion) -> Self {
        Self {
            name: name.into(),
            version,
            culture: None,
            public_key_token: None,
        }
    }

    /// Sets the culture.
    #[must_use]
    pub fn with_culture(mut self, culture: impl Into<String>) -> Self {
        self.culture = Some(culture.into());
        self
    }

    /// Sets the public key token (hex).
    #[must_use]
    pub fn with_public_key_token(mut self, token: impl Into<String>) -> Self {
        self.public_key_token = Some(token.into().to_ascii_lowercase());
        self
    }

    /// Parses an identity from its display name.
    ///
    /// Only the name component is mandatory. Unknown components are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAssemblyName`] if the name is empty, the version is malformed
    /// or the public key token is not 16 hex digits.
    pub fn parse(display_name: &str) -> Result<Self> {
        let mut parts = display_name.split(',').map(str::trim);

        let name = parts.next().unwrap_or_default();
        if name.is_empty() {
            return Err(Error::InvalidAssemblyName(format!(
                "empty name in '{display_name}'"
            )));
        }

        let mut identity = Self::new(name, AssemblyVersion::default());
        for part in parts {
            if let Some(value) = part.strip_prefix("Version=") {
                identity.version = AssemblyVersion::parse(value)?;
            } else if let Some(value) = part.strip_prefix("Culture=") {
                if value != "neutral" && !value.is_empty() {
                    identity.culture = Some(value.to_string());
                }
            } else if let Some(value) = part.strip_prefix("PublicKeyToken=") {
                if value != "null" && !value.is_empty() {
                    if value.len() != 16 || !value.chars().all(|c| c.is_ascii_hexdigit()) {
                        return Err(Error::InvalidAssemblyName(format!(
                            "PublicKeyToken must be 16 hex digits, got '{value}'"
                        )));
                    }
                    identity.public_key_token = Some(value.to_ascii_lowercase());
                }
            }
        }

        Ok(identity)
    }

    /// Returns the full display name.
    ///
    /// This is the key assemblies are cached and compared by.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!(
            "{}, Version={}, Culture={}, PublicKeyToken={}",
            self.name,
            self.version,
            self.culture.as_deref().unwrap_or("neutral"),
            self.public_key_token.as_deref().unwrap_or("null")
        )
    }

    /// Returns `true` if the identity carries a public key token.
    #[must_use]
    pub fn is_strong_named(&self) -> bool {
        self.public_key_token.is_some()
    }

    /// Returns `true` if the identity has no culture.
    #[must_use]
    pub fn is_culture_neutral(&self) -> bool {
        self.culture.is_none()
    }

    /// Returns `true` if this identity can stand in for `required`.
    ///
    /// Names compare case-insensitively, cultures exactly, and versions via
    /// [`AssemblyVersion::is_compatible_with`].
    #[must_use]
    pub fn satisfies(&self, required: &AssemblyIdentity) -> bool {
        self.name.eq_ignore_ascii_case(&required.name)
            && self.culture == required.culture
            && self.version.is_compatible_with(&required.version)
    }
}

impl AssemblyVersion {
    /// The all-zero version, used when a reference does not pin a version.
    pub const UNKNOWN: Self = Self::new(0, 0, 0, 0);

    /// Creates a version from its four components.
    #[must_use]
    pub const fn new(major: u16, minor: u16, build: u16, revision: u16) -> Self {
        Self {
            major,
            minor,
            build,
            revision,
        }
    }

    /// Returns `true` for [`AssemblyVersion::UNKNOWN`].
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        self.major == 0 && self.minor == 0 && self.build == 0 && self.revision == 0
    }

    /// Returns `true` if this version satisfies a reference to `required`.
    ///
    /// An unknown requirement accepts anything; otherwise majors must match and this
    /// version must not be older.
    #[must_use]
    pub fn is_compatible_with(&self, required: &AssemblyVersion) -> bool {
        if required.is_unknown() {
            return true;
        }

        self.major == required.major && *self >= *required
    }

    /// Parses `major[.minor[.build[.revision]]]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAssemblyName`] for more than four components or a component
    /// that is not a 16-bit unsigned integer.
    pub fn parse(version_str: &str) -> Result<Self> {
        let parts: Vec<&str> = version_str.split('.').collect();
        if parts.len() > 4 {
            return Err(Error::InvalidAssemblyName(format!(
                "invalid version format '{version_str}'"
            )));
        }

        let mut components = [0u16; 4];
        for (i, part) in parts.iter().enumerate() {
            components[i] = part.parse::<u16>().map_err(|_| {
                Error::InvalidAssemblyName(format!("invalid version component '{part}'"))
            })?;
        }

        Ok(Self::new(
            components[0],
            components[1],
            components[2],
            components[3],
        ))
    }
}

impl fmt::Display for AssemblyVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.build, self.revision
        )
    }
}

impl fmt::Display for AssemblyIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for AssemblyVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl FromStr for AssemblyIdentity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_display_name() {
        let identity = AssemblyIdentity::parse(
            "System.Core, Version=3.5.0.0, Culture=neutral, PublicKeyToken=B77A5C561934E089",
        )
        .unwrap();

        assert_eq!(identity.name, "System.Core");
        assert_eq!(identity.version, AssemblyVersion::new(3, 5, 0, 0));
        assert!(identity.is_culture_neutral());
        assert_eq!(
            identity.public_key_token.as_deref(),
            Some("b77a5c561934e089")
        );
    }

    #[test]
    fn test_display_name_round_trip() {
        let identity = AssemblyIdentity::new("Lib", AssemblyVersion::new(1, 2, 3, 4))
            .with_culture("de-DE");
        let text = identity.display_name();
        assert_eq!(
            text,
            "Lib, Version=1.2.3.4, Culture=de-DE, PublicKeyToken=null"
        );
        assert_eq!(AssemblyIdentity::parse(&text).unwrap(), identity);
    }

    #[test]
    fn test_parse_errors() {
        assert!(AssemblyIdentity::parse("").is_err());
        assert!(AssemblyIdentity::parse("A, Version=1.2.3.4.5").is_err());
        assert!(AssemblyIdentity::parse("A, Version=1.x").is_err());
        assert!(AssemblyIdentity::parse("A, PublicKeyToken=abc").is_err());
    }

    #[test]
    fn test_version_compatibility() {
        let v4 = AssemblyVersion::new(4, 0, 0, 0);
        let v45 = AssemblyVersion::new(4, 5, 0, 0);
        let v2 = AssemblyVersion::new(2, 0, 0, 0);

        assert!(v45.is_compatible_with(&v4));
        assert!(!v4.is_compatible_with(&v45));
        assert!(!v2.is_compatible_with(&v4));
        assert!(v2.is_compatible_with(&AssemblyVersion::UNKNOWN));
    }

    #[test]
    fn test_satisfies() {
        let available = AssemblyIdentity::new("lib", AssemblyVersion::new(1, 1, 0, 0));
        let required = AssemblyIdentity::new("Lib", AssemblyVersion::new(1, 0, 0, 0));
        assert!(available.satisfies(&required));
        assert!(!available.satisfies(&required.clone().with_culture("fr")));
    }
}
