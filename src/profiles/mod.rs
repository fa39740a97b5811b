//! Named conditioning profiles and the registry that holds them.
//!
//! A [`Profile`] is a transform with a stable identifier, a display caption
//! and a [`Capability`] describing how it is called. The capability is fixed
//! when the profile is declared, so dispatch is a plain `match` with no
//! runtime signature inspection.
//!
//! | Capability | Receives | Returns |
//! |---|---|---|
//! | [`Capability::Simple`] | pixels | pixels (format inferred from the source) |
//! | [`Capability::WithFormat`] | pixels | pixels + explicit [`TargetFormat`] |
//! | [`Capability::Parameterized`] | pixels + extra data | pixels + optional [`TargetFormat`] |
//!
//! The registry is built once at startup ([`ProfileRegistry::builtin`]) and
//! only read afterwards. Registration rejects inconsistent declarations
//! (duplicate identifiers, a parameterized profile without a default extra
//! data string, ...) so they surface immediately instead of mid-batch.

mod builtin;

pub use builtin::builtin_profiles;

use crate::extra_data::FormatError;
use crate::imaging::{InterpolationMode, PixelBuffer, TargetFormat, TransformError};
use thiserror::Error;

/// Failure inside a profile function.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ProfileError {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Transform(#[from] TransformError),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Profile identifier cannot be empty")]
    EmptyIdentifier,
    #[error("Profile '{0}' is registered twice")]
    DuplicateIdentifier(String),
    #[error("Profile '{0}' takes extra data but declares no default")]
    MissingDefaultExtraData(String),
    #[error("Profile '{0}' takes no extra data but declares a default")]
    UnexpectedExtraData(String),
    #[error("Unknown profile '{0}'")]
    UnknownProfile(String),
}

pub type SimpleFn = fn(&PixelBuffer, InterpolationMode) -> Result<PixelBuffer, ProfileError>;
pub type WithFormatFn =
    fn(&PixelBuffer, InterpolationMode) -> Result<(PixelBuffer, TargetFormat), ProfileError>;
pub type ParameterizedFn = fn(
    &PixelBuffer,
    &str,
    InterpolationMode,
) -> Result<(PixelBuffer, Option<TargetFormat>), ProfileError>;

/// How a profile is invoked and what it hands back.
#[derive(Debug, Clone, Copy)]
pub enum Capability {
    Simple(SimpleFn),
    WithFormat(WithFormatFn),
    Parameterized(ParameterizedFn),
}

impl Capability {
    pub fn takes_extra_data(&self) -> bool {
        matches!(self, Capability::Parameterized(_))
    }

    /// Short lowercase name, used in logs and listings.
    pub fn kind(&self) -> &'static str {
        match self {
            Capability::Simple(_) => "simple",
            Capability::WithFormat(_) => "with-format",
            Capability::Parameterized(_) => "parameterized",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Profile {
    pub identifier: &'static str,
    pub caption: &'static str,
    /// Hidden profiles are left out of [`ProfileRegistry::list`] but can
    /// still be resolved by identifier.
    pub hidden: bool,
    pub default_extra_data: Option<&'static str>,
    pub interpolation: InterpolationMode,
    pub capability: Capability,
}

impl Profile {
    fn new(identifier: &'static str, caption: &'static str, capability: Capability) -> Self {
        Self {
            identifier,
            caption,
            hidden: false,
            default_extra_data: None,
            interpolation: InterpolationMode::Default,
            capability,
        }
    }

    pub fn simple(identifier: &'static str, caption: &'static str, run: SimpleFn) -> Self {
        Self::new(identifier, caption, Capability::Simple(run))
    }

    pub fn with_format(
        identifier: &'static str,
        caption: &'static str,
        run: WithFormatFn,
    ) -> Self {
        Self::new(identifier, caption, Capability::WithFormat(run))
    }

    pub fn parameterized(
        identifier: &'static str,
        caption: &'static str,
        default_extra_data: &'static str,
        run: ParameterizedFn,
    ) -> Self {
        Self {
            default_extra_data: Some(default_extra_data),
            ..Self::new(identifier, caption, Capability::Parameterized(run))
        }
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn interpolation(mut self, mode: InterpolationMode) -> Self {
        self.interpolation = mode;
        self
    }

    fn validate(&self) -> Result<(), RegistryError> {
        if self.identifier.trim().is_empty() {
            return Err(RegistryError::EmptyIdentifier);
        }
        match (self.capability.takes_extra_data(), self.default_extra_data) {
            (true, None) => Err(RegistryError::MissingDefaultExtraData(
                self.identifier.to_string(),
            )),
            (false, Some(_)) => Err(RegistryError::UnexpectedExtraData(
                self.identifier.to_string(),
            )),
            _ => Ok(()),
        }
    }
}

/// Profiles in registration order.
#[derive(Debug, Clone, Default)]
pub struct ProfileRegistry {
    profiles: Vec<Profile>,
}

impl ProfileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in profile.
    pub fn builtin() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for profile in builtin_profiles() {
            registry.register(profile)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, profile: Profile) -> Result<(), RegistryError> {
        profile.validate()?;
        if self.resolve(profile.identifier).is_some() {
            return Err(RegistryError::DuplicateIdentifier(
                profile.identifier.to_string(),
            ));
        }
        self.profiles.push(profile);
        Ok(())
    }

    /// Visible profiles, in registration order.
    pub fn list(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.iter().filter(|p| !p.hidden)
    }

    /// Look up a profile by identifier, hidden ones included.
    pub fn resolve(&self, identifier: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.identifier == identifier)
    }

    pub fn get(&self, identifier: &str) -> Result<&Profile, RegistryError> {
        self.resolve(identifier)
            .ok_or_else(|| RegistryError::UnknownProfile(identifier.to_string()))
    }

    pub fn default_extra_data(&self, identifier: &str) -> Result<Option<&str>, RegistryError> {
        Ok(self.get(identifier)?.default_extra_data)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
