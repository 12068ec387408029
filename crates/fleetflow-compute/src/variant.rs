//! Provider option variants
//!
//! A variant is the set of extra fields a provider adds on top of the
//! portable [`TemplateOptions`](crate::TemplateOptions). Variants may be
//! layered: a variant that embeds another exposes it through [`Variant::view`],
//! so code asking for the inner variant still finds it.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;

/// Provider-specific extension of the template options
pub trait Variant: Any + Clone + fmt::Debug + PartialEq + Send + Sync {
    /// Short name used in logs and error messages (e.g. "softlayer")
    const NAME: &'static str;

    /// Field values of a freshly created options object
    const DEFAULT: Self;

    /// Returns the fields of variant `T` if this variant carries them
    fn view<T: Variant>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }

    /// Mutable counterpart of [`Variant::view`]
    fn view_mut<T: Variant>(&mut self) -> Option<&mut T> {
        (self as &mut dyn Any).downcast_mut::<T>()
    }

    /// Applies this variant's fields to `target` where the target supports them.
    ///
    /// Targets that do not carry `Self` are left untouched.
    fn copy_to<W: Variant>(&self, target: &mut W) {
        if let Some(target) = target.view_mut::<Self>() {
            *target = self.clone();
        }
    }
}

/// The provider-agnostic variant: no extra fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portable;

impl Variant for Portable {
    const NAME: &'static str = "portable";
    const DEFAULT: Self = Portable;
}
