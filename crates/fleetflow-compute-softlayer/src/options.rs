//! SoftLayer template options
//!
//! SoftLayer orders every virtual guest under a DNS domain, so its options
//! carry a domain name on top of the portable fields. The domain must end
//! in a public suffix.
//!
//! ```ignore
//! use fleetflow_compute_softlayer::{SoftLayerTemplateOptions, SoftLayerTemplateOptionsExt, builder};
//!
//! let mut options = builder::domain_name("example.com")?;
//! options.inbound_ports([22, 80, 8080, 443]).with_metadata();
//! ```

use fleetflow_compute::{ComputeError, Result, TemplateOptions, Variant, validate_domain_name};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Domain used when none is configured
pub const DEFAULT_DOMAIN_NAME: &str = "fleetflow.dev";

/// Extra fields understood by SoftLayer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSoftLayer")]
pub struct SoftLayer {
    domain_name: Cow<'static, str>,
}

#[derive(Deserialize)]
struct RawSoftLayer {
    domain_name: String,
}

impl TryFrom<RawSoftLayer> for SoftLayer {
    type Error = ComputeError;

    fn try_from(raw: RawSoftLayer) -> Result<Self> {
        let mut softlayer = Self::DEFAULT;
        softlayer.domain_name(&raw.domain_name)?;
        Ok(softlayer)
    }
}

impl Variant for SoftLayer {
    const NAME: &'static str = "softlayer";
    const DEFAULT: Self = SoftLayer {
        domain_name: Cow::Borrowed(DEFAULT_DOMAIN_NAME),
    };
}

impl Default for SoftLayer {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl SoftLayer {
    /// Replace the domain used when ordering virtual guests
    pub fn domain_name(&mut self, domain_name: &str) -> Result<&mut Self> {
        if domain_name.is_empty() {
            return Err(ComputeError::invalid_argument("domainName was empty"));
        }
        validate_domain_name(domain_name)?;
        self.domain_name = Cow::Owned(domain_name.to_string());
        tracing::debug!(domain = %domain_name, "Set SoftLayer domain");
        Ok(self)
    }

    pub fn get_domain_name(&self) -> &str {
        &self.domain_name
    }
}

pub type SoftLayerTemplateOptions = TemplateOptions<SoftLayer>;

/// SoftLayer mutators on the options object itself, so chains keep their type
pub trait SoftLayerTemplateOptionsExt {
    fn domain_name(&mut self, domain_name: &str) -> Result<&mut Self>;

    fn get_domain_name(&self) -> &str;
}

impl SoftLayerTemplateOptionsExt for SoftLayerTemplateOptions {
    fn domain_name(&mut self, domain_name: &str) -> Result<&mut Self> {
        self.extension_mut().domain_name(domain_name)?;
        Ok(self)
    }

    fn get_domain_name(&self) -> &str {
        self.extension().get_domain_name()
    }
}

/// One-call constructors for SoftLayer options
///
/// The portable shortcuts from [`fleetflow_compute::builder`] are re-exported
/// here; they yield SoftLayer options when the target type says so.
pub mod builder {
    use super::*;

    pub use fleetflow_compute::builder::{
        authorize_public_key, block_on_port, inbound_ports, install_private_key, run_script,
        with_metadata,
    };

    pub fn domain_name(domain_name: &str) -> Result<SoftLayerTemplateOptions> {
        let mut options = SoftLayerTemplateOptions::new();
        options.domain_name(domain_name)?;
        Ok(options)
    }
}
