//! Template requirements handed to the provisioning workflow

use crate::error::{ComputeError, Result};
use crate::options::TemplateOptions;
use crate::variant::{Portable, Variant};
use serde::{Deserialize, Serialize};

/// Operating system family of the image to boot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OsFamily {
    AmznLinux,
    Ubuntu,
    Debian,
    Centos,
    Rhel,
    Windows,
}

impl std::fmt::Display for OsFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OsFamily::AmznLinux => write!(f, "amzn-linux"),
            OsFamily::Ubuntu => write!(f, "ubuntu"),
            OsFamily::Debian => write!(f, "debian"),
            OsFamily::Centos => write!(f, "centos"),
            OsFamily::Rhel => write!(f, "rhel"),
            OsFamily::Windows => write!(f, "windows"),
        }
    }
}

/// Resolved requirements for a provisioning request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template<V: Variant = Portable> {
    pub image_id: Option<String>,
    pub location_id: Option<String>,
    pub os_family: Option<OsFamily>,
    pub os_64bit: Option<bool>,
    pub min_ram_mb: Option<u32>,
    pub min_cores: Option<f64>,
    pub options: TemplateOptions<V>,
}

/// Accumulates template requirements
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateBuilder<V: Variant = Portable> {
    image_id: Option<String>,
    location_id: Option<String>,
    os_family: Option<OsFamily>,
    os_64bit: Option<bool>,
    min_ram_mb: Option<u32>,
    min_cores: Option<f64>,
    options: TemplateOptions<V>,
}

impl<V: Variant> Default for TemplateBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Variant> TemplateBuilder<V> {
    pub fn new() -> Self {
        Self {
            image_id: None,
            location_id: None,
            os_family: None,
            os_64bit: None,
            min_ram_mb: None,
            min_cores: None,
            options: TemplateOptions::<V>::NONE,
        }
    }

    /// Boot a specific image (e.g. "us-east-1/ami-44d02f2d")
    pub fn image_id(mut self, image_id: impl Into<String>) -> Result<Self> {
        self.image_id = Some(non_empty(image_id.into(), "image id")?);
        Ok(self)
    }

    /// Region or zone to provision in
    pub fn location_id(mut self, location_id: impl Into<String>) -> Result<Self> {
        self.location_id = Some(non_empty(location_id.into(), "location id")?);
        Ok(self)
    }

    pub fn os_family(mut self, os_family: OsFamily) -> Self {
        self.os_family = Some(os_family);
        self
    }

    pub fn os_64bit(mut self, is_64bit: bool) -> Self {
        self.os_64bit = Some(is_64bit);
        self
    }

    pub fn min_ram(mut self, megabytes: u32) -> Result<Self> {
        if megabytes == 0 {
            return Err(ComputeError::invalid_argument("min ram must be positive"));
        }
        self.min_ram_mb = Some(megabytes);
        Ok(self)
    }

    pub fn min_cores(mut self, cores: f64) -> Result<Self> {
        if !cores.is_finite() || cores <= 0.0 {
            return Err(ComputeError::invalid_argument(format!(
                "min cores must be positive, was {}",
                cores
            )));
        }
        self.min_cores = Some(cores);
        Ok(self)
    }

    /// Layer `options` onto the options already held by this builder
    pub fn options<W: Variant>(mut self, options: &TemplateOptions<W>) -> Self {
        options.copy_to(&mut self.options);
        self
    }

    pub fn get_options(&self) -> &TemplateOptions<V> {
        &self.options
    }

    pub fn get_options_mut(&mut self) -> &mut TemplateOptions<V> {
        &mut self.options
    }

    pub fn build(self) -> Template<V> {
        tracing::debug!(
            provider = V::NAME,
            image = ?self.image_id,
            location = ?self.location_id,
            "Built template"
        );
        Template {
            image_id: self.image_id,
            location_id: self.location_id,
            os_family: self.os_family,
            os_64bit: self.os_64bit,
            min_ram_mb: self.min_ram_mb,
            min_cores: self.min_cores,
            options: self.options,
        }
    }
}

fn non_empty(value: String, what: &str) -> Result<String> {
    if value.trim().is_empty() {
        return Err(ComputeError::invalid_argument(format!("{} was empty", what)));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_builder_is_valid() {
        let template = TemplateBuilder::<Portable>::new().build();
        assert!(template.image_id.is_none());
        assert_eq!(template.options, TemplateOptions::NONE);
    }

    #[test]
    fn test_builder_validation() {
        assert!(TemplateBuilder::<Portable>::new().image_id("").is_err());
        assert!(TemplateBuilder::<Portable>::new().location_id(" ").is_err());
        assert!(TemplateBuilder::<Portable>::new().min_ram(0).is_err());
        assert!(TemplateBuilder::<Portable>::new().min_cores(-1.0).is_err());
        assert!(TemplateBuilder::<Portable>::new().min_cores(f64::NAN).is_err());
    }

    #[test]
    fn test_builder_layers_options() {
        let mut requested = TemplateOptions::<Portable>::new();
        requested.inbound_ports([22]).with_metadata();

        let template = TemplateBuilder::<Portable>::new()
            .location_id("us-west-2")
            .unwrap()
            .os_family(OsFamily::Ubuntu)
            .os_64bit(true)
            .options(&requested)
            .build();

        assert_eq!(template.location_id.as_deref(), Some("us-west-2"));
        assert_eq!(template.os_family, Some(OsFamily::Ubuntu));
        assert_eq!(template.options.get_inbound_ports(), &[22]);
        assert!(template.options.include_metadata());
    }

    #[test]
    fn test_os_family_display() {
        assert_eq!(OsFamily::AmznLinux.to_string(), "amzn-linux");
        assert_eq!(
            serde_json::to_string(&OsFamily::AmznLinux).unwrap(),
            "\"amzn_linux\""
        );
    }
}
