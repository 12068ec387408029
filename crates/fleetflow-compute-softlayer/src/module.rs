//! SoftLayer provider wiring

use crate::options::{SoftLayer, SoftLayerTemplateOptions, SoftLayerTemplateOptionsExt};
use fleetflow_compute::{ComputeModule, Result};
use fleetflow_config::{ComputeConfig, ProviderDefaults};

pub const PROVIDER_NAME: &str = "softlayer";

/// SoftLayer compute module
#[derive(Debug, Clone, Default)]
pub struct SoftLayerComputeModule {
    defaults: ProviderDefaults,
}

impl SoftLayerComputeModule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Module using the `softlayer` section of the compute configuration
    pub fn from_config(config: &ComputeConfig) -> Self {
        Self {
            defaults: config.for_provider(PROVIDER_NAME),
        }
    }
}

impl ComputeModule for SoftLayerComputeModule {
    type Variant = SoftLayer;

    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn display_name(&self) -> &str {
        "SoftLayer"
    }

    fn provide_template_options(&self, options: &mut SoftLayerTemplateOptions) -> Result<()> {
        options.apply_defaults(&self.defaults)?;
        if let Some(domain_name) = &self.defaults.domain_name {
            options.domain_name(domain_name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::DEFAULT_DOMAIN_NAME;
    use fleetflow_compute::ComputeError;

    #[test]
    fn test_unconfigured_module_uses_placeholder_domain() {
        let options = SoftLayerComputeModule::new().template_options().unwrap();
        assert_eq!(options.get_domain_name(), DEFAULT_DOMAIN_NAME);
    }

    #[test]
    fn test_configured_domain() {
        let mut config = ComputeConfig::default();
        config.defaults.inbound_ports = vec![22];
        config.providers.insert(
            PROVIDER_NAME.to_string(),
            ProviderDefaults {
                domain_name: Some("example.com".to_string()),
                ..Default::default()
            },
        );

        let module = SoftLayerComputeModule::from_config(&config);
        let template = module.template_builder().unwrap().build();
        assert_eq!(template.options.get_domain_name(), "example.com");
        assert_eq!(template.options.get_inbound_ports(), &[22]);
    }

    #[test]
    fn test_configured_domain_without_suffix_fails() {
        let mut config = ComputeConfig::default();
        config.providers.insert(
            PROVIDER_NAME.to_string(),
            ProviderDefaults {
                domain_name: Some("intranet".to_string()),
                ..Default::default()
            },
        );

        let err = SoftLayerComputeModule::from_config(&config)
            .template_options()
            .unwrap_err();
        assert!(matches!(err, ComputeError::InvalidDomain(_)));
    }
}
