//! Configured defaults
//!
//! Applies the portable part of a [`ProviderDefaults`] block from the
//! compute configuration file. Provider-only keys (`domain_name`,
//! `user_data`) are applied by the provider modules.

use crate::error::{ComputeError, Result};
use crate::options::{BlockOnPort, TemplateOptions};
use crate::variant::Variant;
use fleetflow_config::ProviderDefaults;

impl<V: Variant> TemplateOptions<V> {
    /// Layer configured defaults onto these options
    pub fn apply_defaults(&mut self, defaults: &ProviderDefaults) -> Result<&mut Self> {
        if defaults.user_metadata.keys().any(|k| k.is_empty()) {
            return Err(ComputeError::InvalidConfig(
                "user_metadata contains an empty key".to_string(),
            ));
        }

        if !defaults.inbound_ports.is_empty() {
            self.inbound_ports(defaults.inbound_ports.iter().copied());
        }
        if let Some(wait) = defaults.block_on_port {
            self.set_block_on_port(BlockOnPort {
                port: wait.port,
                timeout_secs: wait.timeout_secs,
            });
        }
        for (key, value) in &defaults.user_metadata {
            self.user_metadata_entry(key.as_str(), value.as_str())?;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::Portable;
    use fleetflow_config::PortWait;
    use std::collections::BTreeMap;

    #[test]
    fn test_apply_defaults() {
        let defaults = ProviderDefaults {
            inbound_ports: vec![22, 80],
            block_on_port: Some(PortWait {
                port: 22,
                timeout_secs: 600,
            }),
            user_metadata: BTreeMap::from([("Team".to_string(), "infra".to_string())]),
            ..Default::default()
        };

        let mut options = TemplateOptions::<Portable>::new();
        options.apply_defaults(&defaults).unwrap();

        assert_eq!(options.get_inbound_ports(), &[22, 80]);
        assert_eq!(
            options.get_block_on_port().map(|b| b.timeout_secs),
            Some(600)
        );
        assert_eq!(options.get_user_metadata()["Team"], "infra");
    }

    #[test]
    fn test_apply_defaults_rejects_empty_key() {
        let defaults = ProviderDefaults {
            inbound_ports: vec![22],
            user_metadata: BTreeMap::from([(String::new(), "x".to_string())]),
            ..Default::default()
        };

        let mut options = TemplateOptions::<Portable>::new();
        let err = options.apply_defaults(&defaults).unwrap_err();
        assert!(matches!(err, ComputeError::InvalidConfig(_)));
        assert!(options.get_inbound_ports().is_empty());
    }
}
