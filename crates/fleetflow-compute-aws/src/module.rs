//! AWS EC2 provider wiring

use crate::aws_ec2::{AwsEc2, AwsEc2TemplateOptions};
use crate::ec2::Ec2;
use fleetflow_compute::{ComputeModule, OsFamily, Result, TemplateBuilder};
use fleetflow_config::{ComputeConfig, ProviderDefaults};

pub const PROVIDER_NAME: &str = "aws-ec2";

/// User data attached to every request unless configured otherwise.
///
/// With Amazon Linux, sshd only starts after package upgrades finish, which
/// slows boot enough to exhaust ssh retries.
pub const DEFAULT_USER_DATA: &str = "#cloud-config\nrepo_upgrade: none\n";

/// AWS EC2 compute module
#[derive(Debug, Clone, Default)]
pub struct AwsEc2ComputeModule {
    defaults: ProviderDefaults,
}

impl AwsEc2ComputeModule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Module using the `aws-ec2` section of the compute configuration
    pub fn from_config(config: &ComputeConfig) -> Self {
        Self {
            defaults: config.for_provider(PROVIDER_NAME),
        }
    }
}

impl ComputeModule for AwsEc2ComputeModule {
    type Variant = AwsEc2;

    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn display_name(&self) -> &str {
        "Amazon EC2"
    }

    fn provide_template(
        &self,
        template: TemplateBuilder<AwsEc2>,
    ) -> Result<TemplateBuilder<AwsEc2>> {
        Ok(template.os_family(OsFamily::AmznLinux).os_64bit(true))
    }

    fn provide_template_options(&self, options: &mut AwsEc2TemplateOptions) -> Result<()> {
        options.apply_defaults(&self.defaults)?;

        let user_data = self
            .defaults
            .user_data
            .as_deref()
            .unwrap_or(DEFAULT_USER_DATA);
        options.cast_mut::<Ec2>()?.user_data(user_data)?;
        tracing::debug!(
            bytes = user_data.len(),
            "Attached default user data to {} options",
            PROVIDER_NAME
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ec2::Ec2Fields;

    #[test]
    fn test_default_template() {
        let template = AwsEc2ComputeModule::new().template_builder().unwrap().build();
        assert_eq!(template.os_family, Some(OsFamily::AmznLinux));
        assert_eq!(template.os_64bit, Some(true));

        let user_data = template.options.extension().ec2().get_user_data().unwrap();
        assert_eq!(user_data.as_utf8(), Some(DEFAULT_USER_DATA));
    }

    #[test]
    fn test_configured_user_data() {
        let mut config = ComputeConfig::default();
        config.providers.insert(
            PROVIDER_NAME.to_string(),
            ProviderDefaults {
                user_data: Some("#cloud-config\npackages: [git]\n".to_string()),
                inbound_ports: vec![22, 443],
                ..Default::default()
            },
        );

        let options = AwsEc2ComputeModule::from_config(&config)
            .template_options()
            .unwrap();
        assert_eq!(
            options
                .as_variant::<Ec2>()
                .and_then(|e| e.get_user_data())
                .and_then(|p| p.as_utf8()),
            Some("#cloud-config\npackages: [git]\n")
        );
        assert_eq!(options.get_inbound_ports(), &[22, 443]);
    }

    #[test]
    fn test_names() {
        let module = AwsEc2ComputeModule::new();
        assert_eq!(module.name(), "aws-ec2");
        assert_eq!(module.display_name(), "Amazon EC2");
    }
}
