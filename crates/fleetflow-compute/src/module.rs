//! Provider wiring
//!
//! Each provider crate ships a [`ComputeModule`] that fixes its option
//! variant and layers provider defaults onto every template and options
//! object handed out to callers.

use crate::error::Result;
use crate::options::TemplateOptions;
use crate::template::TemplateBuilder;
use crate::variant::Variant;

/// Provider-specific defaults for templates and template options
pub trait ComputeModule: Send + Sync {
    /// Option variant understood by this provider
    type Variant: Variant;

    /// Returns the provider name (e.g., "aws-ec2", "softlayer")
    fn name(&self) -> &str;

    /// Returns the provider display name for UI
    fn display_name(&self) -> &str;

    /// Apply provider defaults to a template builder
    fn provide_template(
        &self,
        template: TemplateBuilder<Self::Variant>,
    ) -> Result<TemplateBuilder<Self::Variant>> {
        Ok(template)
    }

    /// Apply provider defaults to a fresh options object
    fn provide_template_options(
        &self,
        _options: &mut TemplateOptions<Self::Variant>,
    ) -> Result<()> {
        Ok(())
    }

    /// Options with this provider's defaults applied
    fn template_options(&self) -> Result<TemplateOptions<Self::Variant>> {
        let mut options = TemplateOptions::<Self::Variant>::NONE;
        self.provide_template_options(&mut options)?;
        tracing::debug!(provider = self.name(), "Provided template options");
        Ok(options)
    }

    /// Template builder with this provider's defaults applied
    fn template_builder(&self) -> Result<TemplateBuilder<Self::Variant>> {
        let options = self.template_options()?;
        let template = self.provide_template(TemplateBuilder::new())?;
        Ok(template.options(&options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::OsFamily;
    use crate::variant::Portable;

    struct StubModule;

    impl ComputeModule for StubModule {
        type Variant = Portable;

        fn name(&self) -> &str {
            "stub"
        }

        fn display_name(&self) -> &str {
            "Stub"
        }

        fn provide_template(
            &self,
            template: TemplateBuilder<Portable>,
        ) -> Result<TemplateBuilder<Portable>> {
            Ok(template.os_family(OsFamily::Debian))
        }

        fn provide_template_options(&self, options: &mut TemplateOptions<Portable>) -> Result<()> {
            options.inbound_ports([22]).block_on_port(22, 300)?;
            Ok(())
        }
    }

    #[test]
    fn test_module_defaults() {
        let module = StubModule;
        let options = module.template_options().unwrap();
        assert_eq!(options.get_inbound_ports(), &[22]);

        let template = module.template_builder().unwrap().build();
        assert_eq!(template.os_family, Some(OsFamily::Debian));
        assert_eq!(
            template.options.get_block_on_port().map(|b| b.timeout_secs),
            Some(300)
        );
    }
}
