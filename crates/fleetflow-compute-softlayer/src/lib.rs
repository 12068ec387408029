//! SoftLayer provider for FleetFlow Compute
//!
//! Template options for SoftLayer virtual guests: the portable options plus
//! the DNS domain guests are ordered under.
//!
//! # Example
//!
//! ```ignore
//! use fleetflow_compute::ComputeModule;
//! use fleetflow_compute_softlayer::{SoftLayerComputeModule, SoftLayerTemplateOptionsExt};
//!
//! let module = SoftLayerComputeModule::from_config(&fleetflow_config::load_compute_config()?);
//! let mut options = module.template_options()?;
//! options.domain_name("example.com")?.inbound_ports([22, 443]);
//! ```

pub mod module;
pub mod options;

pub use module::SoftLayerComputeModule;
pub use options::{
    DEFAULT_DOMAIN_NAME, SoftLayer, SoftLayerTemplateOptions, SoftLayerTemplateOptionsExt, builder,
};
