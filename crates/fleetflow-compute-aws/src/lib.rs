//! AWS EC2 provider for FleetFlow Compute
//!
//! This crate provides the EC2 option variant, the AWS EC2 variant layered
//! on top of it, and the wiring module that applies AWS defaults (Amazon
//! Linux 64-bit, cloud-init user data) to every request.
//!
//! # Example
//!
//! ```ignore
//! use fleetflow_compute::ComputeModule;
//! use fleetflow_compute_aws::{AwsEc2ComputeModule, AwsEc2TemplateOptionsExt, Ec2TemplateOptionsExt};
//!
//! let module = AwsEc2ComputeModule::new();
//! let mut options = module.template_options()?;
//! options
//!     .user_metadata_entry("Name", "web")?
//!     .enable_monitoring()
//!     .spot_price(0.3)?
//!     .key_pair("web")?;
//! let template = module.template_builder()?.location_id("us-west-2")?.options(&options).build();
//! ```

pub mod aws_ec2;
pub mod ec2;
pub mod module;

pub use aws_ec2::{AwsEc2, AwsEc2TemplateOptions, AwsEc2TemplateOptionsExt};
pub use ec2::{Ec2, Ec2Fields, Ec2TemplateOptions, Ec2TemplateOptionsExt, MAX_USER_DATA_BYTES};
pub use module::{AwsEc2ComputeModule, DEFAULT_USER_DATA};
