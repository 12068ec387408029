//! FleetFlow Compute
//!
//! Provider-agnostic template options for provisioning groups of compute
//! nodes, and the seams provider crates plug into.
//!
//! # Providers
//!
//! - **SoftLayer**: domain-name-bearing options (`fleetflow-compute-softlayer`)
//! - **AWS EC2**: EC2 and AWS-EC2 options, cloud-init defaults (`fleetflow-compute-aws`)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │               fleetflow-compute                  │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │  TemplateOptions<V: Variant>              │   │
//! │  │  base fields + provider variant fields    │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────────────┐     │
//! │  │   Template   │  │  trait ComputeModule │     │
//! │  └──────────────┘  └──────────────────────┘     │
//! └───────┬─────────────────┬───────────────────────┘
//!         │                 │
//! ┌───────▼───────┐ ┌───────▼───────┐
//! │   softlayer   │ │    aws-ec2    │
//! │    variant    │ │   variants    │
//! └───────────────┘ └───────────────┘
//! ```
//!
//! Options are plain owned values. Build them on one thread, then hand them
//! off read-only; use `clone()` to fork an independently mutable copy.

mod defaults;
pub mod domain;
pub mod error;
pub mod module;
pub mod options;
pub mod payload;
pub mod template;
pub mod variant;

// Re-exports
pub use domain::{has_public_suffix, validate_domain_name};
pub use error::{ComputeError, Result};
pub use module::ComputeModule;
pub use options::{BlockOnPort, TemplateOptions, builder};
pub use payload::Payload;
pub use template::{OsFamily, Template, TemplateBuilder};
pub use variant::{Portable, Variant};
