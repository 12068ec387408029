//! AWS EC2 template options
//!
//! Amazon's EC2 supports more than the EC2-compatible baseline: detailed
//! monitoring, spot requests, VPC subnets, placement groups and security
//! groups referenced by id. These fields are layered on top of [`Ec2`], so
//! code that only knows about EC2 can still reach the EC2 part through
//! `options.cast_mut::<Ec2>()`.

use crate::ec2::{Ec2, Ec2Fields, non_empty_names};
use fleetflow_compute::{ComputeError, Result, TemplateOptions, Variant};
use serde::{Deserialize, Serialize};
use std::any::Any;

/// Extra fields understood by AWS EC2
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAwsEc2")]
pub struct AwsEc2 {
    ec2: Ec2,
    monitoring_enabled: bool,
    spot_price: Option<f32>,
    security_group_ids: Vec<String>,
    placement_group: Option<String>,
    no_placement_group: bool,
    subnet_id: Option<String>,
}

#[derive(Deserialize)]
struct RawAwsEc2 {
    ec2: Ec2,
    monitoring_enabled: bool,
    spot_price: Option<f32>,
    security_group_ids: Vec<String>,
    placement_group: Option<String>,
    no_placement_group: bool,
    subnet_id: Option<String>,
}

impl TryFrom<RawAwsEc2> for AwsEc2 {
    type Error = ComputeError;

    fn try_from(raw: RawAwsEc2) -> Result<Self> {
        let mut aws = Self {
            ec2: raw.ec2,
            ..Self::DEFAULT
        };
        if raw.monitoring_enabled {
            aws.enable_monitoring();
        }
        if let Some(spot_price) = raw.spot_price {
            aws.spot_price(spot_price)?;
        }
        if !raw.security_group_ids.is_empty() {
            aws.security_group_ids(raw.security_group_ids)?;
        }
        if let Some(placement_group) = raw.placement_group {
            aws.placement_group(&placement_group)?;
        }
        if raw.no_placement_group {
            aws.no_placement_group()?;
        }
        if let Some(subnet_id) = raw.subnet_id {
            aws.subnet_id(&subnet_id)?;
        }
        Ok(aws)
    }
}

impl Variant for AwsEc2 {
    const NAME: &'static str = "aws-ec2";
    const DEFAULT: Self = AwsEc2 {
        ec2: Ec2::DEFAULT,
        monitoring_enabled: false,
        spot_price: None,
        security_group_ids: Vec::new(),
        placement_group: None,
        no_placement_group: false,
        subnet_id: None,
    };

    fn view<T: Variant>(&self) -> Option<&T> {
        (self as &dyn Any)
            .downcast_ref::<T>()
            .or_else(|| self.ec2.view::<T>())
    }

    fn view_mut<T: Variant>(&mut self) -> Option<&mut T> {
        if (self as &dyn Any).is::<T>() {
            return (self as &mut dyn Any).downcast_mut::<T>();
        }
        self.ec2.view_mut::<T>()
    }

    fn copy_to<W: Variant>(&self, target: &mut W) {
        self.ec2.copy_to(target);

        let Some(target) = target.view_mut::<AwsEc2>() else {
            tracing::debug!("Target does not support {} fields, skipping", Self::NAME);
            return;
        };
        if self.monitoring_enabled {
            target.monitoring_enabled = true;
        }
        if self.spot_price.is_some() {
            target.spot_price = self.spot_price;
        }
        if !self.security_group_ids.is_empty() {
            target.security_group_ids = self.security_group_ids.clone();
        }
        if let Some(placement_group) = &self.placement_group {
            target.placement_group = Some(placement_group.clone());
            target.no_placement_group = false;
        }
        if self.no_placement_group {
            target.placement_group = None;
            target.no_placement_group = true;
        }
        if self.subnet_id.is_some() {
            target.subnet_id = self.subnet_id.clone();
        }
    }
}

impl Ec2Fields for AwsEc2 {
    fn ec2(&self) -> &Ec2 {
        &self.ec2
    }

    fn ec2_mut(&mut self) -> &mut Ec2 {
        &mut self.ec2
    }
}

impl AwsEc2 {
    /// Enable detailed CloudWatch monitoring
    pub fn enable_monitoring(&mut self) -> &mut Self {
        self.monitoring_enabled = true;
        self
    }

    /// Request spot instances, bidding at most `spot_price` per hour
    pub fn spot_price(&mut self, spot_price: f32) -> Result<&mut Self> {
        if !spot_price.is_finite() || spot_price <= 0.0 {
            return Err(ComputeError::invalid_argument(format!(
                "spot price must be positive, was {}",
                spot_price
            )));
        }
        self.spot_price = Some(spot_price);
        Ok(self)
    }

    /// Security group ids to launch into (VPC)
    pub fn security_group_ids<S: Into<String>>(
        &mut self,
        group_ids: impl IntoIterator<Item = S>,
    ) -> Result<&mut Self> {
        self.security_group_ids = non_empty_names(group_ids, "security group id")?;
        Ok(self)
    }

    /// Existing placement group for cluster compute instances
    pub fn placement_group(&mut self, placement_group: &str) -> Result<&mut Self> {
        if placement_group.is_empty() {
            return Err(ComputeError::invalid_argument("placement group was empty"));
        }
        if self.no_placement_group {
            return Err(ComputeError::invalid_argument(
                "you cannot specify both placement_group and no_placement_group",
            ));
        }
        self.placement_group = Some(placement_group.to_string());
        Ok(self)
    }

    /// Do not create or use a placement group
    pub fn no_placement_group(&mut self) -> Result<&mut Self> {
        if self.placement_group.is_some() {
            return Err(ComputeError::invalid_argument(
                "you cannot specify both placement_group and no_placement_group",
            ));
        }
        self.no_placement_group = true;
        Ok(self)
    }

    /// VPC subnet to launch into
    pub fn subnet_id(&mut self, subnet_id: &str) -> Result<&mut Self> {
        if subnet_id.is_empty() {
            return Err(ComputeError::invalid_argument("subnet id was empty"));
        }
        self.subnet_id = Some(subnet_id.to_string());
        Ok(self)
    }

    pub fn is_monitoring_enabled(&self) -> bool {
        self.monitoring_enabled
    }

    pub fn get_spot_price(&self) -> Option<f32> {
        self.spot_price
    }

    pub fn get_security_group_ids(&self) -> &[String] {
        &self.security_group_ids
    }

    pub fn get_placement_group(&self) -> Option<&str> {
        self.placement_group.as_deref()
    }

    pub fn is_no_placement_group(&self) -> bool {
        self.no_placement_group
    }

    pub fn get_subnet_id(&self) -> Option<&str> {
        self.subnet_id.as_deref()
    }
}

pub type AwsEc2TemplateOptions = TemplateOptions<AwsEc2>;

/// AWS EC2 mutators on the options object itself
pub trait AwsEc2TemplateOptionsExt {
    fn enable_monitoring(&mut self) -> &mut Self;

    fn spot_price(&mut self, spot_price: f32) -> Result<&mut Self>;

    fn security_group_ids<S: Into<String>>(
        &mut self,
        group_ids: impl IntoIterator<Item = S>,
    ) -> Result<&mut Self>;

    fn placement_group(&mut self, placement_group: &str) -> Result<&mut Self>;

    fn no_placement_group(&mut self) -> Result<&mut Self>;

    fn subnet_id(&mut self, subnet_id: &str) -> Result<&mut Self>;
}

impl AwsEc2TemplateOptionsExt for AwsEc2TemplateOptions {
    fn enable_monitoring(&mut self) -> &mut Self {
        self.extension_mut().enable_monitoring();
        self
    }

    fn spot_price(&mut self, spot_price: f32) -> Result<&mut Self> {
        self.extension_mut().spot_price(spot_price)?;
        Ok(self)
    }

    fn security_group_ids<S: Into<String>>(
        &mut self,
        group_ids: impl IntoIterator<Item = S>,
    ) -> Result<&mut Self> {
        self.extension_mut().security_group_ids(group_ids)?;
        Ok(self)
    }

    fn placement_group(&mut self, placement_group: &str) -> Result<&mut Self> {
        self.extension_mut().placement_group(placement_group)?;
        Ok(self)
    }

    fn no_placement_group(&mut self) -> Result<&mut Self> {
        self.extension_mut().no_placement_group()?;
        Ok(self)
    }

    fn subnet_id(&mut self, subnet_id: &str) -> Result<&mut Self> {
        self.extension_mut().subnet_id(subnet_id)?;
        Ok(self)
    }
}
