//! EC2 template options
//!
//! Fields understood by any EC2-compatible API: security groups, the key
//! pair to boot with, and raw user data.

use fleetflow_compute::{ComputeError, Payload, Result, TemplateOptions, Variant};
use serde::{Deserialize, Serialize};

/// EC2 rejects user data above 16 KiB (before base64 encoding)
pub const MAX_USER_DATA_BYTES: usize = 16 * 1024;

/// Extra fields understood by EC2
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawEc2")]
pub struct Ec2 {
    security_groups: Vec<String>,
    key_pair: Option<String>,
    no_key_pair: bool,
    user_data: Option<Payload>,
}

#[derive(Deserialize)]
struct RawEc2 {
    security_groups: Vec<String>,
    key_pair: Option<String>,
    no_key_pair: bool,
    user_data: Option<Payload>,
}

impl TryFrom<RawEc2> for Ec2 {
    type Error = ComputeError;

    fn try_from(raw: RawEc2) -> Result<Self> {
        let mut ec2 = Self::DEFAULT;
        if !raw.security_groups.is_empty() {
            ec2.security_groups(raw.security_groups)?;
        }
        if let Some(key_pair) = raw.key_pair {
            ec2.key_pair(&key_pair)?;
        }
        if raw.no_key_pair {
            ec2.no_key_pair()?;
        }
        if let Some(user_data) = raw.user_data {
            ec2.user_data(user_data)?;
        }
        Ok(ec2)
    }
}

impl Variant for Ec2 {
    const NAME: &'static str = "ec2";
    const DEFAULT: Self = Ec2 {
        security_groups: Vec::new(),
        key_pair: None,
        no_key_pair: false,
        user_data: None,
    };

    fn copy_to<W: Variant>(&self, target: &mut W) {
        let Some(target) = target.view_mut::<Ec2>() else {
            return;
        };
        if !self.security_groups.is_empty() {
            target.security_groups = self.security_groups.clone();
        }
        if let Some(key_pair) = &self.key_pair {
            target.key_pair = Some(key_pair.clone());
            target.no_key_pair = false;
        }
        if self.no_key_pair {
            target.key_pair = None;
            target.no_key_pair = true;
        }
        if self.user_data.is_some() {
            target.user_data = self.user_data.clone();
        }
    }
}

impl Ec2 {
    /// Security group names to launch into, in addition to the generated group
    pub fn security_groups<S: Into<String>>(
        &mut self,
        groups: impl IntoIterator<Item = S>,
    ) -> Result<&mut Self> {
        self.security_groups = non_empty_names(groups, "security group")?;
        Ok(self)
    }

    /// Existing key pair to boot with
    pub fn key_pair(&mut self, key_pair: &str) -> Result<&mut Self> {
        if key_pair.is_empty() {
            return Err(ComputeError::invalid_argument(
                "key pair was empty; use no_key_pair to boot without one",
            ));
        }
        if self.no_key_pair {
            return Err(ComputeError::invalid_argument(
                "you cannot specify both key_pair and no_key_pair",
            ));
        }
        self.key_pair = Some(key_pair.to_string());
        Ok(self)
    }

    /// Boot without any key pair
    pub fn no_key_pair(&mut self) -> Result<&mut Self> {
        if self.key_pair.is_some() {
            return Err(ComputeError::invalid_argument(
                "you cannot specify both key_pair and no_key_pair",
            ));
        }
        self.no_key_pair = true;
        Ok(self)
    }

    /// Unencoded user data passed to the instance (e.g. a cloud-init document)
    pub fn user_data(&mut self, user_data: impl Into<Payload>) -> Result<&mut Self> {
        let user_data = user_data.into();
        if user_data.is_empty() {
            return Err(ComputeError::invalid_argument("user data was empty"));
        }
        if user_data.len() > MAX_USER_DATA_BYTES {
            return Err(ComputeError::invalid_argument(format!(
                "user data cannot be larger than 16kb, was {} bytes",
                user_data.len()
            )));
        }
        self.user_data = Some(user_data);
        Ok(self)
    }

    pub fn get_security_groups(&self) -> &[String] {
        &self.security_groups
    }

    pub fn get_key_pair(&self) -> Option<&str> {
        self.key_pair.as_deref()
    }

    pub fn should_generate_key_pair(&self) -> bool {
        self.key_pair.is_none() && !self.no_key_pair
    }

    pub fn is_no_key_pair(&self) -> bool {
        self.no_key_pair
    }

    pub fn get_user_data(&self) -> Option<&Payload> {
        self.user_data.as_ref()
    }
}

pub(crate) fn non_empty_names<S: Into<String>>(
    names: impl IntoIterator<Item = S>,
    what: &str,
) -> Result<Vec<String>> {
    let mut unique: Vec<String> = Vec::new();
    for name in names {
        let name = name.into();
        if name.is_empty() {
            return Err(ComputeError::invalid_argument(format!("{} was empty", what)));
        }
        if !unique.contains(&name) {
            unique.push(name);
        }
    }
    if unique.is_empty() {
        return Err(ComputeError::invalid_argument(format!(
            "you must specify at least one {}",
            what
        )));
    }
    Ok(unique)
}

/// Variants that carry EC2 fields
pub trait Ec2Fields: Variant {
    fn ec2(&self) -> &Ec2;

    fn ec2_mut(&mut self) -> &mut Ec2;
}

impl Ec2Fields for Ec2 {
    fn ec2(&self) -> &Ec2 {
        self
    }

    fn ec2_mut(&mut self) -> &mut Ec2 {
        self
    }
}

pub type Ec2TemplateOptions = TemplateOptions<Ec2>;

/// EC2 mutators on the options object itself, so chains keep their type
pub trait Ec2TemplateOptionsExt {
    fn security_groups<S: Into<String>>(
        &mut self,
        groups: impl IntoIterator<Item = S>,
    ) -> Result<&mut Self>;

    fn key_pair(&mut self, key_pair: &str) -> Result<&mut Self>;

    fn no_key_pair(&mut self) -> Result<&mut Self>;

    fn user_data(&mut self, user_data: impl Into<Payload>) -> Result<&mut Self>;
}

impl<V: Ec2Fields> Ec2TemplateOptionsExt for TemplateOptions<V> {
    fn security_groups<S: Into<String>>(
        &mut self,
        groups: impl IntoIterator<Item = S>,
    ) -> Result<&mut Self> {
        self.extension_mut().ec2_mut().security_groups(groups)?;
        Ok(self)
    }

    fn key_pair(&mut self, key_pair: &str) -> Result<&mut Self> {
        self.extension_mut().ec2_mut().key_pair(key_pair)?;
        Ok(self)
    }

    fn no_key_pair(&mut self) -> Result<&mut Self> {
        self.extension_mut().ec2_mut().no_key_pair()?;
        Ok(self)
    }

    fn user_data(&mut self, user_data: impl Into<Payload>) -> Result<&mut Self> {
        self.extension_mut().ec2_mut().user_data(user_data)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetflow_compute::Portable;

    #[test]
    fn test_deserialize_validates_fields() {
        let ec2: Ec2 = serde_json::from_value(serde_json::json!({
            "security_groups": ["ssh", "ssh", "web"],
            "key_pair": "deploy",
            "no_key_pair": false,
            "user_data": "I2Nsb3VkLWNvbmZpZwo="
        }))
        .unwrap();
        assert_eq!(ec2.get_security_groups(), &["ssh", "web"]);
        assert_eq!(ec2.get_key_pair(), Some("deploy"));

        let conflicting = serde_json::json!({
            "security_groups": [],
            "key_pair": "deploy",
            "no_key_pair": true,
            "user_data": null
        });
        assert!(serde_json::from_value::<Ec2>(conflicting).is_err());

        let empty_group = serde_json::json!({
            "security_groups": [""],
            "key_pair": null,
            "no_key_pair": false,
            "user_data": null
        });
        assert!(serde_json::from_value::<Ec2>(empty_group).is_err());
    }

    #[test]
    fn test_key_pair_conflicts() {
        let mut ec2 = Ec2::default();
        ec2.key_pair("deploy").unwrap();
        assert!(ec2.no_key_pair().is_err());
        assert_eq!(ec2.get_key_pair(), Some("deploy"));
        assert!(!ec2.should_generate_key_pair());

        let mut ec2 = Ec2::default();
        ec2.no_key_pair().unwrap();
        assert!(ec2.key_pair("deploy").is_err());
        assert!(ec2.is_no_key_pair());
        assert!(ec2.key_pair("").is_err());
    }

    #[test]
    fn test_security_groups_validation() {
        let mut ec2 = Ec2::default();
        assert!(ec2.security_groups(Vec::<String>::new()).is_err());
        assert!(ec2.security_groups(["web", ""]).is_err());
        assert!(ec2.get_security_groups().is_empty());

        ec2.security_groups(["web", "ssh", "web"]).unwrap();
        assert_eq!(ec2.get_security_groups(), &["web", "ssh"]);
    }

    #[test]
    fn test_user_data_limit() {
        let mut ec2 = Ec2::default();
        assert!(ec2.user_data(vec![b'x'; MAX_USER_DATA_BYTES + 1]).is_err());
        assert!(ec2.user_data("").is_err());
        assert!(ec2.get_user_data().is_none());

        ec2.user_data(vec![b'x'; MAX_USER_DATA_BYTES]).unwrap();
        assert_eq!(ec2.get_user_data().map(|p| p.len()), Some(MAX_USER_DATA_BYTES));
    }

    #[test]
    fn test_copy_no_key_pair_clears_target_key() {
        let mut source = Ec2::default();
        source.no_key_pair().unwrap();
        let mut target = Ec2::default();
        target.key_pair("old").unwrap();

        source.copy_to(&mut target);
        assert!(target.is_no_key_pair());
        assert!(target.get_key_pair().is_none());
    }

    #[test]
    fn test_chained_ec2_options() {
        let mut options = Ec2TemplateOptions::new();
        options
            .inbound_ports([22])
            .key_pair("deploy")
            .unwrap()
            .security_groups(["ssh"])
            .unwrap()
            .user_data("#cloud-config\n")
            .unwrap()
            .with_metadata();

        assert_eq!(options.extension().get_key_pair(), Some("deploy"));
        assert_eq!(options.get_inbound_ports(), &[22]);

        let mut plain = TemplateOptions::<Portable>::new();
        options.copy_to(&mut plain);
        assert_eq!(plain.get_inbound_ports(), &[22]);
        assert!(plain.as_variant::<Ec2>().is_none());
    }
}
