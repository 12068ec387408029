//! Template options
//!
//! Options describing how a batch of nodes should be provisioned: ports to
//! open, a port to wait on, a startup script, key material and user metadata.
//! Provider-specific fields live in the variant `V`.
//!
//! Every mutator validates its input before touching any field, so a failed
//! call leaves the options exactly as they were.
//!
//! ```ignore
//! use fleetflow_compute::{TemplateOptions, builder};
//!
//! let mut options: TemplateOptions = builder::inbound_ports([22, 80, 8080, 443]);
//! options.block_on_port(22, 300)?.run_script("apt-get update")?.with_metadata();
//! ```

use crate::error::{ComputeError, Result};
use crate::payload::Payload;
use crate::variant::{Portable, Variant};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Port the provisioning workflow waits on after boot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockOnPort {
    pub port: u16,
    pub timeout_secs: u32,
}

/// Options for provisioning a group of nodes
///
/// Deserialized options go through the same checks as the mutators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "RawTemplateOptions<V>",
    bound(deserialize = "V: Deserialize<'de>")
)]
pub struct TemplateOptions<V: Variant = Portable> {
    inbound_ports: Vec<u16>,
    block_on_port: Option<BlockOnPort>,
    run_script: Option<Payload>,
    login_private_key: Option<String>,
    authorized_public_key: Option<String>,
    user_metadata: BTreeMap<String, String>,
    include_metadata: bool,
    variant: V,
}

#[derive(Deserialize)]
struct RawTemplateOptions<V> {
    inbound_ports: Vec<u16>,
    block_on_port: Option<BlockOnPort>,
    run_script: Option<Payload>,
    login_private_key: Option<String>,
    authorized_public_key: Option<String>,
    user_metadata: BTreeMap<String, String>,
    include_metadata: bool,
    variant: V,
}

impl<V: Variant> TryFrom<RawTemplateOptions<V>> for TemplateOptions<V> {
    type Error = ComputeError;

    fn try_from(raw: RawTemplateOptions<V>) -> Result<Self> {
        let mut options = Self::with_variant(raw.variant);
        options
            .inbound_ports(raw.inbound_ports)
            .user_metadata(raw.user_metadata)?;
        if let Some(block) = raw.block_on_port {
            options.set_block_on_port(block);
        }
        if let Some(script) = raw.run_script {
            options.run_script(script)?;
        }
        if let Some(key) = raw.login_private_key {
            options.install_private_key(&key)?;
        }
        if let Some(key) = raw.authorized_public_key {
            options.authorize_public_key(&key)?;
        }
        if raw.include_metadata {
            options.with_metadata();
        }
        Ok(options)
    }
}

impl<V: Variant> TemplateOptions<V> {
    /// Options with every field at its default
    pub const NONE: Self = Self::with_variant(V::DEFAULT);

    pub const fn with_variant(variant: V) -> Self {
        Self {
            inbound_ports: Vec::new(),
            block_on_port: None,
            run_script: None,
            login_private_key: None,
            authorized_public_key: None,
            user_metadata: BTreeMap::new(),
            include_metadata: false,
            variant,
        }
    }

    pub fn new() -> Self {
        Self::NONE
    }

    /// Replace the ports opened on provisioned nodes
    ///
    /// Duplicates are dropped; the first occurrence keeps its position.
    pub fn inbound_ports(&mut self, ports: impl IntoIterator<Item = u16>) -> &mut Self {
        let mut unique = Vec::new();
        for port in ports {
            if !unique.contains(&port) {
                unique.push(port);
            }
        }
        self.inbound_ports = unique;
        self
    }

    /// Block provisioning until `port` is reachable or `seconds` elapse
    pub fn block_on_port(&mut self, port: i32, seconds: i32) -> Result<&mut Self> {
        let port = u16::try_from(port).map_err(|_| {
            ComputeError::invalid_argument(format!("port {} out of range 0-65535", port))
        })?;
        let timeout_secs = u32::try_from(seconds).map_err(|_| {
            ComputeError::invalid_argument(format!(
                "seconds must be non-negative, was {}",
                seconds
            ))
        })?;
        self.set_block_on_port(BlockOnPort { port, timeout_secs });
        Ok(self)
    }

    pub(crate) fn set_block_on_port(&mut self, block: BlockOnPort) {
        self.block_on_port = Some(block);
    }

    /// Script to run on first boot
    pub fn run_script(&mut self, script: impl Into<Payload>) -> Result<&mut Self> {
        let script = script.into();
        if script.is_empty() {
            return Err(ComputeError::invalid_argument("script was empty"));
        }
        self.run_script = Some(script);
        Ok(self)
    }

    #[deprecated(note = "use run_script, which accepts any payload")]
    pub fn run_script_bytes(&mut self, script: &[u8]) -> Result<&mut Self> {
        self.run_script(Payload::from(script))
    }

    /// Private key used to log in to the nodes
    pub fn install_private_key(&mut self, private_key: &str) -> Result<&mut Self> {
        self.login_private_key = Some(non_empty_key(private_key, "private key")?);
        Ok(self)
    }

    #[deprecated(note = "use install_private_key with the key text")]
    pub fn install_private_key_payload(&mut self, private_key: Payload) -> Result<&mut Self> {
        let key = payload_text(&private_key, "private key")?;
        self.install_private_key(key)
    }

    /// Public key authorized for login on the nodes
    pub fn authorize_public_key(&mut self, public_key: &str) -> Result<&mut Self> {
        self.authorized_public_key = Some(non_empty_key(public_key, "public key")?);
        Ok(self)
    }

    #[deprecated(note = "use authorize_public_key with the key text")]
    pub fn authorize_public_key_payload(&mut self, public_key: Payload) -> Result<&mut Self> {
        let key = payload_text(&public_key, "public key")?;
        self.authorize_public_key(key)
    }

    /// Replace the user metadata attached to the nodes
    pub fn user_metadata<K, W>(
        &mut self,
        metadata: impl IntoIterator<Item = (K, W)>,
    ) -> Result<&mut Self>
    where
        K: Into<String>,
        W: Into<String>,
    {
        let metadata: BTreeMap<String, String> = metadata
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        if metadata.keys().any(|k| k.is_empty()) {
            return Err(ComputeError::invalid_argument("metadata key was empty"));
        }
        self.user_metadata = metadata;
        Ok(self)
    }

    /// Add a single user metadata entry
    pub fn user_metadata_entry(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<&mut Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(ComputeError::invalid_argument("metadata key was empty"));
        }
        self.user_metadata.insert(key, value.into());
        Ok(self)
    }

    /// Fetch full metadata for the resulting nodes
    pub fn with_metadata(&mut self) -> &mut Self {
        self.include_metadata = true;
        self
    }

    pub fn get_inbound_ports(&self) -> &[u16] {
        &self.inbound_ports
    }

    pub fn get_block_on_port(&self) -> Option<BlockOnPort> {
        self.block_on_port
    }

    pub fn get_run_script(&self) -> Option<&Payload> {
        self.run_script.as_ref()
    }

    pub fn get_login_private_key(&self) -> Option<&str> {
        self.login_private_key.as_deref()
    }

    pub fn get_authorized_public_key(&self) -> Option<&str> {
        self.authorized_public_key.as_deref()
    }

    pub fn get_user_metadata(&self) -> &BTreeMap<String, String> {
        &self.user_metadata
    }

    pub fn include_metadata(&self) -> bool {
        self.include_metadata
    }

    /// This variant's extra fields
    pub fn extension(&self) -> &V {
        &self.variant
    }

    pub fn extension_mut(&mut self) -> &mut V {
        &mut self.variant
    }

    /// Provider view of these options, if the variant carries `T`
    pub fn as_variant<T: Variant>(&self) -> Option<&T> {
        self.variant.view::<T>()
    }

    pub fn as_variant_mut<T: Variant>(&mut self) -> Option<&mut T> {
        self.variant.view_mut::<T>()
    }

    /// Like [`as_variant`](Self::as_variant), for call sites that require `T`
    pub fn cast<T: Variant>(&self) -> Result<&T> {
        self.variant.view::<T>().ok_or(ComputeError::TypeMismatch {
            expected: T::NAME,
            found: V::NAME,
        })
    }

    pub fn cast_mut<T: Variant>(&mut self) -> Result<&mut T> {
        self.variant.view_mut::<T>().ok_or(ComputeError::TypeMismatch {
            expected: T::NAME,
            found: V::NAME,
        })
    }

    /// Copy these options onto `target`
    ///
    /// Base fields are applied first: values set here override the target,
    /// unset values leave the target alone, metadata entries are merged.
    /// Variant fields follow, for whichever of them the target supports.
    pub fn copy_to<W: Variant>(&self, target: &mut TemplateOptions<W>) {
        if !self.inbound_ports.is_empty() {
            target.inbound_ports = self.inbound_ports.clone();
        }
        if self.block_on_port.is_some() {
            target.block_on_port = self.block_on_port;
        }
        if self.run_script.is_some() {
            target.run_script = self.run_script.clone();
        }
        if self.login_private_key.is_some() {
            target.login_private_key = self.login_private_key.clone();
        }
        if self.authorized_public_key.is_some() {
            target.authorized_public_key = self.authorized_public_key.clone();
        }
        target.user_metadata.extend(
            self.user_metadata
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        if self.include_metadata {
            target.include_metadata = true;
        }

        self.variant.copy_to(&mut target.variant);
        tracing::debug!("Copied {} options onto {} options", V::NAME, W::NAME);
    }
}

impl<V: Variant> Default for TemplateOptions<V> {
    fn default() -> Self {
        Self::NONE
    }
}

fn non_empty_key(key: &str, what: &str) -> Result<String> {
    if key.trim().is_empty() {
        return Err(ComputeError::invalid_argument(format!("{} was empty", what)));
    }
    Ok(key.to_string())
}

fn payload_text<'a>(payload: &'a Payload, what: &str) -> Result<&'a str> {
    payload
        .as_utf8()
        .ok_or_else(|| ComputeError::invalid_argument(format!("{} is not valid UTF-8", what)))
}

/// One-call constructors: a default instance with a single option applied
pub mod builder {
    use super::*;

    pub fn inbound_ports<V: Variant>(ports: impl IntoIterator<Item = u16>) -> TemplateOptions<V> {
        let mut options = TemplateOptions::new();
        options.inbound_ports(ports);
        options
    }

    pub fn block_on_port<V: Variant>(port: i32, seconds: i32) -> Result<TemplateOptions<V>> {
        let mut options = TemplateOptions::new();
        options.block_on_port(port, seconds)?;
        Ok(options)
    }

    pub fn run_script<V: Variant>(script: impl Into<Payload>) -> Result<TemplateOptions<V>> {
        let mut options = TemplateOptions::new();
        options.run_script(script)?;
        Ok(options)
    }

    pub fn install_private_key<V: Variant>(private_key: &str) -> Result<TemplateOptions<V>> {
        let mut options = TemplateOptions::new();
        options.install_private_key(private_key)?;
        Ok(options)
    }

    pub fn authorize_public_key<V: Variant>(public_key: &str) -> Result<TemplateOptions<V>> {
        let mut options = TemplateOptions::new();
        options.authorize_public_key(public_key)?;
        Ok(options)
    }

    pub fn with_metadata<V: Variant>() -> TemplateOptions<V> {
        let mut options = TemplateOptions::new();
        options.with_metadata();
        options
    }
}
