pub mod error;

pub use error::*;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// 設定ファイルパスを直接指定する環境変数
pub const CONFIG_PATH_ENV: &str = "FLEETFLOW_COMPUTE_CONFIG";

/// コンピュート設定
///
/// ```yaml
/// defaults:
///   inbound_ports: [22]
/// providers:
///   softlayer:
///     domain_name: example.com
///   aws-ec2:
///     user_data: "#cloud-config\nrepo_upgrade: none\n"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComputeConfig {
    /// 全プロバイダー共通のデフォルト
    pub defaults: ProviderDefaults,

    /// プロバイダー名ごとのデフォルト（共通設定を上書き）
    pub providers: HashMap<String, ProviderDefaults>,
}

impl ComputeConfig {
    /// 共通設定にプロバイダー固有の設定を重ねた値を返す
    pub fn for_provider(&self, provider: &str) -> ProviderDefaults {
        let mut merged = self.defaults.clone();
        if let Some(overrides) = self.providers.get(provider) {
            merged.overlay(overrides);
        }
        merged
    }
}

/// テンプレートオプションのデフォルト値
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderDefaults {
    /// 開放するポート
    pub inbound_ports: Vec<u16>,

    /// 起動完了を待つポート
    pub block_on_port: Option<PortWait>,

    /// ノードに付与するメタデータ
    pub user_metadata: BTreeMap<String, String>,

    /// ドメイン名（softlayer）
    pub domain_name: Option<String>,

    /// cloud-init ユーザーデータ（aws-ec2）
    pub user_data: Option<String>,
}

impl ProviderDefaults {
    fn overlay(&mut self, other: &ProviderDefaults) {
        if !other.inbound_ports.is_empty() {
            self.inbound_ports = other.inbound_ports.clone();
        }
        if other.block_on_port.is_some() {
            self.block_on_port = other.block_on_port;
        }
        self.user_metadata.extend(
            other
                .user_metadata
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        if other.domain_name.is_some() {
            self.domain_name = other.domain_name.clone();
        }
        if other.user_data.is_some() {
            self.user_data = other.user_data.clone();
        }
    }
}

/// ポート待機設定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortWait {
    pub port: u16,
    pub timeout_secs: u32,
}

/// コンピュート設定ファイルを探す
///
/// 以下の優先順位で設定ファイルを検索:
/// 1. 環境変数 FLEETFLOW_COMPUTE_CONFIG (直接パス指定)
/// 2. カレントディレクトリ: compute.local.yaml, compute.yaml
/// 3. ./.fleetflow/ ディレクトリ内: 同様の順序
/// 4. ~/.config/fleetflow/compute.yaml (グローバル設定)
pub fn find_compute_config() -> Result<PathBuf> {
    // 1. 環境変数で直接指定
    if let Ok(config_path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(path);
        }
        tracing::warn!(
            "{} points to a missing file: {}",
            CONFIG_PATH_ENV,
            path.display()
        );
    }

    let current_dir = std::env::current_dir()?;
    let candidates = ["compute.local.yaml", "compute.yaml"];

    // 2. カレントディレクトリで検索
    for filename in &candidates {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(path);
        }
    }

    // 3. ./.fleetflow/ ディレクトリで検索
    let flow_dir = current_dir.join(".fleetflow");
    if flow_dir.is_dir() {
        for filename in &candidates {
            let path = flow_dir.join(filename);
            if path.exists() {
                return Ok(path);
            }
        }
    }

    // 4. グローバル設定ファイル (~/.config/fleetflow/compute.yaml)
    if let Some(config_dir) = dirs::config_dir() {
        let global_config = config_dir.join("fleetflow").join("compute.yaml");
        if global_config.exists() {
            return Ok(global_config);
        }
    }

    Err(ConfigError::ConfigFileNotFound)
}

/// 指定パスの設定ファイルを読み込む
pub fn load_from_path(path: &Path) -> Result<ComputeConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: ComputeConfig =
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::debug!(
        "Loaded compute config from {} ({} providers)",
        path.display(),
        config.providers.len()
    );
    Ok(config)
}

/// コンピュート設定を読み込む
///
/// 設定ファイルが無い場合はデフォルト設定を返す
pub fn load_compute_config() -> Result<ComputeConfig> {
    match find_compute_config() {
        Ok(path) => load_from_path(&path),
        Err(ConfigError::ConfigFileNotFound) => {
            tracing::debug!("Compute config not found, using defaults");
            Ok(ComputeConfig::default())
        }
        Err(e) => Err(e),
    }
}
