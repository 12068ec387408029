use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "設定ファイルが見つかりません。以下の場所を確認してください:\n\
        - カレントディレクトリ: compute.local.yaml, compute.yaml\n\
        - ./.fleetflow/ ディレクトリ\n\
        - ~/.config/fleetflow/compute.yaml\n\
        または FLEETFLOW_COMPUTE_CONFIG 環境変数で直接指定できます"
    )]
    ConfigFileNotFound,

    #[error("設定ファイルの解析に失敗しました ({path}): {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("IO エラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
