use std::path::PathBuf;

use thiserror::Error;

/// ノートファイルの読み書きエラー
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to read notes from {0}: {1}")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("failed to write notes to {0}: {1}")]
    Write(PathBuf, #[source] std::io::Error),
}

/// グリフ描画のエラー
///
/// 呼び出し側は生テキスト 1 行にフォールバックするため、致命的にはならない
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to load font: {0}")]
    Font(String),

    #[error("no renderable glyphs in {0:?}")]
    Unrenderable(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot determine home directory; pass a notes file or set FIGNOTES_FILE")]
    NoHomeDir,

    #[error("unknown option: {0}")]
    UnknownOption(String),
}
