//! エラー型の定義
//!
//! このモジュールは、ハンドラーの呼び出し中に発生し得るすべてのエラー型を定義します。
//! どのエラーも回復処理の対象ではなく、呼び出し元へそのまま伝播します。

use std::error::Error;
use std::fmt::{self, Debug};

/// ハンドラー専用のResult型
///
/// エラー型としてデフォルトで[`HandlerError`]を使用します。
pub type Result<T, E = HandlerError> = std::result::Result<T, E>;

/// ハンドラーのエラー型
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// 無効な引数エラー
    ///
    /// 設定の不足や矛盾など、起動時に検出されるエラーです。
    #[error(transparent)]
    InvalidArgument(InvalidArgumentError),

    /// 無効なフォーマットエラー
    ///
    /// 素性文字列の列数がスキーマと一致しない場合などに発生します。
    #[error(transparent)]
    InvalidFormat(InvalidFormatError),

    /// 形態素解析器のエラー
    ///
    /// 辞書の読み込みや構築に失敗した場合に発生します。
    #[error(transparent)]
    Analyzer(#[from] vibrato_rkyv::errors::VibratoError),

    /// I/Oエラー
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSONのシリアライズ・デシリアライズエラー
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// UTF-8エンコーディングエラー
    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),

    /// ユーザー辞書のチェックサム不一致
    #[error("User dictionary checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// 設定で指定されたSHA-256ダイジェスト
        expected: String,
        /// 実際に計算されたSHA-256ダイジェスト
        actual: String,
    },

    /// ダウンロードエラー
    ///
    /// `download`フィーチャーが有効な場合のみ利用可能です。
    #[cfg(feature = "download")]
    #[error(transparent)]
    Download(#[from] DownloadError),
}

impl HandlerError {
    /// 無効な引数エラーを生成します
    ///
    /// # 引数
    ///
    /// * `arg` - 引数の名前
    /// * `msg` - エラーメッセージ
    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument(InvalidArgumentError {
            arg,
            msg: msg.into(),
        })
    }

    /// 無効なフォーマットエラーを生成します
    ///
    /// # 引数
    ///
    /// * `arg` - フォーマット名
    /// * `msg` - エラーメッセージ
    pub(crate) fn invalid_format<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidFormat(InvalidFormatError {
            arg,
            msg: msg.into(),
        })
    }
}

/// 引数が無効な場合に使用されるエラー
#[derive(Debug)]
pub struct InvalidArgumentError {
    /// 引数の名前
    pub(crate) arg: &'static str,

    /// エラーメッセージ
    pub(crate) msg: String,
}

impl fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidArgumentError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidArgumentError {}

/// 入力フォーマットが無効な場合に使用されるエラー
#[derive(Debug)]
pub struct InvalidFormatError {
    /// フォーマットの名前
    pub(crate) arg: &'static str,

    /// エラーメッセージ
    pub(crate) msg: String,
}

impl fmt::Display for InvalidFormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidFormatError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidFormatError {}

/// ダウンロード関連のエラー
///
/// リモートに置かれたユーザー辞書の取得中に発生する可能性のあるエラーを表現します。
#[cfg(feature = "download")]
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// ネットワークリクエストの失敗
    #[error("Network request failed")]
    Request(#[from] reqwest::Error),

    /// HTTPステータスエラー
    #[error("HTTP error: {0}")]
    HttpStatus(reqwest::StatusCode),
}
