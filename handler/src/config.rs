//! 解析器の設定
//!
//! 設定値は起動時に一度だけ組み立てられ、以降は読み取り専用で参照されます。
//! 値の優先順位は、コマンドライン引数、環境変数、rcファイルの順です。
//! コマンドライン引数と環境変数の解決は呼び出し側（`invoke`バイナリ）が行い、
//! このモジュールはrcファイルによる補完と検証を担当します。

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{HandlerError, Result};
use crate::schema::Variant;

/// rcファイルのパスを指定する環境変数
pub const ENV_RCFILE: &str = "MECABRC";
/// システム辞書ディレクトリを指定する環境変数
pub const ENV_DICDIR: &str = "MECAB_DICDIR";
/// ユーザー辞書のパスまたはURLを指定する環境変数
pub const ENV_USERDIC: &str = "MECAB_USERDIC";
/// ユーザー辞書のSHA-256ダイジェストを指定する環境変数
pub const ENV_USERDIC_SHA256: &str = "MECAB_USERDIC_SHA256";

/// ユーザー辞書の所在
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserDicLocation {
    /// ローカルファイル
    Local(PathBuf),
    /// `http://` または `https://` で取得するリモートファイル
    Remote(String),
}

impl UserDicLocation {
    /// 文字列からユーザー辞書の所在を判定します。
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            Self::Remote(location.to_string())
        } else {
            Self::Local(PathBuf::from(location))
        }
    }

    /// リモートファイルかどうか
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

impl fmt::Display for UserDicLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::Remote(url) => f.write_str(url),
        }
    }
}

/// rcファイルのエントリ
///
/// MeCabのrcファイルと同じ `key = value` 形式です。
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RcFile {
    /// `dicdir` エントリ
    pub dicdir: Option<PathBuf>,
    /// `userdic` エントリ
    pub userdic: Option<UserDicLocation>,
}

impl RcFile {
    /// rcファイルを読み込みます。
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            HandlerError::invalid_argument("rcfile", format!("{}: {}", path.display(), e))
        })?;
        Self::parse(&text, rc_base(path))
    }

    /// rcファイルの内容を解析します。
    ///
    /// 相対パスは `base` を基準に解決し、`$(rcpath)` は `base` に展開します。
    /// 未知のキーは無視します。
    pub fn parse(text: &str, base: &Path) -> Result<Self> {
        let mut rc = Self::default();
        for (i, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }
            let (key, value) = line.split_once('=').ok_or_else(|| {
                HandlerError::invalid_argument(
                    "rcfile",
                    format!("line {}: expected `key = value`: {:?}", i + 1, line),
                )
            })?;
            let value = value.trim().replace("$(rcpath)", &base.to_string_lossy());
            match key.trim() {
                "dicdir" => rc.dicdir = Some(base.join(value)),
                "userdic" => {
                    rc.userdic = Some(match UserDicLocation::parse(&value) {
                        UserDicLocation::Local(path) => UserDicLocation::Local(base.join(path)),
                        remote => remote,
                    })
                }
                _ => {}
            }
        }
        Ok(rc)
    }
}

/// rcファイルのあるディレクトリ
///
/// ファイル名だけが与えられた場合はカレントディレクトリ（`.`）を返します。
fn rc_base(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// 解析器の設定
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaggerConfig {
    /// 読み込んだrcファイルのパス
    pub rcfile: Option<PathBuf>,

    /// システム辞書ディレクトリ
    pub dicdir: PathBuf,

    /// ユーザー辞書の所在
    pub userdic: Option<UserDicLocation>,

    /// ユーザー辞書の期待されるSHA-256ダイジェスト（16進数）
    pub userdic_sha256: Option<String>,
}

impl TaggerConfig {
    /// システム辞書ディレクトリのみを指定した設定を作成します。
    pub fn new<P: Into<PathBuf>>(dicdir: P) -> Self {
        Self {
            rcfile: None,
            dicdir: dicdir.into(),
            userdic: None,
            userdic_sha256: None,
        }
    }

    /// 個別に解決済みの値とrcファイルから設定を組み立てます。
    ///
    /// 引数で与えられた値はrcファイルのエントリより優先されます。
    ///
    /// # エラー
    ///
    /// 以下の場合にエラーを返します。
    /// - rcファイルを読み込めない場合
    /// - システム辞書ディレクトリが決まらない場合
    /// - `variant` がユーザー辞書を必要とするのに、その所在が決まらない場合
    pub fn resolve(
        variant: Variant,
        rcfile: Option<PathBuf>,
        dicdir: Option<PathBuf>,
        userdic: Option<String>,
        userdic_sha256: Option<String>,
    ) -> Result<Self> {
        let rc = match &rcfile {
            Some(path) => RcFile::from_path(path)?,
            None => RcFile::default(),
        };

        let dicdir = dicdir.or(rc.dicdir).ok_or_else(|| {
            HandlerError::invalid_argument(
                "dicdir",
                format!("set --dicdir, {ENV_DICDIR}, or `dicdir` in the rc file"),
            )
        })?;

        let userdic = userdic.as_deref().map(UserDicLocation::parse).or(rc.userdic);
        if variant.loads_user_dictionary() && userdic.is_none() {
            return Err(HandlerError::invalid_argument(
                "userdic",
                format!("{variant} requires --userdic or {ENV_USERDIC}"),
            ));
        }

        Ok(Self {
            rcfile,
            dicdir,
            userdic,
            userdic_sha256,
        })
    }
}
