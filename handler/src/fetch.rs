//! ユーザー辞書のローカル実体化
//!
//! リモートに置かれたユーザー辞書は一時ファイルにダウンロードしてから使用します。
//! 一時ファイルはスコープを抜けた時点で、成功・失敗を問わず必ず削除されます。

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;

use crate::config::UserDicLocation;
use crate::errors::{HandlerError, Result};

/// ユーザー辞書のローカルパスを `f` に渡して実行します。
///
/// ローカルファイルはそのまま渡されます。リモートファイルは一時ファイルに
/// ダウンロードされ、`f` の終了後に削除されます。
///
/// # 引数
///
/// * `location` - ユーザー辞書の所在
/// * `expected_sha256` - 期待されるSHA-256ダイジェスト。`None` の場合は検証しません。
/// * `f` - ローカルパスを受け取る処理
///
/// # エラー
///
/// ダウンロードやチェックサム検証に失敗した場合、または `f` が失敗した場合にエラーを返します。
pub fn with_local_copy<T, F>(
    location: &UserDicLocation,
    expected_sha256: Option<&str>,
    f: F,
) -> Result<T>
where
    F: FnOnce(&Path) -> Result<T>,
{
    match location {
        UserDicLocation::Local(path) => {
            if let Some(expected) = expected_sha256 {
                verify_sha256(&mut File::open(path)?, expected)?;
            }
            f(path)
        }
        UserDicLocation::Remote(url) => with_remote_copy(url, expected_sha256, f),
    }
}

#[cfg(feature = "download")]
fn with_remote_copy<T, F>(url: &str, expected_sha256: Option<&str>, f: F) -> Result<T>
where
    F: FnOnce(&Path) -> Result<T>,
{
    use crate::errors::DownloadError;

    log::info!("Downloading the user dictionary from {}", url);
    let response = reqwest::blocking::get(url).map_err(DownloadError::from)?;
    if !response.status().is_success() {
        return Err(DownloadError::HttpStatus(response.status()).into());
    }
    with_temp_copy(response, expected_sha256, f)
}

#[cfg(not(feature = "download"))]
fn with_remote_copy<T, F>(url: &str, _expected_sha256: Option<&str>, _f: F) -> Result<T>
where
    F: FnOnce(&Path) -> Result<T>,
{
    Err(HandlerError::invalid_argument(
        "userdic",
        format!("{url}: remote user dictionaries require the `download` feature"),
    ))
}

/// `rdr` の内容を一時ファイルに書き出し、そのパスを `f` に渡して実行します。
///
/// 一時ファイルは `f` の結果にかかわらず、この関数から戻る前に削除されます。
pub fn with_temp_copy<R, T, F>(mut rdr: R, expected_sha256: Option<&str>, f: F) -> Result<T>
where
    R: Read,
    F: FnOnce(&Path) -> Result<T>,
{
    let mut temp_file = NamedTempFile::new()?;
    io::copy(&mut rdr, &mut temp_file)?;

    if let Some(expected) = expected_sha256 {
        temp_file.seek(SeekFrom::Start(0))?;
        verify_sha256(&mut temp_file, expected)?;
    }

    log::debug!("Materialized a temporary copy at {}", temp_file.path().display());
    f(temp_file.path())
}

fn verify_sha256<R: Read>(rdr: &mut R, expected: &str) -> Result<()> {
    let mut hasher = Sha256::new();
    io::copy(rdr, &mut hasher)?;
    let actual = hex::encode(hasher.finalize());
    if !actual.eq_ignore_ascii_case(expected) {
        return Err(HandlerError::ChecksumMismatch {
            expected: expected.to_string(),
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;
    use std::path::PathBuf;

    // SHA-256 of "abc"
    const ABC_SHA256: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    #[test]
    fn test_local_passthrough() {
        let temp = NamedTempFile::new().unwrap();
        fs::write(temp.path(), "abc").unwrap();
        let location = UserDicLocation::Local(temp.path().to_path_buf());

        let seen = with_local_copy(&location, Some(ABC_SHA256), |path| Ok(path.to_path_buf()))
            .unwrap();
        assert_eq!(seen, temp.path());
        assert!(seen.exists());
    }

    #[test]
    fn test_local_checksum_mismatch() {
        let temp = NamedTempFile::new().unwrap();
        fs::write(temp.path(), "abd").unwrap();
        let location = UserDicLocation::Local(temp.path().to_path_buf());

        let result = with_local_copy(&location, Some(ABC_SHA256), |_| Ok(()));
        assert!(matches!(result, Err(HandlerError::ChecksumMismatch { .. })));
    }

    #[test]
    fn test_temp_copy_removed_on_success() {
        let mut seen = PathBuf::new();
        let content = with_temp_copy("abc".as_bytes(), Some(ABC_SHA256.to_uppercase().as_str()), |path| {
            seen = path.to_path_buf();
            Ok(fs::read_to_string(path)?)
        })
        .unwrap();
        assert_eq!(content, "abc");
        assert!(!seen.as_os_str().is_empty());
        assert!(!seen.exists());
    }

    #[test]
    fn test_temp_copy_removed_on_error() {
        let mut seen = PathBuf::new();
        let result: Result<()> = with_temp_copy("abc".as_bytes(), None, |path| {
            seen = path.to_path_buf();
            Err(HandlerError::invalid_format("feature", "broken"))
        });
        assert!(result.is_err());
        assert!(!seen.exists());
    }

    #[test]
    fn test_temp_copy_checksum_mismatch() {
        let result = with_temp_copy("abd".as_bytes(), Some(ABC_SHA256), |_| Ok(()));
        assert!(matches!(result, Err(HandlerError::ChecksumMismatch { .. })));
    }

    /// 1回だけ固定のレスポンスを返すHTTPサーバーを起動し、そのURLを返す
    #[cfg(feature = "download")]
    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        use std::io::{BufRead, BufReader, Write};
        use std::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 0 {
                if line == "\r\n" {
                    break;
                }
                line.clear();
            }
            let mut stream = reader.into_inner();
            write!(
                stream,
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            )
            .unwrap();
        });
        format!("http://{addr}/user.csv")
    }

    #[cfg(feature = "download")]
    #[test]
    fn test_remote_copy_removed_after_use() {
        let location = UserDicLocation::Remote(serve_once("200 OK", "abc"));

        let mut seen = PathBuf::new();
        let content = with_local_copy(&location, Some(ABC_SHA256), |path| {
            seen = path.to_path_buf();
            Ok(fs::read_to_string(path)?)
        })
        .unwrap();
        assert_eq!(content, "abc");
        assert!(!seen.as_os_str().is_empty());
        assert!(!seen.exists());
    }

    #[cfg(feature = "download")]
    #[test]
    fn test_remote_http_status_error() {
        use crate::errors::DownloadError;

        let location = UserDicLocation::Remote(serve_once("404 Not Found", "missing"));

        let mut called = false;
        let result = with_local_copy(&location, None, |_| {
            called = true;
            Ok(())
        });
        assert!(matches!(
            result,
            Err(HandlerError::Download(DownloadError::HttpStatus(status))) if status.as_u16() == 404
        ));
        assert!(!called);
    }
}
