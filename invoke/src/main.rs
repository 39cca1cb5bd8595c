//! ハンドラーをローカルで呼び出すユーティリティ
//!
//! このバイナリは、`--data` で与えられたイベントを処理し、
//! 指定された出力形式（raw、json）でレスポンスを標準出力に出力します。

use std::error::Error;
use std::path::PathBuf;
use std::str::FromStr;

use morph_handler::config::{ENV_DICDIR, ENV_RCFILE, ENV_USERDIC, ENV_USERDIC_SHA256};
use morph_handler::{Event, Handler, Response, TaggerConfig, Variant};

use clap::Parser;
use serde_json::{json, Value};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// 出力モード
#[derive(Clone, Debug)]
enum OutputMode {
    Raw,
    Json,
}

impl FromStr for OutputMode {
    type Err = &'static str;

    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode {
            "raw" => Ok(Self::Raw),
            "json" => Ok(Self::Json),
            _ => Err("Could not parse a mode"),
        }
    }
}

/// コマンドライン引数
#[derive(Parser, Debug)]
#[clap(name = "invoke", about = "Invokes the function locally")]
struct Args {
    /// Log level (e.g. ERROR, WARNING, INFO, DEBUG).
    #[clap(long, default_value = "INFO", value_parser = parse_log_level)]
    log_level: LevelFilter,

    /// Input data: a JSON event such as {"body": "..."}, a JSON string, or raw text.
    #[clap(long)]
    data: String,

    /// Output mode. Choices are raw and json.
    #[clap(long, default_value = "raw")]
    output: OutputMode,

    /// Feature schema. Choices are unidic, ipadic, and ipadic-userdic.
    #[clap(long, default_value = "unidic")]
    variant: Variant,

    /// Analyzer resource file (mecabrc).
    #[clap(long, env = ENV_RCFILE)]
    rcfile: Option<PathBuf>,

    /// System dictionary directory.
    #[clap(long, env = ENV_DICDIR)]
    dicdir: Option<PathBuf>,

    /// User dictionary (lexicon CSV), as a local path or an http(s) URL.
    #[clap(long, env = ENV_USERDIC)]
    userdic: Option<String>,

    /// Expected SHA-256 digest of the user dictionary.
    #[clap(long, env = ENV_USERDIC_SHA256)]
    userdic_sha256: Option<String>,
}

/// ログレベル名を解釈する
///
/// `WARNING` と `CRITICAL` はそれぞれ `warn` と `error` として扱います。
fn parse_log_level(level: &str) -> Result<LevelFilter, String> {
    let level = level.to_ascii_lowercase();
    let level = match level.as_str() {
        "warning" => "warn",
        "critical" => "error",
        other => other,
    };
    LevelFilter::from_str(level).map_err(|_| format!("unknown log level: {level}"))
}

/// `--log-level` に従ってログ出力を初期化する
fn configure_logging(log_level: LevelFilter) -> Result<(), Box<dyn Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::default().add_directive(log_level.into()))
        .with_writer(std::io::stderr)
        .try_init()
}

/// レスポンスを出力形式に従って書き出す
fn print_response(response: &Response, mode: &OutputMode) -> Result<(), Box<dyn Error>> {
    match mode {
        OutputMode::Raw => println!("{:#?}", response),
        OutputMode::Json => {
            let body: Value = serde_json::from_str(&response.body)?;
            let output = json!({
                "statusCode": response.status_code,
                "body": body,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

/// メイン関数
///
/// 設定を組み立ててハンドラーを構築し、イベントを1回処理して結果を出力します。
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    configure_logging(args.log_level).map_err(|e| e as Box<dyn Error>)?;
    log::debug!("given option: {:?}", args);

    let config = TaggerConfig::resolve(
        args.variant,
        args.rcfile,
        args.dicdir,
        args.userdic,
        args.userdic_sha256,
    )?;

    let mut handler = Handler::from_config(&config, args.variant)?;
    let event = Event::from_data(&args.data)?;
    let response = handler.handle(&event)?;
    log::info!("response: {:?}", response);

    print_response(&response, &args.output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("INFO"), Ok(LevelFilter::INFO));
        assert_eq!(parse_log_level("debug"), Ok(LevelFilter::DEBUG));
        assert_eq!(parse_log_level("WARNING"), Ok(LevelFilter::WARN));
        assert_eq!(parse_log_level("CRITICAL"), Ok(LevelFilter::ERROR));
        assert!(parse_log_level("verbose").is_err());
    }

    #[test]
    fn test_userdic_variant_without_userdic_flag() {
        let args = Args::try_parse_from([
            "invoke",
            "--variant",
            "ipadic-userdic",
            "--rcfile",
            "mecabrc",
            "--data",
            "x",
        ])
        .unwrap();
        assert_eq!(args.variant, Variant::IpadicUserdic);
        assert_eq!(args.rcfile, Some(PathBuf::from("mecabrc")));
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        assert!(Args::try_parse_from(["invoke", "--log-level", "verbose", "--data", "x"]).is_err());
    }
}
