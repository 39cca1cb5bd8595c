//! 素性文字列のデコーダ
//!
//! 素性文字列は、引用符付きフィールドを許すCSVの1レコードとして扱います。
//! 各フィールドはスキーマの列名に先頭から順に対応付けられます。

use csv_core::ReadFieldResult;
use hashbrown::HashMap;

use crate::errors::{HandlerError, Result};
use crate::schema::FeatureRecord;

/// 素性文字列をCSVの1レコードとして解析し、フィールドのベクターに分割します。
///
/// ダブルクォートで囲まれたフィールドや、フィールド内のカンマも正しく処理します。
///
/// # エラー
///
/// 空文字列が与えられた場合、または2つ以上のレコードを含む場合にエラーを返します。
///
/// # 例
///
/// ```
/// # use morph_handler::feature::split_feature_line;
/// let fields = split_feature_line("名詞,\"1,2-ジクロロエタン\"").unwrap();
/// assert_eq!(fields, vec!["名詞", "1,2-ジクロロエタン"]);
/// ```
pub fn split_feature_line(line: &str) -> Result<Vec<String>> {
    if line.is_empty() {
        return Err(HandlerError::invalid_format("feature", "empty feature line"));
    }

    let mut fields = vec![];
    let mut field = vec![];
    let mut rdr = csv_core::Reader::new();
    let mut bytes = line.as_bytes();
    let mut output = [0; 4096];
    loop {
        // An empty input signals EOF to the reader, which then flushes the last field.
        let (result, nin, nout) = rdr.read_field(bytes, &mut output);
        bytes = &bytes[nin..];
        field.extend_from_slice(&output[..nout]);
        match result {
            ReadFieldResult::InputEmpty | ReadFieldResult::OutputFull => {}
            ReadFieldResult::Field { record_end } => {
                fields.push(String::from_utf8(std::mem::take(&mut field))?);
                if record_end {
                    break;
                }
            }
            ReadFieldResult::End => break,
        }
    }

    if !bytes.is_empty() {
        return Err(HandlerError::invalid_format(
            "feature",
            format!("feature line must be a single record: {line:?}"),
        ));
    }
    Ok(fields)
}

/// 素性文字列を分割し、フィールド数が `num_columns` と一致することを確認します。
///
/// # エラー
///
/// フィールド数が一致しない場合にエラーを返します。
pub fn decode_fields(line: &str, num_columns: usize) -> Result<Vec<String>> {
    let fields = split_feature_line(line)?;
    if fields.len() != num_columns {
        return Err(HandlerError::invalid_format(
            "feature",
            format!(
                "expected {} fields, but got {}: {:?}",
                num_columns,
                fields.len(),
                line
            ),
        ));
    }
    Ok(fields)
}

/// 素性文字列を列名から値へのマッピングにデコードします。
///
/// `i` 番目のフィールドは `schema` の `i` 番目の列名に対応付けられます。
///
/// # エラー
///
/// 空文字列の場合、またはフィールド数が `schema` の長さと一致しない場合にエラーを返します。
pub fn decode<'s>(line: &str, schema: &[&'s str]) -> Result<HashMap<&'s str, String>> {
    let fields = decode_fields(line, schema.len())?;
    Ok(schema.iter().copied().zip(fields).collect())
}

/// 素性文字列を型付きレコードにデコードします。
pub fn decode_record<F>(line: &str) -> Result<F>
where
    F: FeatureRecord,
{
    F::from_fields(decode_fields(line, F::COLUMNS.len())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::schema::{IpadicFeatures, FEATURES_IPADIC};

    #[test]
    fn test_split_feature_line() {
        assert_eq!(
            &["名詞", "トスカーナ"],
            split_feature_line("名詞,トスカーナ").unwrap().as_slice()
        );
    }

    #[test]
    fn test_split_feature_line_with_quote() {
        assert_eq!(
            &["名詞", "1,2-ジクロロエタン"],
            split_feature_line("名詞,\"1,2-ジクロロエタン\"").unwrap().as_slice()
        );
    }

    #[test]
    fn test_split_feature_line_escaped_quote() {
        assert_eq!(
            &["記号", "\"", "*"],
            split_feature_line("記号,\"\"\"\",*").unwrap().as_slice()
        );
    }

    #[test]
    fn test_split_feature_line_empty_fields() {
        assert_eq!(
            &["", "", ""],
            split_feature_line(",,").unwrap().as_slice()
        );
    }

    #[test]
    fn test_split_feature_line_long_field() {
        let long = "あ".repeat(3000);
        let fields = split_feature_line(&format!("名詞,{long}")).unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1], long);
    }

    #[test]
    fn test_split_feature_line_empty() {
        assert!(split_feature_line("").is_err());
    }

    #[test]
    fn test_split_feature_line_multiple_records() {
        assert!(split_feature_line("名詞,一般\n動詞,自立").is_err());
    }

    #[test]
    fn test_decode() {
        let map = decode("名詞,一般", &["pos1", "pos2"]).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["pos1"], "名詞");
        assert_eq!(map["pos2"], "一般");
    }

    #[test]
    fn test_decode_field_count_mismatch() {
        assert!(decode("名詞,一般,*", &["pos1", "pos2"]).is_err());
        assert!(decode("名詞", &["pos1", "pos2"]).is_err());
        assert!(decode("", &["pos1"]).is_err());
    }

    #[test]
    fn test_decode_binds_in_order() {
        let line = "動詞,自立,*,*,一段,連用形,食べる,タベ,タベ";
        let map = decode(line, FEATURES_IPADIC).unwrap();
        assert_eq!(map.len(), FEATURES_IPADIC.len());
        for (name, value) in FEATURES_IPADIC.iter().zip(line.split(',')) {
            assert_eq!(map[name], value);
        }
    }

    #[test]
    fn test_decode_record() {
        let record: IpadicFeatures =
            decode_record("動詞,自立,*,*,一段,連用形,食べる,タベ,タベ").unwrap();
        assert_eq!(record.pos1, "動詞");
        assert_eq!(record.base_form, "食べる");

        // IPADIC emits seven fields for unknown words.
        assert!(decode_record::<IpadicFeatures>("名詞,一般,*,*,*,*,*").is_err());
    }
}
