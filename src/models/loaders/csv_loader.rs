use super::json_loader::read_input;
use crate::error::LoadError;
use crate::models::speech::SpeechItem;
use std::path::Path;
use tracing::warn;

const DELIMITER: u8 = b';';

/// 从 `;` 分隔的 CSV 文件加载语音合成条目
///
/// 第一行是表头，必须包含 `id_column` 和 `text_column` 两列。
/// 字段可以用双引号包裹，引号内的 `;` 不作为分隔符。
/// 列数不足的行会被跳过并记录警告。
pub async fn load_speech_items(
    path: &Path,
    id_column: &str,
    text_column: &str,
) -> Result<Vec<SpeechItem>, LoadError> {
    let content = read_input(path).await?;
    parse_speech_items(&content, &path.display().to_string(), id_column, text_column)
}

pub fn parse_speech_items(
    content: &str,
    source_name: &str,
    id_column: &str,
    text_column: &str,
) -> Result<Vec<SpeechItem>, LoadError> {
    let malformed = |reason: String| LoadError::Malformed {
        path: source_name.to_string(),
        reason,
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.trim_start_matches('\u{feff}').as_bytes());

    let header = reader
        .headers()
        .map_err(|e| malformed(format!("无法读取表头: {}", e)))?
        .clone();
    if header.is_empty() {
        return Err(malformed("缺少表头".to_string()));
    }

    let column = |name: &str| {
        header
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| malformed(format!("表头中找不到列 '{}'", name)))
    };
    let id_idx = column(id_column)?;
    let text_idx = column(text_column)?;

    let mut items = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| malformed(format!("CSV 格式错误: {}", e)))?;
        match (record.get(id_idx), record.get(text_idx)) {
            (Some(id), Some(text)) => items.push(SpeechItem {
                id: id.to_string(),
                text: text.to_string(),
            }),
            _ => {
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                let fields: Vec<&str> = record.iter().collect();
                warn!("⚠️ 第 {} 行列数不足，已跳过: {}", line, fields.join(";"));
            }
        }
    }

    Ok(items)
}
