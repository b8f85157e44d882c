// ==========================================
// 咖啡售货亭配置器 - 图库字段编解码
// ==========================================
// 持久化格式: 紧凑 JSON 字符串数组，例如 ["a.jpg","b.jpg"]
// 约定: 缺失/损坏一律解码为空列表，从不向调用方抛错
// ==========================================

use serde_json::Value;

/// 解析存储的图库字段
///
/// - None / 空白 / 非法 JSON / 非数组 → 空列表
/// - 数组中非字符串或空字符串元素被丢弃，其余保持顺序
pub fn parse_gallery(raw: Option<&str>) -> Vec<String> {
    let stripped = match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return Vec::new(),
    };

    match serde_json::from_str::<Value>(stripped) {
        Ok(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) if !s.is_empty() => Some(s),
                _ => None,
            })
            .collect(),
        Ok(_) => Vec::new(),
        Err(e) => {
            tracing::debug!(error = %e, "图库字段不是合法 JSON，按空列表处理");
            Vec::new()
        }
    }
}

/// 编码图库列表为紧凑 JSON（丢弃空白引用）
pub fn encode_gallery<S: AsRef<str>>(urls: &[S]) -> String {
    let cleaned: Vec<&str> = urls
        .iter()
        .map(|u| u.as_ref().trim())
        .filter(|u| !u.is_empty())
        .collect();
    // Vec<&str> 序列化不会失败
    serde_json::to_string(&cleaned).unwrap_or_else(|_| "[]".to_string())
}

/// 在已有图库后追加新引用（合并而非替换）
pub fn append_gallery(existing: &[String], extra: &[String]) -> Vec<String> {
    existing
        .iter()
        .chain(extra.iter())
        .map(|u| u.trim())
        .filter(|u| !u.is_empty())
        .map(str::to_string)
        .collect()
}
