// ==========================================
// 咖啡售货亭配置器 - 编码生成
// ==========================================
// 规则: 已给出的编码去空白后保留；否则 <slug(名称)>-<6位随机十六进制>
// slug: 小写，非 [a-z0-9] 的连续字符替换为 '-'，去掉首尾 '-'
// ==========================================

use uuid::Uuid;

/// 随机后缀长度
pub const CODE_SUFFIX_LEN: usize = 6;

/// 名称转 slug；结果为空时返回 None
pub fn slugify(name: &str) -> Option<String> {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for ch in name.to_lowercase().chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        None
    } else {
        Some(slug)
    }
}

/// 生成随机后缀
fn random_suffix() -> String {
    Uuid::new_v4().simple().to_string()[..CODE_SUFFIX_LEN].to_string()
}

/// 保证编码存在
///
/// # 参数
/// - code: 调用方提供的编码（可为空）
/// - name: 实体名称
/// - fallback_prefix: 名称无法转为 slug 时的前缀（如 "machine"）
pub fn ensure_code(code: Option<&str>, name: &str, fallback_prefix: &str) -> String {
    if let Some(code) = code.map(str::trim).filter(|c| !c.is_empty()) {
        return code.to_string();
    }

    let base = slugify(name).unwrap_or_else(|| fallback_prefix.to_string());
    format!("{}-{}", base, random_suffix())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Jura E8 Piano Black"), Some("jura-e8-piano-black".to_string()));
        assert_eq!(slugify("  --Hello__World--  "), Some("hello-world".to_string()));
        assert_eq!(slugify("Кофемашина"), None);
        assert_eq!(slugify(""), None);
    }

    #[test]
    fn test_ensure_code_keeps_given_code() {
        assert_eq!(ensure_code(Some("  M-1 "), "whatever", "machine"), "M-1");
    }

    #[test]
    fn test_ensure_code_generates_from_name() {
        let code = ensure_code(None, "Jura E8", "machine");
        assert!(code.starts_with("jura-e8-"));
        assert_eq!(code.len(), "jura-e8-".len() + CODE_SUFFIX_LEN);

        let blank = ensure_code(Some("   "), "Jura E8", "machine");
        assert!(blank.starts_with("jura-e8-"));
    }

    #[test]
    fn test_ensure_code_falls_back_to_prefix() {
        let code = ensure_code(None, "Холодильник", "fridge");
        assert!(code.starts_with("fridge-"));
    }

    #[test]
    fn test_generated_codes_differ() {
        let a = ensure_code(None, "x", "machine");
        let b = ensure_code(None, "x", "machine");
        assert_ne!(a, b);
    }
}
