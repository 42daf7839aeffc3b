//! 当事人检索与重复身份证号提示

use crate::db::Offender;

/// 相似身份证号检索的最少字符数
pub const MIN_SIMILAR_ID_LEN: usize = 2;

/// 按姓名（不区分大小写）或身份证号子串检索，可选性别过滤
pub fn search_offenders<'a>(
    offenders: &'a [Offender],
    search: &str,
    gender: Option<&str>,
) -> Vec<&'a Offender> {
    let search = search.trim();
    let needle = search.to_lowercase();

    offenders
        .iter()
        .filter(|o| {
            o.full_name.to_lowercase().contains(&needle)
                || o.national_id.as_deref().is_some_and(|id| id.contains(search))
        })
        .filter(|o| match gender {
            Some(g) if !g.is_empty() => o.gender.as_deref() == Some(g),
            _ => true,
        })
        .collect()
}

/// 身份证号相似的当事人（任一方包含另一方）
///
/// 输入不足两个字符时返回空；没有身份证号的记录不参与比较。
pub fn similar_national_ids<'a>(offenders: &'a [Offender], id: &str) -> Vec<&'a Offender> {
    let query = id.trim().to_lowercase();
    if query.chars().count() < MIN_SIMILAR_ID_LEN {
        return Vec::new();
    }

    offenders
        .iter()
        .filter(|o| {
            let Some(existing) = o.national_id.as_deref().map(str::trim) else {
                return false;
            };
            if existing.is_empty() {
                return false;
            }
            let existing = existing.to_lowercase();
            existing.contains(&query) || query.contains(&existing)
        })
        .collect()
}
