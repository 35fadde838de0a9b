// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持英文（默认）和中文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// 红线: 不读写全局语言,语言由车队设置逐次传入
// ==========================================

/// 按指定语言翻译（带参数）
///
/// # 参数
/// - locale: 语言代码（"en" 或 "zh-CN"）,未知语言回退英文
/// - key: 文案键,如 "fleet.train_added"
/// - args: 占位符参数 `%{name}`
///
/// # 示例
/// ```no_run
/// use metro_induction::i18n::t_in;
/// let msg = t_in("zh-CN", "fleet.train_removed", &[("train_id", "T-003")]);
/// ```
pub fn t_in(locale: &str, key: &str, args: &[(&str, &str)]) -> String {
    fill_args(rust_i18n::t!(key, locale = locale).to_string(), args)
}

fn fill_args(mut result: String, args: &[(&str, &str)]) -> String {
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}
