#[macro_export]
macro_rules! truncate_long {
    ($query:expr) => {
        format_args!(
            "{}{}\n",
            &$query[..$crate::char_boundary_below(&$query, 497)].trim_end(),
            if $query.len() > 497 { "..." } else { "" },
        )
    };
}

/// Largest char boundary of `value` not exceeding `max`.
pub fn char_boundary_below(value: &str, max: usize) -> usize {
    if value.len() <= max {
        return value.len();
    }
    (0..=max).rev().find(|i| value.is_char_boundary(*i)).unwrap_or(0)
}

const ROW_PRODUCING_KEYWORDS: [&str; 3] = ["select", "with", "values"];

/// Skip whitespace and SQL comments at the start of `sql`.
pub fn skip_leading_trivia(mut sql: &str) -> &str {
    loop {
        sql = sql.trim_start();
        if let Some(rest) = sql.strip_prefix("--") {
            sql = rest.find('\n').map_or("", |i| &rest[i + 1..]);
        } else if let Some(rest) = sql.strip_prefix("/*") {
            sql = rest.find("*/").map_or("", |i| &rest[i + 2..]);
        } else {
            return sql;
        }
    }
}

/// Whether `sql` is a read-only query returning rows, decided on its leading keyword.
pub fn is_row_producing(sql: &str) -> bool {
    let sql = skip_leading_trivia(sql);
    ROW_PRODUCING_KEYWORDS.iter().any(|keyword| {
        sql.get(..keyword.len())
            .is_some_and(|v| v.eq_ignore_ascii_case(keyword))
            && !sql[keyword.len()..]
                .chars()
                .next()
                .is_some_and(|c| c.is_alphanumeric() || c == '_')
    })
}
