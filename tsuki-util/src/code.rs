use std::fmt::Display;

/// Strips a surrounding ```` ```lang ```` code block, e.g.
///
/// ````text
/// ```sql
/// SELECT * FROM table WHERE id = $1
/// ```
/// ````
///
/// becomes `SELECT * FROM table WHERE id = $1`.
///
/// Input without such a block is returned as is.
pub fn parse_code<'c>(code: &'c str, lang: &str) -> &'c str {
    let inner = code
        .strip_prefix("```")
        .and_then(|code| code.strip_prefix(lang))
        .and_then(|code| code.strip_suffix("```"));

    match inner {
        Some(inner) => inner.trim(),
        None => code,
    }
}

/// Wraps the given data in a code block of the given language.
pub fn with_block(data: impl Display, lang: &str) -> String {
    format!("```{lang}\n{data}\n```")
}
