//! Clause helpers - keyword lookup and list splitting over raw statement text

/// Keywords that delimit clauses inside a statement
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Keyword {
    Values,
    From,
    Where,
    Set,
}

impl Keyword {
    /// Returns the uppercase string representation of the keyword
    pub fn to_str(&self) -> &'static str {
        match self {
            Keyword::Values => "VALUES",
            Keyword::From => "FROM",
            Keyword::Where => "WHERE",
            Keyword::Set => "SET",
        }
    }
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}

/// Finds the byte offset of `keyword` as a standalone word.
///
/// Matching is case-insensitive and skips anything inside single-quoted literals.
pub fn find_keyword(input: &str, keyword: Keyword) -> Option<usize> {
    let bytes = input.as_bytes();
    let word = keyword.to_str().as_bytes();
    let mut quoted = false;

    for i in 0..bytes.len() {
        if bytes[i] == b'\'' {
            quoted = !quoted;
            continue;
        }
        if quoted || i + word.len() > bytes.len() {
            continue;
        }
        if !bytes[i..i + word.len()].eq_ignore_ascii_case(word) {
            continue;
        }
        let before = i == 0 || !is_ident_byte(bytes[i - 1]);
        let after = bytes.get(i + word.len()).is_none_or(|b| !is_ident_byte(*b));
        if before && after {
            return Some(i);
        }
    }
    None
}

/// Splits `input` around the first standalone `keyword`, trimming both halves.
pub fn split_keyword(input: &str, keyword: Keyword) -> Option<(&str, &str)> {
    let pos = find_keyword(input, keyword)?;
    Some((
        input[..pos].trim(),
        input[pos + keyword.to_str().len()..].trim(),
    ))
}

/// Strips a case-insensitive ASCII prefix such as `SELECT * FROM`.
pub fn strip_prefix_ignore_case<'a>(input: &'a str, prefix: &str) -> Option<&'a str> {
    let head = input.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &input[prefix.len()..])
}

/// Splits a comma-separated list, leaving commas inside quoted literals alone.
///
/// Every item is trimmed. An empty input yields a single empty item.
pub fn split_list(input: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut quoted = false;
    let mut start = 0;

    for (i, c) in input.char_indices() {
        match c {
            '\'' => quoted = !quoted,
            ',' if !quoted => {
                items.push(input[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    items.push(input[start..].trim());
    items
}

#[cfg(test)]
mod tests {
    use super::{Keyword, find_keyword, split_keyword, split_list, strip_prefix_ignore_case};

    #[test]
    fn test_find_keyword() {
        assert_eq!(find_keyword("t where a = 1", Keyword::Where), Some(2));
        assert_eq!(find_keyword("t WHERE a = 1", Keyword::Where), Some(2));
        // Part of a longer identifier
        assert_eq!(find_keyword("nowhere", Keyword::Where), None);
        assert_eq!(find_keyword("t SET offset = 1", Keyword::Set), Some(2));
        // Inside a literal
        assert_eq!(find_keyword("a = 'x where y'", Keyword::Where), None);
        assert_eq!(find_keyword("", Keyword::From), None);
    }

    #[test]
    fn test_split_keyword() {
        assert_eq!(
            split_keyword("a, b FROM  tbl ", Keyword::From),
            Some(("a, b", "tbl"))
        );
        assert_eq!(split_keyword("a, b", Keyword::From), None);
    }

    #[test]
    fn test_strip_prefix_ignore_case() {
        assert_eq!(
            strip_prefix_ignore_case("select * from t", "SELECT * FROM"),
            Some(" t")
        );
        assert_eq!(strip_prefix_ignore_case("SELECT", "SELECT * FROM"), None);
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(" 1, 'a', 2.5 "), vec!["1", "'a'", "2.5"]);
        assert_eq!(split_list("'a,b', c"), vec!["'a,b'", "c"]);
        assert_eq!(split_list(""), vec![""]);
    }
}
