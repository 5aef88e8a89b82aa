#[inline]
pub fn strip_surrounding_quotes(s: &str) -> &str {
    let b = s.as_bytes();
    if b.len() >= 2 {
        let first = b[0];
        let last = b[b.len() - 1];
        if (first == b'\'' && last == b'\'') || (first == b'"' && last == b'"') {
            return &s[1..s.len() - 1];
        }
    }
    s
}

/// Splits one delimited line into trimmed, unquoted fields.
///
/// Delimiters inside single or double quotes are kept. Empty fields are
/// preserved (`"a,,b"` has three fields).
pub fn split_fields(line: &str, delimiter: char) -> Vec<String> {
    let mut out = Vec::new();
    let mut cur = String::new();
    let mut in_quotes: Option<char> = None;

    for ch in line.chars() {
        match in_quotes {
            Some(q) => {
                if ch == q {
                    in_quotes = None;
                }
                cur.push(ch);
            }
            None => {
                if ch == '"' || ch == '\'' {
                    in_quotes = Some(ch);
                    cur.push(ch);
                } else if ch == delimiter {
                    out.push(strip_surrounding_quotes(cur.trim()).to_string());
                    cur.clear();
                } else {
                    cur.push(ch);
                }
            }
        }
    }
    out.push(strip_surrounding_quotes(cur.trim()).to_string());
    out
}

/// `true` for blank lines and `#` comments.
#[inline]
pub fn is_skippable(line: &str) -> bool {
    let t = line.trim();
    t.is_empty() || t.starts_with('#')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_quotes_works() {
        assert_eq!(strip_surrounding_quotes("'a,b'"), "a,b");
        assert_eq!(strip_surrounding_quotes(r#""x""#), "x");
        assert_eq!(strip_surrounding_quotes("nq"), "nq");
    }

    #[test]
    fn split_keeps_quoted_delimiters() {
        let p = split_fields(r#"0, "dm" ,'1,5',0.25"#, ',');
        assert_eq!(p, vec!["0", "dm", "1,5", "0.25"]);
    }

    #[test]
    fn split_keeps_empty_fields_and_other_delimiters() {
        assert_eq!(split_fields("a,,b", ','), vec!["a", "", "b"]);
        assert_eq!(split_fields("1\t2", '\t'), vec!["1", "2"]);
    }

    #[test]
    fn comments_and_blanks_are_skippable() {
        assert!(is_skippable("   "));
        assert!(is_skippable("# split,ground_truth"));
        assert!(!is_skippable("0,0.5"));
    }
}
