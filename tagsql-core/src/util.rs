/// Writes `values` into `out` through `f`, putting `separator` between the
/// entries that produced some output.
pub fn separated_by<T, F>(
    out: &mut String,
    values: impl IntoIterator<Item = T>,
    mut f: F,
    separator: &str,
) where
    F: FnMut(&mut String, T),
{
    let mut len = out.len();
    for v in values {
        if out.len() > len {
            out.push_str(separator);
        }
        len = out.len();
        f(out, v);
    }
}

pub fn consume_while<'s>(input: &mut &'s str, predicate: impl FnMut(&char) -> bool) -> &'s str {
    let len: usize = input
        .chars()
        .take_while(predicate)
        .map(char::len_utf8)
        .sum();
    if len == 0 {
        return "";
    }
    let result = &input[..len];
    *input = &input[len..];
    result
}

/// Element wise first non empty of `primary[i]`, then `secondary[i]`, then
/// `default`. The result is as long as the longest input.
pub fn coalesce<A: AsRef<str>, B: AsRef<str>>(
    primary: &[A],
    secondary: &[B],
    default: &str,
) -> Vec<String> {
    (0..primary.len().max(secondary.len()))
        .map(|i| {
            primary
                .get(i)
                .map(AsRef::as_ref)
                .filter(|v| !v.is_empty())
                .or_else(|| secondary.get(i).map(AsRef::as_ref).filter(|v| !v.is_empty()))
                .unwrap_or(default)
                .to_string()
        })
        .collect()
}

/// Largest char boundary of `value` not above `index`.
pub fn floor_char_boundary(value: &str, index: usize) -> usize {
    if index >= value.len() {
        return value.len();
    }
    (0..=index)
        .rev()
        .find(|i| value.is_char_boundary(*i))
        .unwrap_or_default()
}

#[macro_export]
macro_rules! truncate_long {
    ($query:expr) => {
        format_args!(
            "{}{}",
            &$query[..$crate::floor_char_boundary(&$query, 497)].trim_end(),
            if $query.len() > 497 { "..." } else { "" },
        )
    };
}
