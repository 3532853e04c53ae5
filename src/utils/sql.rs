/// 转义 LIKE 模式中的通配符，用户输入按字面匹配
pub fn escape_like_pattern(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '\\' | '%' | '_' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_pattern() {
        assert_eq!(escape_like_pattern("2학년 1반"), "2학년 1반");
        assert_eq!(escape_like_pattern("100%_a"), "100\\%\\_a");
    }
}
