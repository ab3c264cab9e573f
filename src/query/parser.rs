//! Selector parsing
//!
//! Compiles selector text into a [`Query`]: a sequence of descendant
//! groups, each a compound of simple selectors that must all hold on one
//! element. Supported simples are `tag`, `.class`, `#id` and `[attr]`;
//! attribute operators and pseudo-classes are parsed but not evaluated.

/// One simple selector within a compound
#[derive(Debug, Clone, PartialEq)]
pub enum Simple {
    /// Tag name, matched case-insensitively
    Tag(String),
    /// Class token membership
    Class(String),
    /// Exact `id` attribute match
    Id(String),
    /// Attribute presence (operators are accepted but ignored)
    Attr(String),
    /// Recognized but unevaluatable (pseudo-classes); matches nothing
    Unsupported,
}

/// A compiled selector: whitespace-separated descendant groups
#[derive(Debug, Clone)]
pub struct Query {
    pub text: String,
    pub groups: Vec<Vec<Simple>>,
}

#[inline]
fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Read an identifier run starting at `pos`; returns (ident, next pos)
fn read_ident(chars: &[char], pos: usize) -> (String, usize) {
    let mut end = pos;
    while end < chars.len() && is_ident_char(chars[end]) {
        end += 1;
    }
    (chars[pos..end].iter().collect(), end)
}

fn parse_compound(part: &str, selector: &str) -> Result<Vec<Simple>, String> {
    let chars: Vec<char> = part.chars().collect();
    let mut simples = Vec::new();
    let mut pos = 0;
    while pos < chars.len() {
        match chars[pos] {
            '.' => {
                let (name, next) = read_ident(&chars, pos + 1);
                if name.is_empty() {
                    return Err(format!("empty class name in `{selector}`"));
                }
                simples.push(Simple::Class(name));
                pos = next;
            }
            '#' => {
                let (name, next) = read_ident(&chars, pos + 1);
                if name.is_empty() {
                    return Err(format!("empty id in `{selector}`"));
                }
                simples.push(Simple::Id(name));
                pos = next;
            }
            '[' => {
                let (name, next) = read_ident(&chars, pos + 1);
                if name.is_empty() {
                    return Err(format!("empty attribute name in `{selector}`"));
                }
                // Operators and values are tolerated but evaluation is
                // presence-only
                let close = chars[next..]
                    .iter()
                    .position(|&c| c == ']')
                    .map(|i| next + i)
                    .ok_or_else(|| format!("unterminated `[` in `{selector}`"))?;
                simples.push(Simple::Attr(name));
                pos = close + 1;
            }
            ':' => {
                let start = if pos + 1 < chars.len() && chars[pos + 1] == ':' {
                    pos + 2
                } else {
                    pos + 1
                };
                let (name, mut next) = read_ident(&chars, start);
                if name.is_empty() {
                    return Err(format!("empty pseudo-class in `{selector}`"));
                }
                // Skip a parenthesized argument if one follows
                if next < chars.len() && chars[next] == '(' {
                    next = chars[next..]
                        .iter()
                        .position(|&c| c == ')')
                        .map(|i| next + i + 1)
                        .ok_or_else(|| format!("unterminated `(` in `{selector}`"))?;
                }
                simples.push(Simple::Unsupported);
                pos = next;
            }
            '*' => {
                // Universal selector: no constraint beyond being an element
                pos += 1;
            }
            c if is_ident_char(c) => {
                let (name, next) = read_ident(&chars, pos);
                simples.push(Simple::Tag(name));
                pos = next;
            }
            c => {
                return Err(format!("unexpected `{c}` in selector `{selector}`"));
            }
        }
    }
    Ok(simples)
}

/// Compile selector text
pub fn parse(selector: &str) -> Result<Query, String> {
    let mut groups = Vec::new();
    for part in selector.split_whitespace() {
        groups.push(parse_compound(part, selector)?);
    }
    if groups.is_empty() {
        return Err("empty selector".to_string());
    }
    Ok(Query {
        text: selector.to_string(),
        groups,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag() {
        let q = parse("div").unwrap();
        assert_eq!(q.groups, vec![vec![Simple::Tag("div".into())]]);
    }

    #[test]
    fn test_compound() {
        let q = parse("a.link#home[href]").unwrap();
        assert_eq!(
            q.groups,
            vec![vec![
                Simple::Tag("a".into()),
                Simple::Class("link".into()),
                Simple::Id("home".into()),
                Simple::Attr("href".into()),
            ]]
        );
    }

    #[test]
    fn test_descendant_groups() {
        let q = parse("ul li .item").unwrap();
        assert_eq!(q.groups.len(), 3);
        assert_eq!(q.groups[2], vec![Simple::Class("item".into())]);
    }

    #[test]
    fn test_attr_operator_tolerated() {
        let q = parse(r#"[href="x"]"#).unwrap();
        assert_eq!(q.groups, vec![vec![Simple::Attr("href".into())]]);
        let q = parse("[lang|=en]").unwrap();
        assert_eq!(q.groups, vec![vec![Simple::Attr("lang".into())]]);
    }

    #[test]
    fn test_pseudo_class_is_unsupported() {
        let q = parse("a:hover").unwrap();
        assert_eq!(
            q.groups,
            vec![vec![Simple::Tag("a".into()), Simple::Unsupported]]
        );
        let q = parse("li:nth-child(2)").unwrap();
        assert_eq!(q.groups[0][1], Simple::Unsupported);
    }

    #[test]
    fn test_errors() {
        assert!(parse("").is_err());
        assert!(parse("   ").is_err());
        assert!(parse(">div").is_err());
        assert!(parse("[").is_err());
        assert!(parse("[href").is_err());
        assert!(parse(".").is_err());
    }
}
