//! `{% import Name from "path" %}`

/// A parsed import directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Import<'a> {
    pub name: &'a str,
    pub path: &'a str,
}

/// Parse an import payload.
///
/// On failure returns the statement with its delimiters stripped, for the
/// placeholder comment.
pub(super) fn parse(payload: &str) -> Result<Import<'_>, &str> {
    let statement = strip_tag(payload);
    let fields: Vec<&str> = statement.split_whitespace().collect();

    if fields.len() < 4 {
        return Err(statement);
    }

    Ok(Import {
        name: fields[1],
        path: fields[3].trim_matches(|c| c == '"' || c == '\''),
    })
}

fn strip_tag(payload: &str) -> &str {
    let inner = payload.strip_prefix("{%").unwrap_or(payload);
    inner.strip_suffix("%}").unwrap_or(inner).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_import() {
        let import = parse("{% import ProductCard from \"components/product-card.js\" %}").unwrap();
        assert_eq!(import.name, "ProductCard");
        assert_eq!(import.path, "components/product-card.js");
    }

    #[test]
    fn test_parse_single_quoted_path() {
        let import = parse("{% import Hero from 'hero.js' %}").unwrap();
        assert_eq!(import.path, "hero.js");
    }

    #[test]
    fn test_parse_without_inner_spacing() {
        let import = parse("{%import Hero from \"hero.js\"%}").unwrap();
        assert_eq!(import.name, "Hero");
        assert_eq!(import.path, "hero.js");
    }

    #[test]
    fn test_too_few_fields() {
        assert_eq!(parse("{% import Hero from %}"), Err("import Hero from"));
        assert_eq!(parse("{% import %}"), Err("import"));
    }
}
