//! Custom element names for components.

/// Kebab-case a component identifier into a custom element tag name.
///
/// Every uppercase letter after the first is preceded by a dash and all
/// letters are lowercased. Names without a dash get an `x-` prefix, since
/// custom elements must contain one.
///
/// ```text
/// Hero        -> x-hero
/// ProductCard -> product-card
/// ABTest      -> a-b-test
/// ```
pub(super) fn custom_element_name(component: &str) -> String {
    let mut name = String::with_capacity(component.len() + 4);

    for (i, ch) in component.chars().enumerate() {
        if ch.is_uppercase() && i > 0 {
            name.push('-');
        }
        name.extend(ch.to_lowercase());
    }

    if !name.contains('-') {
        name.insert_str(0, "x-");
    }
    name
}
