//! Schema titles derived from type names.

/// Convert a type name into a dash-separated lowercase slug.
///
/// Module paths are dropped (`blog::BlogPost` → `blog-post`), camel-case
/// boundaries and any run of non-alphanumeric characters become a single dash.
#[must_use]
pub fn title_slug(type_name: &str) -> String {
    let short = type_name.rsplit("::").next().unwrap_or(type_name);
    let short = short.split('<').next().unwrap_or(short);
    let chars = short.chars().collect::<Vec<_>>();

    let mut slug = String::with_capacity(short.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
            continue;
        }

        if c.is_uppercase() {
            let prev = i.checked_sub(1).and_then(|j| chars.get(j)).copied();
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_lowercase() || p.is_numeric() => true,
                Some(p) if p.is_uppercase() => next.is_some_and(char::is_lowercase),
                _ => false,
            };
            if boundary && !slug.ends_with('-') {
                slug.push('-');
            }
            slug.extend(c.to_lowercase());
        } else {
            slug.push(c);
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::title_slug;
    use rstest::rstest;

    #[rstest]
    #[case("BlogPost", "blog-post")]
    #[case("blog::models::BlogPost", "blog-post")]
    #[case("Blog_Post", "blog-post")]
    #[case("HTTPRequest", "http-request")]
    #[case("Post", "post")]
    #[case("post", "post")]
    #[case("blog-post", "blog-post")]
    #[case("Invoice2Line", "invoice2-line")]
    #[case("Wrapper<Inner>", "wrapper")]
    #[case("__Weird__Name__", "weird-name")]
    fn slugs(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(title_slug(input), expected);
    }
}
