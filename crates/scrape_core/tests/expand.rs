use scrape_core::{expand, normalize_scheme, PAGE_NUMBER_TOKEN};

#[test]
fn page_index_replaces_token_and_keeps_the_rest() {
    let template = "https://shop.example.com/list?page={{page_number}}&sort=asc";
    for index in [-3_i64, 0, 1, 42, 1_000_000] {
        assert_eq!(
            expand(template, Some(index)),
            format!("https://shop.example.com/list?page={index}&sort=asc")
        );
    }
}

#[test]
fn only_first_token_is_replaced() {
    let template = "https://example.com/{{page_number}}/{{page_number}}";
    assert_eq!(
        expand(template, Some(7)),
        "https://example.com/7/{{page_number}}"
    );
}

#[test]
fn template_without_token_is_identical_for_every_page() {
    let template = "https://example.com/static";
    let urls: Vec<String> = (1..=5).map(|i| expand(template, Some(i))).collect();
    assert!(urls.iter().all(|url| url == template));
}

#[test]
fn single_shot_leaves_token_in_place() {
    let template = format!("https://example.com/?p={PAGE_NUMBER_TOKEN}");
    assert_eq!(expand(&template, None), template);
}

#[test]
fn missing_scheme_is_prefixed_with_https() {
    assert_eq!(expand("example.com", None), "https://example.com");
    assert_eq!(
        expand("example.com/p/{{page_number}}", Some(2)),
        "https://example.com/p/2"
    );
}

#[test]
fn existing_scheme_is_left_alone() {
    assert_eq!(expand("http://example.com", None), "http://example.com");
    assert_eq!(expand("https://example.com", None), "https://example.com");
}

#[test]
fn scheme_check_is_a_literal_prefix_test() {
    assert_eq!(normalize_scheme("httpxyz.com".to_string()), "httpxyz.com");
    assert_eq!(normalize_scheme("ftp://x".to_string()), "https://ftp://x");
}
