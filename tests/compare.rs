use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use url_view::UrlView;

fn hash_of(u: &UrlView<'_>) -> u64 {
    let mut hasher = DefaultHasher::new();
    u.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn normalized_equality() {
    // Scheme case, percent-triplet case, and unreserved escapes all
    // normalize away; the buffers stay distinct.
    let pairs = [
        ("HTTP://example.com/", "http://example.com/"),
        ("http://example.com/%7Eted", "http://example.com/~ted"),
        ("http://example.com/%7eted", "http://example.com/~ted"),
        ("http://h/%2fx", "http://h/%2Fx"),
        ("ftp://h/a%41", "ftp://h/aA"),
    ];
    for (a, b) in pairs {
        let ua = UrlView::parse(a).unwrap();
        let ub = UrlView::parse(b).unwrap();
        assert_eq!(ua, ub, "{a} vs {b}");
        assert_eq!(ua.compare(&ub), Ordering::Equal);
        assert_eq!(hash_of(&ua), hash_of(&ub), "{a} vs {b}");
        assert_ne!(ua.as_str(), ub.as_str());
    }
}

#[test]
fn distinctions_survive() {
    // Host case is not folded; only the scheme is case-insensitive.
    let pairs = [
        ("http://Example.com/", "http://example.com/"),
        ("http://h/a", "http://h/A"),
        ("http://h/a", "http://h/a/"),
        ("http://h/a", "http://h/a?"),
        ("http://h/a?q", "http://h/a?q#"),
        ("http://h/a%2Fb", "http://h/a/b"),
        ("//h", "http://h"),
        ("http://h", "http://h:"),
        ("http://@h", "http://h"),
    ];
    for (a, b) in pairs {
        let ua = UrlView::parse(a).unwrap();
        let ub = UrlView::parse(b).unwrap();
        assert_ne!(ua, ub, "{a} vs {b}");
    }
}

#[test]
fn total_order_laws() {
    let inputs = [
        "",
        "#f",
        "?q",
        "/a",
        "/a/",
        "//h",
        "//h:80/p",
        "a:b",
        "ftp://h/",
        "http://h/",
        "http://h/?",
        "http://h/a?q#f",
        "HTTPS://h/",
    ];
    let views: Vec<_> = inputs.iter().map(|s| UrlView::parse(s).unwrap()).collect();

    for a in &views {
        // Reflexive.
        assert_eq!(a.compare(a), Ordering::Equal);
        for b in &views {
            // Antisymmetric.
            assert_eq!(a.compare(b), b.compare(a).reverse());
            assert_eq!(a < b, a.compare(b) == Ordering::Less);
            for c in &views {
                // Transitive.
                if a.compare(b) == Ordering::Less && b.compare(c) == Ordering::Less {
                    assert_eq!(a.compare(c), Ordering::Less);
                }
            }
        }
    }

    let mut sorted = views.clone();
    sorted.sort();
    for w in sorted.windows(2) {
        assert_ne!(w[0].compare(&w[1]), Ordering::Greater);
    }
}

#[test]
fn absent_orders_before_present() {
    let without = UrlView::parse("http://h/p").unwrap();
    let with_empty = UrlView::parse("http://h/p?").unwrap();
    let with_query = UrlView::parse("http://h/p?a").unwrap();
    assert!(without < with_empty);
    assert!(with_empty < with_query);

    let no_frag = UrlView::parse("x").unwrap();
    let empty_frag = UrlView::parse("x#").unwrap();
    assert!(no_frag < empty_frag);
}

#[test]
fn views_in_hash_containers() {
    use std::collections::HashSet;

    let a = UrlView::parse("http://example.com/%7Eted").unwrap();
    let b = UrlView::parse("HTTP://example.com/~ted").unwrap();
    let c = UrlView::parse("http://example.com/ted").unwrap();

    let mut set = HashSet::new();
    set.insert(a);
    assert!(set.contains(&b));
    assert!(!set.contains(&c));
    set.insert(c);
    assert_eq!(set.len(), 2);
}
