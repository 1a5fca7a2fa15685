use proptest::prelude::*;

use poul::pattern::{Args, Pattern};

// A path segment that `clean` leaves alone: never "." or "..".
fn segment() -> impl Strategy<Value = String> {
    "[a-z0-9_-][a-z0-9_.-]{0,7}"
}

fn capture_value() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_-]{1,8}"
}

proptest! {
    #[test]
    fn literal_paths_match_themselves(segments in proptest::collection::vec(segment(), 1..5)) {
        let path = segments.join("/");
        let pattern = Pattern::new(&path).unwrap();

        let entry = pattern.matches(&path);
        prop_assert!(entry.is_some());
        let entry = entry.unwrap();
        prop_assert_eq!(entry.name, path);
        prop_assert!(entry.args.is_empty());
    }

    #[test]
    fn captures_bind_by_number_not_position(x in capture_value(), y in capture_value()) {
        let pattern = Pattern::new("a/$2/$1").unwrap();

        let entry = pattern.matches(&format!("a/{x}/{y}")).unwrap();
        let expected: Args = [(1, y), (2, x)].into_iter().collect();
        prop_assert_eq!(entry.args, expected);
    }

    #[test]
    fn repeated_capture_requires_equal_text(x in capture_value(), y in capture_value()) {
        let pattern = Pattern::new("a/$1/$1_test").unwrap();

        let matched = pattern.matches(&format!("a/{x}/{y}_test"));
        prop_assert_eq!(matched.is_some(), x == y);
    }

    #[test]
    fn substitute_inverts_match(x in capture_value(), y in capture_value()) {
        let pattern = Pattern::new("out/$1/$2.o").unwrap();
        let path = format!("out/{x}/{y}.o");

        let entry = pattern.matches(&path).unwrap();
        prop_assert_eq!(pattern.substitute(&entry.args).unwrap(), path);
    }
}
