//! Property tests for the history invariant and the query round trip.

use navstate_core::{MemoryStorage, NavigationContext, QuerySync};
use navstate_model::{ListParams, Location, NavigationConfig, ParamPatch, QueryScalar, QueryValue};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Action {
    Visit(String),
    Back,
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        4 => prop::sample::select(vec!["/a", "/b", "/c", "/admin-trip-list", "/admin-trip-list/1"])
            .prop_map(|path| Action::Visit(path.to_string())),
        1 => Just(Action::Back),
    ]
}

fn scalar() -> impl Strategy<Value = QueryScalar> {
    prop_oneof![
        any::<bool>().prop_map(QueryScalar::Bool),
        any::<i64>().prop_map(|n| QueryScalar::Number(n.into())),
        "[a-z][a-z ]{0,8}"
            .prop_filter("must not coerce", |text| {
                QueryScalar::coerce(text) == QueryScalar::Text(text.clone())
            })
            .prop_map(QueryScalar::Text),
    ]
}

fn value() -> impl Strategy<Value = QueryValue> {
    prop_oneof![
        3 => scalar().prop_map(QueryValue::Scalar),
        1 => prop::collection::vec(scalar(), 1..4).prop_map(QueryValue::List),
    ]
}

fn params() -> impl Strategy<Value = ListParams> {
    prop::collection::btree_map("[a-zA-Z]{1,10}", value(), 0..6)
        .prop_map(|entries| entries.into_iter().collect::<ListParams>())
}

proptest! {
    #[test]
    fn history_never_holds_consecutive_duplicates(actions in prop::collection::vec(action(), 0..40)) {
        let mut nav = NavigationContext::start(
            MemoryStorage::new(),
            NavigationConfig::default(),
            Location::parse("/a"),
        );
        for action in actions {
            match action {
                Action::Visit(path) => nav.navigate(path.as_str()),
                Action::Back => {
                    nav.navigate_back(None);
                }
            }
            let entries = nav.history().entries();
            prop_assert!(entries.windows(2).all(|pair| pair[0] != pair[1]));
            prop_assert_eq!(nav.history().current(), Some(&nav.location().path));
            let expected = entries.len().checked_sub(2).map(|i| &entries[i]);
            prop_assert_eq!(nav.previous_path(), expected);
        }
    }

    #[test]
    fn written_params_read_back_equal(params in params()) {
        let mut nav = NavigationContext::start(
            MemoryStorage::new(),
            NavigationConfig::default(),
            Location::parse("/admin-client-list"),
        );
        let list = QuerySync::new("admin-client-list");
        let written = list.write_params(&mut nav, &ParamPatch::from_params(&params));
        prop_assert_eq!(&written, &params);
        prop_assert_eq!(list.read_params(&nav), params);
    }
}
