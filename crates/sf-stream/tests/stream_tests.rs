//! Stream builder chains, terminal consumers and error propagation.

use serde_json::{json, Value as Json};
use sf_core::{Reference, SeqError};
use sf_stream::{EqualityMode, Group, Stream, Value};
use std::cell::Cell;

const MIXED: [i64; 6] = [1, -1, 2, -2, 3, -3];

fn expected(data: Json) -> Vec<Value> {
    match Value::from(data) {
        Value::Composite(c) => c.into_iter().collect(),
        other => vec![other],
    }
}

fn num(v: &Value) -> i64 {
    v.as_i64().unwrap()
}

fn mixed() -> Stream<'static> {
    Stream::of(MIXED)
}

fn empty() -> Stream<'static> {
    Stream::of(Vec::<Value>::new())
}

// ========== Stateless stages ==========

#[test]
fn test_to_array() {
    assert!(empty().to_array().unwrap().is_empty());
    assert_eq!(mixed().to_array().unwrap(), expected(json!([1, -1, 2, -2, 3, -3])));
}

#[test]
fn test_filter_true_false() {
    assert!(empty().filter_true(|v| num(v) > 0).to_array().unwrap().is_empty());
    assert_eq!(mixed().filter_true(|v| num(v) > 0).to_array().unwrap(), expected(json!([1, 2, 3])));
    assert_eq!(mixed().filter_false(|v| num(v) > 0).to_array().unwrap(), expected(json!([-1, -2, -3])));
}

#[test]
fn test_take_while() {
    assert!(empty().take_while(|v| num(v).abs() < 3).to_array().unwrap().is_empty());
    assert_eq!(
        mixed().take_while(|v| num(v).abs() < 3).to_array().unwrap(),
        expected(json!([1, -1, 2, -2]))
    );
}

#[test]
fn test_take_while_then_compress() {
    let out = mixed()
        .take_while(|v| num(v).abs() < 3)
        .compress([0, 1, 0, 1])
        .to_array()
        .unwrap();
    assert_eq!(out, expected(json!([-1, -2])));
}

#[test]
fn test_drop_while_then_compress() {
    assert!(empty().drop_while(|v| num(v).abs() < 3).compress([0, 1]).to_array().unwrap().is_empty());
    let out = mixed()
        .drop_while(|v| num(v).abs() < 3)
        .compress([0, 1])
        .to_array()
        .unwrap();
    assert_eq!(out, expected(json!([-3])));
}

#[test]
fn test_filter_then_compress() {
    let out = mixed()
        .filter_true(|v| num(v) > 0)
        .compress([0, 1, 1])
        .to_array()
        .unwrap();
    assert_eq!(out, expected(json!([2, 3])));
}

#[test]
fn test_compress_with_boolean_selectors() {
    let out = Stream::of(["a", "b", "c"]).compress([true, false, true]).to_array().unwrap();
    assert_eq!(out, expected(json!(["a", "c"])));
}

#[test]
fn test_compress_with_borrowed_selector_source() {
    let flags = vec![String::from("0"), String::from("yes"), String::from("")];
    let out = Stream::of([10, 20, 30])
        .compress(flags.iter().map(String::as_str))
        .to_array()
        .unwrap();
    assert_eq!(out, expected(json!([20])));
}

#[test]
fn test_map() {
    let out = mixed().map(|v| Value::Int(num(&v) * 10)).limit(2).to_array().unwrap();
    assert_eq!(out, expected(json!([10, -10])));
}

// ========== Stateful stages ==========

#[test]
fn test_pairwise() {
    assert!(empty().pairwise().to_array().unwrap().is_empty());
    assert!(Stream::of([1]).pairwise().to_array().unwrap().is_empty());
    assert_eq!(
        Stream::of([1, 2, 3]).pairwise().to_array().unwrap(),
        expected(json!([[1, 2], [2, 3]]))
    );
}

#[test]
fn test_filter_then_pairwise() {
    assert_eq!(
        mixed().filter_true(|v| num(v) > 0).pairwise().to_array().unwrap(),
        expected(json!([[1, 2], [2, 3]]))
    );
    assert_eq!(
        mixed().filter_false(|v| num(v) > 0).pairwise().to_array().unwrap(),
        expected(json!([[-1, -2], [-2, -3]]))
    );
}

fn sign(v: &Value) -> Value {
    Value::from(if num(v) > 0 { "pos" } else { "neg" })
}

#[test]
fn test_group_by() {
    assert!(empty().group_by(sign).to_array().unwrap().is_empty());
    let out = mixed()
        .filter_false(|v| num(v) % 2 == 0)
        .group_by(sign)
        .to_array()
        .unwrap();
    assert_eq!(out, expected(json!([[1, 3], [-1, -3]])));
}

#[test]
fn test_to_groups_keeps_keys() {
    let groups = mixed().filter_false(|v| num(v) % 2 == 0).to_groups(sign).unwrap();
    assert_eq!(
        groups,
        vec![
            Group { key: Value::from("pos"), items: expected(json!([1, 3])) },
            Group { key: Value::from("neg"), items: expected(json!([-1, -3])) },
        ]
    );
}

#[test]
fn test_stages_after_group_by() {
    let out = Stream::of([1, 2, 3, 4, 5, 6])
        .group_by(|v| Value::Int(num(v) % 3))
        .pairwise()
        .to_array()
        .unwrap();
    assert_eq!(out, expected(json!([[[1, 4], [2, 5]], [[2, 5], [3, 6]]])));
}

#[test]
fn test_chunkwise_and_slice() {
    let out = Stream::of(0..7).chunkwise(3).unwrap().to_array().unwrap();
    assert_eq!(out, expected(json!([[0, 1, 2], [3, 4, 5], [6]])));
    let out = Stream::of(0..).slice(2, Some(3), 3).unwrap().to_array().unwrap();
    assert_eq!(out, expected(json!([2, 5, 8])));
    assert!(matches!(empty().chunkwise(0), Err(SeqError::InvalidArgument(_))));
}

#[test]
fn test_distinct_stage() {
    let out = Stream::of(expected(json!([1, "1", 2, 1])))
        .distinct(EqualityMode::Loose)
        .to_array()
        .unwrap();
    assert_eq!(out, expected(json!([1, 2])));
}

// ========== Running aggregates ==========

#[test]
fn test_running_average() {
    assert_eq!(
        Stream::of([1, 3, 5]).running_average().to_array().unwrap(),
        expected(json!([1, 2, 3]))
    );
    assert_eq!(
        Stream::of([1, 2]).running_average().to_array().unwrap(),
        expected(json!([1, 1.5]))
    );
    assert_eq!(
        Stream::of([1, 2, 3]).running_average().to_array().unwrap(),
        expected(json!([1, 1.5, 2]))
    );
    assert!(Stream::of([1, 2, 3])
        .running_average()
        .same_with(expected(json!([1, 1.5, 2])))
        .unwrap());
}

#[test]
fn test_running_total_product() {
    assert_eq!(
        Stream::of([1, 2, 3, 4, 5]).running_total().to_array().unwrap(),
        expected(json!([1, 3, 6, 10, 15]))
    );
    assert_eq!(
        Stream::of([1, 2, 3, 4, 5]).running_product().to_array().unwrap(),
        expected(json!([1, 2, 6, 24, 120]))
    );
}

#[test]
fn test_running_max_min() {
    assert_eq!(
        mixed().filter_true(|v| num(v) > 0).running_max().to_array().unwrap(),
        expected(json!([1, 2, 3]))
    );
    assert_eq!(
        mixed().filter_true(|v| num(v) < 0).running_min().to_array().unwrap(),
        expected(json!([-1, -2, -3]))
    );
}

#[test]
fn test_running_with_floats() {
    let out = Stream::of([1.5, 2.5]).running_total().to_array().unwrap();
    assert_eq!(out, expected(json!([1.5, 4.0])));
}

#[test]
fn test_seeded_running() {
    assert_eq!(
        Stream::of([1, 2, 3]).running_total_from(10).to_array().unwrap(),
        expected(json!([10, 11, 13, 16]))
    );
    assert_eq!(
        Stream::of([4]).running_average_from(2).to_array().unwrap(),
        expected(json!([2, 3]))
    );
    assert_eq!(
        Stream::of([1, 2]).running_difference_from(0).to_array().unwrap(),
        expected(json!([0, -1, -3]))
    );
    assert_eq!(
        Stream::of([5, 7]).running_min_from(6).running_max_from(0).to_array().unwrap(),
        expected(json!([0, 6, 6, 6]))
    );
}

// ========== Summary terminals ==========

#[test]
fn test_sorted_and_reversed_on_short_sequences() {
    assert!(empty().is_sorted().unwrap());
    assert!(empty().is_reversed().unwrap());
    assert!(Stream::of([42]).is_sorted().unwrap());
    assert!(Stream::of([42]).is_reversed().unwrap());
}

#[test]
fn test_running_average_summary() {
    let avg = || Stream::of([1, 3, 5]).running_average();
    assert!(avg().is_sorted().unwrap());
    assert!(!avg().is_reversed().unwrap());
    assert!(avg().same_with([1, 2, 3]).unwrap());
    assert!(!avg().same_with([11, 22, 33]).unwrap());
    assert!(avg().same_count_with([11, 22, 33]).unwrap());
    assert!(!avg().same_count_with([11, 22, 33, 44, 55]).unwrap());
}

#[test]
fn test_running_max_min_summary() {
    assert!(mixed().filter_true(|v| num(v) > 0).running_max().is_sorted().unwrap());
    assert!(!mixed().filter_true(|v| num(v) > 0).running_max().is_reversed().unwrap());
    assert!(mixed().filter_true(|v| num(v) < 0).running_min().is_reversed().unwrap());
    assert!(!mixed().filter_true(|v| num(v) < 0).running_min().is_sorted().unwrap());
}

#[test]
fn test_chained_aggregates_are_constant() {
    let chain = || Stream::of([1, 2, 3, 4, 5]).running_product().running_total().running_min();
    assert!(chain().is_sorted().unwrap());
    assert!(chain().is_reversed().unwrap());
    assert!(chain().same_with([1, 1, 1, 1, 1]).unwrap());
}

#[test]
fn test_same_with_and_count() {
    assert!(empty().same_with(Vec::<Value>::new()).unwrap());
    assert!(!empty().same_with([1]).unwrap());
    assert!(empty().same_count_with(Vec::<Value>::new()).unwrap());
    assert!(!empty().same_count_with([1]).unwrap());
    assert!(Stream::of([1]).same_count_with([2]).unwrap());
    assert!(!Stream::of([1]).same_with(["1"]).unwrap());
}

#[test]
fn test_sorted_mixed_scalars() {
    assert!(Stream::of(expected(json!([1, "2", 2.5, "10"]))).is_sorted().unwrap());
    assert!(Stream::of(["apple", "banana", "cherry"]).is_sorted().unwrap());
    assert!(!Stream::of(["b", "a"]).is_sorted().unwrap());
}

#[test]
fn test_match_terminals() {
    assert!(mixed().any_match(|v| num(v) == 3).unwrap());
    assert!(!mixed().all_match(|v| num(v) > 0).unwrap());
    assert!(mixed().none_match(|v| num(v) == 0).unwrap());
    assert!(mixed().all_unique(EqualityMode::Strict).unwrap());
    assert!(!Stream::of(expected(json!([1, "1"]))).all_unique(EqualityMode::Loose).unwrap());
}

// ========== Laziness ==========

#[test]
fn test_take_while_bounds_infinite_source() {
    let out = Stream::of(1..).take_while(|v| num(v) < 4).running_total().to_array().unwrap();
    assert_eq!(out, expected(json!([1, 3, 6])));
}

#[test]
fn test_nothing_pulled_before_terminal() {
    let pulled = Cell::new(0);
    let source = (0..10).map(|i: i64| {
        pulled.set(pulled.get() + 1);
        i
    });
    let stream = Stream::of(source).filter_true(|v| num(v) % 2 == 0).pairwise();
    assert_eq!(pulled.get(), 0);
    let first: Vec<_> = stream.take(1).collect();
    assert_eq!(first.len(), 1);
    assert_eq!(pulled.get(), 3);
}

#[test]
fn test_is_sorted_stops_at_first_violation() {
    let pulled = Cell::new(0);
    let source = [1, 3, 2, 4, 5].into_iter().map(|i: i64| {
        pulled.set(pulled.get() + 1);
        i
    });
    assert!(!Stream::of(source).is_sorted().unwrap());
    assert_eq!(pulled.get(), 3);
}

// ========== Errors ==========

#[test]
fn test_running_rejects_text() {
    let err = Stream::of(expected(json!([1, "x"]))).running_total().to_array().unwrap_err();
    assert!(matches!(
        err,
        SeqError::TypeMismatch { stage: "running_total", expected: "number", found: "text" }
    ));
}

#[test]
fn test_running_rejects_references() {
    let items = vec![Value::Ref(Reference::new("P", [("a", 1)]))];
    let err = Stream::of(items).running_max().to_array().unwrap_err();
    assert!(matches!(err, SeqError::TypeMismatch { found: "reference", .. }));
}

#[test]
fn test_callback_error_propagates() {
    let err = mixed()
        .try_filter_true(|v| {
            if num(v) == 2 {
                anyhow::bail!("cannot judge {v}");
            }
            Ok(true)
        })
        .to_array()
        .unwrap_err();
    assert!(matches!(err, SeqError::Callback(_)));
    assert_eq!(err.to_string(), "cannot judge 2");
}

#[test]
fn test_error_does_not_poison_stream() {
    let mut stream = mixed().try_map(|v| {
        if num(&v) == -1 {
            anyhow::bail!("skip me");
        }
        Ok(v)
    });
    assert_eq!(stream.next().unwrap().unwrap(), Value::Int(1));
    assert!(stream.next().unwrap().is_err());
    assert_eq!(stream.next().unwrap().unwrap(), Value::Int(2));
}

#[test]
fn test_source_errors_reach_terminal() {
    let items: Vec<sf_stream::Result<Value>> =
        vec![Ok(Value::Int(1)), Err(SeqError::InvalidArgument("bad source".into()))];
    let err = Stream::of_results(items).filter_true(|_| true).is_sorted().unwrap_err();
    assert!(matches!(err, SeqError::InvalidArgument(_)));
}
