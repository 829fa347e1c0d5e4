use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use qqtag::{
    quote, unquote, unquote_async, unquote_fn, unquote_future, Hole, HoleSourceKind, QqError,
    ReductionConfig, Reducer, Value,
};
use tokio::sync::oneshot;

use super::{assert_tagged, qq, qq_raw};

#[tokio::test]
async fn test_async_thunk_quote() {
    let q = qq(["1", "2"], vec![unquote_async(|| async { Ok(Some(quote("x"))) })]);
    assert_tagged(&q.export_async().await.unwrap(), &["1x2"], &["1x2"], &[]);
}

#[tokio::test]
async fn test_awaitable_quasiquote() {
    let q = qq(
        ["<", ">"],
        vec![unquote_future(async {
            Ok(Some(Hole::from(qq_raw(["\n", "\t"], ["\\n", "\\t"], vec![Hole::from(1)]))))
        })],
    );
    assert_tagged(
        &q.export_async().await.unwrap(),
        &["<\n", "\t>"],
        &["<\\n", "\\t>"],
        &[Value::Integer(1)],
    );
}

#[tokio::test]
async fn test_awaitable_resolved_elsewhere() {
    let (tx, rx) = oneshot::channel::<i64>();
    let q = qq(
        ["a", "b"],
        vec![unquote_future(async move {
            match rx.await {
                Ok(v) => Ok(Some(Hole::from(v))),
                Err(e) => Err(QqError::rejected("sender dropped").with_source(e)),
            }
        })],
    );

    let handle = tokio::spawn(async move { q.export_async().await });
    tx.send(42).unwrap();
    let tagged = handle.await.unwrap().unwrap();
    assert_tagged(&tagged, &["a", "b"], &["a", "b"], &[Value::Integer(42)]);
}

#[tokio::test]
async fn test_async_absent_trims() {
    let q = qq(["1", "2"], vec![unquote_async(|| async { Ok(None) })]);
    assert_tagged(&q.export_async().await.unwrap(), &["12"], &["12"], &[]);

    let q = qq(["1", "2"], vec![unquote_future(async { Ok(None) })]);
    assert_tagged(&q.export_async().await.unwrap(), &["12"], &["12"], &[]);
}

#[tokio::test]
async fn test_async_handles_sync_sources_too() {
    let q = qq(
        ["", "", ""],
        vec![unquote(quote(1)), unquote_fn(|| Some(Hole::from(2)))],
    );
    assert_tagged(&q.export_async().await.unwrap(), &["1", ""], &["1", ""], &[Value::Integer(2)]);
}

#[tokio::test]
async fn test_async_chain_through_nested() {
    let q = qq(
        ["", ""],
        vec![unquote_async(|| async {
            Ok(Some(Hole::from(qq(
                ["2", "3"],
                vec![unquote_future(async {
                    Ok(Some(Hole::from(qq(["4", "5"], vec![Hole::from(1)]))))
                })],
            ))))
        })],
    );
    assert_tagged(
        &q.export_async().await.unwrap(),
        &["24", "53"],
        &["24", "53"],
        &[Value::Integer(1)],
    );
}

#[tokio::test]
async fn test_holes_resolve_left_to_right() {
    let order = Arc::new(std::sync::Mutex::new(Vec::new()));
    let holes = (0..3i64)
        .map(|i| {
            let order = order.clone();
            unquote_async(move || {
                let order = order.clone();
                async move {
                    tokio::time::sleep(Duration::from_millis(10 * (3 - i) as u64)).await;
                    order.lock().unwrap().push(i);
                    Ok(Some(Hole::from(i)))
                }
            })
        })
        .collect();
    let q = qq(["", "", "", ""], holes);

    let tagged = q.export_async().await.unwrap();
    assert_eq!(tagged.values, vec![Value::Integer(0), Value::Integer(1), Value::Integer(2)]);
    assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
}

#[tokio::test]
async fn test_rejection_fails_whole_reduction() {
    let calls = Arc::new(AtomicUsize::new(0));
    let c = calls.clone();
    let q = qq(
        ["", "", ""],
        vec![
            unquote_fn(move || {
                c.fetch_add(1, Ordering::SeqCst);
                Some(Hole::from(1))
            }),
            unquote_async(|| async { Err(QqError::rejected("backend down")) }),
        ],
    );

    let err = q.export_async().await.unwrap_err();
    assert!(matches!(err, QqError::Rejected { ref message, .. } if message == "backend down"));
    let err = q.evaluated_async().await.unwrap_err();
    assert!(matches!(err, QqError::Rejected { .. }));
    let err = q.dispatch_async(|_, _| async {}).await.unwrap_err();
    assert!(matches!(err, QqError::Rejected { .. }));

    // The source value is untouched and can be retried.
    assert!(!q.is_reduced());
    assert_eq!(q.hole_count(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_rejection_is_shared_by_awaitable() {
    let q = qq(["", ""], vec![unquote_future(async { Err(QqError::rejected("once")) })]);
    for _ in 0..2 {
        let err = q.export_async().await.unwrap_err();
        assert!(matches!(err, QqError::Rejected { ref message, .. } if message == "once"));
    }
}

#[tokio::test]
async fn test_evaluated_async_snapshot() {
    let calls = Arc::new(AtomicUsize::new(0));
    let c = calls.clone();
    let q = qq(
        ["n=", ""],
        vec![unquote_async(move || {
            let n = c.fetch_add(1, Ordering::SeqCst) as i64;
            async move { Ok(Some(Hole::from(n))) }
        })],
    );

    let frozen = q.evaluated_async().await.unwrap();
    assert!(frozen.is_reduced());
    for _ in 0..3 {
        assert_eq!(frozen.export_async().await.unwrap().stringify(), "n=0");
    }
    assert_eq!(q.export_async().await.unwrap().stringify(), "n=1");
    // A frozen value also exports synchronously.
    assert_eq!(frozen.export().unwrap().stringify(), "n=0");
}

#[tokio::test]
async fn test_sync_export_rejects_async_source() {
    let q = qq(["", ""], vec![unquote_async(|| async { Ok(None) })]);
    let err = q.export().unwrap_err();
    assert!(matches!(
        err,
        QqError::AsyncSourceInSyncReduction(HoleSourceKind::AsyncThunk)
    ));
    assert_eq!(
        err.to_string(),
        "Synchronous reduction cannot resolve async thunk source"
    );

    // Reducing it asynchronously first makes it safe to export synchronously.
    let frozen = q.evaluated_async().await.unwrap();
    assert_tagged(&frozen.export().unwrap(), &[""], &[""], &[]);
}

#[tokio::test]
async fn test_configured_timeout() {
    let reducer = Reducer::new(
        ReductionConfig::from_str(r#"{"resolution_timeout": 20}"#).unwrap(),
    );
    let slow = qq(
        ["", ""],
        vec![unquote_async(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(Some(Hole::from(1)))
        })],
    );
    let err = reducer.export_async(&slow).await.unwrap_err();
    assert!(matches!(err, QqError::Timeout(d) if d == Duration::from_millis(20)));

    let fast = qq(["", ""], vec![unquote_async(|| async { Ok(Some(Hole::from(1))) })]);
    let tagged = reducer.export_async(&fast).await.unwrap();
    assert_eq!(tagged.values, vec![Value::Integer(1)]);
}
