use monguito::collection::DocumentId;
use monguito::errors::ErrorKind;
use monguito::filter::Criterion;
use monguito_int_test::test_util::{cleanup, create_test_context, insert_test_orders, run_test};
use serde_json::json;

#[test]
fn test_remove_by_criterion() {
    run_test(
        create_test_context,
        |ctx| {
            let orders = ctx.orders()?;
            insert_test_orders(&orders)?;

            let result = orders.remove(Some(&Criterion::field("seller", "Armani")))?;
            assert_eq!(result.affected_ids(), &[DocumentId::Int(1), DocumentId::Int(3)]);
            assert_eq!(orders.count()?, 1);
            assert!(ctx.stored_value("orders-1")?.is_none());
            assert!(ctx.stored_value("orders-3")?.is_none());
            assert_eq!(ctx.stored_value("orders")?, Some(json!({"identity": 4, "ids": [2]})));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_remove_all() {
    run_test(
        create_test_context,
        |ctx| {
            let orders = ctx.orders()?;
            insert_test_orders(&orders)?;
            orders.insert(json!({"_id": "uuid"}))?;

            let result = orders.remove(None)?;
            assert_eq!(result.len(), 4);
            assert_eq!(orders.count()?, 0);
            assert!(orders.find(None)?.is_empty());
            // only the index record remains
            assert_eq!(ctx.storage().keys()?, vec!["orders".to_string()]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_remove_non_matching() {
    run_test(
        create_test_context,
        |ctx| {
            let orders = ctx.orders()?;
            insert_test_orders(&orders)?;

            let result = orders.remove(Some(&Criterion::field("seller", "Prada")))?;
            assert!(result.is_empty());
            assert_eq!(orders.count()?, 3);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_remove_in_empty_collection() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.users()?;
            assert!(users.remove(None)?.is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_document_remove_twice() {
    run_test(
        create_test_context,
        |ctx| {
            let orders = ctx.orders()?;
            let documents = insert_test_orders(&orders)?;
            let juan = &documents[0];

            juan.remove()?;
            assert!(juan.is_removed());
            assert_eq!(orders.count()?, 2);

            let err = juan.remove().unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::NotFound);
            assert_eq!(orders.count()?, 2);

            let err = juan.update(Some(&json!({"total": 1}))).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::NotFound);
            // stale fields are still readable
            assert_eq!(juan.get("recipient"), Some(json!("Juan")));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_remove_keeps_identity_counter() {
    run_test(
        create_test_context,
        |ctx| {
            let orders = ctx.orders()?;
            insert_test_orders(&orders)?;
            orders.remove(None)?;

            let next = orders.insert(json!({"total": 1}))?;
            assert_eq!(next.id(), &DocumentId::Int(4));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_juan_and_ana_scenario() {
    run_test(
        create_test_context,
        |ctx| {
            let orders = ctx.orders()?;
            let juan = orders.insert(json!({"recipient": "Juan", "total": 50}))?;
            assert_eq!(juan.get("_id"), Some(json!(1)));
            let ana = orders.insert(json!({"recipient": "Ana", "total": 70}))?;
            assert_eq!(ana.get("_id"), Some(json!(2)));

            assert_eq!(orders.find(Some(&Criterion::field("recipient", "Juan")))?.count(), 1);

            let first = orders.find(None)?.sort("total DESC")?.first();
            assert_eq!(first.and_then(|doc| doc.get("recipient")), Some(json!("Ana")));

            orders.remove(Some(&Criterion::equals(json!({"_id": 1}))?))?;
            assert!(orders.get(1)?.is_none());
            assert_eq!(orders.count()?, 1);
            Ok(())
        },
        cleanup,
    )
}
