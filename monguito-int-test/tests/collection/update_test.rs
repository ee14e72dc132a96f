use monguito::collection::DocumentId;
use monguito::errors::ErrorKind;
use monguito::filter::Criterion;
use monguito_int_test::test_util::{cleanup, create_test_context, insert_test_orders, run_test};
use serde_json::json;

#[test]
fn test_update_by_criterion() {
    run_test(
        create_test_context,
        |ctx| {
            let orders = ctx.orders()?;
            insert_test_orders(&orders)?;

            let updated = orders.update(
                &Criterion::field("status", "Pending"),
                &json!({"status": "Delivered", "courier": "DHL"}),
            )?;
            assert_eq!(updated.ids(), vec![DocumentId::Int(1), DocumentId::Int(3)]);
            assert!(updated.iter().all(|doc| doc.get("courier") == Some(json!("DHL"))));

            let delivered = orders.find(Some(&Criterion::field("status", "Delivered")))?;
            assert_eq!(delivered.count(), 3);
            assert_eq!(ctx.stored_value("orders-3")?.map(|doc| doc["courier"].clone()), Some(json!("DHL")));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_update_never_changes_id() {
    run_test(
        create_test_context,
        |ctx| {
            let orders = ctx.orders()?;
            insert_test_orders(&orders)?;

            orders.update(&Criterion::field("recipient", "Ana"), &json!({"_id": 42, "total": 900}))?;

            let ana = orders.get(2)?.map(|doc| doc.to_value());
            assert_eq!(ana.as_ref().map(|doc| doc["total"].clone()), Some(json!(900)));
            assert_eq!(ana.map(|doc| doc["_id"].clone()), Some(json!(2)));
            assert!(orders.get(42)?.is_none());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_update_rejects_non_object_payload() {
    run_test(
        create_test_context,
        |ctx| {
            let orders = ctx.orders()?;
            insert_test_orders(&orders)?;
            let before = ctx.stored_value("orders-1")?;

            let err = orders
                .update(&Criterion::field("recipient", "Juan"), &json!(["status"]))
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidArgument);
            assert_eq!(ctx.stored_value("orders-1")?, before);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_document_update_with_payload() {
    run_test(
        create_test_context,
        |ctx| {
            let orders = ctx.orders()?;
            let juan = orders.insert(json!({"recipient": "Juan", "total": 50}))?;

            let same = juan.update(Some(&json!({"total": 60})))?;
            assert_eq!(same.get("total"), Some(json!(60)));
            assert_eq!(
                ctx.stored_value("orders-1")?,
                Some(json!({"_id": 1, "recipient": "Juan", "total": 60}))
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_document_update_persists_in_memory_edits() {
    run_test(
        create_test_context,
        |ctx| {
            let orders = ctx.orders()?;
            let juan = orders.insert(json!({"recipient": "Juan", "total": 50}))?;

            juan.put("total", 75)?;
            juan.put("gift", true)?;
            assert_eq!(orders.get(1)?.and_then(|doc| doc.get("total")), Some(json!(50)));

            juan.update(None)?;
            let stored = orders.get(1)?.map(|doc| doc.to_value());
            assert_eq!(stored, Some(json!({"_id": 1, "recipient": "Juan", "total": 75, "gift": true})));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_document_update_after_external_removal() {
    run_test(
        create_test_context,
        |ctx| {
            let orders = ctx.orders()?;
            insert_test_orders(&orders)?;
            let juan = orders.get(1)?;
            orders.remove(Some(&Criterion::field("recipient", "Juan")))?;

            let juan = juan.expect("document 1 was inserted");
            let err = juan.update(Some(&json!({"total": 1}))).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::NotFound);
            assert!(ctx.stored_value("orders-1")?.is_none());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_cursor_update_returns_same_cursor() {
    run_test(
        create_test_context,
        |ctx| {
            let orders = ctx.orders()?;
            insert_test_orders(&orders)?;

            let cursor = orders.find(Some(&Criterion::field("seller", "Armani")))?;
            let count = cursor.update(Some(&json!({"seller": "Versace"})))?.count();
            assert_eq!(count, 2);
            assert!(orders.find(Some(&Criterion::field("seller", "Armani")))?.is_empty());
            assert_eq!(orders.find(Some(&Criterion::field("seller", "Versace")))?.count(), 2);
            Ok(())
        },
        cleanup,
    )
}
