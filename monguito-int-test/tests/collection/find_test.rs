use monguito::collection::DocumentId;
use monguito::errors::ErrorKind;
use monguito::filter::Criterion;
use monguito_int_test::test_util::{cleanup, create_test_context, insert_test_orders, run_test};
use serde_json::{json, Value};

#[test]
fn test_find_all_in_insertion_order() {
    run_test(
        create_test_context,
        |ctx| {
            let orders = ctx.orders()?;
            insert_test_orders(&orders)?;

            let cursor = orders.find(None)?;
            assert_eq!(cursor.count(), 3);
            assert_eq!(orders.count()?, 3);
            assert_eq!(
                cursor.ids(),
                vec![DocumentId::Int(1), DocumentId::Int(2), DocumentId::Int(3)]
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_find_by_equality() {
    run_test(
        create_test_context,
        |ctx| {
            let orders = ctx.orders()?;
            insert_test_orders(&orders)?;

            let criterion = Criterion::equals(json!({"seller": "Armani", "status": "Pending"}))?;
            let cursor = orders.find(Some(&criterion))?;
            let recipients: Vec<Value> = cursor.iter().filter_map(|doc| doc.get("recipient")).collect();
            assert_eq!(recipients, vec![json!("Juan"), json!("Luis")]);

            let by_items = orders.find(Some(&Criterion::field("items", json!(["bag"]))))?;
            assert_eq!(by_items.ids(), vec![DocumentId::Int(2)]);

            let none = orders.find(Some(&Criterion::field("seller", "Prada")))?;
            assert!(none.is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_find_by_predicate() {
    run_test(
        create_test_context,
        |ctx| {
            let orders = ctx.orders()?;
            insert_test_orders(&orders)?;

            let big = Criterion::predicate(|doc| {
                doc.get("total").and_then(Value::as_i64).unwrap_or(0) >= 700
            });
            assert_eq!(orders.find(Some(&big))?.ids(), vec![DocumentId::Int(2), DocumentId::Int(3)]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_find_one() {
    run_test(
        create_test_context,
        |ctx| {
            let orders = ctx.orders()?;
            insert_test_orders(&orders)?;

            let armani = orders.find_one(Some(&Criterion::field("seller", "Armani")))?;
            assert_eq!(armani.map(|doc| doc.id().clone()), Some(DocumentId::Int(1)));
            assert!(orders.find_one(Some(&Criterion::field("seller", "Prada")))?.is_none());
            assert!(ctx.users()?.find_one(None)?.is_none());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_get_validates_id() {
    run_test(
        create_test_context,
        |ctx| {
            let orders = ctx.orders()?;
            insert_test_orders(&orders)?;

            assert!(orders.get(2)?.is_some());
            assert!(orders.get(99)?.is_none());
            assert!(orders.get("0F4C2A6E-9D53-469F-BF4E-D056A3BE403C")?.is_none());
            for id in [json!(-1), json!(1.5), json!("2"), json!(null), json!({"_id": 2})] {
                assert_eq!(orders.get(id).unwrap_err().kind(), &ErrorKind::InvalidId);
            }
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_find_with_dangling_index_entry_fails() {
    run_test(
        create_test_context,
        |ctx| {
            let orders = ctx.orders()?;
            insert_test_orders(&orders)?;
            ctx.storage().remove("orders-2")?;

            let err = orders.find(None).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::IndexCorrupted);
            assert_eq!(orders.count()?, 3);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_find_with_unreadable_index_fails() {
    run_test(
        create_test_context,
        |ctx| {
            let orders = ctx.orders()?;
            ctx.storage().set("orders", "not json")?;

            assert_eq!(orders.find(None).unwrap_err().kind(), &ErrorKind::IndexCorrupted);
            assert_eq!(orders.count().unwrap_err().kind(), &ErrorKind::IndexCorrupted);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_find_sees_writes_from_other_handles() {
    run_test(
        create_test_context,
        |ctx| {
            let orders = ctx.orders()?;
            let same_orders = ctx.db().collection("orders")?;
            orders.insert(json!({"total": 1}))?;
            assert_eq!(same_orders.find(None)?.count(), 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_sorted_find() {
    run_test(
        create_test_context,
        |ctx| {
            let orders = ctx.orders()?;
            insert_test_orders(&orders)?;

            let sorted = orders.find(None)?.sort("seller, total DESC")?;
            assert_eq!(
                sorted.ids(),
                vec![DocumentId::Int(3), DocumentId::Int(1), DocumentId::Int(2)]
            );
            Ok(())
        },
        cleanup,
    )
}
