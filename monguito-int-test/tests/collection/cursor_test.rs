use monguito::collection::DocumentId;
use monguito::errors::ErrorKind;
use monguito::filter::Criterion;
use monguito_int_test::test_util::{cleanup, create_test_context, insert_test_orders, run_test};
use serde_json::{json, Value};

#[test]
fn test_chained_queries() {
    run_test(
        create_test_context,
        |ctx| {
            let orders = ctx.orders()?;
            insert_test_orders(&orders)?;

            let cursor = orders.find(None)?;
            let pending = cursor.find(Some(&Criterion::field("status", "Pending")));
            let sorted = pending.sort("total DESC")?;

            assert_eq!(cursor.count(), 3);
            assert_eq!(pending.ids(), vec![DocumentId::Int(1), DocumentId::Int(3)]);
            assert_eq!(sorted.ids(), vec![DocumentId::Int(3), DocumentId::Int(1)]);
            assert_eq!(sorted.first().map(|doc| doc.id().clone()), Some(DocumentId::Int(3)));
            assert_eq!(sorted.last().map(|doc| doc.id().clone()), Some(DocumentId::Int(1)));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_cursor_is_a_snapshot() {
    run_test(
        create_test_context,
        |ctx| {
            let orders = ctx.orders()?;
            insert_test_orders(&orders)?;

            let cursor = orders.find(None)?;
            orders.insert(json!({"total": 1}))?;
            assert_eq!(cursor.count(), 3);
            assert_eq!(orders.find(None)?.count(), 4);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_cursor_get_and_find_one() {
    run_test(
        create_test_context,
        |ctx| {
            let orders = ctx.orders()?;
            insert_test_orders(&orders)?;
            let cursor = orders.find(Some(&Criterion::field("seller", "Armani")))?;

            assert!(cursor.get(3)?.is_some());
            assert!(cursor.get(2)?.is_none());
            assert_eq!(cursor.get("two").unwrap_err().kind(), &ErrorKind::InvalidId);

            let luis = cursor.find_one(Some(&Criterion::field("recipient", "Luis")));
            assert_eq!(luis.map(|doc| doc.id().clone()), Some(DocumentId::Int(3)));
            assert_eq!(cursor.find_one(None).map(|doc| doc.id().clone()), Some(DocumentId::Int(1)));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_cursor_remove() {
    run_test(
        create_test_context,
        |ctx| {
            let orders = ctx.orders()?;
            insert_test_orders(&orders)?;

            let mut cursor = orders.find(Some(&Criterion::field("status", "Pending")))?;
            let result = cursor.remove()?;
            assert_eq!(result.len(), 2);
            assert_eq!(cursor.count(), 0);
            assert!(cursor.first().is_none());
            assert_eq!(orders.count()?, 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_cursor_sort_with_missing_fields() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.users()?;
            users.insert(json!({"k": 2}))?;
            users.insert(json!({"k": 1}))?;
            users.insert(json!({"k": 1, "t": "b"}))?;
            users.insert(json!({"k": 1, "t": "a"}))?;

            let sorted = users.find(None)?.sort("k ASC, t ASC")?;
            assert_eq!(
                sorted.ids(),
                vec![DocumentId::Int(2), DocumentId::Int(4), DocumentId::Int(3), DocumentId::Int(1)]
            );

            let descending = users.find(None)?.sort("k desc,  t   DESC")?;
            assert_eq!(
                descending.ids(),
                vec![DocumentId::Int(1), DocumentId::Int(3), DocumentId::Int(4), DocumentId::Int(2)]
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_cursor_sort_rejects_malformed_expressions() {
    run_test(
        create_test_context,
        |ctx| {
            let orders = ctx.orders()?;
            insert_test_orders(&orders)?;
            let cursor = orders.find(None)?;

            for expression in ["", "total,", "total UP", "total ASC extra"] {
                let err = cursor.sort(expression).unwrap_err();
                assert_eq!(err.kind(), &ErrorKind::InvalidSortExpression);
            }
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_cursor_render() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.users()?;
            users.insert(json!({"name": "Ana"}))?;
            let cursor = users.find(None)?;

            let rendered = cursor.render()?;
            assert_eq!(rendered, "[\n\t{\n\t\t\"_id\": 1,\n\t\t\"name\": \"Ana\"\n\t}\n]");
            let parsed: Value = serde_json::from_str(&rendered)?;
            assert_eq!(parsed, json!([{"_id": 1, "name": "Ana"}]));

            let document = cursor.first().expect("one user inserted");
            assert_eq!(document.render()?, "{\n\t\"_id\": 1,\n\t\"name\": \"Ana\"\n}");
            Ok(())
        },
        cleanup,
    )
}
