//! Live integration tests for goodslink-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/goodslink-db/`), so `"../../migrations"` resolves to the workspace
//! migration directory.

use goodslink_core::{Actor, Authorizer, ContentType, GoodsStore, NewProductRecord};
use goodslink_db::{
    content_key, find_draft_by_content, find_draft_by_title, get_goods, grant_permission,
    has_permission, insert_goods, revoke_permission, DbError, PgAuthorizer, PgGoodsStore,
};
use rust_decimal::Decimal;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn make_record(owner_id: i64, title: &str, ready_content: &str) -> NewProductRecord {
    NewProductRecord {
        owner_id,
        thread_id: 0,
        platform_id: "998877".to_string(),
        title: title.to_string(),
        image_path: "https://img.alicdn.com/a.jpg".to_string(),
        price: Decimal::new(5900, 2),
        goods_type: 0,
        status: 0,
        ready_content: ready_content.to_string(),
        detail_content: "https://item.taobao.com/item.htm?id=998877".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Section 1: post_goods
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn insert_goods_round_trips_every_column(pool: sqlx::PgPool) {
    let record = make_record(7, "保温杯", "看看 https://item.taobao.com/item.htm?id=998877");
    let row = insert_goods(&pool, &record)
        .await
        .expect("insert_goods failed");

    assert!(row.id > 0);
    assert_eq!(row.user_id, 7);
    assert_eq!(row.post_id, 0);
    assert_eq!(row.title, "保温杯");
    assert_eq!(row.price, Decimal::new(5900, 2));
    assert_eq!(row.goods_type, 0);
    assert_eq!(row.ready_content, record.ready_content);

    let hash: String =
        sqlx::query_scalar("SELECT ready_content_hash FROM post_goods WHERE id = $1")
            .bind(row.id)
            .fetch_one(&pool)
            .await
            .expect("hash query failed");
    assert_eq!(hash, content_key(&record.ready_content));

    let fetched = get_goods(&pool, row.id).await.expect("get_goods failed");
    assert_eq!(fetched.id, row.id);
}

#[sqlx::test(migrations = "../../migrations")]
async fn get_goods_missing_row_is_not_found(pool: sqlx::PgPool) {
    let err = get_goods(&pool, 424_242).await.unwrap_err();
    assert!(matches!(err, DbError::NotFound), "got: {err:?}");
}

#[sqlx::test(migrations = "../../migrations")]
async fn find_draft_by_content_is_scoped_to_owner_and_drafts(pool: sqlx::PgPool) {
    let text = "https://item.taobao.com/item.htm?id=1";
    let mine = insert_goods(&pool, &make_record(7, "A", text))
        .await
        .expect("insert mine");
    insert_goods(&pool, &make_record(8, "B", text))
        .await
        .expect("insert theirs");
    let mut published = make_record(7, "C", "published text");
    published.thread_id = 55;
    insert_goods(&pool, &published).await.expect("insert published");

    let found = find_draft_by_content(&pool, 7, text)
        .await
        .expect("query failed")
        .expect("draft found");
    assert_eq!(found.id, mine.id);

    let none = find_draft_by_content(&pool, 7, "published text")
        .await
        .expect("query failed");
    assert!(none.is_none(), "published rows are not drafts");
}

#[sqlx::test(migrations = "../../migrations")]
async fn find_draft_returns_newest_match(pool: sqlx::PgPool) {
    let text = "https://item.jd.com/100.html";
    insert_goods(&pool, &make_record(7, "京东商品", text))
        .await
        .expect("first");
    let newer = insert_goods(&pool, &make_record(7, "京东商品", text))
        .await
        .expect("second");

    let by_content = find_draft_by_content(&pool, 7, text)
        .await
        .expect("query failed")
        .expect("found");
    assert_eq!(by_content.id, newer.id);

    let by_title = find_draft_by_title(&pool, 7, "京东商品")
        .await
        .expect("query failed")
        .expect("found");
    assert_eq!(by_title.id, newer.id);
}

#[sqlx::test(migrations = "../../migrations")]
async fn pg_goods_store_implements_collaborator(pool: sqlx::PgPool) {
    let store = PgGoodsStore::new(pool);
    let stored = store
        .insert(make_record(7, "不锈钢保温杯", "【不锈钢保温杯】https://m.tb.cn/h.x"))
        .await
        .expect("insert");

    let by_title = store
        .find_draft_by_title(7, "不锈钢保温杯")
        .await
        .expect("query")
        .expect("found");
    assert_eq!(by_title.id, stored.id);
    assert!(by_title.is_draft());

    let miss = store
        .find_draft_by_content(7, "something else")
        .await
        .expect("query");
    assert!(miss.is_none());
}

// ---------------------------------------------------------------------------
// Section 2: actor_permissions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn permission_grant_and_revoke(pool: sqlx::PgPool) {
    assert!(!has_permission(&pool, 7, "createThread.goods").await.unwrap());

    grant_permission(&pool, 7, "createThread.goods")
        .await
        .expect("grant");
    grant_permission(&pool, 7, "createThread.goods")
        .await
        .expect("second grant is a no-op");
    assert!(has_permission(&pool, 7, "createThread.goods").await.unwrap());

    assert!(revoke_permission(&pool, 7, "createThread.goods").await.unwrap());
    assert!(!revoke_permission(&pool, 7, "createThread.goods").await.unwrap());
    assert!(!has_permission(&pool, 7, "createThread.goods").await.unwrap());
}

#[sqlx::test(migrations = "../../migrations")]
async fn pg_authorizer_checks_goods_permission(pool: sqlx::PgPool) {
    grant_permission(&pool, 7, "createThread.goods")
        .await
        .expect("grant");
    let authorizer = PgAuthorizer::new(pool);

    assert!(authorizer
        .can_create(&Actor { id: 7 }, ContentType::Goods)
        .await
        .unwrap());
    assert!(!authorizer
        .can_create(&Actor { id: 8 }, ContentType::Goods)
        .await
        .unwrap());
}
