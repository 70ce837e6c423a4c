//! End-to-end device flows over an on-disk store

use btn_device::notifications::TracingNotifier;
use btn_device::{AppContext, Config, DeviceStore, StoreKey};
use shared::models::{Dashboard, NotificationKind, OrderStatus, SenderType, StaffRole};
use shared::{AppError, ErrorCode};
use std::sync::Arc;

fn context(dir: &tempfile::TempDir) -> AppContext {
    let store = DeviceStore::open(dir.path().join("device.redb")).unwrap();
    AppContext::with_store(store, Arc::new(TracingNotifier)).unwrap()
}

#[test]
fn test_guest_to_waiter_flow() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(&dir);

    // Guest picks a table and orders
    assert_eq!(ctx.session.login_as_guest().unwrap(), Dashboard::TableSelection);
    ctx.session.select_table("table_5").unwrap();

    let pho = ctx.catalog.get("6").unwrap().clone();
    let tikka = ctx.catalog.find_by_name("Gà Tikka Masala").unwrap().clone();
    ctx.cart.add_or_increment(&pho, 2, None).unwrap();
    ctx.cart
        .add_or_increment(&tikka, 1, Some("ít cay".to_string()))
        .unwrap();
    assert_eq!(ctx.cart.total().unwrap(), 210000);
    assert_eq!(ctx.cart.count().unwrap(), 3);

    let order = ctx.orders.checkout(None, None).unwrap();
    assert_eq!(order.table_id, "table_5");
    assert_eq!(order.table, "Table 5");
    assert!(ctx.cart.lines().unwrap().is_empty());

    // Order receiver confirms payment
    assert_eq!(ctx.session.login("receiver1", "123456").unwrap(), Dashboard::OrderReceiver);
    ctx.session.require_role(StaffRole::Receiver).unwrap();
    let paid = ctx.orders.confirm_payment(&order.id).unwrap();
    assert_eq!(paid.status, OrderStatus::Paid);
    assert_eq!(paid.waiter_id.as_deref(), Some("waiter2"));

    // Table 5 is now taken
    let err: AppError = ctx.session.select_table("table_5").unwrap_err().into();
    assert_eq!(err.code, ErrorCode::TableOccupied);

    // Waiter serves it
    ctx.session.login("waiter2", "123456").unwrap();
    let mine = ctx.orders.orders_for_waiter("waiter2").unwrap();
    assert_eq!(mine.len(), 1);
    ctx.orders.complete_service(&mine[0].id).unwrap();

    assert!(ctx.orders.paid_orders().unwrap().is_empty());
    assert_eq!(ctx.orders.history().unwrap().len(), 1);
    assert!(ctx.session.tables().unwrap().iter().all(|t| !t.occupied));

    let kinds: Vec<NotificationKind> = ctx
        .notifications
        .history()
        .unwrap()
        .into_iter()
        .map(|n| n.kind)
        .collect();
    assert_eq!(kinds, vec![NotificationKind::OrderReady, NotificationKind::OrderPlaced]);
}

#[test]
fn test_failed_checkout_keeps_cart() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(&dir);

    let err: AppError = ctx.orders.checkout(Some("table_1"), Some("Table 1")).unwrap_err().into();
    assert_eq!(err.code, ErrorCode::CartEmpty);
    assert!(ctx.orders.pending_orders().unwrap().is_empty());
}

#[test]
fn test_cancelled_order_never_reaches_history() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(&dir);

    ctx.cart
        .add_or_increment(ctx.catalog.get("18").unwrap(), 1, None)
        .unwrap();
    let order = ctx.orders.checkout(Some("table_11"), Some("Table 11")).unwrap();
    let cancelled = ctx.orders.cancel_order(&order.id).unwrap();

    assert_eq!(cancelled.status.label(), "Đã huỷ");
    assert_eq!(cancelled.waiter_id.as_deref(), Some("waiter4"));
    assert!(ctx.orders.history().unwrap().is_empty());
    assert_eq!(ctx.orders.orders_for_waiter("waiter4").unwrap().len(), 1);
}

#[test]
fn test_state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let order_id = {
        let ctx = context(&dir);
        ctx.session.login("waiter1", "123456").unwrap();
        ctx.cart
            .add_or_increment(ctx.catalog.get("1").unwrap(), 1, None)
            .unwrap();
        ctx.orders.checkout(Some("table_2"), Some("Table 2")).unwrap().id
    };

    let ctx = context(&dir);
    let pending = ctx.orders.pending_orders().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, order_id);
    assert_eq!(
        ctx.session.current().unwrap().and_then(|s| s.role()),
        Some(StaffRole::Waiter)
    );
}

#[test]
fn test_messaging_between_waiter_and_table() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(&dir);

    ctx.messaging
        .send("table_7", "Món ăn đã sẵn sàng, chúng tôi sẽ mang ra ngay.", SenderType::Waiter)
        .unwrap();
    ctx.messaging.quick_reply("table_7", "OK, mình đợi").unwrap();

    assert_eq!(ctx.messaging.unread_count("table_7").unwrap(), 1);
    ctx.messaging.mark_read("table_7").unwrap();
    assert!(ctx.messaging.unread("table_7").unwrap().is_empty());

    let conversations = ctx.messaging.conversations().unwrap();
    assert_eq!(conversations.len(), 1);
    assert_eq!(conversations[0].message_count, 2);

    let notes = ctx.notifications.history().unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].kind, NotificationKind::WaiterMessage);
}

#[test]
fn test_stored_json_matches_device_format() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(&dir);

    ctx.cart
        .add_or_increment(ctx.catalog.get("2").unwrap(), 1, None)
        .unwrap();
    ctx.orders.checkout(Some("table_1"), Some("Table 1")).unwrap();

    let raw: serde_json::Value = ctx.store.get(StoreKey::Orders).unwrap().unwrap();
    let order = &raw[0];
    assert_eq!(order["status"], "Đang chờ thanh toán");
    assert_eq!(order["tableId"], "table_1");
    assert_eq!(order["items"][0]["name"], "Gà Tikka Masala");
    assert_eq!(order["items"][0]["quantity"], 1);
    assert!(order["createdAt"].is_string());
}

#[test]
fn test_initialize_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::with_work_dir(dir.path().join("work").to_string_lossy().to_string());
    config.staff_config = None;
    config.assistant_keys = vec!["k1".to_string()];

    let ctx = AppContext::initialize(&config).unwrap();
    assert!(config.store_path().exists());
    assert_eq!(ctx.catalog.len(), 19);
    assert_eq!(ctx.staff.accounts().len(), 5);
}
