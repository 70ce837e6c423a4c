//! Order lifecycle
//!
//! ```text
//! cart ──checkout──▶ orders (Pending)
//!                      │ confirm_payment ──▶ paidOrders (Paid, waiterId) + copy in history
//!                      │ cancel_order    ──▶ paidOrders (Cancelled, waiterId)
//!                                              │ complete_service ──▶ removed
//! ```
//!
//! An order sits in exactly one of `orders` / `paidOrders` at a time. Paying
//! or cancelling an order that already left `orders` reports it as processed.
//! `history` is append-only and only ever receives paid orders. Each
//! transition runs in one store transaction, so a failure leaves every list
//! as it was.

mod error;

pub use error::OrderError;

use crate::core::StaffDirectory;
use crate::notifications::NotificationCenter;
use crate::store::{DeviceStore, StoreKey, StoreTxn};
use shared::models::{CartLine, Notification, NotificationKind, Order, OrderStatus};
use std::collections::HashSet;
use std::sync::Arc;

/// Table used when checkout happens without a selected table
pub const UNKNOWN_TABLE_ID: &str = "UnknownTableId";
pub const UNKNOWN_TABLE_NAME: &str = "Unknown Table";

pub type OrderResult<T> = Result<T, OrderError>;

#[derive(Debug, Clone)]
pub struct OrderLifecycle {
    store: DeviceStore,
    staff: Arc<StaffDirectory>,
    notifications: NotificationCenter,
}

impl OrderLifecycle {
    pub fn new(
        store: DeviceStore,
        staff: Arc<StaffDirectory>,
        notifications: NotificationCenter,
    ) -> Self {
        Self {
            store,
            staff,
            notifications,
        }
    }

    // ========== Transitions ==========

    /// Turn the cart into a pending order and empty the cart
    ///
    /// Without an explicit table the device's selected table is used.
    pub fn checkout(&self, table_id: Option<&str>, table_name: Option<&str>) -> OrderResult<Order> {
        let order = self.store.transaction(|txn| -> OrderResult<Order> {
            let cart: Vec<CartLine> = txn.get_list(StoreKey::CartItems)?;
            if cart.is_empty() {
                return Err(OrderError::EmptyCart);
            }

            let table_id = match table_id {
                Some(id) => id.to_string(),
                None => txn
                    .get::<String>(StoreKey::SelectedTable)?
                    .unwrap_or_else(|| UNKNOWN_TABLE_ID.to_string()),
            };
            let table_name = match table_name {
                Some(name) => name.to_string(),
                None => txn
                    .get::<String>(StoreKey::SelectedTableName)?
                    .unwrap_or_else(|| UNKNOWN_TABLE_NAME.to_string()),
            };

            let order = Order::new(table_id, table_name, cart);
            let mut orders: Vec<Order> = txn.get_list(StoreKey::Orders)?;
            orders.push(order.clone());
            txn.set(StoreKey::Orders, &orders)?;
            txn.remove(StoreKey::CartItems)?;
            Ok(order)
        })?;

        tracing::info!(
            order_id = %order.id,
            table_id = %order.table_id,
            items = order.item_count(),
            total = order.total(),
            "Order placed"
        );
        self.notifications.deliver(
            Notification::new(
                NotificationKind::OrderPlaced,
                "Đặt hàng thành công!",
                format!(
                    "Đơn hàng {} với {} món đã được gửi đến bếp",
                    order.table,
                    order.item_count()
                ),
            )
            .for_table(&order.table_id),
        );
        Ok(order)
    }

    /// Mark a pending order paid and forward it to the table's waiter
    pub fn confirm_payment(&self, order_id: &str) -> OrderResult<Order> {
        let order = self.store.transaction(|txn| -> OrderResult<Order> {
            let order = self.forward(txn, order_id, OrderStatus::Paid)?;
            let mut history: Vec<Order> = txn.get_list(StoreKey::History)?;
            history.push(order.clone());
            txn.set(StoreKey::History, &history)?;
            Ok(order)
        })?;

        tracing::info!(
            order_id = %order.id,
            waiter_id = ?order.waiter_id,
            total = order.total(),
            "Payment confirmed"
        );
        Ok(order)
    }

    /// Cancel a pending order; the waiter still sees it, history does not
    pub fn cancel_order(&self, order_id: &str) -> OrderResult<Order> {
        let order = self
            .store
            .transaction(|txn| self.forward(txn, order_id, OrderStatus::Cancelled))?;

        tracing::info!(order_id = %order.id, waiter_id = ?order.waiter_id, "Order cancelled");
        Ok(order)
    }

    /// Move a pending order to `paidOrders` with a final status
    fn forward(&self, txn: &StoreTxn<'_>, order_id: &str, status: OrderStatus) -> OrderResult<Order> {
        let mut pending: Vec<Order> = txn.get_list(StoreKey::Orders)?;
        let Some(idx) = pending.iter().position(|o| o.id == order_id) else {
            return Err(Self::not_pending(txn, order_id)?);
        };

        let mut order = pending.remove(idx);
        order.status = status;
        order.waiter_id = self.staff.waiter_for_table(&order.table_id).map(String::from);
        if order.waiter_id.is_none() {
            tracing::warn!(order_id = %order.id, table_id = %order.table_id, "No waiter section for table");
        }

        let mut forwarded: Vec<Order> = txn.get_list(StoreKey::PaidOrders)?;
        forwarded.push(order.clone());

        txn.set(StoreKey::Orders, &pending)?;
        txn.set(StoreKey::PaidOrders, &forwarded)?;
        Ok(order)
    }

    /// Why an order is missing from `orders`: already forwarded or paid, or unknown
    fn not_pending(txn: &StoreTxn<'_>, order_id: &str) -> OrderResult<OrderError> {
        let forwarded: Vec<Order> = txn.get_list(StoreKey::PaidOrders)?;
        if let Some(order) = forwarded.iter().find(|o| o.id == order_id) {
            return Ok(OrderError::AlreadyProcessed {
                id: order_id.to_string(),
                status: order.status,
            });
        }
        let history: Vec<Order> = txn.get_list(StoreKey::History)?;
        if history.iter().any(|o| o.id == order_id) {
            return Ok(OrderError::AlreadyProcessed {
                id: order_id.to_string(),
                status: OrderStatus::Paid,
            });
        }
        Ok(OrderError::OrderNotFound(order_id.to_string()))
    }

    /// The waiter has served a forwarded order; history is untouched
    pub fn complete_service(&self, order_id: &str) -> OrderResult<Order> {
        let order = self.store.transaction(|txn| -> OrderResult<Order> {
            let mut forwarded: Vec<Order> = txn.get_list(StoreKey::PaidOrders)?;
            let idx = forwarded
                .iter()
                .position(|o| o.id == order_id)
                .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))?;
            let order = forwarded.remove(idx);
            txn.set(StoreKey::PaidOrders, &forwarded)?;
            Ok(order)
        })?;

        tracing::info!(order_id = %order.id, table_id = %order.table_id, "Service completed");
        if order.status == OrderStatus::Paid {
            let dishes: Vec<&str> = order.items.iter().map(|i| i.name.as_str()).collect();
            self.notifications.deliver(
                Notification::new(
                    NotificationKind::OrderReady,
                    "Món ăn đã sẵn sàng!",
                    format!("{}: {} đã được chuẩn bị xong", order.table, dishes.join(", ")),
                )
                .for_table(&order.table_id),
            );
        }
        Ok(order)
    }

    // ========== Queries ==========

    /// Orders waiting for payment confirmation
    pub fn pending_orders(&self) -> OrderResult<Vec<Order>> {
        Ok(self.store.get_list(StoreKey::Orders)?)
    }

    /// Paid and cancelled orders not yet served
    pub fn paid_orders(&self) -> OrderResult<Vec<Order>> {
        Ok(self.store.get_list(StoreKey::PaidOrders)?)
    }

    /// Forwarded orders for one waiter's dashboard
    pub fn orders_for_waiter(&self, username: &str) -> OrderResult<Vec<Order>> {
        Ok(self
            .paid_orders()?
            .into_iter()
            .filter(|o| o.waiter_id.as_deref() == Some(username))
            .collect())
    }

    /// Every paid order, oldest first
    pub fn history(&self) -> OrderResult<Vec<Order>> {
        Ok(self.store.get_list(StoreKey::History)?)
    }

    /// Tables with a forwarded order still on the floor
    pub fn occupied_tables(&self) -> OrderResult<HashSet<String>> {
        Ok(occupied_table_ids(&self.paid_orders()?))
    }
}

/// Table ids referenced by forwarded orders
pub fn occupied_table_ids(forwarded: &[Order]) -> HashSet<String> {
    forwarded.iter().map(|o| o.table_id.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::TracingNotifier;
    use shared::models::Dish;
    use shared::{AppError, ErrorCode};

    fn lifecycle() -> (DeviceStore, OrderLifecycle) {
        let store = DeviceStore::open_in_memory().unwrap();
        let notifications = NotificationCenter::new(store.clone(), Arc::new(TracingNotifier));
        let lifecycle = OrderLifecycle::new(
            store.clone(),
            Arc::new(StaffDirectory::default()),
            notifications,
        );
        (store, lifecycle)
    }

    fn line(id: &str, price: i64, quantity: i32) -> CartLine {
        let dish = Dish {
            id: id.to_string(),
            name: format!("Dish {}", id),
            price,
            category: "Dinner".to_string(),
            description: String::new(),
            calories: 350,
            cooking_time: "30 phút".to_string(),
            servings: 2,
            image: String::new(),
            ingredients: vec![],
            instructions: vec![],
        };
        CartLine::from_dish(&dish, quantity, None)
    }

    fn fill_cart(store: &DeviceStore) -> Vec<CartLine> {
        let cart = vec![line("A", 70000, 2), line("B", 50000, 1)];
        store.set(StoreKey::CartItems, &cart).unwrap();
        cart
    }

    #[test]
    fn test_checkout_snapshots_cart_and_clears_it() {
        let (store, orders) = lifecycle();
        let cart = fill_cart(&store);

        let order = orders.checkout(Some("table_5"), Some("Table 5")).unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.items, cart);
        assert_eq!(order.total(), 190000);
        assert!(order.waiter_id.is_none());
        assert_eq!(orders.pending_orders().unwrap(), vec![order]);
        assert!(store.get_list::<CartLine>(StoreKey::CartItems).unwrap().is_empty());
    }

    #[test]
    fn test_checkout_empty_cart_changes_nothing() {
        let (store, orders) = lifecycle();

        let err = orders.checkout(Some("table_1"), Some("Table 1")).unwrap_err();
        assert!(matches!(err, OrderError::EmptyCart));
        assert!(orders.pending_orders().unwrap().is_empty());
        assert!(!store.contains(StoreKey::Orders).unwrap());
    }

    #[test]
    fn test_checkout_uses_selected_table_then_unknown() {
        let (store, orders) = lifecycle();

        fill_cart(&store);
        let order = orders.checkout(None, None).unwrap();
        assert_eq!(order.table_id, UNKNOWN_TABLE_ID);
        assert_eq!(order.table, UNKNOWN_TABLE_NAME);

        store.set(StoreKey::SelectedTable, "table_7").unwrap();
        store.set(StoreKey::SelectedTableName, "Table 7").unwrap();
        fill_cart(&store);
        let order = orders.checkout(None, None).unwrap();
        assert_eq!(order.table_id, "table_7");
        assert_eq!(order.table, "Table 7");
    }

    #[test]
    fn test_confirm_payment_forwards_and_records_history() {
        let (store, orders) = lifecycle();
        fill_cart(&store);
        let placed = orders.checkout(Some("table_5"), Some("Table 5")).unwrap();

        let paid = orders.confirm_payment(&placed.id).unwrap();

        assert_eq!(paid.status, OrderStatus::Paid);
        assert_eq!(paid.waiter_id.as_deref(), Some("waiter2"));
        assert!(orders.pending_orders().unwrap().is_empty());
        assert_eq!(orders.paid_orders().unwrap(), vec![paid.clone()]);
        assert_eq!(orders.history().unwrap(), vec![paid]);
    }

    #[test]
    fn test_cancel_order_skips_history() {
        let (store, orders) = lifecycle();
        fill_cart(&store);
        let placed = orders.checkout(Some("table_10"), Some("Table 10")).unwrap();

        let cancelled = orders.cancel_order(&placed.id).unwrap();

        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert_eq!(cancelled.waiter_id.as_deref(), Some("waiter4"));
        assert!(orders.pending_orders().unwrap().is_empty());
        assert_eq!(orders.paid_orders().unwrap().len(), 1);
        assert!(orders.history().unwrap().is_empty());
    }

    #[test]
    fn test_complete_service_keeps_history() {
        let (store, orders) = lifecycle();
        fill_cart(&store);
        let placed = orders.checkout(Some("table_2"), Some("Table 2")).unwrap();
        orders.confirm_payment(&placed.id).unwrap();

        orders.complete_service(&placed.id).unwrap();

        assert!(orders.paid_orders().unwrap().is_empty());
        assert_eq!(orders.history().unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_order_changes_nothing() {
        let (store, orders) = lifecycle();
        fill_cart(&store);
        let placed = orders.checkout(Some("table_2"), Some("Table 2")).unwrap();

        assert!(matches!(
            orders.confirm_payment("missing"),
            Err(OrderError::OrderNotFound(_))
        ));
        assert!(matches!(
            orders.cancel_order("missing"),
            Err(OrderError::OrderNotFound(_))
        ));
        assert!(matches!(
            orders.complete_service(&placed.id),
            Err(OrderError::OrderNotFound(_))
        ));

        assert_eq!(orders.pending_orders().unwrap().len(), 1);
        assert!(orders.paid_orders().unwrap().is_empty());
        assert!(orders.history().unwrap().is_empty());
    }

    #[test]
    fn test_paid_order_cannot_be_confirmed_twice() {
        let (store, orders) = lifecycle();
        fill_cart(&store);
        let placed = orders.checkout(Some("table_2"), Some("Table 2")).unwrap();
        orders.confirm_payment(&placed.id).unwrap();

        let err = orders.confirm_payment(&placed.id).unwrap_err();
        assert!(matches!(
            err,
            OrderError::AlreadyProcessed { status: OrderStatus::Paid, .. }
        ));
        assert_eq!(AppError::from(err).code, ErrorCode::OrderAlreadyPaid);
        assert_eq!(orders.history().unwrap().len(), 1);
        assert_eq!(orders.paid_orders().unwrap().len(), 1);

        // Still reported as processed once served and gone from paidOrders
        orders.complete_service(&placed.id).unwrap();
        assert!(matches!(
            orders.cancel_order(&placed.id),
            Err(OrderError::AlreadyProcessed { .. })
        ));
    }

    #[test]
    fn test_cancelled_order_cannot_be_confirmed() {
        let (store, orders) = lifecycle();
        fill_cart(&store);
        let placed = orders.checkout(Some("table_4"), Some("Table 4")).unwrap();
        orders.cancel_order(&placed.id).unwrap();

        assert!(matches!(
            orders.confirm_payment(&placed.id),
            Err(OrderError::AlreadyProcessed { status: OrderStatus::Cancelled, .. })
        ));
        assert!(orders.history().unwrap().is_empty());
    }

    #[test]
    fn test_orders_for_waiter_and_occupancy() {
        let (store, orders) = lifecycle();
        for (id, name) in [("table_1", "Table 1"), ("table_4", "Table 4"), ("table_2", "Table 2")] {
            fill_cart(&store);
            let placed = orders.checkout(Some(id), Some(name)).unwrap();
            orders.confirm_payment(&placed.id).unwrap();
        }

        let mine = orders.orders_for_waiter("waiter1").unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|o| o.waiter_id.as_deref() == Some("waiter1")));
        assert_eq!(orders.orders_for_waiter("waiter3").unwrap().len(), 0);

        let occupied = orders.occupied_tables().unwrap();
        assert!(occupied.contains("table_4"));
        assert!(!occupied.contains("table_3"));
    }

    #[test]
    fn test_notifications_for_placed_and_ready() {
        let (store, orders) = lifecycle();
        fill_cart(&store);
        let placed = orders.checkout(Some("table_3"), Some("Table 3")).unwrap();
        orders.confirm_payment(&placed.id).unwrap();
        orders.complete_service(&placed.id).unwrap();

        let history: Vec<Notification> = store.get_list(StoreKey::NotificationHistory).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].kind, NotificationKind::OrderReady);
        assert_eq!(history[0].body, "Table 3: Dish A, Dish B đã được chuẩn bị xong");
        assert_eq!(history[1].kind, NotificationKind::OrderPlaced);
        assert_eq!(history[1].body, "Đơn hàng Table 3 với 3 món đã được gửi đến bếp");
    }
}
