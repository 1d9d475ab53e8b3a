//! Order store: the only persistence channel of the engine
//!
//! Orders are kept in two collections. The workshop collection holds each
//! workshop's live orders; the global collection holds every order across
//! workshops, including archived records imported from older systems.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::Order;

/// Which collection a listing reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", content = "workshop_id", rename_all = "snake_case")]
pub enum OrderScope {
    /// Workshop collection, narrowed to one workshop when an id is given
    Workshop(Option<Uuid>),
    /// Cross-workshop collection
    Global,
}

impl OrderScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderScope::Workshop(_) => "workshop",
            OrderScope::Global => "global",
        }
    }
}

/// Repository of orders, injected into the services
pub trait OrderStore: Send + Sync {
    /// Point-in-time snapshot of the orders in `scope`, oldest first
    fn list_orders(&self, scope: &OrderScope) -> AppResult<Vec<Order>>;

    fn append_order(&self, order: Order) -> AppResult<()>;

    /// Replace a stored order with the same id
    fn update_order(&self, order: Order) -> AppResult<()>;

    fn find_order(&self, order_id: Uuid) -> AppResult<Option<Order>> {
        Ok(self
            .list_orders(&OrderScope::Global)?
            .into_iter()
            .find(|order| order.id == order_id))
    }
}

/// Serialized form of the whole store, used to seed it at startup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// Live orders keyed by workshop id
    #[serde(default)]
    pub workshops: BTreeMap<Uuid, Vec<Order>>,
    /// Cross-workshop and archived orders
    #[serde(default)]
    pub global: Vec<Order>,
}

/// In-memory order store shared by the HTTP handlers
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    data: RwLock<StoreSnapshot>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        Self {
            data: RwLock::new(snapshot),
        }
    }

    /// Load a JSON snapshot from disk
    pub fn load_seed(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::StorageError(format!("cannot read seed {}: {}", path.display(), e))
        })?;
        let snapshot: StoreSnapshot = serde_json::from_str(&raw).map_err(|e| {
            AppError::StorageError(format!("invalid seed {}: {}", path.display(), e))
        })?;

        tracing::info!(
            workshops = snapshot.workshops.len(),
            global_orders = snapshot.global.len(),
            "Order store seeded from {}",
            path.display()
        );
        Ok(Self::from_snapshot(snapshot))
    }

    /// Add a historical order to the global collection only
    pub fn archive_order(&self, order: Order) -> AppResult<()> {
        self.write()?.global.push(order);
        Ok(())
    }

    pub fn snapshot(&self) -> AppResult<StoreSnapshot> {
        Ok(self.read()?.clone())
    }

    fn read(&self) -> AppResult<RwLockReadGuard<'_, StoreSnapshot>> {
        self.data
            .read()
            .map_err(|_| AppError::StorageError("order store lock poisoned".to_string()))
    }

    fn write(&self) -> AppResult<RwLockWriteGuard<'_, StoreSnapshot>> {
        self.data
            .write()
            .map_err(|_| AppError::StorageError("order store lock poisoned".to_string()))
    }
}

impl OrderStore for InMemoryOrderStore {
    fn list_orders(&self, scope: &OrderScope) -> AppResult<Vec<Order>> {
        let data = self.read()?;
        let orders = match scope {
            OrderScope::Workshop(Some(workshop_id)) => data
                .workshops
                .get(workshop_id)
                .cloned()
                .unwrap_or_default(),
            OrderScope::Workshop(None) => data.workshops.values().flatten().cloned().collect(),
            OrderScope::Global => data.global.clone(),
        };
        Ok(orders)
    }

    fn find_order(&self, order_id: Uuid) -> AppResult<Option<Order>> {
        let data = self.read()?;
        Ok(data
            .global
            .iter()
            .chain(data.workshops.values().flatten())
            .find(|order| order.id == order_id)
            .cloned())
    }

    fn append_order(&self, order: Order) -> AppResult<()> {
        let mut data = self.write()?;
        if data.global.iter().any(|o| o.id == order.id) {
            return Err(AppError::ValidationError(format!(
                "Order {} already exists",
                order.id
            )));
        }

        data.workshops
            .entry(order.workshop.id)
            .or_default()
            .push(order.clone());
        data.global.push(order);
        Ok(())
    }

    fn update_order(&self, order: Order) -> AppResult<()> {
        let mut data = self.write()?;
        let mut found = false;

        if let Some(orders) = data.workshops.get_mut(&order.workshop.id) {
            if let Some(slot) = orders.iter_mut().find(|o| o.id == order.id) {
                *slot = order.clone();
                found = true;
            }
        }
        if let Some(slot) = data.global.iter_mut().find(|o| o.id == order.id) {
            *slot = order;
            found = true;
        }

        if found {
            Ok(())
        } else {
            Err(AppError::NotFound("Order".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CustomerRef, Discount, OrderStatus, Payment, WorkshopRef};
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn order_for(workshop_id: Uuid) -> Order {
        Order {
            id: Uuid::new_v4(),
            workshop: WorkshopRef {
                id: workshop_id,
                name: "Workshop".to_string(),
            },
            customer: CustomerRef {
                id: Uuid::new_v4(),
                name: "Customer".to_string(),
                phone: None,
            },
            measurements: None,
            items: vec![],
            item_summaries: vec![],
            item_count: 1,
            discount: Discount::none(),
            subtotal: Decimal::TEN,
            total: Decimal::TEN,
            delivery_date: None,
            payment: Payment::default(),
            status: OrderStatus::New,
            production: None,
            completed_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_append_lands_in_both_collections() {
        let store = InMemoryOrderStore::new();
        let workshop = Uuid::new_v4();
        let order = order_for(workshop);
        store.append_order(order.clone()).unwrap();

        assert_eq!(store.list_orders(&OrderScope::Workshop(Some(workshop))).unwrap().len(), 1);
        assert_eq!(store.list_orders(&OrderScope::Workshop(None)).unwrap().len(), 1);
        assert_eq!(store.list_orders(&OrderScope::Global).unwrap().len(), 1);
        assert_eq!(store.find_order(order.id).unwrap(), Some(order));
    }

    #[test]
    fn test_workshop_filter() {
        let store = InMemoryOrderStore::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        store.append_order(order_for(a)).unwrap();
        store.append_order(order_for(b)).unwrap();
        store.append_order(order_for(b)).unwrap();

        assert_eq!(store.list_orders(&OrderScope::Workshop(Some(b))).unwrap().len(), 2);
        assert_eq!(store.list_orders(&OrderScope::Workshop(None)).unwrap().len(), 3);
        assert!(store
            .list_orders(&OrderScope::Workshop(Some(Uuid::new_v4())))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_archived_orders_are_global_only() {
        let store = InMemoryOrderStore::new();
        store.archive_order(order_for(Uuid::new_v4())).unwrap();

        assert!(store.list_orders(&OrderScope::Workshop(None)).unwrap().is_empty());
        assert_eq!(store.list_orders(&OrderScope::Global).unwrap().len(), 1);
    }

    #[test]
    fn test_update_replaces_everywhere() {
        let store = InMemoryOrderStore::new();
        let workshop = Uuid::new_v4();
        let mut order = order_for(workshop);
        store.append_order(order.clone()).unwrap();

        order.status = OrderStatus::InProduction;
        store.update_order(order.clone()).unwrap();

        let local = store.list_orders(&OrderScope::Workshop(Some(workshop))).unwrap();
        assert_eq!(local[0].status, OrderStatus::InProduction);
        assert_eq!(store.find_order(order.id).unwrap().unwrap().status, OrderStatus::InProduction);
    }

    #[test]
    fn test_update_unknown_order_fails() {
        let store = InMemoryOrderStore::new();
        let result = store.update_order(order_for(Uuid::new_v4()));
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_duplicate_append_rejected() {
        let store = InMemoryOrderStore::new();
        let order = order_for(Uuid::new_v4());
        store.append_order(order.clone()).unwrap();
        assert!(store.append_order(order).is_err());
    }

    #[test]
    fn test_snapshot_json_round_trip() {
        let store = InMemoryOrderStore::new();
        store.append_order(order_for(Uuid::new_v4())).unwrap();
        store.archive_order(order_for(Uuid::new_v4())).unwrap();

        let json = serde_json::to_string(&store.snapshot().unwrap()).unwrap();
        let reloaded = InMemoryOrderStore::from_snapshot(serde_json::from_str(&json).unwrap());
        assert_eq!(reloaded.list_orders(&OrderScope::Global).unwrap().len(), 2);
        assert_eq!(reloaded.list_orders(&OrderScope::Workshop(None)).unwrap().len(), 1);
    }
}
