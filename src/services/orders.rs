use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::error::ServiceError;
use crate::types::{OrderStatus, ALL_FILTER};

const ALL_STATUSES_RU: &str = "все";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderItem {
    pub name: String,
    pub quantity: u32,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub id: u32,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub total: f64,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
}

impl Order {
    pub fn new(id: u32, date: NaiveDate, time: NaiveTime, status: OrderStatus, items: Vec<OrderItem>) -> Self {
        let total = items.iter().map(|i| i.price * i.quantity as f64).sum();
        Self { id, date, time, total, status, items }
    }

    /// Keeps a recorded total even where it differs from the item sum.
    pub fn with_total(self, total: f64) -> Self {
        Self { total, ..self }
    }
}

fn item(name: &str, quantity: u32, price: f64) -> OrderItem {
    OrderItem { name: name.into(), quantity, price }
}

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> (NaiveDate, NaiveTime) {
    (
        NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default(),
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default(),
    )
}

/// Order history held in process memory. Nothing ever adds to it.
#[derive(Debug, Default)]
pub struct OrderBook {
    orders: Vec<Order>,
}

impl OrderBook {
    pub fn new(orders: Vec<Order>) -> Self {
        Self { orders }
    }

    pub fn with_samples() -> Self {
        let (d1, t1) = at(2024, 3, 15, 12, 30);
        let (d2, t2) = at(2024, 3, 14, 13, 15);
        let (d3, t3) = at(2024, 3, 13, 11, 45);

        Self::new(vec![
            Order::new(
                1001,
                d1,
                t1,
                OrderStatus::Completed,
                vec![
                    item("Суп картофельный с бобовыми", 1, 55.0),
                    item("Салат из свежих помидор и огурцов", 1, 65.0),
                    item("Пирожное «Чоко пай»", 2, 25.0),
                ],
            )
            .with_total(165.0),
            Order::new(1002, d2, t2, OrderStatus::Completed, vec![item("Салат Цезарь", 1, 80.0)]),
            Order::new(
                1003,
                d3,
                t3,
                OrderStatus::Cancelled,
                vec![item("Суп картофельный с бобовыми", 2, 55.0), item("Компот", 1, 10.0)],
            ),
        ])
    }

    /// `None`, `all` and `все` list every order.
    pub fn list(&self, status: Option<&str>) -> Result<Vec<Order>, ServiceError> {
        let wanted = match status.map(str::trim) {
            None | Some("") | Some(ALL_FILTER) | Some(ALL_STATUSES_RU) => None,
            Some(label) => Some(
                label
                    .parse::<OrderStatus>()
                    .map_err(|err| ServiceError::Validation(err.to_string()))?,
            ),
        };

        Ok(self
            .orders
            .iter()
            .filter(|order| wanted.map_or(true, |status| order.status == status))
            .cloned()
            .collect())
    }

    pub fn get(&self, id: u32) -> Result<&Order, ServiceError> {
        self.orders
            .iter()
            .find(|order| order.id == id)
            .ok_or_else(|| ServiceError::NotFound(format!("Order {id}")))
    }

    /// Only orders still being processed can be cancelled.
    pub fn cancel(&mut self, id: u32) -> Result<Order, ServiceError> {
        let order = self
            .orders
            .iter_mut()
            .find(|order| order.id == id)
            .ok_or_else(|| ServiceError::NotFound(format!("Order {id}")))?;

        if order.status != OrderStatus::Processing {
            return Err(ServiceError::Conflict(format!(
                "Order {id} is '{}' and can no longer be cancelled",
                order.status
            )));
        }

        order.status = OrderStatus::Cancelled;
        Ok(order.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processing_book() -> OrderBook {
        let (date, time) = at(2024, 3, 16, 12, 0);
        OrderBook::new(vec![Order::new(
            2001,
            date,
            time,
            OrderStatus::Processing,
            vec![item("Компот", 2, 10.0)],
        )])
    }

    #[test]
    fn samples_keep_recorded_totals() {
        let book = OrderBook::with_samples();

        assert_eq!(book.get(1001).unwrap().total, 165.0);
        assert_eq!(book.get(1003).unwrap().total, 120.0);
        assert_eq!(book.get(1002).unwrap().total, 80.0);
    }

    #[test]
    fn new_orders_total_their_items() {
        assert_eq!(processing_book().get(2001).unwrap().total, 20.0);
    }

    #[test]
    fn status_filter_matches_exactly() {
        let book = OrderBook::with_samples();

        assert_eq!(book.list(None).unwrap().len(), 3);
        assert_eq!(book.list(Some("все")).unwrap().len(), 3);
        assert_eq!(book.list(Some("выполнен")).unwrap().len(), 2);

        let cancelled = book.list(Some("отменен")).unwrap();
        assert_eq!(cancelled.len(), 1);
        assert_eq!(cancelled[0].id, 1003);

        assert!(book.list(Some("в обработке")).unwrap().is_empty());
        assert!(book.list(Some("потерян")).is_err());
    }

    #[test]
    fn cancel_moves_processing_to_cancelled() {
        let mut book = processing_book();

        assert_eq!(book.cancel(2001).unwrap().status, OrderStatus::Cancelled);
        assert!(matches!(book.cancel(2001), Err(ServiceError::Conflict(_))));
    }

    #[test]
    fn cancel_rejects_completed_and_unknown() {
        let mut book = OrderBook::with_samples();

        assert!(matches!(book.cancel(1001), Err(ServiceError::Conflict(_))));
        assert!(matches!(book.cancel(9999), Err(ServiceError::NotFound(_))));
        assert_eq!(book.get(1001).unwrap().status, OrderStatus::Completed);
    }
}
