use blvd_analytics::boulevard::types::{LineGroup, Order, OrderLine, OrderSummary};
use chrono::{DateTime, Utc};

/// Build a closed order with one line group.
#[allow(dead_code)]
pub fn order(id: &str, closed_at: &str, subtotal_minor: i64, lines: Vec<OrderLine>) -> Order {
    Order {
        id: id.into(),
        closed_at: Some(
            closed_at
                .parse::<DateTime<Utc>>()
                .expect("test timestamp must be RFC3339"),
        ),
        summary: Some(OrderSummary {
            current_subtotal: Some(subtotal_minor),
        }),
        line_groups: vec![LineGroup { lines }],
    }
}

/// An order the upstream never stamped with a close time.
#[allow(dead_code)]
pub fn undated_order(id: &str, subtotal_minor: i64) -> Order {
    Order {
        id: id.into(),
        closed_at: None,
        summary: Some(OrderSummary {
            current_subtotal: Some(subtotal_minor),
        }),
        line_groups: Vec::new(),
    }
}

/// An order whose summary is missing the numeric subtotal.
#[allow(dead_code)]
pub fn subtotal_less_order(id: &str, closed_at: &str) -> Order {
    Order {
        id: id.into(),
        closed_at: Some(closed_at.parse::<DateTime<Utc>>().unwrap()),
        summary: Some(OrderSummary {
            current_subtotal: None,
        }),
        line_groups: Vec::new(),
    }
}

#[allow(dead_code)]
pub fn service_line(
    name: &str,
    quantity: i64,
    subtotal_minor: i64,
    discount_minor: i64,
) -> OrderLine {
    OrderLine::Service {
        id: format!("svc_{name}"),
        service_id: None,
        name: name.into(),
        quantity,
        current_subtotal: subtotal_minor,
        current_discount_amount: discount_minor,
    }
}

#[allow(dead_code)]
pub fn product_line(
    name: &str,
    quantity: i64,
    subtotal_minor: i64,
    discount_minor: i64,
) -> OrderLine {
    OrderLine::Product {
        id: format!("prod_{name}"),
        product_id: None,
        name: name.into(),
        quantity,
        current_subtotal: subtotal_minor,
        current_discount_amount: discount_minor,
    }
}

#[allow(dead_code)]
pub fn gratuity_line(subtotal_minor: i64) -> OrderLine {
    OrderLine::Gratuity {
        id: "grat_1".into(),
        quantity: 1,
        current_subtotal: subtotal_minor,
        current_discount_amount: 0,
    }
}
