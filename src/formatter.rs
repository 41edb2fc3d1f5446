//! Builds the submission payload from a locked pickup context and a draft
//! batch. Pure: no I/O, deterministic, identical inputs give identical
//! payloads. The network call belongs to the caller.

use chrono::NaiveTime;

use crate::{
    errors::ConsoleError,
    models::{DraftOrder, PickupContext, SubmissionPayload, SubmittedOrder},
};

// Placeholder fallbacks inherited from the legacy formatter. Whether any of
// them is an intended business default is unconfirmed with product; they are
// kept as named constants so the question stays visible.
pub const FALLBACK_PICKUP_DATE: &str = "2024-08-15T10:00:00Z";
pub const FALLBACK_PICKUP_ADDRESS: &str = "Common PickUp Address, Yangon";
pub const FALLBACK_PICKUP_PHONE: &str = "09987654321";
pub const FALLBACK_PICKUP_NAME: &str = "Common Shipper Name";
pub const FALLBACK_PICKUP_CITY_ID: i64 = 4;
pub const FALLBACK_DESTINATION_CITY_ID: i64 = 1;

/// Formats a batch for `POST /order/upload`.
///
/// Rejects the submission before any network call when the required-field
/// contract cannot be met: the shipper must exist and every order needs a
/// customer name and phone. Per-order city ids and empty pickup fields
/// fall back to the named defaults above.
pub fn format_submission(
    context: &PickupContext,
    orders: &[DraftOrder],
) -> Result<SubmissionPayload, ConsoleError> {
    if context.shipper_id.trim().is_empty() {
        return Err(ConsoleError::Validation(
            "A confirmed shipper is required before submitting.".to_string(),
        ));
    }
    if orders.is_empty() {
        return Err(ConsoleError::Validation(
            "There are no orders to submit.".to_string(),
        ));
    }
    for (index, order) in orders.iter().enumerate() {
        if order.cus_name.trim().is_empty() || order.cus_phone.trim().is_empty() {
            return Err(ConsoleError::Validation(format!(
                "Order {}: customer name and phone are required.",
                index + 1
            )));
        }
    }

    let pick_up_date = match context.pickup_date {
        Some(date) => date
            .and_time(NaiveTime::MIN)
            .and_utc()
            .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        None => FALLBACK_PICKUP_DATE.to_string(),
    };

    Ok(SubmissionPayload {
        shipper_id: context.shipper_id.clone(),
        pick_up_address: non_empty_or(&context.pickup_address, FALLBACK_PICKUP_ADDRESS),
        pick_up_date,
        pick_up_phone: non_empty_or(&context.pickup_phone, FALLBACK_PICKUP_PHONE),
        pick_up_name: non_empty_or(&context.pickup_name, FALLBACK_PICKUP_NAME),
        pick_up_city_id: context.pickup_city_id.unwrap_or(FALLBACK_PICKUP_CITY_ID),
        orders: orders
            .iter()
            .map(|order| SubmittedOrder {
                cus_name: order.cus_name.clone(),
                cus_phone: order.cus_phone.clone(),
                cus_address: order.cus_address.clone(),
                cod: order.cod,
                delivery: order.delivery,
                note: order.note.clone(),
                city_id: order.city_id.unwrap_or(FALLBACK_DESTINATION_CITY_ID),
            })
            .collect(),
    })
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn context() -> PickupContext {
        PickupContext {
            shipper_id: "791234".to_string(),
            pickup_date: NaiveDate::from_ymd_opt(2025, 8, 15),
            pickup_name: "Brownsley Br Nyar Shop".to_string(),
            pickup_phone: "+959788889337".to_string(),
            pickup_address: "115-70B".to_string(),
            pickup_city_id: Some(7),
        }
    }

    fn order() -> DraftOrder {
        DraftOrder {
            cus_name: "Brown kid".to_string(),
            cus_phone: "09123456".to_string(),
            cus_address: "Aunmyaythazan".to_string(),
            cod: dec!(1000000),
            delivery: true,
            note: String::new(),
            state_id: Some(2),
            city_id: Some(4),
        }
    }

    #[test]
    fn pickup_date_serializes_to_rfc3339() {
        let payload = format_submission(&context(), &[order()]).unwrap();
        assert_eq!(payload.pick_up_date, "2025-08-15T00:00:00Z");
    }

    #[test]
    fn absent_pickup_date_uses_the_named_fallback() {
        let mut ctx = context();
        ctx.pickup_date = None;
        let payload = format_submission(&ctx, &[order()]).unwrap();
        assert_eq!(payload.pick_up_date, FALLBACK_PICKUP_DATE);
    }

    #[test]
    fn absent_city_ids_use_the_named_fallbacks() {
        let mut ctx = context();
        ctx.pickup_city_id = None;
        let mut o = order();
        o.city_id = None;

        let payload = format_submission(&ctx, &[o]).unwrap();
        assert_eq!(payload.pick_up_city_id, FALLBACK_PICKUP_CITY_ID);
        assert_eq!(payload.orders[0].city_id, FALLBACK_DESTINATION_CITY_ID);
    }

    #[test]
    fn missing_customer_phone_blocks_the_whole_submission() {
        let mut bad = order();
        bad.cus_phone = "  ".to_string();
        let err = format_submission(&context(), &[order(), bad]).unwrap_err();
        assert_matches!(err, ConsoleError::Validation(msg) if msg.contains("Order 2"));
    }

    #[test]
    fn empty_batch_is_rejected() {
        assert_matches!(
            format_submission(&context(), &[]),
            Err(ConsoleError::Validation(_))
        );
    }

    #[test]
    fn formatting_is_idempotent() {
        let orders = [order(), { let mut o = order(); o.city_id = None; o }];
        let first = format_submission(&context(), &orders).unwrap();
        let second = format_submission(&context(), &orders).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_pickup_fields_fall_back_to_placeholders() {
        let mut ctx = context();
        ctx.pickup_name = String::new();
        ctx.pickup_phone = String::new();
        ctx.pickup_address = String::new();
        let payload = format_submission(&ctx, &[order()]).unwrap();
        assert_eq!(payload.pick_up_name, FALLBACK_PICKUP_NAME);
        assert_eq!(payload.pick_up_phone, FALLBACK_PICKUP_PHONE);
        assert_eq!(payload.pick_up_address, FALLBACK_PICKUP_ADDRESS);
    }
}
