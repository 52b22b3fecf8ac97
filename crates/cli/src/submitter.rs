//! Order backend that writes the payload to stdout.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use qissa_engine::{OrderReceipt, OrderSubmitter};
use qissa_types::OrderPayload;

#[derive(Debug, Default)]
pub struct StdoutSubmitter;

#[async_trait]
impl OrderSubmitter for StdoutSubmitter {
    async fn submit_order(&self, payload: &OrderPayload) -> Result<OrderReceipt> {
        println!("{}", serde_json::to_string_pretty(payload)?);
        Ok(OrderReceipt {
            reference: format!("{}-{}", payload.product_key, Utc::now().format("%Y%m%d%H%M%S")),
        })
    }
}
