use serde::Deserialize;

/// A raw, unvalidated transaction submission.
///
/// Field names mirror the wire contract: `type`, `product_sku`,
/// `warehouse_code`, `quantity`, `reference`. Nothing here is trusted;
/// every field goes through the gateway's validation rules.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub product_sku: String,
    pub warehouse_code: String,
    pub quantity: i64,
    #[serde(default)]
    pub reference: Option<String>,
}

impl SubmitRequest {
    /// Convenience constructor for tests and embedding callers.
    pub fn new(
        kind: impl Into<String>,
        product_sku: impl Into<String>,
        warehouse_code: impl Into<String>,
        quantity: i64,
    ) -> Self {
        Self {
            kind: kind.into(),
            product_sku: product_sku.into(),
            warehouse_code: warehouse_code.into(),
            quantity,
            reference: None,
        }
    }

    /// Attaches a free-text reference.
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_wire_shape() {
        let req: SubmitRequest = serde_json::from_str(
            r#"{"type":"in","product_sku":"SKU-1","warehouse_code":"WH-1","quantity":10}"#,
        )
        .unwrap();
        assert_eq!(req.kind, "in");
        assert_eq!(req.product_sku, "SKU-1");
        assert_eq!(req.quantity, 10);
        assert!(req.reference.is_none());
    }
}
