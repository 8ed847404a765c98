/// Basic unit tests to verify core functionality
use std::sync::Arc;

use mort_mcp::*;
use tempfile::NamedTempFile;

#[cfg(test)]
mod basic_unit_tests {
    use super::*;

    #[test]
    fn test_customer_request_creation() {
        let customer = NewCustomer::new(
            "  Ada Lovelace ".to_string(),
            Some("ada@example.com".to_string()),
            Some("First programmer".to_string()),
        );

        assert!(customer.is_ok());
        let customer = customer.unwrap();
        assert_eq!(customer.name, "Ada Lovelace");
        assert_eq!(customer.email.as_deref(), Some("ada@example.com"));
    }

    #[test]
    fn test_customer_request_rejects_bad_email() {
        let customer = NewCustomer::new("Ada".to_string(), Some("not-an-email".to_string()), None);
        assert!(matches!(customer, Err(DomainError::Validation { .. })));
    }

    #[test]
    fn test_price_request_creation() {
        let price = NewPrice::new("prod_1".to_string(), 1500, "EUR", Some(Interval::Year)).unwrap();

        assert_eq!(price.currency, "eur");
        assert_eq!(price.recurring, Some(Recurring { interval: Interval::Year }));
    }

    #[test]
    fn test_payment_link_request_defaults() {
        let link = NewPaymentLink::new("price_1".to_string(), None, None).unwrap();
        assert_eq!(link.quantity, 1);
        assert!(link.after_completion.is_none());

        let zero = NewPaymentLink::new("price_1".to_string(), Some(0), None);
        assert_eq!(zero, Err(DomainError::InvalidQuantity(0)));

        let relative = NewPaymentLink::new("price_1".to_string(), None, Some("/thanks"));
        assert!(matches!(relative, Err(DomainError::InvalidUrl { .. })));
    }

    #[test]
    fn test_list_limits() {
        assert_eq!(ListQuery::new(None).unwrap().limit, DEFAULT_LIST_LIMIT);
        assert_eq!(ListQuery::new(Some(MAX_LIST_LIMIT)).unwrap().limit, MAX_LIST_LIMIT);
        assert!(ListQuery::new(Some(MAX_LIST_LIMIT + 1)).is_err());
    }

    #[test]
    fn test_builtin_registry() {
        let registry = ToolRegistry::builtin().expect("builtin catalogue is valid");

        assert_eq!(registry.len(), 7);
        assert!(registry.contains("stripe_create_payment_link"));
        assert!(!registry.contains("stripe_refund"));

        let price = registry
            .definitions()
            .into_iter()
            .find(|d| d.name == "stripe_create_price")
            .unwrap();
        let required = price.input_schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 3);
        assert!(price.input_schema.get("$schema").is_none());
    }

    #[test]
    fn test_gateway_creation_without_key() {
        let gateway = StripeGateway::new(&GatewayConfig::default());

        assert!(gateway.is_ok());
        assert!(!gateway.unwrap().is_configured());
    }

    #[test]
    fn test_server_creation() {
        let gateway = StripeGateway::new(&GatewayConfig::default()).unwrap();
        let server = PaymentsServer::with_gateway(Arc::new(gateway), ServerConfig::default());

        assert!(server.is_ok());
        assert_eq!(server.unwrap().registry().len(), 7);
    }

    #[test]
    fn test_storage_creation() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let storage = SqliteStorage::new(temp_file.path().to_path_buf());
        assert!(storage.is_ok());
    }

    #[test]
    fn test_storage_rejects_price_for_unknown_product() {
        let storage = SqliteStorage::in_memory().unwrap();
        let price = Price {
            id: "price_1".to_string(),
            product: "prod_missing".to_string(),
            amount: Some(100),
            currency: "usd".to_string(),
            recurring: None,
        };

        let err = storage.upsert_price(&price).unwrap_err();
        assert!(matches!(err, StorageError::ProductNotFound { .. }));
    }
}
