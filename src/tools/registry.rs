/// Static tool catalogue and invocation
///
/// The catalogue is a plain table of name, description, schema generator and
/// handler. `ToolRegistry::new` turns it into lookup structures once at
/// startup and rejects a table with duplicate names or malformed schemas.

use std::collections::HashMap;

use schemars::gen::SchemaSettings;
use schemars::JsonSchema;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::gateway::PaymentGateway;
use crate::mcp::protocol::{ToolCallResult, ToolDefinition};
use crate::tools::{
    create_customer, create_payment_link, create_price, create_product, list_customers,
    list_prices, list_products, Arguments, CreateCustomerArgs, CreatePaymentLinkArgs,
    CreatePriceArgs, CreateProductArgs, ListCustomersArgs, ListPricesArgs, ListProductsArgs,
    ToolError, ToolHandler,
};

/// One entry of a tool catalogue
#[derive(Clone, Copy)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: fn() -> Value,
    pub handler: ToolHandler,
}

/// The payment tools this server exposes, in listing order
pub const CATALOGUE: &[ToolSpec] = &[
    ToolSpec {
        name: "stripe_create_customer",
        description: "Create a new customer in Stripe",
        input_schema: input_schema::<CreateCustomerArgs>,
        handler: create_customer,
    },
    ToolSpec {
        name: "stripe_create_product",
        description: "Create a new product in Stripe",
        input_schema: input_schema::<CreateProductArgs>,
        handler: create_product,
    },
    ToolSpec {
        name: "stripe_create_price",
        description: "Create a new price for a product in Stripe",
        input_schema: input_schema::<CreatePriceArgs>,
        handler: create_price,
    },
    ToolSpec {
        name: "stripe_create_payment_link",
        description: "Create a payment link for a price",
        input_schema: input_schema::<CreatePaymentLinkArgs>,
        handler: create_payment_link,
    },
    ToolSpec {
        name: "stripe_list_customers",
        description: "List customers from Stripe",
        input_schema: input_schema::<ListCustomersArgs>,
        handler: list_customers,
    },
    ToolSpec {
        name: "stripe_list_products",
        description: "List products from Stripe",
        input_schema: input_schema::<ListProductsArgs>,
        handler: list_products,
    },
    ToolSpec {
        name: "stripe_list_prices",
        description: "List prices from Stripe, optionally for one product",
        input_schema: input_schema::<ListPricesArgs>,
        handler: list_prices,
    },
];

/// Generate an MCP input schema from a typed argument struct
///
/// Produces a draft-07 object schema with nested types inlined and
/// optional fields left out of `required`. Root metadata the MCP
/// client has no use for (`$schema`, `title`, root `description`) is dropped.
pub fn input_schema<T: JsonSchema>() -> Value {
    let settings = SchemaSettings::draft07().with(|s| {
        s.option_nullable = false;
        s.option_add_null_type = false;
        s.inline_subschemas = true;
    });
    let root = settings.into_generator().into_root_schema_for::<T>();

    let mut schema = serde_json::to_value(root).unwrap_or_else(|_| Value::Object(Default::default()));
    if let Value::Object(map) = &mut schema {
        map.remove("$schema");
        map.remove("title");
        map.remove("description");
        if map.get("definitions").map_or(false, |d| d.as_object().map_or(true, |d| d.is_empty())) {
            map.remove("definitions");
        }
        map.entry("required").or_insert_with(|| Value::Array(Vec::new()));
    }
    schema
}

/// Problems found while building a registry
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Duplicate tool name: {0}")]
    DuplicateTool(String),

    #[error("Invalid input schema for tool {tool}: {reason}")]
    InvalidSchema { tool: String, reason: String },
}

struct RegisteredTool {
    definition: ToolDefinition,
    required: Vec<String>,
    handler: ToolHandler,
}

/// Read-only lookup of the tools a server can call
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Build a registry from a catalogue, validating it
    pub fn new(catalogue: &[ToolSpec]) -> Result<Self, RegistryError> {
        let mut tools = Vec::with_capacity(catalogue.len());
        let mut index = HashMap::with_capacity(catalogue.len());

        for spec in catalogue {
            if index.contains_key(spec.name) {
                return Err(RegistryError::DuplicateTool(spec.name.to_string()));
            }

            let schema = (spec.input_schema)();
            let required = required_fields(spec.name, &schema)?;

            index.insert(spec.name.to_string(), tools.len());
            tools.push(RegisteredTool {
                definition: ToolDefinition {
                    name: spec.name.to_string(),
                    description: spec.description.to_string(),
                    input_schema: schema,
                },
                required,
                handler: spec.handler,
            });
        }

        debug!("Registered {} tools", tools.len());
        Ok(Self { tools, index })
    }

    /// Registry over the built-in payment catalogue
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::new(CATALOGUE)
    }

    /// Tool definitions in registration order
    pub fn definitions(&self) -> Vec<&ToolDefinition> {
        self.tools.iter().map(|t| &t.definition).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Invoke a tool by name
    ///
    /// Caller mistakes (unknown tool, missing or malformed arguments) come
    /// back as `Err`. A gateway failure comes back as `Ok` with an error
    /// result, so the client sees it as a failed operation rather than a
    /// failed request.
    pub async fn call(
        &self,
        gateway: &dyn PaymentGateway,
        name: &str,
        arguments: Arguments,
    ) -> Result<ToolCallResult, ToolError> {
        let tool = self
            .index
            .get(name)
            .map(|&i| &self.tools[i])
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;

        if let Some(missing) = tool
            .required
            .iter()
            .find(|field| arguments.get(field.as_str()).map_or(true, Value::is_null))
        {
            return Err(ToolError::MissingArgument(missing.clone()));
        }

        debug!("Calling tool {} with {} arguments", name, arguments.len());

        match (tool.handler)(gateway, arguments).await {
            Ok(output) => Ok(ToolCallResult::success(serde_json::to_string_pretty(&output)?)),
            Err(ToolError::Gateway(e)) => {
                warn!("Tool {} failed at the gateway: {}", name, e);
                Ok(ToolCallResult::error(e.to_string()))
            }
            Err(e) => Err(e),
        }
    }
}

fn required_fields(tool: &str, schema: &Value) -> Result<Vec<String>, RegistryError> {
    let invalid = |reason: &str| RegistryError::InvalidSchema {
        tool: tool.to_string(),
        reason: reason.to_string(),
    };

    if schema.get("type").and_then(Value::as_str) != Some("object") {
        return Err(invalid("schema type must be \"object\""));
    }

    let properties = schema
        .get("properties")
        .and_then(Value::as_object)
        .ok_or_else(|| invalid("schema has no properties"))?;

    let mut required = Vec::new();
    for field in schema.get("required").and_then(Value::as_array).into_iter().flatten() {
        let field = field.as_str().ok_or_else(|| invalid("required entries must be strings"))?;
        if !properties.contains_key(field) {
            return Err(invalid(&format!("required field '{}' is not a property", field)));
        }
        required.push(field.to_string());
    }

    Ok(required)
}
