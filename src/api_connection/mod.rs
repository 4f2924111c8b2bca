pub mod connection;
pub mod endpoints;

pub use connection::{strip_code_fences, ApiConnectionError, GenerativeBackend};
pub use endpoints::{JsonSchema, JsonSchemaDefinition, Provider, SchemaType};
