//! Error types for form transformation.

use thiserror::Error;

/// Configuration errors raised while transforming a schema.
///
/// These signal an authoring mistake in the schema/UI-schema pairing and
/// abort the whole transform call. Validation errors supplied through
/// `schema_errors` are data, rendered into the output instead of thrown.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("unknown component \"{component}\" at {key}")]
    UnknownComponent { key: String, component: String },

    #[error("no transformer for {key}: type {type_name} with no content or summary marker")]
    UnsupportedSchema { key: String, type_name: String },

    #[error("{parent} lists \"{key}\" but has no such property")]
    MissingProperty { parent: String, key: String },

    #[error("conditional for {key} references \"{component_id}\", which has not been transformed yet")]
    MissingConditionalComponent { key: String, component_id: String },

    #[error("conditional for {key} references item value {item_value} with no matching option")]
    UnknownConditionalValue { key: String, item_value: String },

    #[error("invalid \"{option}\" option at {key}: {message}")]
    InvalidUiOption {
        key: String,
        option: String,
        message: String,
    },
}
