use serde::Serialize;
use serde_json::{Map, Value};

/// Uniform `{success, message?, count?, data?, errors?}` wrapper returned by every endpoint.
#[derive(Serialize, Debug)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Map<String, Value>>,
}

impl<T: Serialize> Envelope<T> {
    pub fn created(message: &str, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.to_string()),
            count: None,
            data: Some(data),
            errors: None,
        }
    }

    pub fn item(data: T) -> Self {
        Self {
            success: true,
            message: None,
            count: None,
            data: Some(data),
            errors: None,
        }
    }
}

impl<T: Serialize> Envelope<Vec<T>> {
    pub fn list(data: Vec<T>) -> Self {
        Self {
            success: true,
            message: None,
            count: Some(data.len()),
            data: Some(data),
            errors: None,
        }
    }
}

impl Envelope<()> {
    pub fn failure(message: &str, errors: Map<String, Value>) -> Self {
        Self {
            success: false,
            message: Some(message.to_string()),
            count: None,
            data: None,
            errors: Some(errors),
        }
    }
}
