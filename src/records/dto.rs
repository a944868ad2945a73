use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body for both create and update; an update replaces every editable field.
///
/// `age` is widened to i64 so out-of-range values reach validation and get a
/// field-level message instead of a deserialization error.
#[derive(Debug, Deserialize)]
pub struct RecordPayload {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub age: i64,
    pub father: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteManyRequest {
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteManyResponse {
    pub deleted_count: u64,
}

#[derive(Debug, Serialize)]
pub struct AckResponse {
    pub message: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deleted_count_serializes_camel_case() {
        let json = serde_json::to_value(DeleteManyResponse { deleted_count: 3 }).unwrap();
        assert_eq!(json["deletedCount"], 3);
    }
}
