use serde::Serialize;

/// `{ "data": T }`, the envelope for every entity and list response.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
