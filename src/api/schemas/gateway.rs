use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct WsParams {
    pub token: String,
}
