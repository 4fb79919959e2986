//! Buffered-response envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Normalized envelope the gateway wraps around buffered (non-stream)
/// backend replies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisEnvelope {
    pub success: bool,
    /// The backend's JSON body, unchanged.
    pub data: Value,
}

impl AnalysisEnvelope {
    pub fn new(data: Value) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_preserves_data() {
        let data = json!({"score": 42, "tags": ["jungle", "mid"]});
        let envelope = AnalysisEnvelope::new(data.clone());
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["success"], json!(true));
        assert_eq!(json["data"], data);
    }
}
