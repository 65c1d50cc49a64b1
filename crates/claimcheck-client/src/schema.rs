//! JSON Schema for the verification service's response body.

use serde_json::{json, Value};

/// `{ verdict, summary, links: [{ title?, url }] }`, with an optional `id`.
///
/// Extra properties are allowed so a newer service does not break older
/// clients.
pub fn response_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "type": "object",
        "required": ["verdict", "summary", "links"],
        "properties": {
            "id": { "type": "string" },
            "verdict": { "type": "string" },
            "summary": { "type": "string" },
            "links": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["url"],
                    "properties": {
                        "title": { "type": ["string", "null"] },
                        "url": { "type": "string" }
                    }
                }
            }
        }
    })
}
