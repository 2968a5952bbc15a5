use serde_json::json;

use super::*;

#[tokio::test]
async fn test_think_echoes_thought() {
    let tool = ThinkTool;
    assert_eq!(tool.name(), "think");

    let result = tool
        .execute(&json!({"thought": "the answer is 42"}))
        .await
        .expect("think never fails");
    assert_eq!(result, json!("I thought about: the answer is 42"));
}

#[tokio::test]
async fn test_think_with_missing_thought() {
    let tool = ThinkTool;
    let result = tool.execute(&json!({})).await.expect("think never fails");
    assert_eq!(result, json!("I thought about: "));
}
