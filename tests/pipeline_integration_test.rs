//! End-to-end tests for the optimizer pipeline
//!
//! Runs sampler, selector and synthesizer together against a scripted
//! completion client, and once against a mock HTTP server through the
//! Ollama client.

use std::sync::Arc;

use mockito::{Matcher, Server};
use reprompt::adapters::completion::{
    MockCompletionClient, OllamaClient, OllamaConfig, PromptShape,
};
use reprompt::domain::ports::CompletionError;
use reprompt::domain::DomainError;
use reprompt::services::PromptOptimizer;

fn numbered_samples(n: usize) -> Vec<Result<String, CompletionError>> {
    (1..=n).map(|i| Ok(format!("Answer number {i}"))).collect()
}

#[tokio::test]
async fn test_full_run_picks_judged_sample() {
    let client = Arc::new(
        MockCompletionClient::by_shape("unused", "Response 3 is clearly the best.", "\"Describe a sunset\"")
            .with_script(numbered_samples(5)),
    );
    let optimizer = PromptOptimizer::new(client.clone());

    let result = optimizer.run("sunset", 5, "llama3.1").await.unwrap();

    assert_eq!(result.best_index, 2);
    assert!(!result.fallback_used);
    assert_eq!(result.best_sample.as_str(), "Answer number 3");
    assert_eq!(result.optimized_prompt.as_str(), "Describe a sunset");
    assert_eq!(result.samples.len(), 5);

    assert_eq!(client.count(PromptShape::Sampling), 5);
    assert_eq!(client.count(PromptShape::Ranking), 1);
    assert_eq!(client.count(PromptShape::Synthesis), 1);
    assert!(client.calls().iter().all(|c| c.model == "llama3.1"));
}

#[tokio::test]
async fn test_two_digit_choice_with_ten_samples() {
    let client = Arc::new(
        MockCompletionClient::by_shape("unused", "10", "Prompt: Write a limerick")
            .with_script(numbered_samples(10)),
    );
    let optimizer = PromptOptimizer::new(client);

    let result = optimizer.run("limerick", 10, "llama3.1").await.unwrap();

    assert_eq!(result.best_index, 9);
    assert_eq!(result.best_sample.as_str(), "Answer number 10");
    assert_eq!(result.optimized_prompt.as_str(), "Write a limerick");
}

#[tokio::test]
async fn test_unusable_ranking_falls_back_to_first_sample() {
    let client = Arc::new(
        MockCompletionClient::by_shape("unused", "I cannot decide.", "Best prompt: Tell a story")
            .with_script(numbered_samples(3)),
    );
    let optimizer = PromptOptimizer::new(client);

    let result = optimizer.run("story", 3, "llama3.1").await.unwrap();

    assert_eq!(result.best_index, 0);
    assert!(result.fallback_used);
    assert_eq!(result.best_sample.as_str(), "Answer number 1");
    assert_eq!(result.optimized_prompt.as_str(), "Tell a story");
}

#[tokio::test]
async fn test_invalid_count_makes_no_calls() {
    let client = Arc::new(MockCompletionClient::new());
    let optimizer = PromptOptimizer::new(client.clone());

    for count in [0, -1] {
        let err = optimizer.run("sunset", count, "llama3.1").await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidSampleCount(c) if c == count));
    }
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn test_sampling_failure_stops_pipeline() {
    let client = Arc::new(
        MockCompletionClient::new().with_script(vec![
            Ok("first".to_string()),
            Err(CompletionError::Transport("connection reset".to_string())),
        ]),
    );
    let optimizer = PromptOptimizer::new(client.clone());

    let err = optimizer.run("sunset", 4, "llama3.1").await.unwrap_err();

    assert!(matches!(err, DomainError::Completion(CompletionError::Transport(_))));
    assert_eq!(client.calls().len(), 2);
    assert_eq!(client.count(PromptShape::Ranking), 0);
}

#[tokio::test]
async fn test_synthesis_failure_is_propagated() {
    let client = Arc::new(
        MockCompletionClient::by_shape("sample", "1", "unused").with_synthesis_reply(Err(
            CompletionError::Backend {
                status: 500,
                message: "out of memory".to_string(),
            },
        )),
    );
    let optimizer = PromptOptimizer::new(client);

    let err = optimizer.run("sunset", 2, "llama3.1").await.unwrap_err();

    assert!(matches!(
        err,
        DomainError::Completion(CompletionError::Backend { status: 500, .. })
    ));
}

#[tokio::test]
async fn test_blank_synthesis_is_rejected() {
    let client = Arc::new(MockCompletionClient::by_shape("sample", "1", "\"  \""));
    let optimizer = PromptOptimizer::new(client);

    let err = optimizer.run("sunset", 2, "llama3.1").await.unwrap_err();

    assert!(matches!(err, DomainError::EmptyOptimizedPrompt));
}

#[tokio::test]
async fn test_full_run_over_http() {
    let mut server = Server::new_async().await;
    let sampling = server
        .mock("POST", "/api/generate")
        .match_body(Matcher::PartialJson(serde_json::json!({ "prompt": "sunset" })))
        .with_status(200)
        .with_body(r#"{"response":"  Orange light fades.  "}"#)
        .expect(2)
        .create_async()
        .await;
    let ranking = server
        .mock("POST", "/api/generate")
        .match_body(Matcher::Regex("Rank these responses".to_string()))
        .with_status(200)
        .with_body(r#"{"response":"2"}"#)
        .expect(1)
        .create_async()
        .await;
    let synthesis = server
        .mock("POST", "/api/generate")
        .match_body(Matcher::Regex("Generate the single best prompt".to_string()))
        .with_status(200)
        .with_body(r#"{"response":"'Describe a sunset in one line'"}"#)
        .expect(1)
        .create_async()
        .await;

    let client = OllamaClient::new(OllamaConfig::default().with_base_url(server.url())).unwrap();
    let optimizer = PromptOptimizer::new(Arc::new(client));

    let result = optimizer.run("sunset", 2, "llama3.1").await.unwrap();

    assert_eq!(result.best_index, 1);
    assert_eq!(result.best_sample.as_str(), "Orange light fades.");
    assert_eq!(result.optimized_prompt.as_str(), "Describe a sunset in one line");
    sampling.assert_async().await;
    ranking.assert_async().await;
    synthesis.assert_async().await;
}
