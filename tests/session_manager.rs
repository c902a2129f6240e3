use async_trait::async_trait;
use gemchat::api::{ChatRequest, ModelApi, ModelInfo, ProviderTurn, Speaker};
use gemchat::error::{GenerationError, TurnError};
use gemchat::models::{GenerationConfig, Message, Role};
use gemchat::session::{project_history, SessionManager, SessionRegistry};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Scripted remote API that records every request it receives.
#[derive(Default)]
struct FakeModelApi {
    replies: Mutex<VecDeque<Result<String, GenerationError>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl FakeModelApi {
    fn with_replies(replies: Vec<Result<String, GenerationError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelApi for FakeModelApi {
    async fn generate(&self, request: &ChatRequest) -> Result<String, GenerationError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(format!("echo: {}", request.message)))
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, GenerationError> {
        Ok(Vec::new())
    }
}

fn manager_with(api: &Arc<FakeModelApi>) -> SessionManager {
    let client: Arc<dyn ModelApi> = api.clone();
    SessionManager::new(Some(client))
}

fn quota_error() -> GenerationError {
    GenerationError::Api {
        status: 429,
        message: "Resource has been exhausted (e.g. check quota).".to_string(),
    }
}

#[tokio::test]
async fn test_first_turn_sends_empty_history() {
    let api = FakeModelApi::with_replies(vec![Ok("Hello there!".to_string())]);
    let mut manager = manager_with(&api);

    let reply = manager
        .submit("Hi", &GenerationConfig::default())
        .await
        .unwrap();

    assert_eq!(reply, Message::assistant("Hello there!"));
    assert_eq!(
        manager.log().as_slice(),
        &[Message::user("Hi"), Message::assistant("Hello there!")]
    );

    let requests = api.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].history.is_empty());
    assert_eq!(requests[0].message, "Hi");
}

#[tokio::test]
async fn test_follow_up_turn_sends_prior_exchange_as_history() {
    let api = FakeModelApi::with_replies(vec![
        Ok("Hello".to_string()),
        Ok("Fine, thanks".to_string()),
    ]);
    let mut manager = manager_with(&api);
    let config = GenerationConfig::new("gemini-1.5-flash-latest", 1.3, 512).unwrap();

    manager.submit("Hi", &config).await.unwrap();
    manager.submit("How are you?", &config).await.unwrap();

    let requests = api.requests();
    assert_eq!(
        requests[1].history,
        vec![
            ProviderTurn {
                speaker: Speaker::User,
                text: "Hi".to_string()
            },
            ProviderTurn {
                speaker: Speaker::Model,
                text: "Hello".to_string()
            },
        ]
    );
    assert_eq!(requests[1].message, "How are you?");
    assert_eq!(requests[1].model, "gemini-1.5-flash-latest");
    assert_eq!(requests[1].temperature, 1.3);
    assert_eq!(requests[1].max_output_tokens, 512);
}

#[tokio::test]
async fn test_missing_client_rolls_back_with_configuration_error() {
    let mut manager = SessionManager::new(None);

    let result = manager.submit("Hi", &GenerationConfig::default()).await;

    assert!(matches!(result, Err(TurnError::Configuration(_))));
    assert!(manager.log().is_empty());
}

#[tokio::test]
async fn test_generation_failure_rolls_back_user_turn() {
    let api = FakeModelApi::with_replies(vec![Err(quota_error())]);
    let mut manager = manager_with(&api);

    let result = manager.submit("Hi", &GenerationConfig::default()).await;

    match result {
        Err(TurnError::Generation(e)) => {
            assert!(e.to_string().contains("check quota"));
        }
        other => panic!("expected generation error, got {:?}", other),
    }
    assert!(manager.log().is_empty());
}

#[tokio::test]
async fn test_failure_mid_conversation_restores_previous_log() {
    let api = FakeModelApi::with_replies(vec![
        Ok("Hello".to_string()),
        Err(GenerationError::Timeout),
        Ok("Sure".to_string()),
    ]);
    let mut manager = manager_with(&api);
    let config = GenerationConfig::default();

    manager.submit("Hi", &config).await.unwrap();
    let before = manager.log().clone();

    assert!(manager.submit("Tell me a joke", &config).await.is_err());
    assert_eq!(manager.log(), &before);

    // Retrying does not duplicate the user's text
    manager.submit("Tell me a joke", &config).await.unwrap();
    let contents: Vec<&str> = manager.log().iter().map(|m| m.content()).collect();
    assert_eq!(contents, vec!["Hi", "Hello", "Tell me a joke", "Sure"]);
}

#[tokio::test]
async fn test_successful_turns_alternate_starting_with_user() {
    let api = FakeModelApi::with_replies(Vec::new());
    let mut manager = manager_with(&api);
    let config = GenerationConfig::default();

    for turn in 1..=4 {
        manager
            .submit(format!("question {}", turn), &config)
            .await
            .unwrap();
        assert_eq!(manager.log().len(), 2 * turn);
    }

    for (index, message) in manager.log().iter().enumerate() {
        let expected = if index % 2 == 0 {
            Role::User
        } else {
            Role::Assistant
        };
        assert_eq!(message.role(), expected);
    }
}

#[tokio::test]
async fn test_clear_resets_log_unconditionally() {
    let api = FakeModelApi::with_replies(Vec::new());
    let mut manager = manager_with(&api);
    let config = GenerationConfig::default();

    manager.clear();
    assert!(manager.log().is_empty());

    manager.submit("Hi", &config).await.unwrap();
    manager.append_user_turn("dangling");
    manager.clear();
    assert!(manager.log().is_empty());
}

#[tokio::test]
async fn test_send_turn_leaves_log_untouched() {
    let api = FakeModelApi::with_replies(vec![Ok("reply".to_string())]);
    let mut manager = manager_with(&api);
    manager.append_user_turn("Hi");

    let reply = manager
        .send_turn(&GenerationConfig::default())
        .await
        .unwrap();

    assert_eq!(reply.role(), Role::Assistant);
    assert_eq!(manager.log().as_slice(), &[Message::user("Hi")]);
}

#[tokio::test]
async fn test_send_turn_requires_trailing_user_message() {
    let api = FakeModelApi::with_replies(Vec::new());
    let manager = manager_with(&api);

    let result = manager.send_turn(&GenerationConfig::default()).await;

    assert!(matches!(result, Err(GenerationError::InvalidState(_))));
    assert!(api.requests().is_empty());
}

#[tokio::test]
async fn test_send_turn_without_client_reports_not_configured() {
    let mut manager = SessionManager::new(None);
    manager.append_user_turn("Hi");

    let result = manager.send_turn(&GenerationConfig::default()).await;

    assert!(matches!(result, Err(GenerationError::NotConfigured)));
}

#[tokio::test]
async fn test_consecutive_user_messages_are_projected_as_is() {
    let api = FakeModelApi::with_replies(vec![Ok("ok".to_string())]);
    let mut manager = manager_with(&api);
    manager.append_user_turn("first");

    manager
        .submit("second", &GenerationConfig::default())
        .await
        .unwrap();

    let requests = api.requests();
    assert_eq!(
        requests[0].history,
        vec![ProviderTurn {
            speaker: Speaker::User,
            text: "first".to_string()
        }]
    );
    assert_eq!(requests[0].message, "second");
}

#[test]
fn test_project_history_maps_roles_in_order() {
    let log = vec![
        Message::user("a"),
        Message::assistant("b"),
        Message::user("c"),
    ];

    let all = project_history(&log, false);
    let speakers: Vec<Speaker> = all.iter().map(|t| t.speaker).collect();
    let texts: Vec<&str> = all.iter().map(|t| t.text.as_str()).collect();

    assert_eq!(speakers, vec![Speaker::User, Speaker::Model, Speaker::User]);
    assert_eq!(texts, vec!["a", "b", "c"]);
    assert_eq!(Speaker::Model.as_str(), "model");
}

#[test]
fn test_project_history_excludes_only_the_last_entry() {
    let log = vec![
        Message::user("a"),
        Message::assistant("b"),
        Message::user("c"),
    ];

    let projected = project_history(&log, true);

    assert_eq!(projected.len(), 2);
    assert_eq!(projected, project_history(&log[..2], false));
}

#[test]
fn test_project_history_short_logs_ignore_exclusion() {
    assert!(project_history(&[], true).is_empty());

    let single = vec![Message::user("only")];
    assert_eq!(project_history(&single, true), project_history(&single, false));
    assert_eq!(project_history(&single, true).len(), 1);
}

#[tokio::test]
async fn test_registry_keeps_session_logs_separate() {
    let api = FakeModelApi::with_replies(Vec::new());
    let client: Arc<dyn ModelApi> = api.clone();
    let mut registry = SessionRegistry::new(Some(client));
    let config = GenerationConfig::default();

    let alice = registry.start();
    let bob = registry.start();
    assert_ne!(alice, bob);
    assert_eq!(registry.len(), 2);

    registry
        .get_mut(&alice)
        .unwrap()
        .manager
        .submit("Hi from alice", &config)
        .await
        .unwrap();

    assert_eq!(registry.get(&alice).unwrap().manager.log().len(), 2);
    assert!(registry.get(&bob).unwrap().manager.log().is_empty());

    assert!(registry.end(&alice));
    assert!(!registry.end(&alice));
    assert!(registry.get(&alice).is_none());
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_registry_sessions_record_id_and_start_time() {
    let before = chrono::Local::now();
    let mut registry = SessionRegistry::new(None);

    let session_id = registry.start();
    let session = registry.get(&session_id).unwrap();

    assert_eq!(session.session_id, session_id);
    assert!(session.started_at >= before);
    assert!(session.started_at <= chrono::Local::now());
    assert!(!session.manager.is_configured());
}
