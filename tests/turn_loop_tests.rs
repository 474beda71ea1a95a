// Integration tests for the interview turn loop
//
// These drive an InterviewClient against a scripted backend and check the
// transcript, loading flag and request sequencing after each completion.

mod common;

use common::{pump, question, sales_form, server_error, started, ScriptedApi};
use mock_interview::api::NextResponse;
use mock_interview::client::{InterviewClient, Update};
use mock_interview::error::SessionError;
use mock_interview::session::{
    InterviewSession, MessageKind, Stage, TurnOutcome, COMPLETION_MESSAGE,
};
use std::sync::Arc;
use std::time::Duration;

/// Start a sales/chatty session "abc" whose opening question has arrived
async fn interviewing(
    api: &Arc<ScriptedApi>,
) -> (InterviewClient, tokio::sync::mpsc::Receiver<mock_interview::ClientEvent>) {
    api.push_start(Ok(started("abc")));
    api.push_next(Ok(question("Tell me about yourself")));

    let (mut client, mut events) = InterviewClient::new(api.clone());
    client.start(sales_form()).unwrap();
    assert_eq!(pump(&mut client, &mut events).await.unwrap(), Update::Started);
    assert_eq!(
        pump(&mut client, &mut events).await.unwrap(),
        Update::Turn(TurnOutcome::Appended { from: 0 })
    );
    (client, events)
}

#[tokio::test]
async fn test_start_fetches_opening_question() {
    let api = Arc::new(ScriptedApi::new());
    let (client, _events) = interviewing(&api).await;

    // Exactly one start, then one empty-answer turn for the opening question
    assert_eq!(api.start_count(), 1);
    assert_eq!(api.next_texts(), vec![String::new()]);
    assert_eq!(api.next_requests.lock().unwrap()[0].session_id, "abc");

    let form = &api.start_forms.lock().unwrap()[0];
    assert_eq!(form.role.as_str(), "sales");
    assert_eq!(form.persona.as_str(), "chatty");
    assert!(form.resume.is_none());

    let session = client.session();
    assert_eq!(session.stage(), Stage::Interview);
    assert_eq!(session.session_id(), Some("abc"));
    let messages = session.transcript().messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].kind, MessageKind::Agent);
    assert_eq!(messages[0].text, "Tell me about yourself");
    assert_eq!(session.transcript().count(MessageKind::User), 0);
    assert!(client.timer_running());
}

#[tokio::test]
async fn test_answer_appends_user_then_feedback_then_question() {
    let api = Arc::new(ScriptedApi::new());
    let (mut client, mut events) = interviewing(&api).await;

    api.push_next(Ok(NextResponse {
        feedback: Some("Good specificity".to_string()),
        next_question: Some("What motivates you?".to_string()),
        ..Default::default()
    }));
    client.submit("I have 5 years in sales").unwrap();

    // Optimistic append before the server answers
    let session = client.session();
    assert_eq!(session.transcript().len(), 2);
    assert_eq!(session.transcript().messages()[1].kind, MessageKind::User);
    assert_eq!(session.transcript().messages()[1].text, "I have 5 years in sales");
    assert!(session.is_loading());
    assert!(session.typing_indicator_visible());

    let update = pump(&mut client, &mut events).await.unwrap();
    assert_eq!(update, Update::Turn(TurnOutcome::Appended { from: 2 }));

    let messages = client.session().transcript().messages();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[2].kind, MessageKind::Feedback);
    assert_eq!(messages[2].text, "Good specificity");
    assert_eq!(messages[3].kind, MessageKind::Agent);
    assert_eq!(messages[3].text, "What motivates you?");
    assert!(!client.session().is_loading());
    assert_eq!(api.next_texts()[1], "I have 5 years in sales");
}

#[tokio::test]
async fn test_end_session_shows_summary_and_blocks_submissions() {
    let api = Arc::new(ScriptedApi::new());
    let (mut client, mut events) = interviewing(&api).await;

    api.push_next(Ok(NextResponse {
        end_session: true,
        summary: Some("Great job".to_string()),
        ..Default::default()
    }));
    client.submit("That's all from me").unwrap();
    let update = pump(&mut client, &mut events).await.unwrap();
    assert_eq!(update, Update::Turn(TurnOutcome::Ended));

    let session = client.session();
    assert!(session.is_ended());
    assert_eq!(session.summary(), Some("Great job"));
    let last = session.transcript().messages().last().unwrap();
    assert_eq!(last.kind, MessageKind::Agent);
    assert_eq!(last.text, COMPLETION_MESSAGE);
    assert!(!client.timer_running());

    // No further requests, whatever is typed
    let requests = api.next_count();
    for text in ["hello?", "one more thing", "  "] {
        assert!(client.submit(text).is_err());
    }
    assert!(matches!(client.retry(), Err(SessionError::Ended)));
    assert_eq!(api.next_count(), requests);
    assert!(!client.session().can_submit());
}

#[tokio::test]
async fn test_turn_requests_never_overlap() {
    let api = Arc::new(ScriptedApi::with_delay(Duration::from_millis(20)));
    let (mut client, mut events) = interviewing(&api).await;

    for i in 0..5 {
        api.push_next(Ok(question(&format!("Question {}", i + 2))));
        client.submit(&format!("Answer {}", i + 1)).unwrap();

        // A second submission while the first is in flight is refused
        assert!(matches!(
            client.submit("impatient follow-up"),
            Err(SessionError::Busy)
        ));

        pump(&mut client, &mut events).await.unwrap();
    }

    assert_eq!(api.max_in_flight.load(std::sync::atomic::Ordering::SeqCst), 1);
    assert_eq!(api.next_count(), 6);
    assert!(!api.next_texts().iter().any(|t| t == "impatient follow-up"));
    assert_eq!(client.session().transcript().len(), 11);
}

#[tokio::test]
async fn test_start_failure_stays_in_setup() {
    let api = Arc::new(ScriptedApi::new());
    api.push_start(Err(server_error()));

    let (mut client, mut events) = InterviewClient::new(api.clone());
    client.start(sales_form()).unwrap();
    assert!(client.session().is_loading());

    let err = pump(&mut client, &mut events).await.unwrap_err();
    assert!(matches!(err, SessionError::StartFailure(_)));

    let session = client.session();
    assert_eq!(session.stage(), Stage::Setup);
    assert_eq!(session.session_id(), None);
    assert!(!session.is_loading());
    assert!(session.transcript().is_empty());
    assert_eq!(api.next_count(), 0);
    assert!(!client.timer_running());

    // Manual retry succeeds
    api.push_start(Ok(started("abc")));
    api.push_next(Ok(question("Tell me about yourself")));
    client.start(session_form_again(&client)).unwrap();
    assert_eq!(pump(&mut client, &mut events).await.unwrap(), Update::Started);
    pump(&mut client, &mut events).await.unwrap();
    assert_eq!(client.session().transcript().len(), 1);
}

fn session_form_again(client: &InterviewClient) -> mock_interview::SessionForm {
    client.session().form().clone()
}

#[tokio::test]
async fn test_invalid_form_issues_no_request() {
    let api = Arc::new(ScriptedApi::new());
    let (mut client, _events) = InterviewClient::new(api.clone());

    let mut form = sales_form();
    form.email = "not-an-email".to_string();
    assert!(matches!(client.start(form), Err(SessionError::Invalid(_))));

    tokio::task::yield_now().await;
    assert_eq!(api.start_count(), 0);
    assert!(!client.session().is_loading());
}

#[tokio::test]
async fn test_turn_failure_keeps_answer_and_retry_resends_it() {
    let api = Arc::new(ScriptedApi::new());
    let (mut client, mut events) = interviewing(&api).await;

    api.push_next(Err(server_error()));
    client.submit("I exceeded quota twice").unwrap();
    let err = pump(&mut client, &mut events).await.unwrap_err();
    assert!(matches!(err, SessionError::TurnFailure(_)));

    let session = client.session();
    assert!(!session.is_loading());
    assert_eq!(session.transcript().len(), 2);
    assert!(session.transcript().is_unconfirmed(1));

    api.push_next(Ok(question("By how much?")));
    client.retry().unwrap();
    pump(&mut client, &mut events).await.unwrap();

    let texts = api.next_texts();
    assert_eq!(texts[1], "I exceeded quota twice");
    assert_eq!(texts[2], "I exceeded quota twice");

    let transcript = client.session().transcript();
    assert_eq!(transcript.len(), 3);
    assert_eq!(transcript.count(MessageKind::User), 1);
    assert!(!transcript.is_unconfirmed(1));
}

#[tokio::test]
async fn test_reset_discards_in_flight_turn() {
    let api = Arc::new(ScriptedApi::new());
    let (mut client, mut events) = interviewing(&api).await;

    api.push_next(Ok(question("This arrives too late")));
    client.submit("answer").unwrap();
    client.reset();

    assert_eq!(pump(&mut client, &mut events).await.unwrap(), Update::Stale);
    assert_eq!(client.snapshot(), InterviewSession::new().snapshot(0));
    assert!(!client.timer_running());
}

#[tokio::test]
async fn test_reset_after_turns_matches_fresh_state() {
    let api = Arc::new(ScriptedApi::new());
    let (mut client, mut events) = interviewing(&api).await;

    for answer in ["one", "two"] {
        api.push_next(Ok(question("next")));
        client.submit(answer).unwrap();
        pump(&mut client, &mut events).await.unwrap();
    }
    client.reset();
    let first = client.snapshot();
    client.reset();

    assert_eq!(first, InterviewSession::new().snapshot(0));
    assert_eq!(client.snapshot(), first);
    assert_eq!(client.elapsed_secs(), 0);
    assert_eq!(client.session().session_id(), None);
}

#[tokio::test]
async fn test_empty_server_response_adds_nothing() {
    let api = Arc::new(ScriptedApi::new());
    let (mut client, mut events) = interviewing(&api).await;

    api.push_next(Ok(NextResponse::default()));
    client.submit("hello").unwrap();
    let update = pump(&mut client, &mut events).await.unwrap();

    assert_eq!(update, Update::Turn(TurnOutcome::NoOp));
    assert_eq!(client.session().transcript().len(), 2);
    assert!(client.session().can_submit());
}
