// The interactive menu must survive recoverable failures and keep looping
// until the operator picks exit.

mod util;

use std::collections::HashSet;

use repotidy::commands::run_menu;
use repotidy::error::RepotidyError;

use util::{Answer, Call, FakeClient, ScriptedPrompter, raw, test_config};

#[tokio::test]
async fn test_menu_exit_immediately() {
    let client = FakeClient::with_repos(vec![raw("a", false)]);
    let mut prompter = ScriptedPrompter::new(vec![ScriptedPrompter::one("exit")]);

    run_menu(&client, &mut prompter, &test_config()).await.unwrap();
    assert!(client.calls.borrow().is_empty());
}

#[tokio::test]
async fn test_menu_continues_after_fetch_failure() {
    let client = FakeClient {
        fail_page: Some(1),
        ..FakeClient::with_repos(vec![raw("a", false)])
    };
    let mut prompter = ScriptedPrompter::new(vec![
        ScriptedPrompter::one("list"),
        ScriptedPrompter::one("delete"),
        ScriptedPrompter::one("exit"),
    ]);

    run_menu(&client, &mut prompter, &test_config()).await.unwrap();
    assert_eq!(client.fetch_calls(), 2);
    assert!(client.mutation_calls().is_empty());
    assert!(prompter.answers.is_empty());
}

#[tokio::test]
async fn test_menu_runs_visibility_then_wrong_phrase_delete() {
    let client = FakeClient {
        fail_names: HashSet::from(["b".to_string()]),
        ..FakeClient::with_repos(vec![raw("a", false), raw("b", false), raw("c", true)])
    };
    let mut prompter = ScriptedPrompter::new(vec![
        ScriptedPrompter::one("visibility"),
        ScriptedPrompter::one("private"),
        Answer::Many(vec!["a", "b"]),
        Answer::Confirm(true),
        ScriptedPrompter::one("delete"),
        Answer::Many(vec!["c"]),
        Answer::Text("delete"),
        ScriptedPrompter::one("exit"),
    ]);

    run_menu(&client, &mut prompter, &test_config()).await.unwrap();

    assert_eq!(
        client.mutation_calls(),
        vec![
            Call::SetVisibility("a".to_string(), true),
            Call::SetVisibility("b".to_string(), true),
        ]
    );
    assert_eq!(client.is_private("a"), Some(true));
    assert_eq!(client.is_private("b"), Some(false));
    assert!(client.exists("c"));
}

#[tokio::test]
async fn test_menu_backing_out_of_visibility_target() {
    let client = FakeClient::with_repos(vec![raw("a", false)]);
    let mut prompter = ScriptedPrompter::new(vec![
        ScriptedPrompter::one("visibility"),
        Answer::One(None),
        ScriptedPrompter::one("exit"),
    ]);

    run_menu(&client, &mut prompter, &test_config()).await.unwrap();
    assert!(client.calls.borrow().is_empty());
}

#[tokio::test]
async fn test_menu_recovers_from_prompt_io_error() {
    let client = FakeClient::with_repos(vec![raw("a", false)]);
    let mut prompter = ScriptedPrompter::new(vec![
        Answer::IoError("terminal hiccup"),
        ScriptedPrompter::one("list"),
        ScriptedPrompter::one("exit"),
    ]);

    run_menu(&client, &mut prompter, &test_config()).await.unwrap();
    assert_eq!(client.fetch_calls(), 1);
    assert!(prompter.answers.is_empty());
}

#[tokio::test]
async fn test_menu_gives_up_after_repeated_prompt_errors() {
    let client = FakeClient::with_repos(vec![raw("a", false)]);
    let mut prompter = ScriptedPrompter::new(vec![
        Answer::IoError("one"),
        Answer::IoError("two"),
        Answer::IoError("three"),
        ScriptedPrompter::one("list"),
    ]);

    let err = run_menu(&client, &mut prompter, &test_config()).await.unwrap_err();
    assert!(matches!(err, RepotidyError::Io(_)));
    assert!(client.calls.borrow().is_empty());
    assert_eq!(prompter.answers.len(), 1);
}

#[tokio::test]
async fn test_menu_stops_when_input_closes() {
    let client = FakeClient::with_repos(vec![raw("a", false)]);
    let mut prompter = ScriptedPrompter::new(vec![Answer::Closed, ScriptedPrompter::one("list")]);

    let err = run_menu(&client, &mut prompter, &test_config()).await.unwrap_err();
    assert!(matches!(err, RepotidyError::Prompt(_)));
    assert!(client.calls.borrow().is_empty());
}
