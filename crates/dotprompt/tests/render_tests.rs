//! End-to-end rendering: template execution, role splitting, part building

use std::sync::Arc;
use std::thread;

use dotprompt::{to_messages, Message, Part, Prompt, PromptError, Role};
use serde_json::json;

#[test]
fn test_plain_text_is_single_user_message() {
    assert_eq!(to_messages("Hello"), vec![Message::text(Role::User, "Hello")]);
}

#[test]
fn test_role_markers_split_messages() {
    let messages = to_messages("<<<dotprompt:role:system>>>Be terse.<<<dotprompt:role:user>>>Hi");
    assert_eq!(
        messages,
        vec![
            Message::text(Role::System, "Be terse."),
            Message::text(Role::User, "Hi"),
        ]
    );
}

#[test]
fn test_media_marker_becomes_media_part() {
    let messages = to_messages("Look: <<<dotprompt:media:url https://x/img.png image/png>>> done");
    assert_eq!(
        messages,
        vec![Message::new(
            Role::User,
            vec![
                Part::text("Look: "),
                Part::media("image/png", "https://x/img.png"),
                Part::text(" done"),
            ],
        )]
    );
}

#[test]
fn test_role_marker_followed_by_whitespace_yields_nothing() {
    assert!(to_messages("<<<dotprompt:role:user>>>   ").is_empty());
}

#[test]
fn test_unmarked_text_round_trips() {
    for input in ["x", "  padded  ", "line one\nline two\n", "<<<not a marker>>>"] {
        assert_eq!(to_messages(input), vec![Message::text(Role::User, input)]);
    }
    for blank in ["", " ", "\n\t"] {
        assert!(to_messages(blank).is_empty());
    }
}

#[test]
fn test_template_with_roles_and_media() {
    let document = r#"---
model: vision-model
input:
  default:
    subject: the picture
---
{{role "system"}}
You describe images.
{{role "user"}}
Describe {{subject}}: {{media url=photo contentType="image/jpeg"}}
"#;
    let prompt = Prompt::parse("describe", document).unwrap();
    let messages = prompt
        .render_messages(&json!({ "photo": "https://x/cat.jpg" }))
        .unwrap();

    assert_eq!(
        messages,
        vec![
            Message::text(Role::System, "\nYou describe images.\n"),
            Message::new(
                Role::User,
                vec![
                    Part::text("\nDescribe the picture: "),
                    Part::media("image/jpeg", "https://x/cat.jpg"),
                    Part::text("\n"),
                ],
            ),
        ]
    );
}

#[test]
fn test_json_helper_inside_prompt() {
    let prompt = Prompt::parse("data", "Data: {{json record indent=1}}").unwrap();
    let text = prompt
        .render_text(&json!({ "record": { "id": 7 } }))
        .unwrap();
    assert_eq!(text, "Data: {\n \"id\": 7\n}");
}

#[test]
fn test_render_text_errors() {
    let multi = Prompt::parse("multi", "{{role \"system\"}}a{{role \"user\"}}b").unwrap();
    assert!(matches!(
        multi.render_text(&json!({})),
        Err(PromptError::MultiMessage(2))
    ));

    let modal = Prompt::parse("modal", "see {{media url=\"https://x/a.png\"}}").unwrap();
    assert!(matches!(
        modal.render_text(&json!({})),
        Err(PromptError::MultiModal)
    ));

    // The full-message accessor never raises these.
    assert_eq!(multi.render_messages(&json!({})).unwrap().len(), 2);
    assert_eq!(modal.render_messages(&json!({})).unwrap().len(), 1);
}

#[test]
fn test_literal_marker_text_is_read_as_directive() {
    let prompt = Prompt::parse("literal", "{{text}}").unwrap();
    let messages = prompt
        .render_messages(&json!({ "text": "a<<<dotprompt:role:model>>>b" }))
        .unwrap();
    assert_eq!(
        messages,
        vec![Message::text(Role::User, "a"), Message::text(Role::Model, "b")]
    );
}

#[test]
fn test_prompt_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Prompt>();

    let prompt = Arc::new(
        Prompt::parse("greet", "{{role \"system\"}}Greet.{{role \"user\"}}I am {{name}}").unwrap(),
    );

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let prompt = Arc::clone(&prompt);
            thread::spawn(move || {
                let name = format!("user{i}");
                let messages = prompt.render_messages(&json!({ "name": name })).unwrap();
                (name, messages)
            })
        })
        .collect();

    for handle in handles {
        let (name, messages) = handle.join().unwrap();
        assert_eq!(messages[0], Message::text(Role::System, "Greet."));
        assert_eq!(messages[1], Message::text(Role::User, format!("I am {name}")));
    }
}
