//! Command dispatch and handler behaviour against a recording platform.

use pretty_assertions::assert_eq;

use suggestbot_core::dispatch::{Outcome, dispatch};
use suggestbot_core::id::{ChannelId, GuildId, MessageId, RoleId};
use suggestbot_core::permissions::Permissions;
use suggestbot_core::{DEFAULT_PREFIX, InboundMessage, TokenKind, Tokenizer};
use suggestbot_test_utils::platform::{member, member_with_roles, owner};
use suggestbot_test_utils::{
    MessageBuilder, RecordingPlatform, TestState, TestStateBuilder, init_test_tracing,
};

const GUILD: &str = "g1";
const CHANNEL: &str = "general";
const DENIED: &str = "<@pleb> You don't have permission to run this command.";

fn fixture() -> TestState {
    TestStateBuilder::new()
        .guild(GUILD, Some("suggestions"))
        .admin_role(GUILD, "mods")
        .build()
}

fn platform() -> RecordingPlatform {
    RecordingPlatform::new()
        .with_guild(GUILD, "Test Guild", Some("suggestions"))
        .with_member(GUILD, member_with_roles("mod", &["mods"]))
        .with_member(GUILD, member("pleb"))
}

fn in_guild(author: &str, content: &str) -> InboundMessage {
    MessageBuilder::guild(GUILD, CHANNEL, author)
        .id("m1")
        .content(content)
        .build()
}

fn in_dm(content: &str) -> InboundMessage {
    MessageBuilder::direct("dm-pleb", "pleb").content(content).build()
}

/// Tokenize like the service does and dispatch the leading command.
async fn invoke(
    fixture: &mut TestState,
    platform: &RecordingPlatform,
    message: &InboundMessage,
) -> Outcome {
    init_test_tracing();
    let prefix = match &message.guild_id {
        Some(guild_id) => fixture.state.guild(guild_id).unwrap().bot_prefix.clone(),
        None => DEFAULT_PREFIX.to_string(),
    };
    let mut tokenizer = Tokenizer::new(&message.content, &prefix);
    let first = tokenizer.advance().unwrap();
    assert_eq!(first.kind(), TokenKind::Command, "{}", message.content);
    dispatch(first.value(), &mut tokenizer, &mut fixture.state, platform, message)
        .await
        .unwrap()
}

fn admin_roles(fixture: &TestState) -> Vec<String> {
    fixture
        .state
        .guild(&GuildId::from(GUILD))
        .unwrap()
        .admin_role_ids
        .iter()
        .map(|r| r.to_string())
        .collect()
}

// ── Permissions ────────────────────────────────────────────────────

#[tokio::test]
async fn test_elevated_command_denied_once_without_mutation() {
    let mut fixture = fixture();
    let platform = platform();

    let outcome = invoke(&mut fixture, &platform, &in_guild("pleb", "sb!admin add <@&99>")).await;

    assert_eq!(outcome, Outcome::Denied);
    assert_eq!(platform.sent_to(CHANNEL), vec![DENIED.to_string()]);
    assert_eq!(platform.sent().len(), 1);
    assert_eq!(admin_roles(&fixture), vec!["mods".to_string()]);
    assert!(!fixture.was_saved());
}

#[tokio::test]
async fn test_unknown_member_is_denied() {
    let mut fixture = fixture();
    let platform = platform();

    let outcome = invoke(&mut fixture, &platform, &in_guild("stranger", "sb!botPrefix")).await;

    assert_eq!(outcome, Outcome::Denied);
    assert_eq!(
        platform.sent_to(CHANNEL),
        vec!["<@stranger> You don't have permission to run this command.".to_string()]
    );
}

#[tokio::test]
async fn test_owner_and_platform_permissions_are_elevated() {
    let mut fixture = fixture();
    let platform = platform()
        .with_member(GUILD, owner("boss"))
        .with_member(
            GUILD,
            suggestbot_core::permissions::Member {
                permissions: Permissions::MANAGE_GUILD,
                ..member("manager")
            },
        );

    for author in ["boss", "manager"] {
        platform.clear();
        let outcome = invoke(&mut fixture, &platform, &in_guild(author, "sb!botPrefix")).await;
        assert_eq!(outcome, Outcome::Ran, "{author}");
        assert_eq!(
            platform.sent_to(CHANNEL),
            vec!["The current bot prefix is sb!".to_string()]
        );
    }
}

#[tokio::test]
async fn test_elevated_command_in_dm_has_no_effect() {
    let mut fixture = fixture();
    let platform = platform();

    let outcome = invoke(&mut fixture, &platform, &in_dm("sb!admin add <@&99>")).await;

    assert_eq!(outcome, Outcome::Ignored);
    assert!(platform.sent().is_empty());
    assert_eq!(admin_roles(&fixture), vec!["mods".to_string()]);
}

#[tokio::test]
async fn test_unknown_command_has_no_effect() {
    let mut fixture = fixture();
    let platform = platform();

    assert_eq!(
        invoke(&mut fixture, &platform, &in_guild("pleb", "sb!frobnicate now")).await,
        Outcome::Ran
    );
    assert_eq!(
        invoke(&mut fixture, &platform, &in_dm("sb!frobnicate now")).await,
        Outcome::Ran
    );
    assert!(platform.sent().is_empty());
    assert!(!fixture.was_saved());
}

#[tokio::test]
async fn test_missing_guild_config_is_an_error() {
    let mut fixture = TestStateBuilder::new().build();
    let platform = platform();
    let message = in_guild("mod", "sb!say hi");

    let mut tokenizer = Tokenizer::new(&message.content, DEFAULT_PREFIX);
    tokenizer.advance().unwrap();
    let result = dispatch("say", &mut tokenizer, &mut fixture.state, &platform, &message).await;

    assert!(result.is_err());
    assert!(platform.sent().is_empty());
}

// ── say ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_say_sends_and_deletes_original() {
    let mut fixture = fixture();
    let platform = platform();

    invoke(&mut fixture, &platform, &in_guild("mod", "sb!say hello world")).await;

    let sent = platform.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].content, "hello world");
    assert!(!sent[0].tts);
    assert_eq!(
        platform.deleted(),
        vec![(ChannelId::from(CHANNEL), MessageId::from("m1"))]
    );
}

#[tokio::test]
async fn test_say_tts_suffix() {
    let mut fixture = fixture();
    let platform = platform();

    invoke(&mut fixture, &platform, &in_guild("mod", "sb!say hello world !tts")).await;

    let sent = platform.sent();
    assert_eq!(sent[0].content, "hello world");
    assert!(sent[0].tts);
}

#[tokio::test]
async fn test_say_blank() {
    let mut fixture = fixture();
    let platform = platform();

    invoke(&mut fixture, &platform, &in_guild("mod", "sb!say")).await;
    invoke(&mut fixture, &platform, &in_guild("mod", "sb!say !tts")).await;

    assert_eq!(
        platform.sent_to(CHANNEL),
        vec![
            "I can't say blank messages".to_string(),
            "I can't say blank messages".to_string()
        ]
    );
    assert!(platform.deleted().is_empty());
}

#[tokio::test]
async fn test_say_resolves_escapes_in_remainder() {
    let mut fixture = fixture();
    let platform = platform();

    invoke(&mut fixture, &platform, &in_guild("mod", r#"sb!say \"hi\""#)).await;

    assert_eq!(platform.sent_to(CHANNEL), vec!["\"hi\"".to_string()]);
}

// ── reply ──────────────────────────────────────────────────────────

fn fixture_with_suggestion() -> TestState {
    TestStateBuilder::new()
        .guild(GUILD, Some("suggestions"))
        .admin_role(GUILD, "mods")
        .suggestion(1, "555", "dm-author")
        .build()
}

#[tokio::test]
async fn test_reply_delivers_and_confirms() {
    let mut fixture = fixture_with_suggestion();
    let platform = platform();

    invoke(
        &mut fixture,
        &platform,
        &in_guild("mod", "sb!reply 555 Thanks, we are on it"),
    )
    .await;

    assert_eq!(
        platform.sent_to("dm-author"),
        vec!["The mods from Test Guild have replied to your suggestion: Thanks, we are on it".to_string()]
    );
    assert_eq!(
        platform.sent_to(CHANNEL),
        vec!["Your reply was successfully sent".to_string()]
    );
}

#[tokio::test]
async fn test_reply_without_id() {
    let mut fixture = fixture_with_suggestion();
    let platform = platform();

    invoke(&mut fixture, &platform, &in_guild("mod", "sb!reply")).await;

    assert_eq!(
        platform.sent_to(CHANNEL),
        vec!["You must specify a suggestion id".to_string()]
    );
}

#[tokio::test]
async fn test_reply_with_non_numeric_id_continues() {
    let mut fixture = fixture_with_suggestion();
    let platform = platform();

    invoke(&mut fixture, &platform, &in_guild("mod", "sb!reply abc hello")).await;

    assert_eq!(
        platform.sent_to(CHANNEL),
        vec![
            "You must specify a valid suggestion id".to_string(),
            "Unable to reply to the suggestion because it's either been purged from cache, the user does not exist, or I cannot send a DM to them".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_reply_unknown_or_undeliverable() {
    let mut fixture = fixture_with_suggestion();
    let platform = platform().with_closed_dm("dm-author");
    let failure = "Unable to reply to the suggestion because it's either been purged from cache, the user does not exist, or I cannot send a DM to them";

    invoke(&mut fixture, &platform, &in_guild("mod", "sb!reply 777 hello")).await;
    invoke(&mut fixture, &platform, &in_guild("mod", "sb!reply 555 hello")).await;

    assert_eq!(
        platform.sent_to(CHANNEL),
        vec![failure.to_string(), failure.to_string()]
    );
    assert!(platform.sent_to("dm-author").is_empty());
}

// ── admin ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_admin_add_duplicate_roles() {
    let mut fixture = TestStateBuilder::new().guild(GUILD, None).build();
    let platform = RecordingPlatform::new()
        .with_guild(GUILD, "Test Guild", None)
        .with_member(GUILD, owner("boss"));

    invoke(&mut fixture, &platform, &in_guild("boss", "sb!admin add <@&7> <@&7>")).await;

    assert_eq!(admin_roles(&fixture), vec!["7".to_string()]);
    assert_eq!(
        platform.sent_to(CHANNEL),
        vec!["The admin roles have been updated".to_string()]
    );
    let saved = fixture.saved().await;
    assert_eq!(
        saved.guild_data[0].admin_role_ids.iter().collect::<Vec<_>>(),
        vec![&RoleId::from("7")]
    );
}

#[tokio::test]
async fn test_admin_add_ignores_non_role_tokens() {
    let mut fixture = fixture();
    let platform = platform();

    invoke(&mut fixture, &platform, &in_guild("mod", "sb!admin add please <@&8> <@9>")).await;

    assert_eq!(admin_roles(&fixture), vec!["8".to_string(), "mods".to_string()]);
}

#[tokio::test]
async fn test_admin_add_without_arguments_does_nothing() {
    let mut fixture = fixture();
    let platform = platform();

    invoke(&mut fixture, &platform, &in_guild("mod", "sb!admin add")).await;
    invoke(&mut fixture, &platform, &in_guild("mod", "sb!admin")).await;
    invoke(&mut fixture, &platform, &in_guild("mod", "sb!admin promote <@&8>")).await;

    assert!(platform.sent().is_empty());
    assert!(!fixture.was_saved());
}

#[tokio::test]
async fn test_admin_remove_only_reports_changes() {
    let mut fixture = fixture();
    let platform = platform();

    invoke(&mut fixture, &platform, &in_guild("mod", "sb!admin remove <@&404>")).await;
    assert!(platform.sent().is_empty());

    invoke(&mut fixture, &platform, &in_guild("mod", "sb!admin remove <@&mods>")).await;
    // `<@&mods>` is not a role mention; nothing changes.
    assert!(platform.sent().is_empty());

    fixture
        .state
        .guilds
        .get_mut(&GuildId::from(GUILD))
        .unwrap()
        .admin_role_ids
        .insert(RoleId::from("42"));
    invoke(&mut fixture, &platform, &in_guild("mod", "sb!admin remove <@&42>")).await;
    assert_eq!(
        platform.sent_to(CHANNEL),
        vec!["The admin roles have been updated".to_string()]
    );
    assert_eq!(admin_roles(&fixture), vec!["mods".to_string()]);
}

#[tokio::test]
async fn test_admin_list() {
    let mut fixture = TestStateBuilder::new().guild(GUILD, None).build();
    let platform = RecordingPlatform::new()
        .with_guild(GUILD, "Test Guild", None)
        .with_member(GUILD, owner("boss"));

    invoke(&mut fixture, &platform, &in_guild("boss", "sb!admin list")).await;
    invoke(&mut fixture, &platform, &in_guild("boss", "sb!admin add <@&2> <@&1>")).await;
    platform.clear();
    invoke(&mut fixture, &platform, &in_guild("boss", "sb!admin list")).await;

    assert_eq!(platform.sent_to(CHANNEL), vec!["<@&1> <@&2>".to_string()]);
}

#[tokio::test]
async fn test_admin_list_empty() {
    let mut fixture = TestStateBuilder::new().guild(GUILD, None).build();
    let platform = RecordingPlatform::new()
        .with_guild(GUILD, "Test Guild", None)
        .with_member(GUILD, owner("boss"));

    invoke(&mut fixture, &platform, &in_guild("boss", "sb!admin list")).await;

    assert_eq!(
        platform.sent_to(CHANNEL),
        vec!["No roles are registered as a bot admin".to_string()]
    );
}

// ── suggestionChannel / botPrefix ──────────────────────────────────

#[tokio::test]
async fn test_suggestion_channel_get_and_set() {
    let mut fixture = fixture();
    let platform = platform();

    invoke(&mut fixture, &platform, &in_guild("mod", "sb!suggestionChannel")).await;
    invoke(&mut fixture, &platform, &in_guild("mod", "sb!suggestionChannel <#321>")).await;
    invoke(&mut fixture, &platform, &in_guild("mod", "sb!suggestionChannel")).await;

    assert_eq!(
        platform.sent_to(CHANNEL),
        vec![
            "The current suggestion channel is <#suggestions>".to_string(),
            "The suggestion channel has been updated".to_string(),
            "The current suggestion channel is <#321>".to_string(),
        ]
    );
    let saved = fixture.saved().await;
    assert_eq!(
        saved.guild_data[0].suggestion_channel_id,
        Some(ChannelId::from("321"))
    );
}

#[tokio::test]
async fn test_suggestion_channel_unset() {
    let mut fixture = TestStateBuilder::new()
        .guild(GUILD, None)
        .admin_role(GUILD, "mods")
        .build();
    let platform = platform();

    invoke(&mut fixture, &platform, &in_guild("mod", "sb!suggestionChannel")).await;

    assert_eq!(
        platform.sent_to(CHANNEL),
        vec!["No suggestion channel is configured".to_string()]
    );
}

#[tokio::test]
async fn test_bot_prefix_change_takes_effect() {
    let mut fixture = fixture();
    let platform = platform();

    invoke(&mut fixture, &platform, &in_guild("mod", "sb!botPrefix g!")).await;
    invoke(&mut fixture, &platform, &in_guild("mod", "g!botPrefix")).await;
    // The default prefix keeps working next to the guild prefix.
    invoke(&mut fixture, &platform, &in_guild("mod", "sb!botPrefix")).await;

    assert_eq!(
        platform.sent_to(CHANNEL),
        vec![
            "The bot prefix has been updated".to_string(),
            "The current bot prefix is g!".to_string(),
            "The current bot prefix is g!".to_string(),
        ]
    );
    assert_eq!(fixture.saved().await.guild_data[0].bot_prefix, "g!");
}

// ── help ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_help_lists_commands_in_dm() {
    let mut fixture = fixture();
    let platform = platform();

    let outcome = invoke(&mut fixture, &platform, &in_dm("sb!help")).await;

    assert_eq!(outcome, Outcome::Ran);
    let sent = platform.sent_to("dm-pleb");
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("**Standard Commands**\n`help`"));
    assert!(sent[0].contains("**Admin Commands**\n`say` `reply` `admin` `suggestionChannel` `botPrefix`"));
    assert!(sent[0].contains("`sb!help say`"));
}

#[tokio::test]
async fn test_help_for_one_command_uses_guild_prefix() {
    let mut fixture = TestStateBuilder::new()
        .guild(GUILD, None)
        .prefix(GUILD, "g!")
        .build();
    let platform = platform();

    invoke(&mut fixture, &platform, &in_guild("pleb", "g!help say")).await;
    invoke(&mut fixture, &platform, &in_guild("pleb", "g!help noop")).await;

    let sent = platform.sent_to(CHANNEL);
    assert!(sent[0].starts_with("`g!say` __Makes the bot say something__"));
    assert_eq!(sent[1], "Command 'noop' was not found.");
}
