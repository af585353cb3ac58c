//! Standard message catalog: identity, wire tags and schema per message.
//!
//! The first tag of each entry is the canonical one used when encoding.
//! Free-text and JSON bodies opt out of keyword extraction so bracketed text
//! inside them is never mistaken for `[name] value` annotations.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value as JsonValue;

use sdwire_core::protocol::{
    array, details, hp, json, number, optional, pokemon, subcommand, text, username,
    MessageSchema, Rule,
};

use super::kind::MessageKind;

/// One catalog row.
pub struct Entry {
    pub kind: MessageKind,
    pub tags: &'static [&'static str],
    pub schema: MessageSchema,
}

fn entry(kind: MessageKind, tags: &'static [&'static str], schema: MessageSchema) -> Entry {
    Entry { kind, tags, schema }
}

const SIDES: &[&str] = &["p1", "p2", "p3", "p4"];
const STATS: &[&str] = &["atk", "def", "spa", "spd", "spe", "accuracy", "evasion"];

// --------------------
// JSON payload shapes (validation only)
// --------------------

/// `|updatesearch|` body.
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct SearchState {
    searching: Vec<JsonValue>,
    #[serde(default)]
    games: Option<JsonValue>,
}

/// `|updatechallenges|` body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
struct ChallengeState {
    challenges_from: HashMap<String, JsonValue>,
    #[serde(default)]
    challenge_to: Option<JsonValue>,
}

/// `|request|` body: any object.
type BattleRequest = serde_json::Map<String, JsonValue>;

// --------------------
// schema shorthands
// --------------------

/// Single free-text field swallowing the rest of the line.
fn free_text(name: &'static str) -> MessageSchema {
    MessageSchema::new()
        .field(name, text())
        .concat_last()
        .skip_kwargs()
}

fn json_body<T: serde::de::DeserializeOwned + 'static>(name: &'static str) -> MessageSchema {
    MessageSchema::new()
        .field(name, json::<T>())
        .concat_last()
        .skip_kwargs()
}

fn just_pokemon() -> MessageSchema {
    MessageSchema::new().field("pokemon", pokemon())
}

fn pokemon_and(name: &'static str) -> MessageSchema {
    MessageSchema::new()
        .field("pokemon", pokemon())
        .field(name, text())
}

fn appearance() -> MessageSchema {
    MessageSchema::new()
        .field("pokemon", pokemon())
        .field("details", details())
        .field("hp", optional(hp()))
        .omit_trailing_undefined()
}

fn hp_change() -> MessageSchema {
    MessageSchema::new()
        .field("pokemon", pokemon())
        .field("hp", hp())
}

fn stat_change() -> MessageSchema {
    MessageSchema::new()
        .field("pokemon", pokemon())
        .field("stat", text())
        .field("amount", number())
        .rule(Rule::OneOf {
            field: "stat",
            values: STATS,
        })
}

fn side_condition() -> MessageSchema {
    MessageSchema::new()
        .field("side", text())
        .field("condition", text())
}

fn queryresponse() -> MessageSchema {
    let arms = ["userdetails", "rooms", "roomlist", "laddertop", "savereplay", "debug"]
        .into_iter()
        .map(|name| (name, json_body::<JsonValue>("data")));
    MessageSchema::new()
        .field("response", subcommand(arms))
        .concat_last()
        .skip_kwargs()
}

fn tournament() -> MessageSchema {
    let user = || MessageSchema::new().field("user", text());
    let toggle = || {
        MessageSchema::new()
            .field("state", text())
            .field("timeout", optional(number()))
            .omit_trailing_undefined()
    };
    let arms = [
        (
            "create",
            MessageSchema::new()
                .field("format", text())
                .field("generator", text())
                .field("player_cap", optional(number()))
                .omit_trailing_undefined(),
        ),
        ("update", json_body::<JsonValue>("data")),
        ("updateEnd", MessageSchema::new()),
        (
            "error",
            MessageSchema::new()
                .field("error_type", text())
                .field("message", optional(text()))
                .concat_last()
                .omit_trailing_undefined(),
        ),
        ("forceend", MessageSchema::new()),
        ("join", user()),
        ("leave", user()),
        (
            "replace",
            MessageSchema::new()
                .field("old_user", text())
                .field("new_user", text()),
        ),
        ("start", MessageSchema::new().field("players", number())),
        ("disqualify", user()),
        (
            "battlestart",
            MessageSchema::new()
                .field("user1", text())
                .field("user2", text())
                .field("room_id", text()),
        ),
        (
            "battleend",
            MessageSchema::new()
                .field("user1", text())
                .field("user2", text())
                .field("result", text())
                .field("score", array(number()))
                .field("recorded", text())
                .field("room_id", text())
                .rule(Rule::OneOf {
                    field: "result",
                    values: &["win", "loss", "draw"],
                })
                .rule(Rule::OneOf {
                    field: "recorded",
                    values: &["success", "fail"],
                }),
        ),
        ("end", json_body::<JsonValue>("data")),
        ("autostart", toggle()),
        ("autodq", toggle()),
        ("scouting", MessageSchema::new().field("state", text())),
    ];
    MessageSchema::new()
        .field("command", subcommand(arms))
        .concat_last()
        .skip_kwargs()
}

/// Every message the standard registry knows.
pub fn entries() -> Vec<Entry> {
    use MessageKind as K;

    vec![
        // ---- room lifecycle / global
        entry(K::Spacer, &[""], MessageSchema::new()),
        entry(
            K::Init,
            &["init"],
            MessageSchema::new()
                .field("room_type", text())
                .rule(Rule::OneOf {
                    field: "room_type",
                    values: &["chat", "battle"],
                }),
        ),
        entry(K::Title, &["title"], free_text("title")),
        entry(
            K::Users,
            &["users"],
            MessageSchema::new()
                .field("users", array(text()))
                .concat_last()
                .skip_kwargs(),
        ),
        entry(K::Deinit, &["deinit"], MessageSchema::new()),
        entry(K::Html, &["html", "raw"], free_text("html")),
        entry(
            K::Uhtml,
            &["uhtml"],
            MessageSchema::new()
                .field("name", text())
                .field("html", text())
                .concat_last()
                .skip_kwargs(),
        ),
        entry(
            K::UhtmlChange,
            &["uhtmlchange"],
            MessageSchema::new()
                .field("name", text())
                .field("html", text())
                .concat_last()
                .skip_kwargs(),
        ),
        entry(K::Join, &["join", "j", "J"], MessageSchema::new().field("user", username())),
        entry(K::Leave, &["leave", "l", "L"], MessageSchema::new().field("user", username())),
        entry(
            K::Name,
            &["name", "n", "N"],
            MessageSchema::new()
                .field("user", username())
                .field("old_id", text()),
        ),
        entry(
            K::Chat,
            &["chat", "c"],
            MessageSchema::new()
                .field("user", username())
                .field("message", text())
                .concat_last()
                .skip_kwargs(),
        ),
        entry(
            K::ChatTimestamp,
            &["c:"],
            MessageSchema::new()
                .field("timestamp", number())
                .field("user", username())
                .field("message", text())
                .concat_last()
                .skip_kwargs(),
        ),
        entry(K::Timestamp, &[":"], MessageSchema::new().field("timestamp", number())),
        entry(
            K::Notify,
            &["notify"],
            MessageSchema::new()
                .field("title", text())
                .field("message", optional(text()))
                .field("highlight", optional(text()))
                .rule(Rule::Requires {
                    field: "highlight",
                    needs: "message",
                })
                .omit_trailing_undefined()
                .skip_kwargs(),
        ),
        entry(
            K::Battle,
            &["battle", "b", "B"],
            MessageSchema::new()
                .field("room_id", text())
                .field("user1", username())
                .field("user2", username()),
        ),
        entry(K::Usercount, &["usercount"], MessageSchema::new().field("count", number())),
        entry(K::Popup, &["popup"], free_text("message")),
        entry(
            K::Pm,
            &["pm"],
            MessageSchema::new()
                .field("sender", username())
                .field("receiver", username())
                .field("message", text())
                .concat_last()
                .skip_kwargs(),
        ),
        entry(
            K::Nametaken,
            &["nametaken"],
            MessageSchema::new()
                .field("username", text())
                .field("message", text())
                .concat_last()
                .skip_kwargs(),
        ),
        entry(K::Challstr, &["challstr"], free_text("challenge")),
        entry(
            K::Updateuser,
            &["updateuser"],
            MessageSchema::new()
                .field("user", username())
                .field("named", number())
                .field("avatar", text())
                .field("settings", optional(json::<JsonValue>()))
                .concat_last()
                .omit_trailing_undefined()
                .skip_kwargs(),
        ),
        entry(K::Formats, &["formats"], free_text("formats")),
        entry(K::Updatesearch, &["updatesearch"], json_body::<SearchState>("search")),
        entry(
            K::Updatechallenges,
            &["updatechallenges"],
            json_body::<ChallengeState>("challenges"),
        ),
        entry(K::Queryresponse, &["queryresponse"], queryresponse()),
        entry(K::Tournament, &["tournament"], tournament()),
        entry(K::Error, &["error"], free_text("message")),
        entry(K::Bigerror, &["bigerror"], free_text("message")),
        // ---- battle setup
        entry(
            K::Player,
            &["player"],
            MessageSchema::new()
                .field("side", text())
                .field("username", optional(text()))
                .field("avatar", optional(text()))
                .field("rating", optional(number()))
                .rule(Rule::OneOf {
                    field: "side",
                    values: SIDES,
                })
                .rule(Rule::Requires {
                    field: "rating",
                    needs: "username",
                })
                .omit_trailing_undefined(),
        ),
        entry(
            K::Teamsize,
            &["teamsize"],
            MessageSchema::new()
                .field("side", text())
                .field("size", number())
                .rule(Rule::OneOf {
                    field: "side",
                    values: SIDES,
                }),
        ),
        entry(
            K::Gametype,
            &["gametype"],
            MessageSchema::new()
                .field("game_type", text())
                .rule(Rule::OneOf {
                    field: "game_type",
                    values: &["singles", "doubles", "triples", "multi", "freeforall"],
                }),
        ),
        entry(K::Gen, &["gen"], MessageSchema::new().field("generation", number())),
        entry(K::Tier, &["tier"], free_text("format")),
        entry(
            K::Rated,
            &["rated"],
            MessageSchema::new()
                .field("message", optional(text()))
                .concat_last()
                .omit_trailing_undefined()
                .skip_kwargs(),
        ),
        entry(K::Rule, &["rule"], free_text("rule")),
        entry(K::Clearpoke, &["clearpoke"], MessageSchema::new()),
        entry(
            K::Poke,
            &["poke"],
            MessageSchema::new()
                .field("side", text())
                .field("details", details())
                .field("item", optional(text()))
                .rule(Rule::OneOf {
                    field: "side",
                    values: SIDES,
                })
                .omit_trailing_undefined(),
        ),
        entry(
            K::Teampreview,
            &["teampreview"],
            MessageSchema::new()
                .field("count", optional(number()))
                .omit_trailing_undefined(),
        ),
        entry(K::Start, &["start"], MessageSchema::new()),
        entry(
            K::Request,
            &["request"],
            MessageSchema::new()
                .field("request", optional(json::<BattleRequest>()))
                .concat_last()
                .omit_trailing_undefined()
                .skip_kwargs(),
        ),
        entry(K::Inactive, &["inactive"], free_text("message")),
        entry(K::InactiveOff, &["inactiveoff"], free_text("message")),
        // ---- battle progress
        entry(K::Upkeep, &["upkeep"], MessageSchema::new()),
        entry(K::Turn, &["turn"], MessageSchema::new().field("number", number())),
        entry(K::Win, &["win"], free_text("user")),
        entry(K::Tie, &["tie"], MessageSchema::new()),
        entry(K::BattleTimestamp, &["t:"], MessageSchema::new().field("timestamp", number())),
        // ---- major actions
        entry(
            K::Move,
            &["move"],
            MessageSchema::new()
                .field("pokemon", pokemon())
                .field("move", text())
                .field("target", optional(pokemon()))
                .omit_trailing_undefined(),
        ),
        entry(K::Switch, &["switch"], appearance()),
        entry(K::Drag, &["drag"], appearance()),
        entry(K::Replace, &["replace"], appearance()),
        entry(K::DetailsChange, &["detailschange"], appearance()),
        entry(
            K::FormeChange,
            &["-formechange"],
            MessageSchema::new()
                .field("pokemon", pokemon())
                .field("species", text())
                .field("hp", optional(hp()))
                .omit_trailing_undefined(),
        ),
        entry(
            K::Swap,
            &["swap"],
            MessageSchema::new()
                .field("pokemon", pokemon())
                .field("position", number()),
        ),
        entry(
            K::Cant,
            &["cant"],
            MessageSchema::new()
                .field("pokemon", pokemon())
                .field("reason", text())
                .field("move", optional(text()))
                .omit_trailing_undefined(),
        ),
        entry(K::Faint, &["faint"], just_pokemon()),
        // ---- minor actions
        entry(
            K::Fail,
            &["-fail"],
            MessageSchema::new()
                .field("pokemon", pokemon())
                .field("action", optional(text()))
                .omit_trailing_undefined(),
        ),
        entry(
            K::Block,
            &["-block"],
            MessageSchema::new()
                .field("pokemon", pokemon())
                .field("effect", text())
                .field("move", optional(text()))
                .field("attacker", optional(pokemon()))
                .omit_trailing_undefined(),
        ),
        entry(
            K::NoTarget,
            &["-notarget"],
            MessageSchema::new()
                .field("pokemon", optional(pokemon()))
                .omit_trailing_undefined(),
        ),
        entry(
            K::Miss,
            &["-miss"],
            MessageSchema::new()
                .field("source", pokemon())
                .field("target", optional(pokemon()))
                .omit_trailing_undefined(),
        ),
        entry(K::Damage, &["-damage"], hp_change()),
        entry(K::Heal, &["-heal"], hp_change()),
        entry(K::SetHp, &["-sethp"], hp_change()),
        entry(K::Status, &["-status"], pokemon_and("status")),
        entry(K::CureStatus, &["-curestatus"], pokemon_and("status")),
        entry(K::CureTeam, &["-cureteam"], just_pokemon()),
        entry(K::Boost, &["-boost"], stat_change()),
        entry(K::Unboost, &["-unboost"], stat_change()),
        entry(K::SetBoost, &["-setboost"], stat_change()),
        entry(K::ClearAllBoost, &["-clearallboost"], MessageSchema::new()),
        entry(K::Weather, &["-weather"], MessageSchema::new().field("weather", text())),
        entry(K::FieldStart, &["-fieldstart"], MessageSchema::new().field("condition", text())),
        entry(K::FieldEnd, &["-fieldend"], MessageSchema::new().field("condition", text())),
        entry(K::SideStart, &["-sidestart"], side_condition()),
        entry(K::SideEnd, &["-sideend"], side_condition()),
        entry(
            K::EffectStart,
            &["-start"],
            MessageSchema::new()
                .field("pokemon", pokemon())
                .field("effect", text())
                .field("detail", optional(text()))
                .omit_trailing_undefined(),
        ),
        entry(K::EffectEnd, &["-end"], pokemon_and("effect")),
        entry(K::Crit, &["-crit"], just_pokemon()),
        entry(K::SuperEffective, &["-supereffective"], just_pokemon()),
        entry(K::Resisted, &["-resisted"], just_pokemon()),
        entry(K::Immune, &["-immune"], just_pokemon()),
        entry(K::Item, &["-item"], pokemon_and("item")),
        entry(K::EndItem, &["-enditem"], pokemon_and("item")),
        entry(
            K::Ability,
            &["-ability"],
            MessageSchema::new()
                .field("pokemon", pokemon())
                .field("ability", optional(text()))
                .omit_trailing_undefined(),
        ),
        entry(K::EndAbility, &["-endability"], just_pokemon()),
        entry(
            K::Transform,
            &["-transform"],
            MessageSchema::new()
                .field("pokemon", pokemon())
                .field("target", pokemon()),
        ),
        entry(
            K::Mega,
            &["-mega"],
            MessageSchema::new()
                .field("pokemon", pokemon())
                .field("species", text())
                .field("megastone", optional(text()))
                .omit_trailing_undefined(),
        ),
        entry(K::Terastallize, &["-terastallize"], pokemon_and("tera_type")),
        entry(
            K::Activate,
            &["-activate"],
            MessageSchema::new()
                .field("pokemon", optional(pokemon()))
                .field("effect", text())
                .field("detail", optional(text()))
                // Skill Swap and friends name both sides' abilities.
                .field("other_detail", optional(text()))
                .omit_trailing_undefined(),
        ),
        entry(K::Hint, &["-hint"], free_text("message")),
        entry(K::Center, &["-center"], MessageSchema::new()),
        entry(K::Message, &["-message"], free_text("message")),
        entry(
            K::HitCount,
            &["-hitcount"],
            MessageSchema::new()
                .field("pokemon", pokemon())
                .field("count", number()),
        ),
        entry(
            K::Prepare,
            &["-prepare"],
            MessageSchema::new()
                .field("attacker", pokemon())
                .field("move", text())
                .field("defender", optional(pokemon()))
                .omit_trailing_undefined(),
        ),
        entry(K::MustRecharge, &["-mustrecharge"], just_pokemon()),
        entry(K::SingleTurn, &["-singleturn"], pokemon_and("effect")),
        entry(K::SingleMove, &["-singlemove"], pokemon_and("effect")),
    ]
}
