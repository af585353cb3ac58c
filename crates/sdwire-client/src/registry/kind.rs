//! Logical message identities.
//!
//! Wire tags are volatile and aliased (`c`/`chat`, `j`/`J`/`join`); the
//! identity is the catalog-stable name downstream code matches on.

use std::fmt;

/// Catalog-stable identity of a protocol message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MessageKind {
    /// Untagged line; the whole line is the payload.
    Default,
    /// Tag nobody modelled; payload is the tag plus its raw arguments.
    Unhandled,
    /// The bare `|` line.
    Spacer,
    Init,
    Title,
    Users,
    Deinit,
    Html,
    Uhtml,
    UhtmlChange,
    Join,
    Leave,
    Name,
    Chat,
    ChatTimestamp,
    Timestamp,
    Notify,
    Battle,
    Usercount,
    Popup,
    Pm,
    Nametaken,
    /// Login challenge consumed by the login flow.
    Challstr,
    Updateuser,
    Formats,
    Updatesearch,
    Updatechallenges,
    Queryresponse,
    Tournament,
    Error,
    Bigerror,
    Player,
    Teamsize,
    Gametype,
    Gen,
    Tier,
    Rated,
    Rule,
    Clearpoke,
    Poke,
    Teampreview,
    Start,
    Request,
    Inactive,
    InactiveOff,
    Upkeep,
    Turn,
    Win,
    Tie,
    BattleTimestamp,
    Move,
    Switch,
    Drag,
    Replace,
    DetailsChange,
    FormeChange,
    Swap,
    Cant,
    Faint,
    Fail,
    Block,
    NoTarget,
    Miss,
    Damage,
    Heal,
    SetHp,
    Status,
    CureStatus,
    CureTeam,
    Boost,
    Unboost,
    SetBoost,
    ClearAllBoost,
    Weather,
    FieldStart,
    FieldEnd,
    SideStart,
    SideEnd,
    /// `-start`: a volatile effect begins.
    EffectStart,
    EffectEnd,
    Crit,
    SuperEffective,
    Resisted,
    Immune,
    Item,
    EndItem,
    Ability,
    EndAbility,
    Transform,
    Mega,
    Terastallize,
    Activate,
    Hint,
    Center,
    Message,
    HitCount,
    Prepare,
    MustRecharge,
    SingleTurn,
    SingleMove,
}

impl MessageKind {
    /// Stable name used in tool output and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::Default => "default",
            MessageKind::Unhandled => "unhandled",
            MessageKind::Spacer => "spacer",
            MessageKind::Init => "init",
            MessageKind::Title => "title",
            MessageKind::Users => "users",
            MessageKind::Deinit => "deinit",
            MessageKind::Html => "html",
            MessageKind::Uhtml => "uhtml",
            MessageKind::UhtmlChange => "uhtmlchange",
            MessageKind::Join => "join",
            MessageKind::Leave => "leave",
            MessageKind::Name => "name",
            MessageKind::Chat => "chat",
            MessageKind::ChatTimestamp => "chat_timestamp",
            MessageKind::Timestamp => "timestamp",
            MessageKind::Notify => "notify",
            MessageKind::Battle => "battle",
            MessageKind::Usercount => "usercount",
            MessageKind::Popup => "popup",
            MessageKind::Pm => "pm",
            MessageKind::Nametaken => "nametaken",
            MessageKind::Challstr => "challstr",
            MessageKind::Updateuser => "updateuser",
            MessageKind::Formats => "formats",
            MessageKind::Updatesearch => "updatesearch",
            MessageKind::Updatechallenges => "updatechallenges",
            MessageKind::Queryresponse => "queryresponse",
            MessageKind::Tournament => "tournament",
            MessageKind::Error => "error",
            MessageKind::Bigerror => "bigerror",
            MessageKind::Player => "player",
            MessageKind::Teamsize => "teamsize",
            MessageKind::Gametype => "gametype",
            MessageKind::Gen => "gen",
            MessageKind::Tier => "tier",
            MessageKind::Rated => "rated",
            MessageKind::Rule => "rule",
            MessageKind::Clearpoke => "clearpoke",
            MessageKind::Poke => "poke",
            MessageKind::Teampreview => "teampreview",
            MessageKind::Start => "start",
            MessageKind::Request => "request",
            MessageKind::Inactive => "inactive",
            MessageKind::InactiveOff => "inactiveoff",
            MessageKind::Upkeep => "upkeep",
            MessageKind::Turn => "turn",
            MessageKind::Win => "win",
            MessageKind::Tie => "tie",
            MessageKind::BattleTimestamp => "battle_timestamp",
            MessageKind::Move => "move",
            MessageKind::Switch => "switch",
            MessageKind::Drag => "drag",
            MessageKind::Replace => "replace",
            MessageKind::DetailsChange => "detailschange",
            MessageKind::FormeChange => "formechange",
            MessageKind::Swap => "swap",
            MessageKind::Cant => "cant",
            MessageKind::Faint => "faint",
            MessageKind::Fail => "fail",
            MessageKind::Block => "block",
            MessageKind::NoTarget => "notarget",
            MessageKind::Miss => "miss",
            MessageKind::Damage => "damage",
            MessageKind::Heal => "heal",
            MessageKind::SetHp => "sethp",
            MessageKind::Status => "status",
            MessageKind::CureStatus => "curestatus",
            MessageKind::CureTeam => "cureteam",
            MessageKind::Boost => "boost",
            MessageKind::Unboost => "unboost",
            MessageKind::SetBoost => "setboost",
            MessageKind::ClearAllBoost => "clearallboost",
            MessageKind::Weather => "weather",
            MessageKind::FieldStart => "fieldstart",
            MessageKind::FieldEnd => "fieldend",
            MessageKind::SideStart => "sidestart",
            MessageKind::SideEnd => "sideend",
            MessageKind::EffectStart => "effect_start",
            MessageKind::EffectEnd => "effect_end",
            MessageKind::Crit => "crit",
            MessageKind::SuperEffective => "supereffective",
            MessageKind::Resisted => "resisted",
            MessageKind::Immune => "immune",
            MessageKind::Item => "item",
            MessageKind::EndItem => "enditem",
            MessageKind::Ability => "ability",
            MessageKind::EndAbility => "endability",
            MessageKind::Transform => "transform",
            MessageKind::Mega => "mega",
            MessageKind::Terastallize => "terastallize",
            MessageKind::Activate => "activate",
            MessageKind::Hint => "hint",
            MessageKind::Center => "center",
            MessageKind::Message => "message",
            MessageKind::HitCount => "hitcount",
            MessageKind::Prepare => "prepare",
            MessageKind::MustRecharge => "mustrecharge",
            MessageKind::SingleTurn => "singleturn",
            MessageKind::SingleMove => "singlemove",
        }
    }

    /// Identities with no schema: their payload is raw text.
    pub fn is_raw(self) -> bool {
        matches!(self, MessageKind::Default | MessageKind::Unhandled)
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
