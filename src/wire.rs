use serde::{Serialize, Serializer};
use serde_json::{Map, Value as JsonValue};

/// Structured field → value payload for partial updates of cards and boards.
///
/// Keys use the API's field names, e.g. `title`, `priority`, `isBlocked`.
pub type Updates = Map<String, JsonValue>;

/// Card priority.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Normal,
    High,
    Critical,
}

/// Role granted to members of a board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BoardRole {
    #[default]
    None,
    BoardReader,
    BoardUser,
    BoardManager,
    BoardAdministrator,
}

/// Scheduling relation between two cards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyType {
    /// Predecessor must finish before the successor can start.
    #[default]
    FinishToStart,
    StartToStart,
    FinishToFinish,
    StartToFinish,
}

/// Body of `POST /board`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBoard {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_shared: bool,
    pub shared_board_role: BoardRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_board_id: Option<String>,
    pub include_cards: bool,
    pub include_existing_users: bool,
    pub base_wip_on_card_size: bool,
    pub exclude_completed_and_archive_violations: bool,
}

impl NewBoard {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Body of `POST /card`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCard {
    pub board_id: String,
    pub lane_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "typeId", skip_serializing_if = "Option::is_none")]
    pub card_type_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    /// Sent as one comma-separated string.
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        serialize_with = "serialize_comma_joined"
    )]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub assigned_user_ids: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub assigned_team_ids: Vec<String>,
    #[serde(rename = "externalCardID", skip_serializing_if = "Option::is_none")]
    pub external_card_id: Option<String>,
    #[serde(rename = "externalSystemUrl", skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_finish: Option<String>,
    #[serde(rename = "classOfServiceId", skip_serializing_if = "Option::is_none")]
    pub custom_icon_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<Map<String, JsonValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
}

impl NewCard {
    pub fn new(
        board_id: impl Into<String>,
        lane_id: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            board_id: board_id.into(),
            lane_id: lane_id.into(),
            title: title.into(),
            ..Self::default()
        }
    }
}

/// One entry of `POST /card/bulk/move`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardMove {
    pub card_id: String,
    pub lane_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub move_children: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub move_parents: Option<bool>,
}

impl CardMove {
    pub fn new(card_id: impl Into<String>, lane_id: impl Into<String>) -> Self {
        Self {
            card_id: card_id.into(),
            lane_id: lane_id.into(),
            ..Self::default()
        }
    }
}

/// Boards and members for bulk access changes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardAccess {
    pub board_ids: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub user_ids: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub team_ids: Vec<String>,
    /// Only honored when removing members.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub emails: Vec<String>,
}

/// Parent cards and the cards to link to them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardConnections {
    pub card_ids: Vec<String>,
    pub connections: ConnectionTargets,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConnectionTargets {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<String>,
}

impl CardConnections {
    /// Links every card in `parents` to every card in `children`.
    pub fn children_of<P, C>(parents: P, children: C) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            card_ids: parents.into_iter().map(Into::into).collect(),
            connections: ConnectionTargets {
                children: children.into_iter().map(Into::into).collect(),
                parents: Vec::new(),
            },
        }
    }
}

/// Child card created and connected in one call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChildCard {
    pub parent_card_id: String,
    /// Only used when the child goes on another board.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_board_id: Option<String>,
    pub child_lane_id: String,
    pub child_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_type_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MoveBody<'a> {
    pub lane_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
}

#[derive(Serialize)]
pub(crate) struct CommentBody<'a> {
    pub text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AssignMembersBody<'a> {
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    pub assigned_user_ids: &'a [String],
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    pub assigned_team_ids: &'a [String],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DependencyBody<'a> {
    pub card_id: &'a str,
    pub depends_on_card_id: &'a str,
    pub dependency_type: DependencyType,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DependencyUpdateBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependency_type: Option<DependencyType>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BulkUpdateBody<'a> {
    pub card_ids: &'a [String],
    pub updates: &'a Updates,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CardIdsBody<'a> {
    pub card_ids: &'a [String],
}

#[derive(Serialize)]
pub(crate) struct MovesBody<'a> {
    pub moves: &'a [CardMove],
}

#[derive(Serialize)]
pub(crate) struct CardsWithRelationshipsBody<'a> {
    pub cards: &'a [JsonValue],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationships: Option<&'a JsonValue>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GrantAccessBody<'a> {
    #[serde(flatten)]
    pub access: &'a BoardAccess,
    pub board_role: BoardRole,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BoardPairBody<'a> {
    pub parent_board_id: &'a str,
    pub child_board_id: &'a str,
}

fn serialize_comma_joined<S: Serializer>(values: &[String], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&values.join(","))
}
