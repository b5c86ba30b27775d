use serde_json::Value as JsonValue;

use crate::{
    decode::take_list,
    types::path_segment,
    wire::{AssignMembersBody, CommentBody, MoveBody},
    AgilePlaceClient, NewCard, Query, Result, Updates,
};

/// Filters for [`AgilePlaceClient::list_cards`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardQuery {
    pub board_id: Option<String>,
    /// ISO 8601 timestamp; only cards modified after it are returned.
    pub since: Option<String>,
    /// Restrict the returned fields.
    pub only: Vec<String>,
    pub limit: u32,
    pub offset: u32,
}

impl Default for CardQuery {
    fn default() -> Self {
        Self {
            board_id: None,
            since: None,
            only: Vec::new(),
            limit: 200,
            offset: 0,
        }
    }
}

impl CardQuery {
    fn to_query(&self) -> Query {
        let mut query = Query::new()
            .with("limit", self.limit)
            .with("offset", self.offset)
            .with_opt("board", self.board_id.as_deref())
            .with_opt("since", self.since.as_deref());
        if !self.only.is_empty() {
            query.push("only", self.only.join(","));
        }
        query
    }
}

/// Card, comment and attachment endpoints.
impl AgilePlaceClient {
    /// Cards with `pageMeta`.
    pub async fn list_cards(&self, query: &CardQuery) -> Result<JsonValue> {
        self.get("/card", query.to_query()).await
    }

    pub async fn get_card(&self, card_id: &str) -> Result<JsonValue> {
        self.get(&format!("/card/{}", path_segment(card_id)?), ()).await
    }

    /// Activity history; returns the `events` array.
    pub async fn get_card_activity(&self, card_id: &str, limit: u32) -> Result<JsonValue> {
        let response = self
            .get(
                &format!("/card/{}/activity", path_segment(card_id)?),
                Query::new().with("limit", limit),
            )
            .await?;
        Ok(take_list(response, "events"))
    }

    pub async fn create_card(&self, card: &NewCard) -> Result<JsonValue> {
        self.post("/card", card).await
    }

    /// Applies a partial update, e.g. `{"title": "...", "priority": "high"}`.
    pub async fn update_card(&self, card_id: &str, updates: &Updates) -> Result<JsonValue> {
        self.patch(&format!("/card/{}", path_segment(card_id)?), updates).await
    }

    /// Moves a card to `lane_id`, optionally at `position` within the lane.
    pub async fn move_card(
        &self,
        card_id: &str,
        lane_id: &str,
        position: Option<u32>,
    ) -> Result<JsonValue> {
        self.post(
            &format!("/card/{}/move", path_segment(card_id)?),
            &MoveBody { lane_id, position },
        )
        .await
    }

    pub async fn delete_card(&self, card_id: &str) -> Result<()> {
        self.delete(&format!("/card/{}", path_segment(card_id)?)).await?;
        Ok(())
    }

    /// Returns the `comments` array.
    pub async fn get_card_comments(&self, card_id: &str) -> Result<JsonValue> {
        let response = self.get(&format!("/card/{}/comment", path_segment(card_id)?), ()).await?;
        Ok(take_list(response, "comments"))
    }

    pub async fn create_comment(&self, card_id: &str, text: &str) -> Result<JsonValue> {
        self.post(&format!("/card/{}/comment", path_segment(card_id)?), &CommentBody { text })
            .await
    }

    pub async fn update_comment(
        &self,
        card_id: &str,
        comment_id: &str,
        text: &str,
    ) -> Result<JsonValue> {
        self.patch(
            &format!("/card/{}/comment/{}", path_segment(card_id)?, path_segment(comment_id)?),
            &CommentBody { text },
        )
        .await
    }

    pub async fn delete_comment(&self, card_id: &str, comment_id: &str) -> Result<()> {
        let (card_id, comment_id) = (path_segment(card_id)?, path_segment(comment_id)?);
        self.delete(&format!("/card/{card_id}/comment/{comment_id}"))
            .await?;
        Ok(())
    }

    /// Returns the `attachments` array.
    pub async fn list_card_attachments(&self, card_id: &str) -> Result<JsonValue> {
        let response = self
            .get(&format!("/card/{}/attachment", path_segment(card_id)?), ())
            .await?;
        Ok(take_list(response, "attachments"))
    }

    pub async fn delete_attachment(&self, card_id: &str, attachment_id: &str) -> Result<()> {
        let (card_id, attachment_id) = (path_segment(card_id)?, path_segment(attachment_id)?);
        self.delete(&format!("/card/{card_id}/attachment/{attachment_id}"))
            .await?;
        Ok(())
    }

    /// Assigns users and/or teams; empty slices are left out of the request.
    pub async fn assign_members(
        &self,
        card_id: &str,
        user_ids: &[String],
        team_ids: &[String],
    ) -> Result<JsonValue> {
        self.post(
            &format!("/card/{}/assignMembers", path_segment(card_id)?),
            &AssignMembersBody {
                assigned_user_ids: user_ids,
                assigned_team_ids: team_ids,
            },
        )
        .await
    }
}
