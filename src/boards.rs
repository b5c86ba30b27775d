use serde_json::Value as JsonValue;

use crate::{
    decode::take_list, types::path_segment, AgilePlaceClient, NewBoard, Query, Result, Updates,
};

/// Filters for [`AgilePlaceClient::list_boards`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardQuery {
    /// Title filter.
    pub search: Option<String>,
    pub limit: u32,
    pub offset: u32,
    /// Include archived boards.
    pub archived: bool,
}

impl Default for BoardQuery {
    fn default() -> Self {
        Self {
            search: None,
            limit: 200,
            offset: 0,
            archived: false,
        }
    }
}

impl BoardQuery {
    fn to_query(&self) -> Query {
        let query = Query::new()
            .with("limit", self.limit)
            .with("offset", self.offset)
            .with_opt("search", self.search.as_deref());
        if self.archived {
            query.with("archived", true)
        } else {
            query
        }
    }
}

/// Filters for [`AgilePlaceClient::get_board_cards`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardCardsQuery {
    pub lanes: Vec<String>,
    pub cards: Vec<String>,
    pub limit: u32,
    pub offset: u32,
    /// Include cards past the board's archive date.
    pub ignore_archive_date: bool,
}

impl Default for BoardCardsQuery {
    fn default() -> Self {
        Self {
            lanes: Vec::new(),
            cards: Vec::new(),
            limit: 200,
            offset: 0,
            ignore_archive_date: false,
        }
    }
}

impl BoardCardsQuery {
    fn to_query(&self) -> Query {
        let mut query = Query::new()
            .with("limit", self.limit)
            .with("offset", self.offset);
        // The API takes id filters as one comma-separated value.
        if !self.lanes.is_empty() {
            query.push("lanes", self.lanes.join(","));
        }
        if !self.cards.is_empty() {
            query.push("cards", self.cards.join(","));
        }
        if self.ignore_archive_date {
            query.push("ignoreArchiveDate", true);
        }
        query
    }
}

/// Board endpoints.
impl AgilePlaceClient {
    /// Lists boards visible to the token's user; returns the `boards` array.
    pub async fn list_boards(&self, query: &BoardQuery) -> Result<JsonValue> {
        let response = self.get("/board", query.to_query()).await?;
        Ok(take_list(response, "boards"))
    }

    /// Board details including lanes, card types and custom fields.
    pub async fn get_board(&self, board_id: &str) -> Result<JsonValue> {
        self.get(&format!("/board/{}", path_segment(board_id)?), ()).await
    }

    /// Card faces for a board, with `cards` and `pageMeta`.
    pub async fn get_board_cards(
        &self,
        board_id: &str,
        query: &BoardCardsQuery,
    ) -> Result<JsonValue> {
        self.get(&format!("/board/{}/card", path_segment(board_id)?), query.to_query())
            .await
    }

    /// Lanes that can hold cards; returns the `lanes` array.
    pub async fn get_leaf_lanes(&self, board_id: &str) -> Result<JsonValue> {
        let response = self
            .get(&format!("/board/{}/leafLanes", path_segment(board_id)?), ())
            .await?;
        Ok(take_list(response, "lanes"))
    }

    /// Card counts and sizes per lane; all lanes when `lanes` is empty.
    pub async fn get_lane_counts(&self, board_id: &str, lanes: &[String]) -> Result<JsonValue> {
        let mut query = Query::new();
        if !lanes.is_empty() {
            query.push("lanes", lanes.join(","));
        }
        self.get(&format!("/board/{}/laneCount", path_segment(board_id)?), query)
            .await
    }

    pub async fn create_board(&self, board: &NewBoard) -> Result<JsonValue> {
        self.post("/board", board).await
    }

    pub async fn update_board(&self, board_id: &str, updates: &Updates) -> Result<JsonValue> {
        self.patch(&format!("/board/{}", path_segment(board_id)?), updates).await
    }

    pub async fn archive_board(&self, board_id: &str) -> Result<()> {
        self.post_empty(&format!("/board/{}/archive", path_segment(board_id)?))
            .await?;
        Ok(())
    }

    pub async fn unarchive_board(&self, board_id: &str) -> Result<()> {
        self.post_empty(&format!("/board/{}/unarchive", path_segment(board_id)?))
            .await?;
        Ok(())
    }

    pub async fn delete_board(&self, board_id: &str) -> Result<()> {
        self.delete(&format!("/board/{}", path_segment(board_id)?)).await?;
        Ok(())
    }

    /// Assigned users and teams; returns the `members` array.
    pub async fn get_board_members(
        &self,
        board_id: &str,
        search: Option<&str>,
    ) -> Result<JsonValue> {
        let query = Query::new().with_opt("search", search);
        let response = self
            .get(&format!("/board/{}/members", path_segment(board_id)?), query)
            .await?;
        Ok(take_list(response, "members"))
    }

    /// Recent board events, paging towards older events from `event_id`.
    pub async fn get_board_activity(
        &self,
        board_id: &str,
        limit: u32,
        event_id: Option<&str>,
    ) -> Result<JsonValue> {
        let query = Query::new()
            .with("limit", limit)
            .with("direction", "older")
            .with_opt("eventId", event_id);
        let response = self
            .get(&format!("/board/{}/activity", path_segment(board_id)?), query)
            .await?;
        Ok(take_list(response, "events"))
    }

    /// Card types configured on a board.
    pub async fn list_card_types(&self, board_id: &str) -> Result<JsonValue> {
        Ok(take_list(self.get_board(board_id).await?, "cardTypes"))
    }

    /// Tags in use on a board.
    pub async fn list_tags(&self, board_id: &str) -> Result<JsonValue> {
        Ok(take_list(self.get_board(board_id).await?, "tags"))
    }
}
