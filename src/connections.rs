use serde_json::Value as JsonValue;

use crate::{
    decode::take_list, types::path_segment, wire::BoardPairBody, AgilePlaceClient,
    CardConnections, NewChildCard, Query, Result,
};

/// Filters for [`AgilePlaceClient::get_card_children`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChildrenQuery {
    pub limit: u32,
    pub offset: u32,
    pub board_id: Option<String>,
    /// Comma-separated statuses: `notStarted`, `started`, `finished`.
    pub card_status: Option<String>,
}

impl Default for ChildrenQuery {
    fn default() -> Self {
        Self {
            limit: 200,
            offset: 0,
            board_id: None,
            card_status: None,
        }
    }
}

/// Parent/child connection endpoints.
impl AgilePlaceClient {
    pub async fn get_card_children(
        &self,
        card_id: &str,
        query: &ChildrenQuery,
    ) -> Result<JsonValue> {
        let params = Query::new()
            .with("limit", query.limit)
            .with("offset", query.offset)
            .with_opt("boardId", query.board_id.as_deref())
            .with_opt("cardStatus", query.card_status.as_deref());
        self.get(&format!("/card/{}/connection/children", path_segment(card_id)?), params)
            .await
    }

    /// Returns the `ids` array.
    pub async fn get_card_children_ids(&self, card_id: &str) -> Result<JsonValue> {
        let response = self
            .get(&format!("/card/{}/connection/children/ids", path_segment(card_id)?), ())
            .await?;
        Ok(take_list(response, "ids"))
    }

    pub async fn get_card_parents(
        &self,
        card_id: &str,
        limit: u32,
        offset: u32,
        board_id: Option<&str>,
    ) -> Result<JsonValue> {
        let params = Query::new()
            .with("limit", limit)
            .with("offset", offset)
            .with_opt("board", board_id);
        self.get(&format!("/card/{}/connection/parents", path_segment(card_id)?), params)
            .await
    }

    pub async fn get_connection_statistics(&self, card_id: &str) -> Result<JsonValue> {
        self.get(&format!("/card/{}/statistics", path_segment(card_id)?), ()).await
    }

    pub async fn create_connection(&self, parent_id: &str, child_id: &str) -> Result<JsonValue> {
        self.connect_cards(&CardConnections::children_of([parent_id], [child_id]))
            .await
    }

    pub async fn delete_connection(&self, parent_id: &str, child_id: &str) -> Result<()> {
        self.disconnect_cards(&CardConnections::children_of([parent_id], [child_id]))
            .await
    }

    pub async fn connect_cards(&self, connections: &CardConnections) -> Result<JsonValue> {
        self.post("/card/connections", connections).await
    }

    pub async fn disconnect_cards(&self, connections: &CardConnections) -> Result<()> {
        self.delete_with_body("/card/connections", connections)
            .await?;
        Ok(())
    }

    /// Creates a child card on `child.child_board_id` and links it to the parent.
    pub async fn connect_to_board(&self, child: &NewChildCard) -> Result<JsonValue> {
        self.post("/card/connectToBoard", child).await
    }

    /// Creates a child card on the parent's board and links it.
    pub async fn connect_same_board(&self, child: &NewChildCard) -> Result<JsonValue> {
        let child = NewChildCard {
            child_board_id: None,
            ..child.clone()
        };
        self.post("/card/connectSameBoard", &child).await
    }

    /// Removes every connection between cards on the two boards.
    pub async fn delete_connections_by_board(
        &self,
        parent_board_id: &str,
        child_board_id: &str,
    ) -> Result<()> {
        self.post(
            "/card/deleteConnectionsByBoard",
            &BoardPairBody {
                parent_board_id,
                child_board_id,
            },
        )
        .await?;
        Ok(())
    }

    /// Boards holding children of the card; returns the `connections` array.
    pub async fn get_child_boards(&self, card_id: &str) -> Result<JsonValue> {
        let response = self
            .get(&format!("/card/{}/connection", path_segment(card_id)?), ())
            .await?;
        Ok(take_list(response, "connections"))
    }

    pub async fn get_parent_boards(
        &self,
        card_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<JsonValue> {
        let params = Query::new().with("limit", limit).with("offset", offset);
        self.get(&format!("/card/{}/connection/parent-boards", path_segment(card_id)?), params)
            .await
    }

    pub async fn create_board_connection(
        &self,
        card_id: &str,
        board_id: &str,
    ) -> Result<JsonValue> {
        let (card_id, board_id) = (path_segment(card_id)?, path_segment(board_id)?);
        self.put_empty(&format!("/card/{card_id}/connection/{board_id}"))
            .await
    }

    pub async fn delete_board_connection(
        &self,
        card_id: &str,
        board_id: &str,
    ) -> Result<JsonValue> {
        let (card_id, board_id) = (path_segment(card_id)?, path_segment(board_id)?);
        self.delete(&format!("/card/{card_id}/connection/{board_id}"))
            .await
    }

    pub async fn create_same_board_connection(&self, card_id: &str) -> Result<JsonValue> {
        self.put_empty(&format!("/card/{}/connection/same", path_segment(card_id)?))
            .await
    }
}
