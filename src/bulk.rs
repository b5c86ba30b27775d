use serde_json::{json, Value as JsonValue};

use crate::{
    wire::{BulkUpdateBody, CardIdsBody, CardsWithRelationshipsBody, GrantAccessBody, MovesBody},
    AgilePlaceClient, BoardAccess, BoardRole, CardMove, Result, Updates,
};

/// Multi-card and multi-board endpoints.
///
/// Relationship payloads (`operations`, `dependencies`, `cardRelationships`)
/// are forwarded as given.
impl AgilePlaceClient {
    /// Applies the same field values to every card in `card_ids`.
    pub async fn update_cards_bulk(
        &self,
        card_ids: &[String],
        updates: &Updates,
    ) -> Result<JsonValue> {
        self.post("/card/bulk", &BulkUpdateBody { card_ids, updates })
            .await
    }

    pub async fn delete_cards_bulk(&self, card_ids: &[String]) -> Result<()> {
        self.post("/card/deleteMany", &CardIdsBody { card_ids })
            .await?;
        Ok(())
    }

    pub async fn move_cards_bulk(&self, moves: &[CardMove]) -> Result<JsonValue> {
        self.post("/card/bulk/move", &MovesBody { moves }).await
    }

    /// Grants `role` on every board to every listed user and team.
    pub async fn assign_board_members(&self, access: &BoardAccess, role: BoardRole) -> Result<()> {
        self.post(
            "/board/access",
            &GrantAccessBody {
                access,
                board_role: role,
            },
        )
        .await?;
        Ok(())
    }

    /// Revokes access; removed users lose their card assignments on those boards.
    pub async fn remove_board_members(&self, access: &BoardAccess) -> Result<()> {
        self.delete_with_body("/board/access", access).await?;
        Ok(())
    }

    /// Creates cards from raw card objects (each with a `destination`).
    pub async fn create_cards_bulk(&self, cards: &[JsonValue]) -> Result<JsonValue> {
        self.post("/card/bulk/create", &json!({ "cards": cards }))
            .await
    }

    /// Creates cards and links them in one call. `relationships` refers to the
    /// new cards by index (`parentChild`, `dependencies`).
    pub async fn create_cards_with_relationships_bulk(
        &self,
        cards: &[JsonValue],
        relationships: Option<&JsonValue>,
    ) -> Result<JsonValue> {
        self.post(
            "/card/bulk/create-with-relationships",
            &CardsWithRelationshipsBody {
                cards,
                relationships,
            },
        )
        .await
    }

    pub async fn manage_connections_bulk(&self, operations: &JsonValue) -> Result<JsonValue> {
        self.post(
            "/card/connections/bulk",
            &json!({ "operations": operations }),
        )
        .await
    }

    pub async fn manage_dependencies_bulk(&self, dependencies: &JsonValue) -> Result<JsonValue> {
        self.post(
            "/card/dependencies/bulk",
            &json!({ "dependencies": dependencies }),
        )
        .await
    }

    pub async fn update_card_relationships_bulk(
        &self,
        card_relationships: &JsonValue,
    ) -> Result<JsonValue> {
        self.post(
            "/card/relationships/bulk",
            &json!({ "cardRelationships": card_relationships }),
        )
        .await
    }
}
