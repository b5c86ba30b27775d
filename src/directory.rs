use serde_json::Value as JsonValue;

use crate::{decode::take_list, types::path_segment, AgilePlaceClient, Query, Result};

/// User, team and organization lookups.
impl AgilePlaceClient {
    /// Users with `pageMeta`, sorted by last name.
    pub async fn list_users(
        &self,
        search: Option<&str>,
        limit: u32,
        offset: u32,
    ) -> Result<JsonValue> {
        let query = Query::new()
            .with("limit", limit)
            .with("offset", offset)
            .with("sortBy", "lastName")
            .with_opt("search", search);
        self.get("/user", query).await
    }

    pub async fn get_user(&self, user_id: &str) -> Result<JsonValue> {
        self.get(&format!("/user/{}", path_segment(user_id)?), ()).await
    }

    pub async fn get_current_user(&self) -> Result<JsonValue> {
        self.get("/user/me", ()).await
    }

    /// Boards and settings of the current user.
    pub async fn get_user_context(&self) -> Result<JsonValue> {
        self.get("/user/me/context", ()).await
    }

    pub async fn list_teams(
        &self,
        search: Option<&str>,
        limit: u32,
        offset: u32,
    ) -> Result<JsonValue> {
        let query = Query::new()
            .with("limit", limit)
            .with("offset", offset)
            .with_opt("search", search);
        self.get("/team", query).await
    }

    pub async fn get_team(&self, team_id: &str) -> Result<JsonValue> {
        self.get(&format!("/team/{}", path_segment(team_id)?), ()).await
    }

    pub async fn list_team_users(&self, team_id: &str, limit: u32, offset: u32) -> Result<JsonValue> {
        let query = Query::new().with("limit", limit).with("offset", offset);
        self.get(&format!("/team/{}/users", path_segment(team_id)?), query).await
    }

    pub async fn list_team_boards(
        &self,
        team_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<JsonValue> {
        let query = Query::new().with("limit", limit).with("offset", offset);
        self.get(&format!("/team/{}/boards", path_segment(team_id)?), query).await
    }

    /// Returns the `teams` array.
    pub async fn list_team_subteams(&self, team_id: &str) -> Result<JsonValue> {
        let response = self.get(&format!("/team/{}/subTeams", path_segment(team_id)?), ()).await?;
        Ok(take_list(response, "teams"))
    }

    pub async fn get_organization(&self) -> Result<JsonValue> {
        self.get("/organization", ()).await
    }
}
