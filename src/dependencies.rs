use serde_json::Value as JsonValue;

use crate::{
    decode::take_list,
    types::path_segment,
    wire::{DependencyBody, DependencyUpdateBody},
    AgilePlaceClient, DependencyType, Result,
};

/// Card dependency endpoints.
impl AgilePlaceClient {
    /// Dependencies in both directions; returns the `dependencies` array.
    pub async fn get_card_dependencies(&self, card_id: &str) -> Result<JsonValue> {
        let response = self
            .get(&format!("/card/{}/dependencies", path_segment(card_id)?), ())
            .await?;
        Ok(take_list(response, "dependencies"))
    }

    /// Makes `card_id` depend on `depends_on_card_id`.
    pub async fn create_dependency(
        &self,
        card_id: &str,
        depends_on_card_id: &str,
        dependency_type: DependencyType,
    ) -> Result<JsonValue> {
        self.post(
            "/card/dependency",
            &DependencyBody {
                card_id,
                depends_on_card_id,
                dependency_type,
            },
        )
        .await
    }

    pub async fn update_dependency(
        &self,
        dependency_id: &str,
        dependency_type: Option<DependencyType>,
    ) -> Result<JsonValue> {
        self.patch(
            &format!("/card/dependency/{}", path_segment(dependency_id)?),
            &DependencyUpdateBody { dependency_type },
        )
        .await
    }

    pub async fn delete_dependency(&self, dependency_id: &str) -> Result<()> {
        self.delete(&format!("/card/dependency/{}", path_segment(dependency_id)?))
            .await?;
        Ok(())
    }
}
