use serde::{Deserialize, Serialize};

/// RBAC permissions the drinks API requires, as configured for the `coffee`
/// audience in the Auth0 dashboard.
pub mod permissions {
    pub const GET_DRINKS_DETAIL: &str = "get:drinks-detail";
    pub const POST_DRINKS: &str = "post:drinks";
    pub const PATCH_DRINKS: &str = "patch:drinks";
    pub const DELETE_DRINKS: &str = "delete:drinks";
}

/// One ingredient of a drink's recipe, in the full ("long") representation
/// the API serves to baristas and managers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Display color of this layer in the frontend's drink graphic.
    pub color: String,

    /// Ingredient name, e.g. "milk".
    pub name: String,

    /// Number of parts this ingredient contributes to the drink.
    pub parts: i64,
}

/// The public ("short") ingredient representation. The ingredient name is
/// withheld, recipes are the shop's secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortIngredient {
    pub color: String,
    pub parts: i64,
}

impl From<&Ingredient> for ShortIngredient {
    fn from(value: &Ingredient) -> Self {
        Self {
            color: value.color.clone(),
            parts: value.parts,
        }
    }
}

/// A drink as served by the detail endpoints, with the full recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drink {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

/// A drink as served by the public listing, with the shortened recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrinkSummary {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<ShortIngredient>,
}

/// Payload for creating a drink. The API insists on the full recipe
/// representation, every ingredient must carry `color`, `name` and `parts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDrink {
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

/// Payload for partially updating a drink. Absent fields are left untouched
/// by the API.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DrinkUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe: Option<Vec<Ingredient>>,
}

/// Success envelope of all drink read/write endpoints:
/// `{ "success": true, "drinks": [...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrinksEnvelope<D> {
    pub success: bool,
    pub drinks: Vec<D>,
}

/// Success envelope of the delete endpoint:
/// `{ "success": true, "delete": id }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteEnvelope {
    pub success: bool,
    pub delete: i64,
}

/// Error body the API attaches to non-2xx responses:
/// `{ "success": false, "error": 404, "message": "Resource not found" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub success: bool,
    pub error: u16,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use assertr::prelude::*;
    use serde_json::json;

    use super::{Drink, DrinkSummary, DrinkUpdate, DrinksEnvelope, Ingredient, ShortIngredient};

    fn water() -> Drink {
        Drink {
            id: 1,
            title: "Water".to_owned(),
            recipe: vec![Ingredient {
                color: "blue".to_owned(),
                name: "water".to_owned(),
                parts: 1,
            }],
        }
    }

    #[test]
    fn long_representation_matches_the_api_shape() {
        assert_that(serde_json::to_value(water()).unwrap()).is_equal_to(json!({
            "id": 1,
            "title": "Water",
            "recipe": [{ "color": "blue", "name": "water", "parts": 1 }],
        }));
    }

    #[test]
    fn short_representation_withholds_ingredient_names() {
        let summary = DrinkSummary {
            id: 1,
            title: "Water".to_owned(),
            recipe: water().recipe.iter().map(ShortIngredient::from).collect(),
        };
        assert_that(serde_json::to_value(summary).unwrap()).is_equal_to(json!({
            "id": 1,
            "title": "Water",
            "recipe": [{ "color": "blue", "parts": 1 }],
        }));
    }

    #[test]
    fn envelope_decodes_drink_list() {
        let envelope = serde_json::from_value::<DrinksEnvelope<Drink>>(json!({
            "success": true,
            "drinks": [{
                "id": 1,
                "title": "Water",
                "recipe": [{ "color": "blue", "name": "water", "parts": 1 }],
            }],
        }))
        .unwrap();
        assert_that(envelope.success).is_true();
        assert_that(envelope.drinks).is_equal_to(vec![water()]);
    }

    #[test]
    fn recipe_without_name_is_not_a_valid_long_recipe() {
        let result = serde_json::from_value::<Ingredient>(json!({ "color": "blue", "parts": 1 }));
        assert_that(result.is_err()).is_true();
    }

    #[test]
    fn update_payload_omits_absent_fields() {
        let update = DrinkUpdate {
            title: Some("Sparkling Water".to_owned()),
            recipe: None,
        };
        assert_that(serde_json::to_value(update).unwrap())
            .is_equal_to(json!({ "title": "Sparkling Water" }));
    }
}
