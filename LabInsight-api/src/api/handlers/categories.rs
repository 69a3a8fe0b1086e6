use axum::extract::{Json, Path, State};
use tracing::{info, instrument};

use lab_insight_domain::entities::{Category, CategoryProfile};

use crate::api::handlers::reports::ReportService;
use crate::entities::common::ErrorResponse;

/// Strict lookup by category id, unlike the lenient domain conversion
fn parse_category(raw: &str) -> Option<Category> {
    let raw = raw.trim();
    Category::ALL
        .into_iter()
        .find(|c| c.as_str().eq_ignore_ascii_case(raw))
}

/// Reference data, trend and population curve for a health category
#[utoipa::path(
    get,
    path = "/api/v1/categories/{category}",
    params(
        ("category" = String, Path, description = "diabetes, heart, kidney, thyroid, liver or general")
    ),
    responses(
        (status = 200, description = "Category profile", body = CategoryProfile),
        (status = 404, description = "Unknown category", body = ErrorResponse),
    ),
    tag = "categories"
)]
#[instrument(skip(service))]
pub async fn get_category_profile(
    State(service): State<ReportService>,
    Path(category): Path<String>,
) -> Result<Json<CategoryProfile>, ErrorResponse> {
    let category = parse_category(&category).ok_or_else(|| ErrorResponse::not_found("category"))?;
    info!("Building profile for {}", category);
    Ok(Json(service.category_profile(category)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_category() {
        assert_eq!(parse_category("Thyroid"), Some(Category::Thyroid));
        assert_eq!(parse_category(" general "), Some(Category::General));
        assert_eq!(parse_category("lungs"), None);
    }
}
