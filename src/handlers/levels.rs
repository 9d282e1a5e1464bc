use crate::database::models::level::Level;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::level::LevelTable;

/// GET /api/levels - the full level ladder, lowest level first
pub async fn levels_get() -> ApiResult<Vec<Level>> {
    let table = LevelTable::global_or_load().await?;
    Ok(ApiResponse::success(table.entries().to_vec()))
}
