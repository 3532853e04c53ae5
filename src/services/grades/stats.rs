use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::debug;

use super::{
    GradeService,
    summary::{build_class_stats, load_class_summaries},
};
use crate::cache::class_grade_stats_key;
use crate::models::{ApiResponse, grades::responses::ClassGradeStatsResponse};
use crate::services::{
    access::{forbidden, resolve_class_access},
    cache_from_request, current_user, or_respond,
};

pub async fn get_class_stats(
    service: &GradeService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let user = or_respond!(current_user(request));
    let storage = service.get_storage(request)?;

    let (_, access) = or_respond!(resolve_class_access(&storage, &user, class_id).await);
    if !access.can_view_grades() {
        return Ok(forbidden("You cannot view the statistics of this class"));
    }

    let cache = cache_from_request(request)?;
    let cache_key = class_grade_stats_key(class_id);

    if let Some(stats) = cache
        .get_json::<ClassGradeStatsResponse>(&cache_key)
        .await
    {
        debug!("Grade statistics of class {} served from cache", class_id);
        return Ok(HttpResponse::Ok().json(ApiResponse::success(
            stats,
            "Class statistics retrieved",
        )));
    }

    let weights = or_respond!(service.get_weights());
    let summaries = or_respond!(load_class_summaries(&storage, class_id, &weights).await);
    let stats = build_class_stats(class_id, &weights, &summaries);

    cache.insert_json(cache_key, &stats, 0).await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        stats,
        "Class statistics retrieved",
    )))
}
