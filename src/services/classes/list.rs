use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::models::{
    ApiResponse, PaginationInfo,
    classes::{
        entities::Class,
        requests::{ClassListQuery, ClassQueryParams},
        responses::ClassListResponse,
    },
    users::entities::UserRole,
};
use crate::services::{current_user, or_respond, storage_error_response};

pub async fn list_classes(
    service: &ClassService,
    request: &HttpRequest,
    query: ClassQueryParams,
) -> ActixResult<HttpResponse> {
    let user = or_respond!(current_user(request));
    let storage = service.get_storage(request)?;
    let (page, size) = query.pagination.clamped();

    if user.role == UserRole::Admin {
        let list_query = ClassListQuery {
            page,
            size,
            search: query.search,
        };
        return match storage.list_classes_with_pagination(list_query).await {
            Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Class list retrieved",
            ))),
            Err(e) => Ok(storage_error_response("Failed to list classes", &e)),
        };
    }

    match storage.list_user_classes(user.id).await {
        Ok(classes) => {
            let response = paginate_classes(classes, query.search.as_deref(), page, size);
            Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Class list retrieved")))
        }
        Err(e) => Ok(storage_error_response("Failed to list classes", &e)),
    }
}

/// 对用户所在班级做内存分页与名称搜索
fn paginate_classes(
    classes: Vec<Class>,
    search: Option<&str>,
    page: i64,
    size: i64,
) -> ClassListResponse {
    let filtered: Vec<Class> = match search.map(str::trim).filter(|s| !s.is_empty()) {
        Some(keyword) => classes
            .into_iter()
            .filter(|class| class.name.contains(keyword))
            .collect(),
        None => classes,
    };

    let total = filtered.len() as i64;
    let items = filtered
        .into_iter()
        .skip(((page - 1) * size) as usize)
        .take(size as usize)
        .collect();

    ClassListResponse {
        pagination: PaginationInfo::new(page, size, total),
        items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(id: i64, name: &str) -> Class {
        let now = chrono::Utc::now();
        Class {
            id,
            name: name.to_string(),
            description: None,
            teacher_id: 1,
            invite_code: "ABCD1234".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_paginate_classes() {
        let classes = (1..=5).map(|i| class(i, &format!("초급 {i}반"))).collect();
        let response = paginate_classes(classes, None, 2, 2);
        assert_eq!(response.pagination.total, 5);
        assert_eq!(response.pagination.total_pages, 3);
        let ids: Vec<i64> = response.items.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![3, 4]);
    }

    #[test]
    fn test_paginate_classes_with_search() {
        let classes = vec![class(1, "초급 A"), class(2, "중급 B"), class(3, "초급 C")];
        let response = paginate_classes(classes, Some(" 초급 "), 1, 10);
        assert_eq!(response.pagination.total, 2);
        assert_eq!(response.pagination.total_pages, 1);
    }

    #[test]
    fn test_paginate_empty_list() {
        let response = paginate_classes(Vec::new(), None, 1, 10);
        assert_eq!(response.pagination.total, 0);
        assert_eq!(response.pagination.total_pages, 0);
        assert!(response.items.is_empty());
    }
}
