use actix_web::{web, HttpResponse, Result, ResponseError};

use crate::error::AppError;
use crate::models::*;
use crate::services::SubscriptionService;

#[utoipa::path(
    get,
    path = "/subscriptions",
    tag = "subscription",
    responses(
        (status = 200, description = "All subscriptions with operator", body = SubscriptionListApiResponse),
        (status = 500, description = "Operator lookup failed")
    )
)]
pub async fn list_subscriptions(
    subscription_service: web::Data<SubscriptionService>,
) -> Result<HttpResponse> {
    match subscription_service.list().await {
        Ok(subscriptions) => Ok(HttpResponse::Ok().json(ApiResponse::success(subscriptions))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/subscriptions/{msisdn}",
    tag = "subscription",
    params(("msisdn" = String, Path, description = "Subscriber number")),
    responses(
        (status = 200, description = "Subscription with operator", body = SubscriptionApiResponse),
        (status = 404, description = "Subscription not found"),
        (status = 500, description = "Operator lookup failed")
    )
)]
pub async fn get_subscription(
    subscription_service: web::Data<SubscriptionService>,
    msisdn: web::Path<String>,
) -> Result<HttpResponse> {
    match subscription_service.get(&msisdn).await {
        Ok(subscription) => Ok(HttpResponse::Ok().json(ApiResponse::success(subscription))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/subscriptions",
    tag = "subscription",
    request_body = SubscriptionPayload,
    responses(
        (status = 200, description = "Subscription created", body = SubscriptionApiResponse),
        (status = 400, description = "Invalid subscription"),
        (status = 409, description = "An activated subscription already exists"),
        (status = 500, description = "Operator lookup failed")
    )
)]
pub async fn create_subscription(
    subscription_service: web::Data<SubscriptionService>,
    request: web::Json<SubscriptionPayload>,
) -> Result<HttpResponse> {
    match subscription_service.create(request.into_inner()).await {
        Ok(subscription) => Ok(HttpResponse::Ok().json(ApiResponse::success(subscription))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/subscriptions/{msisdn}",
    tag = "subscription",
    params(("msisdn" = String, Path, description = "Subscriber number")),
    request_body = SubscriptionPayload,
    responses(
        (status = 200, description = "Subscription updated", body = SubscriptionApiResponse),
        (status = 400, description = "Invalid update"),
        (status = 404, description = "Subscription not found")
    )
)]
pub async fn update_subscription(
    subscription_service: web::Data<SubscriptionService>,
    msisdn: web::Path<String>,
    request: web::Json<SubscriptionPayload>,
) -> Result<HttpResponse> {
    let mut payload = request.into_inner();
    let msisdn = msisdn.into_inner();

    // The path names the record; a body msisdn is optional but must agree.
    if *payload.msisdn.get_or_insert_with(|| msisdn.clone()) != msisdn {
        return Ok(
            AppError::ValidationError("msisdn in body does not match path".to_string())
                .error_response(),
        );
    }

    match subscription_service.update(payload).await {
        Ok(subscription) => Ok(HttpResponse::Ok().json(ApiResponse::success(subscription))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/subscriptions/{msisdn}/toggle_paused",
    tag = "subscription",
    params(("msisdn" = String, Path, description = "Subscriber number")),
    responses(
        (status = 200, description = "Subscription paused or resumed", body = SubscriptionApiResponse),
        (status = 404, description = "Subscription not found")
    )
)]
pub async fn toggle_paused(
    subscription_service: web::Data<SubscriptionService>,
    msisdn: web::Path<String>,
) -> Result<HttpResponse> {
    match subscription_service.toggle_paused(&msisdn).await {
        Ok(subscription) => Ok(HttpResponse::Ok().json(ApiResponse::success(subscription))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/subscriptions/{msisdn}/cancel",
    tag = "subscription",
    params(("msisdn" = String, Path, description = "Subscriber number")),
    responses(
        (status = 200, description = "Subscription cancelled", body = SubscriptionApiResponse),
        (status = 404, description = "Subscription not found")
    )
)]
pub async fn cancel_subscription(
    subscription_service: web::Data<SubscriptionService>,
    msisdn: web::Path<String>,
) -> Result<HttpResponse> {
    match subscription_service.cancel(&msisdn).await {
        Ok(subscription) => Ok(HttpResponse::Ok().json(ApiResponse::success(subscription))),
        Err(e) => Ok(e.error_response()),
    }
}

/// Undecodable bodies are reported like any other validation failure.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into())
}

pub fn subscription_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/subscriptions")
            .app_data(json_config())
            .route("", web::get().to(list_subscriptions))
            .route("", web::post().to(create_subscription))
            .route("/{msisdn}", web::get().to(get_subscription))
            .route("/{msisdn}", web::put().to(update_subscription))
            .route("/{msisdn}/toggle_paused", web::post().to(toggle_paused))
            .route("/{msisdn}/cancel", web::post().to(cancel_subscription)),
    );
}
