use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::subscription::list_subscriptions,
        handlers::subscription::get_subscription,
        handlers::subscription::create_subscription,
        handlers::subscription::update_subscription,
        handlers::subscription::toggle_paused,
        handlers::subscription::cancel_subscription,
    ),
    components(
        schemas(
            Subscription,
            SubscriptionPayload,
            SubscriptionType,
            SubscriptionStatus,
            ApiError,
            SubscriptionApiResponse,
            SubscriptionListApiResponse,
        )
    ),
    tags(
        (name = "subscription", description = "Subscription lifecycle API"),
    ),
    info(
        title = "Subscription API",
        version = "0.1.0",
        description = "Telephony subscriptions keyed by msisdn"
    ),
    servers(
        (url = "/api/0.1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_subscription_routes() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        assert!(paths.iter().any(|p| p.as_str() == "/subscriptions"));
        assert!(paths.iter().any(|p| p.as_str() == "/subscriptions/{msisdn}/toggle_paused"));
        assert!(paths.iter().any(|p| p.as_str() == "/subscriptions/{msisdn}/cancel"));
    }
}
