use axum::{
    routing::{get, post},
    Router,
};
use lambda_http::{run, Error};
use circulation::calendar::controller::{add_opening_day, find_adjacent_windows, remove_opening_day};
use circulation::core::controller::AppState;
use circulation::core::domain::Configuration;
use circulation::core::repository::RepositoryStore;
use circulation::utils::ddb::setup_tracing;

const DEV_MODE: bool = true;

#[tokio::main]
async fn main() -> Result<(), Error> {
    setup_tracing();

    let time_zone = std::env::var("LIBRARY_TIME_ZONE").unwrap_or_else(|_| "UTC".to_string());
    let state = if DEV_MODE {
        std::env::set_var("AWS_LAMBDA_FUNCTION_NAME", "_");
        std::env::set_var("AWS_LAMBDA_FUNCTION_MEMORY_SIZE", "4096");
        std::env::set_var("AWS_LAMBDA_FUNCTION_VERSION", "1");
        std::env::set_var("AWS_LAMBDA_RUNTIME_API", "http://[::]:9000/.rt");
        let store = RepositoryStore::from(
            std::env::var("REPOSITORY_STORE").unwrap_or_else(|_| "LocalDynamoDB".to_string()));
        AppState::new(Configuration::new("dev").with_time_zone(time_zone.as_str()), store)
    } else {
        AppState::new(Configuration::new("prod").with_time_zone(time_zone.as_str()), RepositoryStore::DynamoDB)
    };

    let app = Router::new()
        .route("/calendar/opening-days", post(add_opening_day))
        .route("/calendar/:service_point_id/:date",
               get(find_adjacent_windows).delete(remove_opening_day))
        .with_state(state);

    run(app).await
}
