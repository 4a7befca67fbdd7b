/// Liveness check, answers any method without authentication
pub async fn ping_handler() -> &'static str {
    "OK"
}
