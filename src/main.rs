#[actix_web::main]
async fn main() {
    if let Err(e) = workorder_risk_lib::run().await {
        eprintln!("workorder-risk: {}", e);
        std::process::exit(1);
    }
}
