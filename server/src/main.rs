#[tokio::main]
async fn main() {
    tasklist::start_server().await;
}
