//! Smoke test against a running server.
//!
//! Drives the real submit flows end to end: register, log in, then add,
//! edit, and delete a task. Point it at the server with `TASKS_URL`
//! (defaults to `http://localhost:8080`).

use std::env;

use reqwest::Client;
use tasklist_client::{Field, FormPage, HttpTransport, submit_login, submit_register};

struct PrintPage;

impl FormPage for PrintPage {
    fn clear_errors(&mut self) {}

    fn show_field_error(&mut self, field: Field, message: &str) {
        println!("  field error on {field:?}: {message}");
    }

    fn alert(&mut self, message: &str) {
        println!("  alert: {message}");
    }

    fn navigate(&mut self, url: &str) {
        println!("  -> navigate to {url}");
    }
}

#[tokio::main]
async fn main() {
    let base = env::var("TASKS_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());

    // Cookie store so the login session carries into the task requests.
    let client = Client::builder().cookie_store(true).build().unwrap();
    let transport = HttpTransport::with_client(client.clone(), base.clone());
    let mut page = PrintPage;

    let credentials = vec![
        ("username".to_string(), "smoketest".to_string()),
        ("password".to_string(), "Sm0ke!test".to_string()),
    ];
    let mut registration = credentials.clone();
    registration.push(("confirmPassword".to_string(), "Sm0ke!test".to_string()));

    println!("registering...");
    submit_register(&transport, &mut page, &registration).await;

    println!("logging in...");
    submit_login(&transport, &mut page, &credentials).await;

    println!("adding a task...");
    let response = client
        .post(format!("{base}/add"))
        .form(&[("title", "try the tester")])
        .send()
        .await
        .unwrap();
    println!("  {}", response.status());

    println!("editing task 1...");
    let response = client
        .post(format!("{base}/edit"))
        .form(&[
            ("id", "1"),
            ("title", "try the tester again"),
            ("status", "Completed"),
        ])
        .send()
        .await
        .unwrap();
    println!("  {}", response.status());

    println!("listing tasks...");
    let body = client
        .get(format!("{base}/tasks"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    println!(
        "  page mentions the task: {}",
        body.contains("try the tester again")
    );

    println!("deleting task 1...");
    let response = client
        .get(format!("{base}/delete?id=1"))
        .send()
        .await
        .unwrap();
    println!("  {}", response.status());
}
